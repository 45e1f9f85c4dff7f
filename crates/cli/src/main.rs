use std::path::{Path, PathBuf};

use {
    clap::Parser,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
    viewshot_capture::{
        CaptureConfig, CaptureError, CaptureRunner, NoProgress, ProgressSink, RunSummary, device,
    },
};

#[derive(Debug, Parser)]
#[command(
    name = "viewshot",
    about = "Capture full-page screenshots of a URL across device viewports"
)]
struct Cli {
    /// Target URL to capture.
    url: String,

    /// Comma-separated device list (mobile, tablet, laptop, desktop).
    /// Case-insensitive; unknown names are dropped. All devices when
    /// omitted.
    #[arg(long, value_name = "LIST")]
    device: Option<String>,

    /// Directory screenshots are written to.
    #[arg(long, default_value = "screenshots", value_name = "DIR")]
    out_dir: PathBuf,

    /// Path to a Chrome/Chromium binary (auto-detected if not set).
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<String>,

    /// Print the run summary as JSON instead of progress lines.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Prints the progress lines users see; tracing carries the diagnostics.
struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn navigation_started(&self, device: &str, url: &str) {
        println!("🌐 Navigating to {url} for {device}...");
    }

    fn height_measured(&self, device: &str, height: u64) {
        println!("📜 Total scroll height for {device}: {height}px");
    }

    fn capturing_segment(&self, device: &str, index: usize, offset: u64) {
        println!("📸 Capturing {device}, part {index} at scrollY {offset}px");
    }

    fn device_failed(&self, device: &str, error: &CaptureError) {
        eprintln!("⚠️  {device} failed: {error}");
    }
}

/// Usage errors (missing URL, malformed flags) exit 1 to match the
/// device-filter path; help and version displays exit 0.
fn usage_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn parse_cli() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        let code = usage_exit_code(&e);
        let _ = e.print();
        std::process::exit(code);
    })
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Logs go to stderr so stdout stays a clean progress stream.
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_summary(summary: &RunSummary, out_dir: &Path) {
    println!();
    for outcome in &summary.outcomes {
        match &outcome.error {
            None => println!("  {}: {} segment(s)", outcome.device, outcome.segments),
            Some(e) => println!("  {}: failed ({e})", outcome.device),
        }
    }
    if summary.all_succeeded() {
        println!("✅ All screenshots saved to {}", out_dir.display());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    init_logging(&cli.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "viewshot starting");

    // Device selection fails before any browser is launched.
    let devices = device::select_devices(cli.device.as_deref())?;

    let config = CaptureConfig {
        url: cli.url,
        devices,
        output_dir: cli.out_dir.clone(),
        chrome_path: cli.chrome_path,
        ..Default::default()
    };

    let runner = CaptureRunner::new(config)?;
    let summary = if cli.json {
        // JSON mode keeps stdout to the summary document alone.
        runner.run(&NoProgress).await?
    } else {
        runner.run(&ConsoleProgress).await?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &cli.out_dir);
    }

    if !summary.all_succeeded() {
        anyhow::bail!("{} device pass(es) failed", summary.failed_count());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn url_argument_is_required() {
        assert!(Cli::try_parse_from(["viewshot"]).is_err());
    }

    #[test]
    fn missing_url_exits_one() {
        let err = Cli::try_parse_from(["viewshot"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn help_exits_zero() {
        let err = Cli::try_parse_from(["viewshot", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 0);
    }

    #[test]
    fn device_flag_equals_form() {
        let cli = Cli::try_parse_from(["viewshot", "https://example.com", "--device=mobile,tablet"])
            .unwrap();
        assert_eq!(cli.device.as_deref(), Some("mobile,tablet"));
        assert_eq!(cli.out_dir, PathBuf::from("screenshots"));
    }

    #[test]
    fn out_dir_override() {
        let cli =
            Cli::try_parse_from(["viewshot", "https://example.com", "--out-dir", "/tmp/shots"])
                .unwrap();
        assert_eq!(cli.out_dir, PathBuf::from("/tmp/shots"));
    }
}
