//! The sequential per-device scroll-and-capture loop.

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use {
    chromiumoxide::{
        Page, cdp::browser_protocol::page::CaptureScreenshotFormat, page::ScreenshotParams,
    },
    serde::Serialize,
    tracing::{debug, info, warn},
};

use crate::{
    device::{self, DeviceProfile},
    error::CaptureError,
    session::BrowserSession,
    slug::url_slug,
};

/// Run configuration, derived once per invocation and immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target URL.
    pub url: String,
    /// Device profiles to capture, in enumeration order.
    pub devices: Vec<&'static DeviceProfile>,
    /// Directory segment PNGs are written to.
    pub output_dir: PathBuf,
    /// Explicit Chrome/Chromium path (auto-detected when unset).
    pub chrome_path: Option<String>,
    /// Navigation timeout handed to the CDP layer.
    pub navigation_timeout_ms: u64,
    /// Budget for the post-navigation settle poll (lazy content,
    /// animations).
    pub settle_timeout_ms: u64,
    /// Budget for the post-scroll stabilization poll.
    pub scroll_settle_timeout_ms: u64,
    /// Interval between layout-stability polls.
    pub poll_interval_ms: u64,
    /// Cap on segments per device, bounding pages that grow on every
    /// scroll.
    pub max_segments: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            devices: device::PROFILES.iter().collect(),
            output_dir: PathBuf::from("screenshots"),
            chrome_path: None,
            navigation_timeout_ms: 30000,
            settle_timeout_ms: 1000,
            scroll_settle_timeout_ms: 800,
            poll_interval_ms: 100,
            max_segments: 100,
        }
    }
}

/// Observer for user-facing progress. The library reports through this
/// seam; the CLI prints, tests stay silent.
pub trait ProgressSink {
    fn navigation_started(&self, _device: &str, _url: &str) {}
    fn height_measured(&self, _device: &str, _height: u64) {}
    fn capturing_segment(&self, _device: &str, _index: usize, _offset: u64) {}
    fn device_failed(&self, _device: &str, _error: &CaptureError) {}
}

/// A sink that swallows all progress events.
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Outcome of one device pass.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceOutcome {
    pub device: &'static str,
    /// Segments written by this pass. Zero when the pass failed before
    /// its first capture; files already written by a failed pass stay on
    /// disk uncounted.
    pub segments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeviceOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-device outcomes for a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<DeviceOutcome>,
}

impl RunSummary {
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Output filename for one segment. Literal pattern
/// `screenshot-{device}-{index}__{slug}.png`, index starting at 1, no
/// zero padding.
pub fn segment_filename(device: &str, index: usize, slug: &str) -> String {
    format!("screenshot-{device}-{index}__{slug}.png")
}

/// Walks segment offsets for one device pass: starts at offset 0 and
/// index 1, advances by the viewport height, and stops once the offset
/// reaches the (possibly re-measured) total height or the segment cap.
struct SegmentCursor {
    offset: u64,
    index: usize,
    viewport_height: u32,
    max_segments: usize,
    capped: bool,
}

impl SegmentCursor {
    fn new(viewport_height: u32, max_segments: usize) -> Self {
        Self {
            offset: 0,
            index: 1,
            viewport_height,
            max_segments,
            capped: false,
        }
    }

    /// Next (index, offset) pair, given the current total page height.
    fn next(&mut self, total_height: u64) -> Option<(usize, u64)> {
        if self.offset >= total_height {
            return None;
        }
        if self.index > self.max_segments {
            self.capped = true;
            return None;
        }
        let segment = (self.index, self.offset);
        self.offset += u64::from(self.viewport_height);
        self.index += 1;
        Some(segment)
    }

    fn hit_cap(&self) -> bool {
        self.capped
    }
}

/// Drives one browser session through every selected device profile,
/// strictly sequentially.
pub struct CaptureRunner {
    config: CaptureConfig,
    slug: String,
}

impl CaptureRunner {
    /// Validate the target URL and build a runner.
    pub fn new(config: CaptureConfig) -> Result<Self, CaptureError> {
        validate_url(&config.url)?;
        let slug = url_slug(&config.url);
        Ok(Self { config, slug })
    }

    /// Run every device pass. Browser launch and output-directory
    /// failures abort the run; a failure inside a device pass is
    /// recorded in the summary and the next device proceeds.
    pub async fn run(&self, progress: &dyn ProgressSink) -> Result<RunSummary, CaptureError> {
        self.ensure_output_dir()?;

        let session = BrowserSession::launch(
            self.config.chrome_path.as_deref(),
            self.config.navigation_timeout_ms,
        )
        .await?;

        let mut summary = RunSummary::default();
        for profile in &self.config.devices {
            let outcome = match self.capture_device(&session, profile, progress).await {
                Ok(segments) => DeviceOutcome {
                    device: profile.name,
                    segments,
                    error: None,
                },
                Err(e) => {
                    warn!(device = profile.name, error = %e, "device pass failed");
                    progress.device_failed(profile.name, &e);
                    DeviceOutcome {
                        device: profile.name,
                        segments: 0,
                        error: Some(e.to_string()),
                    }
                },
            };
            summary.outcomes.push(outcome);
        }

        session.close().await;
        Ok(summary)
    }

    /// One device pass: open page, capture, close page even on failure.
    async fn capture_device(
        &self,
        session: &BrowserSession,
        profile: &DeviceProfile,
        progress: &dyn ProgressSink,
    ) -> Result<usize, CaptureError> {
        let page = session.open_page(profile).await?;
        let result = self.capture_segments(&page, profile, progress).await;
        session.close_page(page).await;
        result
    }

    async fn capture_segments(
        &self,
        page: &Page,
        profile: &DeviceProfile,
        progress: &dyn ProgressSink,
    ) -> Result<usize, CaptureError> {
        progress.navigation_started(profile.name, &self.config.url);
        info!(device = profile.name, url = %self.config.url, "navigating");

        page.goto(self.config.url.as_str())
            .await
            .map_err(|e| CaptureError::NavigationFailed(e.to_string()))?;
        // Network idle heuristic lives in the CDP layer.
        let _ = page.wait_for_navigation().await;
        self.wait_for_stable_layout(page, self.config.settle_timeout_ms)
            .await?;

        let mut total = self.measure_scroll_height(page).await?;
        progress.height_measured(profile.name, total);
        info!(device = profile.name, total, "measured scroll height");

        let mut cursor = SegmentCursor::new(profile.height, self.config.max_segments);
        let mut written = 0;

        while let Some((index, offset)) = cursor.next(total) {
            // Announced before the scroll, like every other progress line.
            progress.capturing_segment(profile.name, index, offset);

            self.scroll_to(page, offset).await?;
            self.wait_for_stable_layout(page, self.config.scroll_settle_timeout_ms)
                .await?;

            let png = page
                .screenshot(
                    ScreenshotParams::builder()
                        .format(CaptureScreenshotFormat::Png)
                        .full_page(false)
                        .build(),
                )
                .await
                .map_err(|e| CaptureError::ScreenshotFailed(e.to_string()))?;

            let path = self.segment_path(profile.name, index);
            tokio::fs::write(&path, &png).await?;
            written += 1;

            debug!(
                device = profile.name,
                index,
                offset,
                bytes = png.len(),
                "captured segment"
            );

            // Lazily loaded content can grow the page after a scroll;
            // re-measure so the loop bound extends with it.
            total = self.measure_scroll_height(page).await?;
        }

        if cursor.hit_cap() {
            warn!(
                device = profile.name,
                max_segments = self.config.max_segments,
                "page kept growing; stopped at segment cap"
            );
        }

        Ok(written)
    }

    /// Poll until two consecutive reads of the page's scroll height and
    /// vertical position agree, bounded by `budget_ms`. Budget expiry is
    /// not an error; capture proceeds with whatever the page shows.
    async fn wait_for_stable_layout(&self, page: &Page, budget_ms: u64) -> Result<(), CaptureError> {
        let deadline = Instant::now() + Duration::from_millis(budget_ms);
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let mut last: Option<(u64, u64)> = None;

        loop {
            let height = self.measure_scroll_height(page).await?;
            let scroll_y = eval_u64(page, "Math.round(window.scrollY)").await?;
            let current = (height, scroll_y);

            if last == Some(current) {
                return Ok(());
            }
            last = Some(current);

            if Instant::now() >= deadline {
                debug!(budget_ms, "layout did not settle within budget");
                return Ok(());
            }
            tokio::time::sleep(interval).await;
        }
    }

    async fn measure_scroll_height(&self, page: &Page) -> Result<u64, CaptureError> {
        eval_u64(page, "document.body.scrollHeight").await
    }

    async fn scroll_to(&self, page: &Page, offset: u64) -> Result<(), CaptureError> {
        let js = format!("window.scrollTo(0, {offset}); true");
        page.evaluate(js.as_str())
            .await
            .map_err(|e| CaptureError::JsEvalFailed(e.to_string()))?;
        Ok(())
    }

    fn segment_path(&self, device: &str, index: usize) -> PathBuf {
        self.config
            .output_dir
            .join(segment_filename(device, index, &self.slug))
    }

    /// Create the output directory if absent. Single level only; a
    /// missing parent is an error.
    fn ensure_output_dir(&self) -> Result<(), CaptureError> {
        match std::fs::create_dir(&self.config.output_dir) {
            Ok(()) => {
                info!(dir = %self.config.output_dir.display(), "created output directory");
                Ok(())
            },
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(CaptureError::Io(e)),
        }
    }
}

/// Reject URLs the browser should never be pointed at: empty input,
/// unparseable strings, and non-http(s) schemes.
pub fn validate_url(url: &str) -> Result<(), CaptureError> {
    if url.is_empty() {
        return Err(CaptureError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| CaptureError::InvalidUrl(format!("'{url}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(CaptureError::InvalidUrl(format!(
            "unsupported scheme '{scheme}', only http/https allowed"
        ))),
    }
}

async fn eval_u64(page: &Page, js: &str) -> Result<u64, CaptureError> {
    page.evaluate(js)
        .await
        .map_err(|e| CaptureError::JsEvalFailed(e.to_string()))?
        .into_value()
        .map_err(|e| CaptureError::JsEvalFailed(format!("{e:?}")))
}
