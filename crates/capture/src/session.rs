//! One shared CDP browser instance per capture run.

use std::time::Duration;

use {
    chromiumoxide::{
        Browser, BrowserConfig as CdpBrowserConfig, Page,
        cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams,
    },
    futures::StreamExt,
    tokio::task::JoinHandle,
    tracing::{debug, info, warn},
};

use crate::{detect, device::DeviceProfile, error::CaptureError};

/// A launched headless browser. Pages are opened one at a time, one per
/// device pass; the session itself lives for the whole run.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Detect a Chromium-based browser and launch it headless.
    pub async fn launch(
        chrome_path: Option<&str>,
        navigation_timeout_ms: u64,
    ) -> Result<Self, CaptureError> {
        let detection = detect::detect_browser(chrome_path);
        if !detection.found {
            return Err(CaptureError::BrowserNotAvailable(detection.install_hint));
        }

        let mut builder = CdpBrowserConfig::builder()
            .request_timeout(Duration::from_millis(navigation_timeout_ms));

        if let Some(ref path) = detection.path {
            builder = builder.chrome_executable(path);
        }

        // chromiumoxide runs headless unless with_head() is called.
        builder = builder
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox");

        let config = builder.build().map_err(|e| {
            CaptureError::LaunchFailed(format!("failed to build browser config: {e}"))
        })?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            let install_hint = detect::install_instructions();
            CaptureError::LaunchFailed(format!("{e}\n\n{install_hint}"))
        })?;

        // Drive browser events for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!(?event, "browser event");
            }
            debug!("browser event handler exited");
        });

        if let Some(ref path) = detection.path {
            info!(browser = %path.display(), "launched headless browser");
        }

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Open a fresh page emulating the given device profile.
    pub async fn open_page(&self, profile: &DeviceProfile) -> Result<Page, CaptureError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| CaptureError::LaunchFailed(e.to_string()))?;

        let viewport_cmd = SetDeviceMetricsOverrideParams::builder()
            .width(profile.width)
            .height(profile.height)
            .device_scale_factor(profile.device_scale_factor())
            .mobile(false)
            .build()
            .map_err(|e| CaptureError::Cdp(e.to_string()))?;
        page.execute(viewport_cmd).await?;

        debug!(
            device = profile.name,
            width = profile.width,
            height = profile.height,
            scale_factor = profile.scale_factor,
            "opened page with device viewport"
        );

        Ok(page)
    }

    /// Close a page after its device pass.
    pub async fn close_page(&self, page: Page) {
        if let Err(e) = page.close().await {
            warn!(error = %e, "failed to close page");
        }
    }

    /// Shut the browser down after all device passes.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        self.handler_task.abort();
        info!("browser session closed");
    }
}
