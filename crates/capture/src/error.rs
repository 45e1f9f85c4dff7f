//! Capture error types.

use thiserror::Error;

/// Errors that can occur while driving the browser and writing segments.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("browser not available: {0}")]
    BrowserNotAvailable(String),

    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("no valid devices selected. Valid options: {valid}")]
    NoDevicesSelected { valid: String },

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    JsEvalFailed(String),

    #[error("screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<chromiumoxide::error::CdpError> for CaptureError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        CaptureError::Cdp(err.to_string())
    }
}
