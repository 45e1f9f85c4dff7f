//! Headless Chrome/Chromium capture of full-page screenshots across
//! device viewport profiles, sliced into vertically-scrolled segments.
//!
//! # Overview
//!
//! - **device**: the fixed viewport profile table and `--device` selection
//! - **slug**: filesystem-safe filename slugs derived from URLs
//! - **detect**: Chrome/Chromium executable discovery with install hints
//! - **session**: one shared CDP browser instance per run
//! - **runner**: the sequential per-device scroll-and-capture loop
//!
//! # Example
//!
//! ```ignore
//! use viewshot_capture::{CaptureConfig, CaptureRunner, device};
//!
//! let config = CaptureConfig {
//!     url: "https://example.com".into(),
//!     devices: device::select_devices(None)?,
//!     ..Default::default()
//! };
//!
//! let summary = CaptureRunner::new(config)?.run(&NoProgress).await?;
//! ```

pub mod detect;
pub mod device;
pub mod error;
pub mod runner;
pub mod session;
pub mod slug;

pub use {
    device::DeviceProfile,
    error::CaptureError,
    runner::{CaptureConfig, CaptureRunner, DeviceOutcome, NoProgress, ProgressSink, RunSummary},
    slug::url_slug,
};
