//! The fixed device viewport profile table and `--device` selection.

use tracing::debug;

use crate::error::CaptureError;

/// A named viewport used to emulate a class of display.
///
/// The table is baked in and not user-extensible at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub name: &'static str,
    /// Viewport width in CSS pixels.
    pub width: u32,
    /// Viewport height in CSS pixels. Also the vertical stride of the
    /// scroll-capture loop.
    pub height: u32,
    /// Device pixel ratio, stored as an integer (all known profiles use
    /// whole-number ratios).
    pub scale_factor: u32,
}

/// All known profiles, in enumeration order. Selection output always
/// follows this order regardless of how the `--device` flag was written.
pub const PROFILES: &[DeviceProfile] = &[
    DeviceProfile {
        name: "mobile",
        width: 445,
        height: 909,
        scale_factor: 3,
    },
    DeviceProfile {
        name: "tablet",
        width: 1016,
        height: 1357,
        scale_factor: 2,
    },
    DeviceProfile {
        name: "laptop",
        width: 1467,
        height: 990,
        scale_factor: 2,
    },
    DeviceProfile {
        name: "desktop",
        width: 1605,
        height: 902,
        scale_factor: 2,
    },
];

impl DeviceProfile {
    /// Look up a profile by its lowercase name.
    pub fn by_name(name: &str) -> Option<&'static DeviceProfile> {
        PROFILES.iter().find(|p| p.name == name)
    }

    /// Device pixel ratio as the float CDP expects.
    pub fn device_scale_factor(&self) -> f64 {
        f64::from(self.scale_factor)
    }
}

/// Comma-separated list of valid profile names, for error messages.
pub fn valid_names() -> String {
    PROFILES
        .iter()
        .map(|p| p.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve the `--device` flag into an ordered profile list.
///
/// `None` selects every profile. The list is case-insensitive and
/// whitespace-tolerant; unknown names are dropped. An empty result after
/// filtering is an error naming the valid options, raised before any
/// browser is launched.
pub fn select_devices(list: Option<&str>) -> Result<Vec<&'static DeviceProfile>, CaptureError> {
    let Some(list) = list else {
        return Ok(PROFILES.iter().collect());
    };

    let requested: Vec<String> = list
        .split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    for name in &requested {
        if DeviceProfile::by_name(name).is_none() {
            debug!(name, "dropping unknown device name");
        }
    }

    let selected: Vec<&'static DeviceProfile> = PROFILES
        .iter()
        .filter(|p| requested.iter().any(|r| r == p.name))
        .collect();

    if selected.is_empty() {
        return Err(CaptureError::NoDevicesSelected {
            valid: valid_names(),
        });
    }

    Ok(selected)
}
