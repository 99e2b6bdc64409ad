//! Target device catalog.
//!
//! Known device canvases used to parameterize planning and generation
//! prompts.  Unknown device names fall back to [`DEFAULT_DEVICE`].

use serde::{Deserialize, Serialize};

/// Fallback device when a job names no (or an unknown) device.
pub const DEFAULT_DEVICE: &str = "Desktop";

/// Target canvas for one device, stored on the job row as JSONB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub corner_radius: u32,
}

/// Built-in device table: (name, width, height, corner radius).
const DEVICE_TABLE: &[(&str, u32, u32, u32)] = &[
    ("iPhone 16 Pro", 402, 874, 55),
    ("iPhone SE", 375, 667, 0),
    ("Pixel 9", 412, 924, 32),
    ("iPad Pro 11", 834, 1194, 18),
    ("Android Tablet", 800, 1280, 16),
    ("Desktop", 1440, 1024, 0),
];

/// Look up a device by name (case-insensitive), falling back to the
/// Desktop canvas for unknown names.
pub fn find_device(name: &str) -> DeviceSpec {
    let row = DEVICE_TABLE
        .iter()
        .find(|(n, _, _, _)| n.eq_ignore_ascii_case(name))
        .or_else(|| DEVICE_TABLE.iter().find(|(n, _, _, _)| *n == DEFAULT_DEVICE))
        .expect("device table contains the default device");
    DeviceSpec {
        name: row.0.to_string(),
        width: row.1,
        height: row.2,
        corner_radius: row.3,
    }
}

/// Render the device table as prompt reference text, one device per line.
pub fn device_reference() -> String {
    DEVICE_TABLE
        .iter()
        .map(|(name, w, h, r)| format!("- {name}: {w}x{h}, corner radius {r}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl DeviceSpec {
    /// Render this device as a prompt parameter line.
    pub fn prompt_line(&self) -> String {
        format!(
            "{} ({}x{}, corner radius {})",
            self.name, self.width, self.height, self.corner_radius
        )
    }
}
