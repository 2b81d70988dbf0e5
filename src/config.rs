//! System-level settings threaded into the analytics
//!
//! The engine takes these as plain parameters; nothing reads a settings
//! store behind the caller's back. When no settings file is present the
//! standard defaults (60 Hz, 100 MVA) apply.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSettings {
    /// Nominal system frequency in Hz
    pub system_frequency: f64,
    /// System MVA base used for per-unit conversions
    pub system_mva_base: f64,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            system_frequency: 60.0,
            system_mva_base: 100.0,
        }
    }
}

impl SystemSettings {
    /// Read settings from a JSON file, falling back to defaults when the
    /// file is absent or unreadable.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("settings file {} is malformed ({err}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                warn!("settings file {} not readable ({err}), using defaults", path.display());
                Self::default()
            }
        }
    }
}
