//! Match settings and preferences
//!
//! Loaded from a JSON file; anything missing or unreadable falls back to
//! defaults so a bad file never stops a match from starting.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SEED;
use crate::sim::Role;
use crate::tuning::Tuning;

/// Match settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Who sits in each seat
    pub roles: [Role; 2],
    /// Display names per seat
    pub names: [String; 2],
    /// RNG seed; `None` uses the built-in default
    pub seed: Option<u64>,
    /// Show the diagnostic line and velocity vectors
    pub debug_overlay: bool,
    /// Tick limit for headless runs
    pub max_ticks: u64,
    /// Rule and physics constants
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            roles: [Role::Human, Role::Automated],
            names: ["Player".to_string(), "AI".to_string()],
            seed: None,
            debug_overlay: false,
            max_ticks: 60 * 60 * 10,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Effective RNG seed
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Parse settings from JSON, validating the embedded tuning
    pub fn from_json(json: &str) -> Result<Self, crate::TuningError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Can't read settings from {}: {}", path.display(), e);
                log::info!("Using default settings");
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings in {}: {}", path.display(), e);
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
