//! Simulator configuration persistence
//!
//! Stores user preferences in `~/.config/stratokeister/config.yaml`

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encoder::TAP_DELAY;
use crate::keymap::Layer;

/// Simulator configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// How long an encoder volume tap is held, in milliseconds
    #[serde(default = "default_tap_delay_ms")]
    pub encoder_tap_delay_ms: u64,
    /// Layer moved on before the first step runs
    #[serde(default = "default_start_layer")]
    pub start_layer: Layer,
    /// Log every raw switch transition at info level
    #[serde(default)]
    pub trace_matrix: bool,
}

fn default_tap_delay_ms() -> u64 {
    TAP_DELAY.as_millis() as u64
}

fn default_start_layer() -> Layer {
    Layer::Default
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            encoder_tap_delay_ms: default_tap_delay_ms(),
            start_layer: default_start_layer(),
            trace_matrix: false,
        }
    }
}

impl SimConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to a specific file
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn encoder_tap_delay(&self) -> Duration {
        Duration::from_millis(self.encoder_tap_delay_ms)
    }
}
