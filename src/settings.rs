//! Runtime settings
//!
//! Loaded from an optional JSON file, then overridden from the environment.
//! Gameplay constants live in `consts`; the three stages are fixed.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::TITLE;
use crate::error::SettingsError;

/// Environment variable naming a settings file for the binary
pub const SETTINGS_PATH_ENV: &str = "TANKS_SETTINGS";

const SEED_ENV: &str = "TANKS_SEED";
const IDLE_MS_ENV: &str = "TANKS_IDLE_MS";
const RUN_SECS_ENV: &str = "TANKS_RUN_SECS";

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window title prefix (counters are appended)
    pub title: String,
    /// Sleep when no update was due (milliseconds)
    pub idle_ms: u64,
    /// RNG seed for spawns and enemy AI
    pub seed: u64,
    /// Report Fps/Upd/Updl in the title once per second
    pub show_counters: bool,
    /// How long the headless binary runs before stopping
    pub run_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: TITLE.to_string(),
            idle_ms: 1,
            seed: 0x7a6b_5c4d,
            show_counters: true,
            run_secs: 10,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Settings::load`], but falls back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Apply `TANKS_*` environment overrides
    pub fn apply_env(&mut self) {
        if let Some(seed) = read_env(SEED_ENV) {
            self.seed = seed;
        }
        if let Some(idle_ms) = read_env(IDLE_MS_ENV) {
            self.idle_ms = idle_ms;
        }
        if let Some(run_secs) = read_env(RUN_SECS_ENV) {
            self.run_secs = run_secs;
        }
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "seed": 42 }"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.title, TITLE);
        assert_eq!(settings.idle_ms, 1);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = Settings::load("/nonexistent/tanks-settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
        assert_eq!(
            Settings::load_or_default("/nonexistent/tanks-settings.json"),
            Settings::default()
        );
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let path = env::temp_dir().join(format!("tanks-settings-{}.json", std::process::id()));
        fs::write(&path, "{ seed: ").unwrap();
        let err = Settings::load(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }
}
