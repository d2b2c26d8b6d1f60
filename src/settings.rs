//! JSON persistence for pipeline and display defaults.
//!
//! A missing file yields defaults silently; a corrupt or invalid file yields
//! defaults with a warning. Nothing here is fatal: a persisted configuration
//! that fails validation never reaches the numeric path.

use crate::config::PipelineConfig;
use crate::render::waterfall::WaterfallStyle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pipeline: PipelineConfig,
    pub display: WaterfallStyle,
}

impl Settings {
    /// Load settings from `dir/settings.json`, falling back to defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE_NAME);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    warn!("failed to read {}: {err}", path.display());
                }
                return Self::default();
            }
        };

        let settings: Self = match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("ignoring corrupt settings at {}: {err}", path.display());
                return Self::default();
            }
        };

        if let Err(err) = settings.pipeline.validate() {
            warn!("ignoring invalid persisted pipeline config: {err}");
            return Self::default();
        }
        settings
    }

    /// Write settings to `dir/settings.json`, creating the directory if
    /// needed.
    pub fn save(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)?;
        let raw = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(dir.join(SETTINGS_FILE_NAME), raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("specfall-settings-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn round_trips_through_json() {
        let dir = scratch_dir("roundtrip");
        let mut settings = Settings::default();
        settings.pipeline.transform_size = 1024;
        settings.pipeline.source = SourceKind::Real;
        settings.pipeline.averaging_alpha = Some(0.125);
        settings.display.scale_factor = 2.5;

        settings.save(&dir).unwrap();
        let loaded = Settings::load_or_default(&dir);

        assert_eq!(loaded.pipeline.transform_size, 1024);
        assert_eq!(loaded.pipeline.source, SourceKind::Real);
        assert_eq!(loaded.pipeline.averaging_alpha, Some(0.125));
        assert_eq!(loaded.display.scale_factor, 2.5);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = scratch_dir("missing");
        let settings = Settings::load_or_default(&dir);
        assert_eq!(settings.pipeline.transform_size, 512);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SETTINGS_FILE_NAME), "{not json").unwrap();

        let settings = Settings::load_or_default(&dir);
        assert_eq!(settings.pipeline.transform_size, 512);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_persisted_config_yields_defaults() {
        let dir = scratch_dir("invalid");
        let mut settings = Settings::default();
        settings.pipeline.transform_size = 500;
        settings.save(&dir).unwrap();

        let loaded = Settings::load_or_default(&dir);
        assert_eq!(loaded.pipeline.transform_size, 512);

        let _ = fs::remove_dir_all(&dir);
    }
}
