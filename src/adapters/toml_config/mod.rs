// TOML config adapter - Settings file loading

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{PalFixError, PalFixResult};
use crate::ports::Tool;
use crate::utils::logging::LogFormat;

/// Settings file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "palfix.toml";

/// Values read from a settings file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub correction: CorrectionSettings,
    pub tools: ToolPaths,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorrectionSettings {
    /// Rational factor such as `25/24`
    pub factor: Option<String>,
}

/// Explicit tool locations; anything unset is looked up on `PATH`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolPaths {
    pub ffmpeg: Option<PathBuf>,
    pub mkvextract: Option<PathBuf>,
    pub mkvinfo: Option<PathBuf>,
    pub mkvmerge: Option<PathBuf>,
}

impl ToolPaths {
    pub fn get(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Ffmpeg => self.ffmpeg.as_deref(),
            Tool::Mkvextract => self.mkvextract.as_deref(),
            Tool::Mkvinfo => self.mkvinfo.as_deref(),
            Tool::Mkvmerge => self.mkvmerge.as_deref(),
        }
    }

    /// Fill unset entries from `fallback`
    pub fn or(self, fallback: ToolPaths) -> ToolPaths {
        ToolPaths {
            ffmpeg: self.ffmpeg.or(fallback.ffmpeg),
            mkvextract: self.mkvextract.or(fallback.mkvextract),
            mkvinfo: self.mkvinfo.or(fallback.mkvinfo),
            mkvmerge: self.mkvmerge.or(fallback.mkvmerge),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Load settings from `explicit` if given, else from the default file if present
    pub fn discover(explicit: Option<&Path>) -> PalFixResult<Settings> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(PalFixError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            return Self::load(default_path);
        }

        debug!("No config file found, using defaults");
        Ok(Settings::default())
    }

    /// Load and parse a settings file
    pub fn load(path: &Path) -> PalFixResult<Settings> {
        info!("Loading configuration from: {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| PalFixError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::parse(&content).map_err(|e| match e {
            PalFixError::Config { message } => PalFixError::Config {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> PalFixResult<Settings> {
        toml::from_str(content).map_err(|e| PalFixError::Config {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_full_file() {
        let settings = TomlConfigAdapter::parse(
            r#"
            [correction]
            factor = "25/24"

            [tools]
            mkvmerge = "/opt/mkvtoolnix/mkvmerge"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(settings.correction.factor.as_deref(), Some("25/24"));
        assert_eq!(
            settings.tools.get(Tool::Mkvmerge),
            Some(Path::new("/opt/mkvtoolnix/mkvmerge"))
        );
        assert_eq!(settings.tools.get(Tool::Ffmpeg), None);
        assert_eq!(settings.logging.level.as_deref(), Some("debug"));
        assert_eq!(settings.logging.format, Some(LogFormat::Json));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(TomlConfigAdapter::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = TomlConfigAdapter::parse("[correction]\nfactr = \"25/24\"\n").unwrap_err();
        assert!(matches!(err, PalFixError::Config { .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(TomlConfigAdapter::discover(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("palfix.toml");
        fs::write(&path, "[correction]\nfactor = \"1001/1000\"\n").unwrap();
        let settings = TomlConfigAdapter::discover(Some(&path)).unwrap();
        assert_eq!(settings.correction.factor.as_deref(), Some("1001/1000"));
    }

    #[test]
    fn tool_paths_fallback() {
        let cli = ToolPaths {
            ffmpeg: Some(PathBuf::from("/cli/ffmpeg")),
            ..ToolPaths::default()
        };
        let file = ToolPaths {
            ffmpeg: Some(PathBuf::from("/file/ffmpeg")),
            mkvinfo: Some(PathBuf::from("/file/mkvinfo")),
            ..ToolPaths::default()
        };
        let merged = cli.or(file);
        assert_eq!(merged.get(Tool::Ffmpeg), Some(Path::new("/cli/ffmpeg")));
        assert_eq!(merged.get(Tool::Mkvinfo), Some(Path::new("/file/mkvinfo")));
        assert_eq!(merged.get(Tool::Mkvmerge), None);
    }
}
