//! Configuration initialization and hierarchy management

use tracing::info;

use crate::adapters::toml_config::{Settings, ToolPaths, TomlConfigAdapter};
use crate::cli::{Cli, OverwritePolicy};
use crate::domain::factor::CorrectionFactor;
use crate::error::PalFixResult;
use crate::utils::logging::LoggingConfig;

/// Everything a run needs, after merging all configuration sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub factor: CorrectionFactor,
    pub tools: ToolPaths,
    pub logging: LoggingConfig,
    pub overwrite: OverwritePolicy,
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
///
/// Environment variables arrive through clap, so they already sit in `cli`
/// with lower precedence than explicit flags.
pub fn initialize_configuration_hierarchy(cli: &Cli) -> PalFixResult<RunConfig> {
    let settings = TomlConfigAdapter::discover(cli.config.as_deref())?;
    merge(cli, settings)
}

/// Merge CLI values over file settings over defaults
pub fn merge(cli: &Cli, settings: Settings) -> PalFixResult<RunConfig> {
    let factor = match cli.factor.as_deref().or(settings.correction.factor.as_deref()) {
        Some(text) => text.parse::<CorrectionFactor>()?,
        None => CorrectionFactor::default(),
    };

    let defaults = LoggingConfig::default();
    let logging = LoggingConfig {
        level: cli
            .log_level
            .clone()
            .or(settings.logging.level)
            .unwrap_or(defaults.level),
        format: cli
            .log_format
            .or(settings.logging.format)
            .unwrap_or(defaults.format),
    };

    Ok(RunConfig {
        factor,
        tools: cli.tools.to_tool_paths().or(settings.tools),
        logging,
        overwrite: cli.overwrite,
    })
}

impl RunConfig {
    /// Log the resolved values; call once the subscriber is installed
    pub fn log_summary(&self) {
        info!(
            factor = %self.factor,
            overwrite = %self.overwrite,
            log_level = %self.logging.level,
            log_format = %self.logging.format,
            "Configuration resolved"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::logging::LogFormat;
    use clap::Parser;
    use std::path::{Path, PathBuf};

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["fix-pal"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["in.mkv", "out.mkv"]);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_without_any_source() {
        let config = merge(&cli(&[]), Settings::default()).unwrap();
        assert_eq!(config.factor, CorrectionFactor::PAL);
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.tools, ToolPaths::default());
        assert_eq!(config.overwrite, OverwritePolicy::Prompt);
    }

    #[test]
    fn file_values_fill_gaps() {
        let settings = TomlConfigAdapter::parse(
            "[correction]\nfactor = \"1001/1000\"\n[logging]\nformat = \"compact\"\n[tools]\nffmpeg = \"/opt/ffmpeg\"\n",
        )
        .unwrap();
        let config = merge(&cli(&[]), settings).unwrap();
        assert_eq!(config.factor, CorrectionFactor::new(1001, 1000).unwrap());
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.tools.ffmpeg.as_deref(), Some(Path::new("/opt/ffmpeg")));
    }

    #[test]
    fn cli_beats_file() {
        let settings = TomlConfigAdapter::parse(
            "[correction]\nfactor = \"1001/1000\"\n[logging]\nlevel = \"warn\"\n[tools]\nmkvinfo = \"/file/mkvinfo\"\n",
        )
        .unwrap();
        let config = merge(
            &cli(&[
                "--factor",
                "50/48",
                "--log-level",
                "debug",
                "--mkvinfo",
                "/cli/mkvinfo",
                "--overwrite",
                "always",
            ]),
            settings,
        )
        .unwrap();
        assert_eq!(config.factor, CorrectionFactor::PAL);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.tools.mkvinfo, Some(PathBuf::from("/cli/mkvinfo")));
        assert_eq!(config.overwrite, OverwritePolicy::Always);
    }

    #[test]
    fn invalid_factor_is_rejected() {
        assert!(merge(&cli(&["--factor", "0/1"]), Settings::default()).is_err());
        assert!(merge(&cli(&["--factor", "fast"]), Settings::default()).is_err());
    }
}
