//! Command-line interface parsing for LiveSports
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated `StartupConfig` before any network activity happens.

use clap::Parser;
use thiserror::Error;

use crate::data::Format;
use crate::pipeline::ALL_FILTER;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified response format is not recognized
    #[error("Invalid format: '{0}'. Valid formats: json, xml")]
    InvalidFormat(String),
}

/// LiveSports - Live and upcoming sports events with stream links
#[derive(Parser, Debug)]
#[command(name = "livesports")]
#[command(about = "Live and upcoming sports events from the TopEmbed schedule")]
#[command(version)]
pub struct Cli {
    /// Response format to request from the API (json or xml)
    #[arg(long, value_name = "FORMAT", default_value = "json")]
    pub format: String,

    /// Show only matches whose sport or tournament contains TEXT ("all" shows everything)
    #[arg(long, value_name = "TEXT", default_value = ALL_FILTER)]
    pub filter: String,

    /// Keep only events of SPORT (exact sport name or tournament fragment)
    #[arg(long, value_name = "SPORT")]
    pub sport: Option<String>,

    /// Keep only events that are live right now
    #[arg(long)]
    pub live: bool,

    /// Keep running, updating the live count and refetching when the cache expires
    #[arg(long)]
    pub watch: bool,

    /// Print the schedule view as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub format: Format,
    pub filter: String,
    pub sport: Option<String>,
    pub live_only: bool,
    pub watch: bool,
    pub json_output: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            format: Format::Json,
            filter: ALL_FILTER.to_string(),
            sport: None,
            live_only: false,
            watch: false,
            json_output: false,
        }
    }
}

/// Parses a format argument into a `Format`.
///
/// # Returns
/// * `Ok(Format)` if the string names a supported format
/// * `Err(CliError::InvalidFormat)` otherwise
pub fn parse_format_arg(s: &str) -> Result<Format, CliError> {
    Format::from_name(s).ok_or_else(|| CliError::InvalidFormat(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let format = parse_format_arg(&cli.format)?;
        let filter = match cli.filter.trim() {
            "" => ALL_FILTER.to_string(),
            text => text.to_string(),
        };

        Ok(StartupConfig {
            format,
            filter,
            sport: cli.sport.clone().filter(|s| !s.trim().is_empty()),
            live_only: cli.live,
            watch: cli.watch,
            json_output: cli.json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_arg_aliases() {
        assert_eq!(parse_format_arg("json").unwrap(), Format::Json);
        assert_eq!(parse_format_arg("XML").unwrap(), Format::Xml);
        assert_eq!(parse_format_arg("markup").unwrap(), Format::Xml);
    }

    #[test]
    fn test_parse_format_arg_invalid() {
        let err = parse_format_arg("yaml").unwrap_err();
        assert!(err.to_string().contains("Invalid format"));
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["livesports"]);
        assert_eq!(cli.format, "json");
        assert_eq!(cli.filter, "all");
        assert!(cli.sport.is_none());
        assert!(!cli.live && !cli.watch && !cli.json);
    }

    #[test]
    fn test_startup_config_from_cli_defaults() {
        let cli = Cli::parse_from(["livesports"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config, StartupConfig::default());
    }

    #[test]
    fn test_startup_config_from_cli_all_flags() {
        let cli = Cli::parse_from([
            "livesports",
            "--format",
            "xml",
            "--filter",
            "bask",
            "--sport",
            "Basketball",
            "--live",
            "--watch",
            "--json",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();

        assert_eq!(config.format, Format::Xml);
        assert_eq!(config.filter, "bask");
        assert_eq!(config.sport.as_deref(), Some("Basketball"));
        assert!(config.live_only);
        assert!(config.watch);
        assert!(config.json_output);
    }

    #[test]
    fn test_startup_config_blank_values_fall_back() {
        let cli = Cli::parse_from(["livesports", "--filter", "  ", "--sport", ""]);
        let config = StartupConfig::from_cli(&cli).unwrap();

        assert_eq!(config.filter, ALL_FILTER);
        assert!(config.sport.is_none());
    }

    #[test]
    fn test_startup_config_from_cli_invalid_format() {
        let cli = Cli::parse_from(["livesports", "--format", "csv"]);
        assert!(StartupConfig::from_cli(&cli).is_err());
    }
}
