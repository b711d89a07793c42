//! Report configuration.
//!
//! Layered as: built-in defaults, then `config/default.toml` if present,
//! then `ANALYTICS__*` environment variables (e.g.
//! `ANALYTICS__INPUTS__SNAPSHOTS=data/snapshots.json`,
//! `ANALYTICS__PROGRAMS__CAMPAIGN_IDS=c1,c2`).

use std::path::PathBuf;

use analytics_core::error::ConfigErrorCode;
use analytics_core::{Error, ProgramSet, Timeframe};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Where the input record arrays are read from. A missing path means that
/// collection is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputPaths {
    #[serde(default)]
    pub snapshots: Option<PathBuf>,
    #[serde(default)]
    pub transactions: Option<PathBuf>,
    #[serde(default)]
    pub content: Option<PathBuf>,
}

impl InputPaths {
    fn is_empty(&self) -> bool {
        self.snapshots.is_none() && self.transactions.is_none() && self.content.is_none()
    }
}

/// What the binary writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// The whole dashboard report as JSON
    #[default]
    Json,
    /// Only the creator ROI table, one CSV row per creator
    RoiCsv,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_app_config"))]
pub struct AppConfig {
    #[serde(default)]
    pub inputs: InputPaths,

    /// Campaigns and boosts the report covers
    #[serde(default)]
    pub programs: ProgramSet,

    #[serde(default)]
    pub timeframe: Timeframe,

    /// Payout per thousand unpaid views
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub rpm_rate: f64,

    /// Report as of this instant instead of the current time
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,

    /// Write the report here instead of stdout
    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub pretty: bool,

    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inputs: InputPaths::default(),
            programs: ProgramSet::default(),
            timeframe: Timeframe::AllTime,
            rpm_rate: 0.0,
            as_of: None,
            output: None,
            pretty: false,
            format: OutputFormat::Json,
        }
    }
}

fn validate_app_config(config: &AppConfig) -> std::result::Result<(), ValidationError> {
    if config.inputs.is_empty() {
        let mut err = ValidationError::new("no_inputs");
        err.message = Some("at least one input path must be configured".into());
        return Err(err);
    }
    if config.programs.is_empty() {
        let mut err = ValidationError::new("no_programs");
        err.message = Some("at least one campaign or boost id must be configured".into());
        return Err(err);
    }
    Ok(())
}

impl AppConfig {
    /// Checks field ranges and required settings.
    pub fn check(&self) -> analytics_core::Result<()> {
        self.validate()
            .map_err(|e| Error::config(ConfigErrorCode::Invalid, e.to_string()))
    }
}

/// Load configuration from files and environment.
pub fn load_config() -> Result<AppConfig> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&AppConfig::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::with_prefix("ANALYTICS")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("programs.campaign_ids")
                .with_list_parse_key("programs.boost_ids")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
