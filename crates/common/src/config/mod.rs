//! Configuration management for LearnPilot
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values

use crate::errors::{AppError, Result};
use crate::types::Difficulty;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Study planning configuration
    #[serde(default)]
    pub planning: PlanningConfig,

    /// Pipeline input/output configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlanningConfig {
    /// Reader's self-reported level, scales the hour estimate
    #[serde(default)]
    pub user_level: Difficulty,

    /// Hours available for study per day
    #[serde(default = "default_daily_hours")]
    pub daily_hours: f64,

    /// Base hours to study a beginner paper
    #[serde(default = "default_hours_beginner")]
    pub hours_beginner: f64,

    /// Base hours to study an intermediate paper
    #[serde(default = "default_hours_intermediate")]
    pub hours_intermediate: f64,

    /// Base hours to study an advanced paper
    #[serde(default = "default_hours_advanced")]
    pub hours_advanced: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Batch file to read when no path is given on the command line
    pub input_path: Option<String>,

    /// Report format written to stdout
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Curriculum report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logging: bool,

    /// Install a Prometheus recorder and log its snapshot on exit
    #[serde(default)]
    pub metrics_enabled: bool,

    /// Service name for log output
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_daily_hours() -> f64 { 2.0 }
fn default_hours_beginner() -> f64 { 3.0 }
fn default_hours_intermediate() -> f64 { 5.0 }
fn default_hours_advanced() -> f64 { 8.0 }
fn default_log_level() -> String { "info".to_string() }
fn default_service_name() -> String { "learnpilot".to_string() }

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            user_level: Difficulty::default(),
            daily_hours: default_daily_hours(),
            hours_beginner: default_hours_beginner(),
            hours_intermediate: default_hours_intermediate(),
            hours_advanced: default_hours_advanced(),
        }
    }
}

impl PlanningConfig {
    /// Base study hours for a paper of the given difficulty
    pub fn hours_for(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Beginner => self.hours_beginner,
            Difficulty::Intermediate => self.hours_intermediate,
            Difficulty::Advanced => self.hours_advanced,
        }
    }

    /// Scale applied to base hours for the reader's level
    pub fn level_multiplier(&self) -> f64 {
        match self.user_level {
            Difficulty::Beginner => 1.5,
            Difficulty::Intermediate => 1.0,
            Difficulty::Advanced => 0.8,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: false,
            metrics_enabled: false,
            service_name: default_service_name(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("observability.log_level", default_log_level())?
            .set_default("planning.daily_hours", default_daily_hours())?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__PLANNING__DAILY_HOURS=3
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )

            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific config file
    pub fn from_file(path: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the planner cannot work with
    pub fn validate(&self) -> Result<()> {
        let planning = &self.planning;
        if !(planning.daily_hours > 0.0) {
            return Err(AppError::Configuration {
                message: format!(
                    "planning.daily_hours must be positive, got {}",
                    planning.daily_hours
                ),
            });
        }

        for (key, hours) in [
            ("planning.hours_beginner", planning.hours_beginner),
            ("planning.hours_intermediate", planning.hours_intermediate),
            ("planning.hours_advanced", planning.hours_advanced),
        ] {
            if !(hours >= 0.0) {
                return Err(AppError::Configuration {
                    message: format!("{} must not be negative, got {}", key, hours),
                });
            }
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            planning: PlanningConfig::default(),
            pipeline: PipelineConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.planning.daily_hours, 2.0);
        assert_eq!(config.planning.user_level, Difficulty::Intermediate);
        assert_eq!(config.pipeline.output_format, OutputFormat::Markdown);
        assert_eq!(config.observability.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hours_and_multiplier() {
        let mut planning = PlanningConfig::default();
        assert_eq!(planning.hours_for(Difficulty::Beginner), 3.0);
        assert_eq!(planning.hours_for(Difficulty::Intermediate), 5.0);
        assert_eq!(planning.hours_for(Difficulty::Advanced), 8.0);
        assert_eq!(planning.level_multiplier(), 1.0);

        planning.user_level = Difficulty::Beginner;
        assert_eq!(planning.level_multiplier(), 1.5);
        planning.user_level = Difficulty::Advanced;
        assert_eq!(planning.level_multiplier(), 0.8);
    }

    #[test]
    fn test_validate_rejects_zero_daily_hours() {
        let mut config = AppConfig::default();
        config.planning.daily_hours = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("daily_hours"));
    }

    #[test]
    fn test_validate_rejects_negative_hours() {
        let mut config = AppConfig::default();
        config.planning.hours_advanced = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"planning": {"user_level": "beginner"}, "pipeline": {"output_format": "json"}}"#,
        )
        .unwrap();
        assert_eq!(config.planning.user_level, Difficulty::Beginner);
        assert_eq!(config.planning.hours_advanced, 8.0);
        assert_eq!(config.pipeline.output_format, OutputFormat::Json);
        assert!(!config.observability.json_logging);
    }
}
