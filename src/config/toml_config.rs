use crate::adapters::exchange_rate::{
    ExchangeRateSettings, DEFAULT_FALLBACK_RATE, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::engine::ModelParameters;
use crate::utils::error::{Result, ValuationError};
use crate::utils::logger::{parse_level, LogSettings};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValuationConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub model: ModelParameters,
    #[serde(default)]
    pub currency: CurrencyConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory the data paths below are resolved against.
    #[serde(default = "default_base_dir")]
    pub base_dir: String,
    pub price_table: Option<String>,
    /// Falls back to the built-in Lima averages when unset.
    pub reference_averages: Option<String>,
}

fn default_base_dir() -> String {
    ".".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            price_table: None,
            reference_averages: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_secondary")]
    pub secondary: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub access_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub fallback_rate: Option<f64>,
    /// Skip the live lookup and always use `fallback_rate`.
    #[serde(default)]
    pub offline: bool,
}

fn default_primary() -> String {
    "PEN".to_string()
}

fn default_secondary() -> String {
    "USD".to_string()
}

fn default_endpoint() -> String {
    "https://api.exchangerate.host/latest".to_string()
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
            endpoint: default_endpoint(),
            access_key: None,
            timeout_seconds: None,
            fallback_rate: None,
            offline: false,
        }
    }
}

impl CurrencyConfig {
    pub fn fallback_rate(&self) -> f64 {
        self.fallback_rate.unwrap_or(DEFAULT_FALLBACK_RATE)
    }

    pub fn rate_settings(&self) -> ExchangeRateSettings {
        ExchangeRateSettings {
            endpoint: self.endpoint.clone(),
            base: self.secondary.clone(),
            symbol: self.primary.clone(),
            // unresolved ${VAR} placeholders mean no key was provided
            access_key: self
                .access_key
                .clone()
                .filter(|key| !key.is_empty() && !key.starts_with("${")),
            timeout: Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)),
            fallback_rate: self.fallback_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// "compact" (default) or "json"
    pub format: Option<String>,
}

impl ValuationConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ValuationError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ValuationError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ValuationError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_path("data.base_dir", &self.data.base_dir)?;
        let price_table = validate_required_field("data.price_table", &self.data.price_table)?;
        validate_file_extension("data.price_table", price_table, &["json", "csv"])?;
        if let Some(references) = &self.data.reference_averages {
            validate_file_extension("data.reference_averages", references, &["json"])?;
        }

        validate_positive_number(
            "model.min_adjusted_unit_price",
            self.model.min_adjusted_unit_price,
        )?;

        validate_non_empty_string("currency.primary", &self.currency.primary)?;
        validate_non_empty_string("currency.secondary", &self.currency.secondary)?;
        validate_positive_number("currency.fallback_rate", self.currency.fallback_rate())?;
        if !self.currency.offline {
            validate_url("currency.endpoint", &self.currency.endpoint)?;
        }
        if let Some(timeout) = self.currency.timeout_seconds {
            validate_range("currency.timeout_seconds", timeout, 1, 60)?;
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if !["compact", "json"].contains(&format) {
                return Err(ValuationError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            if parse_level(level).is_none() {
                return Err(ValuationError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: "Valid levels: trace, debug, info, warn, error".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn price_table_path(&self) -> Option<&str> {
        self.data.price_table.as_deref()
    }

    /// Logger setup from `[logging]`, with `verbose` coming from the command line.
    pub fn log_settings(&self, verbose: bool) -> LogSettings {
        LogSettings::from_config(self.logging.as_ref(), verbose)
    }
}

impl Validate for ValuationConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
