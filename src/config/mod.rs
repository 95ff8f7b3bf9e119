//! User preferences persisted as JSON next to the entry slot.

use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::utils::{app_data_dir, config_dir_in, config_file_in, ensure_dir, write_atomic};
use crate::currency::{CurrencyCode, CurrencyDisplay, LocaleConfig, MoneyFormat, NegativeStyle};
use crate::storage::DEFAULT_STORAGE_KEY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Unknown setting `{0}`")]
    UnknownKey(String),
    #[error("Invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

/// Keys accepted by [`Config::set`], in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "currency",
    "locale",
    "currency_display",
    "negative_style",
    "storage_key",
    "ui_color_enabled",
    "report_title",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub currency_display: CurrencyDisplay,
    #[serde(default)]
    pub negative_style: NegativeStyle,
    #[serde(default = "Config::default_storage_key")]
    pub storage_key: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_report_title")]
    pub report_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            locale: LocaleConfig::default(),
            currency_display: CurrencyDisplay::default(),
            negative_style: NegativeStyle::default(),
            storage_key: Self::default_storage_key(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            report_title: Self::default_report_title(),
        }
    }
}

impl Config {
    fn default_currency() -> String {
        "COP".into()
    }

    fn default_storage_key() -> String {
        DEFAULT_STORAGE_KEY.into()
    }

    fn default_ui_color_enabled() -> bool {
        true
    }

    fn default_report_title() -> String {
        "Home Book Financial Report".into()
    }

    pub fn money_format(&self) -> MoneyFormat {
        MoneyFormat {
            code: CurrencyCode::new(self.currency.clone()),
            locale: self.locale.clone(),
            display: self.currency_display,
            negative_style: self.negative_style,
        }
    }

    /// Current value of `key` as display text.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "currency" => self.currency.clone(),
            "locale" => self.locale.language_tag.clone(),
            "currency_display" => match self.currency_display {
                CurrencyDisplay::Symbol => "symbol".into(),
                CurrencyDisplay::Code => "code".into(),
                CurrencyDisplay::CodeAndSymbol => "code_and_symbol".into(),
            },
            "negative_style" => match self.negative_style {
                NegativeStyle::Sign => "sign".into(),
                NegativeStyle::Parentheses => "parentheses".into(),
            },
            "storage_key" => self.storage_key.clone(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "report_title" => self.report_title.clone(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let trimmed = value.trim();
        match key {
            "currency" => {
                if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(invalid());
                }
                self.currency = trimmed.to_ascii_uppercase();
            }
            "locale" => {
                self.locale = match trimmed.to_ascii_lowercase().as_str() {
                    "es-co" => LocaleConfig::es_co(),
                    "en-us" => LocaleConfig::en_us(),
                    _ => return Err(invalid()),
                };
            }
            "currency_display" => {
                self.currency_display = match trimmed {
                    "symbol" => CurrencyDisplay::Symbol,
                    "code" => CurrencyDisplay::Code,
                    "code_and_symbol" => CurrencyDisplay::CodeAndSymbol,
                    _ => return Err(invalid()),
                };
            }
            "negative_style" => {
                self.negative_style = match trimmed {
                    "sign" => NegativeStyle::Sign,
                    "parentheses" => NegativeStyle::Parentheses,
                    _ => return Err(invalid()),
                };
            }
            "storage_key" => {
                if trimmed.is_empty() {
                    return Err(invalid());
                }
                self.storage_key = trimmed.to_string();
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = parse_bool(trimmed).ok_or_else(invalid)?;
            }
            "report_title" => {
                if trimmed.is_empty() {
                    return Err(invalid());
                }
                self.report_title = trimmed.to_string();
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Loads and saves [`Config`] under `<base>/config/config.json`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        ensure_dir(&config_dir_in(&base))?;
        let path = config_file_in(&base);
        Ok(Self { base, path })
    }

    /// Missing file yields defaults. A malformed file is reported, not silently replaced.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            warn!(path = %self.path.display(), %err, "config file is malformed");
            ConfigError::Serde(err.to_string())
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}
