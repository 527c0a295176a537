//! Configuration management for PriceIntel

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::i18n::Locale;

pub const CONFIG_ENV: &str = "PRICEINTEL_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Fallback locale for missing keys and the last step of detection
    #[serde(default)]
    pub default: Locale,
    /// TOML file holding the persisted locale preference
    #[serde(default = "default_preference_file")]
    pub preference_file: String,
    /// Directory of `<code>.json` catalogs overriding the built-in ones
    #[serde(default)]
    pub catalog_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: u64,
    /// Simulated payment processing time
    #[serde(default = "default_purchase_delay_ms")]
    pub purchase_delay_ms: u64,
    /// Simulated contact message delivery time
    #[serde(default = "default_contact_delay_ms")]
    pub contact_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_demo_interval_secs")]
    pub interval_secs: u64,
}

fn default_preference_file() -> String {
    "~/.config/priceintel/preferences.toml".to_string()
}

fn default_submit_timeout_secs() -> u64 {
    30
}

fn default_purchase_delay_ms() -> u64 {
    2000
}

fn default_contact_delay_ms() -> u64 {
    1000
}

fn default_demo_interval_secs() -> u64 {
    5
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: Locale::default(),
            preference_file: default_preference_file(),
            catalog_dir: None,
        }
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            submit_timeout_secs: default_submit_timeout_secs(),
            purchase_delay_ms: default_purchase_delay_ms(),
            contact_delay_ms: default_contact_delay_ms(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_demo_interval_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file is not an error: the site works without any
    /// configuration, so defaults are returned instead.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.wizard.submit_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "wizard.submit_timeout_secs must be greater than zero".to_string(),
            )
            .into());
        }
        if self.demo.interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "demo.interval_secs must be greater than zero".to_string(),
            )
            .into());
        }
        Ok(())
    }

    pub fn preference_path(&self) -> PathBuf {
        expand_path(&self.locale.preference_file)
    }

    pub fn catalog_dir(&self) -> Option<PathBuf> {
        self.locale.catalog_dir.as_deref().map(expand_path)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.wizard.submit_timeout_secs)
    }

    pub fn demo_interval(&self) -> Duration {
        Duration::from_secs(self.demo.interval_secs)
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(expand_path(&path));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("priceintel").join("config.toml"))
}
