//! Configuration file support for astrofit.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/astrofit/config.toml`.
//! Nutrition API credentials may also come from the `NUTRITIONIX_APP_ID` and
//! `NUTRITIONIX_API_KEY` environment variables, which win over the file.

use crate::store::DEFAULT_FILE_NAME;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_ID_ENV: &str = "NUTRITIONIX_APP_ID";
pub const APP_KEY_ENV: &str = "NUTRITIONIX_API_KEY";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub nutrition: NutritionConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_file_name(),
        }
    }
}

impl DataConfig {
    /// Full path of the store file
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

/// Nutrition lookup service configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NutritionConfig {
    #[serde(default)]
    pub app_id: String,

    #[serde(default)]
    pub app_key: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NutritionConfig {
    pub fn has_credentials(&self) -> bool {
        !self.app_id.is_empty() && !self.app_key.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("astrofit")
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.into()
}

fn default_endpoint() -> String {
    "https://trackapi.nutritionix.com/v2/natural/nutrients".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from the standard config path, then apply
    /// credential overrides from the environment
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Self::default()
        };

        config.apply_credential_overrides(
            std::env::var(APP_ID_ENV).ok(),
            std::env::var(APP_KEY_ENV).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("astrofit")
            .join("config.toml")
    }

    /// Replace credentials with non-empty override values
    pub fn apply_credential_overrides(&mut self, app_id: Option<String>, app_key: Option<String>) {
        if let Some(id) = app_id.filter(|v| !v.trim().is_empty()) {
            self.nutrition.app_id = id.trim().to_string();
        }
        if let Some(key) = app_key.filter(|v| !v.trim().is_empty()) {
            self.nutrition.app_key = key.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data.file_name.trim().is_empty() {
            return Err(Error::Config("data.file_name must not be empty".into()));
        }
        if self.nutrition.endpoint.trim().is_empty() {
            return Err(Error::Config("nutrition.endpoint must not be empty".into()));
        }
        if self.nutrition.timeout_secs == 0 {
            return Err(Error::Config(
                "nutrition.timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
