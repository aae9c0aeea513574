//! Application configuration.
//!
//! Configuration is stored in `.safwa/config.yaml` and includes:
//! - Backend URL and API key (overridable through the environment)
//! - Contact defaults for messaging links
//! - Map and search settings

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SafwaError};
use crate::links::map::DEFAULT_LOCATION;
use crate::links::messaging::{DEFAULT_WHATSAPP_MESSAGE, DEFAULT_WHATSAPP_PHONE};
use crate::types::SAFWA_DIR;
use crate::utils::ensure_parent_dir;

pub const BACKEND_URL_ENV: &str = "SAFWA_BACKEND_URL";
pub const BACKEND_KEY_ENV: &str = "SAFWA_BACKEND_KEY";

/// Keys accepted by `config get` and `config set`.
pub const CONFIG_KEYS: [&str; 7] = [
    "backend.url",
    "backend.key",
    "contact.whatsapp_phone",
    "contact.whatsapp_message",
    "map.default_location",
    "search.debounce_ms",
    "search.limit",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub contact: ContactConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

/// Backend connection
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    #[serde(default = "default_whatsapp_phone")]
    pub whatsapp_phone: String,
    #[serde(default = "default_whatsapp_message")]
    pub whatsapp_message: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            whatsapp_phone: default_whatsapp_phone(),
            whatsapp_message: default_whatsapp_message(),
        }
    }
}

fn default_whatsapp_phone() -> String {
    DEFAULT_WHATSAPP_PHONE.to_string()
}

fn default_whatsapp_message() -> String {
    DEFAULT_WHATSAPP_MESSAGE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_location")]
    pub default_location: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_location: default_location(),
        }
    }
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a search runs, in milliseconds (default: 500)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Results per side of a global search (default: 5)
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            limit: default_search_limit(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_search_limit() -> usize {
    5
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn env_override(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        PathBuf::from(SAFWA_DIR).join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        ensure_parent_dir(&path)?;

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Backend URL from the environment or the config file
    pub fn backend_url(&self) -> Option<String> {
        env_override(BACKEND_URL_ENV).or_else(|| self.backend.url.clone())
    }

    /// Backend API key from the environment or the config file
    pub fn backend_key(&self) -> Option<String> {
        env_override(BACKEND_KEY_ENV).or_else(|| self.backend.key.clone())
    }

    /// Current value of a config key. The backend key is returned in full;
    /// callers decide whether to mask it.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match validate_config_key(key)? {
            "backend.url" => self.backend_url(),
            "backend.key" => self.backend_key(),
            "contact.whatsapp_phone" => Some(self.contact.whatsapp_phone.clone()),
            "contact.whatsapp_message" => Some(self.contact.whatsapp_message.clone()),
            "map.default_location" => Some(self.map.default_location.clone()),
            "search.debounce_ms" => Some(self.search.debounce_ms.to_string()),
            "search.limit" => Some(self.search.limit.to_string()),
            _ => None,
        };
        Ok(value)
    }

    /// Set a config key from its textual value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match validate_config_key(key)? {
            "backend.url" => {
                url::Url::parse(value)?;
                self.backend.url = Some(value.trim_end_matches('/').to_string());
            }
            "backend.key" => self.backend.key = Some(value.to_string()),
            "contact.whatsapp_phone" => self.contact.whatsapp_phone = value.to_string(),
            "contact.whatsapp_message" => self.contact.whatsapp_message = value.to_string(),
            "map.default_location" => self.map.default_location = value.to_string(),
            "search.debounce_ms" => self.search.debounce_ms = parse_number(key, value)?,
            "search.limit" => {
                let limit: usize = parse_number(key, value)?;
                if limit == 0 {
                    return Err(SafwaError::Config("search.limit must be at least 1".to_string()));
                }
                self.search.limit = limit;
            }
            _ => {}
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        SafwaError::Config(format!("invalid value '{value}' for {key}. Expected a whole number"))
    })
}

/// Check a config key, suggesting dot notation for `section_field` typos.
pub fn validate_config_key(key: &str) -> Result<&str> {
    if CONFIG_KEYS.contains(&key) {
        return Ok(key);
    }

    if let Some(pos) = key.find('_') {
        let dot_version = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        if CONFIG_KEYS.contains(&dot_version.as_str()) {
            return Err(SafwaError::Config(format!(
                "invalid config key '{key}'. Use dot notation: '{dot_version}'"
            )));
        }
    }

    Err(SafwaError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    )))
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
pub fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}
