//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value (the backend key is masked)
//! - `config set`: Set a value in `.safwa/config.yaml`

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{BACKEND_KEY_ENV, BACKEND_URL_ENV, Config, mask_sensitive_value};
use crate::error::{Result, SafwaError};

const SECRET_KEY: &str = "backend.key";

fn configured(value: bool) -> String {
    if value {
        "configured".green().to_string()
    } else {
        "not configured".dimmed().to_string()
    }
}

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let url = config.backend_url();
    let key_configured = config.backend_key().is_some();

    let json_output = json!({
        "backend": {
            "url": url,
            "key_configured": key_configured,
        },
        "contact": config.contact,
        "map": config.map,
        "search": config.search,
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text = format!("{}\n\n", "Configuration:".cyan().bold());

    text.push_str(&format!("{}:\n", "backend".cyan()));
    match &url {
        Some(url) => text.push_str(&format!("  url: {url}\n")),
        None => text.push_str(&format!("  url: {}\n", "not configured".dimmed())),
    }
    text.push_str(&format!("  key: {}\n\n", configured(key_configured)));

    text.push_str(&format!("{}:\n", "contact".cyan()));
    text.push_str(&format!("  whatsapp_phone: {}\n", config.contact.whatsapp_phone));
    text.push_str(&format!("  whatsapp_message: {}\n\n", config.contact.whatsapp_message));

    text.push_str(&format!("{}:\n", "map".cyan()));
    text.push_str(&format!("  default_location: {}\n\n", config.map.default_location));

    text.push_str(&format!("{}:\n", "search".cyan()));
    text.push_str(&format!("  debounce_ms: {}\n", config.search.debounce_ms));
    text.push_str(&format!("  limit: {}\n\n", config.search.limit));

    text.push_str(&format!(
        "{}",
        format!(
            "Config file: {} ({BACKEND_URL_ENV} and {BACKEND_KEY_ENV} override the backend)",
            Config::config_path().display()
        )
        .dimmed()
    ));

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    tracing::debug!("set config key {key}");

    let shown = if key == SECRET_KEY {
        mask_sensitive_value(value)
    } else {
        value.to_string()
    };

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    }))
    .with_text(format!("Set {} to {shown}", key.cyan()))
    .print(output)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config
        .get(key)?
        .ok_or_else(|| SafwaError::Config(format!("{key} not set")))?;

    if key == SECRET_KEY {
        let masked = mask_sensitive_value(&value);
        return CommandOutput::new(json!({
            "key": key,
            "value": masked,
            "configured": true,
            "masked": true,
        }))
        .with_text(format!(
            "{masked} (masked - showing first 2 and last 2 characters)"
        ))
        .print(output);
    }

    CommandOutput::new(json!({
        "key": key,
        "value": value,
        "configured": true,
    }))
    .with_text(value.clone())
    .print(output)
}
