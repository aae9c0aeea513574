//! Command implementations behind the `safwa` binary.
//!
//! Every command prints either human-readable text or, with `--json`, a
//! pretty-printed JSON document built from the same data.

mod admin;
mod catalog;
mod config;
mod links;
mod search;

pub use admin::{
    ProjectArgs, SectionArgs, UnitArgs, cmd_file_add, cmd_file_rm, cmd_image_add, cmd_image_rm,
    cmd_image_set_type, cmd_project_create, cmd_project_delete, cmd_project_update,
    cmd_section_add, cmd_section_rm, cmd_unit_add, cmd_unit_rm,
};
pub use catalog::{cmd_project, cmd_projects, cmd_units};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use links::{cmd_map_link, cmd_whatsapp};
pub use search::cmd_search;

use serde_json::Value;

use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::store::StoreClient;

/// Print a JSON value with pretty formatting
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A command result with a JSON form and an optional text form.
///
/// Without a text form the JSON is printed in both modes.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

/// Load the config and connect to the backend it names.
pub(crate) fn open_store() -> Result<(Config, StoreClient)> {
    let config = Config::load()?;
    let store = StoreClient::from_config(&config)?;
    tracing::debug!("using backend {}", store.base_url());
    Ok((config, store))
}
