use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::links::map::{MapTarget, project_map_link, resolve_map_target};
use crate::links::whatsapp_link;

fn describe(target: &MapTarget) -> String {
    match target {
        MapTarget::Embed(_) => "embed link".to_string(),
        MapTarget::Coordinates { lat, lng } => format!("coordinates {lat},{lng}"),
        MapTarget::Place(name) => format!("place \"{name}\""),
        MapTarget::Query(q) => format!("query {q}"),
        MapTarget::Search(text) => format!("search \"{text}\""),
    }
}

/// Resolve a pasted map link (and location) into embed and open links.
/// Works offline.
pub fn cmd_map_link(link: Option<&str>, location: Option<&str>, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let default_location = config.map.default_location.as_str();

    let target = resolve_map_target(link, location, default_location);
    let embed = target.embed_url();
    let open = project_map_link(link, location, default_location);

    let json = json!({
        "resolved": describe(&target),
        "embed_url": embed,
        "open_url": open,
    });
    let text = format!(
        "{} {}\n{} {embed}\n{} {open}",
        "resolved:".cyan(),
        describe(&target),
        "embed:".cyan(),
        "open:".cyan(),
    );

    CommandOutput::new(json).with_text(text).print(output)
}

/// Print a messaging link for the configured contact number.
pub fn cmd_whatsapp(message: Option<&str>, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let message = message.unwrap_or(&config.contact.whatsapp_message);
    let link = whatsapp_link(&config.contact.whatsapp_phone, Some(message));

    CommandOutput::new(json!({ "url": link, "message": message }))
        .with_text(link)
        .print(output)
}
