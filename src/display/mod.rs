use owo_colors::OwoColorize;

use crate::admin::{AdminMessage, MessageKind};
use crate::filter::{Facet, PROJECT_STATUS_OPTIONS};
use crate::types::{ProjectStatus, UnitStatus};

pub mod tables;

pub use tables::{files_table, projects_table, sections_table, unit_cards_table, units_table};

pub fn format_project_status(status: ProjectStatus) -> String {
    let badge = format!("[{}]", status.label());
    match status {
        ProjectStatus::Upcoming => badge.yellow().to_string(),
        ProjectStatus::Ongoing => badge.cyan().to_string(),
        ProjectStatus::Completed => badge.green().to_string(),
    }
}

pub fn format_unit_status(status: UnitStatus) -> String {
    let badge = format!("[{}]", status.label());
    match status {
        UnitStatus::Available => badge.green().to_string(),
        UnitStatus::Reserved => badge.yellow().to_string(),
        UnitStatus::Sold => badge.dimmed().to_string(),
    }
}

/// The projects list status chips, with the selected one bracketed
pub fn format_status_options(selected: &Facet<ProjectStatus>) -> String {
    PROJECT_STATUS_OPTIONS
        .iter()
        .map(|(facet, label)| {
            if facet == selected {
                format!("[{label}]").bold().to_string()
            } else {
                label.dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Inline admin feedback, coloured by kind
pub fn format_admin_message(message: &AdminMessage) -> String {
    match message.kind {
        MessageKind::Success => format!("{} {}", "✓".green(), message.text),
        MessageKind::Warning => format!("{} {}", "!".yellow().bold(), message.text.yellow()),
        MessageKind::Error => format!("{} {}", "✗".red(), message.text.red()),
    }
}

/// `key: value` line with a dimmed placeholder for missing values
pub fn format_field(key: &str, value: Option<&str>) -> String {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(value) => format!("{}: {value}", key.cyan()),
        None => format!("{}: {}", key.cyan(), "-".dimmed()),
    }
}
