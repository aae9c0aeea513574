//! Read-only catalog commands: project listing, project detail, unit gallery.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, open_store};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::display::{
    files_table, format_field, format_project_status, format_status_options, projects_table,
    sections_table, unit_cards_table, units_table,
};
use crate::error::{Result, SafwaError};
use crate::fetcher::catalog::{ProjectBundle, fetch_project_bundle, fetch_projects, fetch_unit_cards};
use crate::filter::{ALL_LABEL, Facet, UnitGalleryFilter, filter_projects};
use crate::links::messaging::project_visit_message;
use crate::links::{project_map_link, resolve_map_target, whatsapp_link};
use crate::types::ProjectStatus;
use crate::view::{ProjectDetailState, ProjectTab, gallery_images, open_lightbox};

/// List projects, newest first, optionally narrowed to one status.
pub async fn cmd_projects(status: Facet<ProjectStatus>, output: OutputOptions) -> Result<()> {
    let (_, store) = open_store()?;
    let projects = fetch_projects(&store).await;
    let shown = filter_projects(&projects, &status);

    let chips = format_status_options(&status);
    let text = if shown.is_empty() {
        format!("{chips}\n\nNo projects found.")
    } else {
        format!("{chips}\n\n{}\n\n{} project(s)", projects_table(&shown), shown.len())
    };

    CommandOutput::new(json!(shown)).with_text(text).print(output)
}

/// Show one tab of a project's detail page.
pub async fn cmd_project(
    id: &str,
    tab: Option<ProjectTab>,
    section: Option<String>,
    image: Option<usize>,
    output: OutputOptions,
) -> Result<()> {
    let (config, store) = open_store()?;
    let bundle = fetch_project_bundle(&store, id)
        .await
        .ok_or_else(|| SafwaError::ProjectNotFound(id.to_string()))?;

    let mut state = ProjectDetailState::new();
    if let Some(section) = section {
        state.view_units_in_section(&section);
    }
    if image.is_some() {
        state.select_tab(ProjectTab::Gallery);
    }
    if let Some(tab) = tab {
        state.select_tab(tab);
    }

    let (json, text) = render_tab(&bundle, &state, image, &config);
    CommandOutput::new(json).with_text(text).print(output)
}

fn render_tab(
    bundle: &ProjectBundle,
    state: &ProjectDetailState,
    image: Option<usize>,
    config: &Config,
) -> (serde_json::Value, String) {
    let project = &bundle.project;
    let tab = state.active_tab();
    let header = format!(
        "{} {}  {}\n{}\n",
        project.display_name().bold(),
        format_project_status(project.status),
        project.display_location().dimmed(),
        tab.label().cyan()
    );

    match tab {
        ProjectTab::Overview => {
            let location = Some(project.location.as_str());
            let default_location = config.map.default_location.as_str();
            let embed = resolve_map_target(project.link.as_deref(), location, default_location)
                .embed_url();
            let open = project_map_link(project.link.as_deref(), location, default_location);
            let visit = whatsapp_link(
                &config.contact.whatsapp_phone,
                Some(project_visit_message(project).as_str()),
            );
            let year = project.start_year.map(|y| y.to_string());
            let lines = [
                format_field("description", Some(project.description.as_str())),
                format_field("start year", year.as_deref()),
                format_field("units", Some(bundle.units.len().to_string().as_str())),
                format_field("map", Some(embed.as_str())),
                format_field("open in maps", Some(open.as_str())),
                format_field("book a visit", Some(visit.as_str())),
            ];
            let json = json!({
                "tab": tab.to_string(),
                "project": project,
                "map_embed_url": embed,
                "map_link": open,
                "visit_link": visit,
            });
            (json, format!("{header}\n{}", lines.join("\n")))
        }
        ProjectTab::Sections => {
            let body = if bundle.sections.is_empty() {
                "No sections.".to_string()
            } else {
                sections_table(&bundle.sections)
            };
            let json = json!({ "tab": tab.to_string(), "sections": bundle.sections });
            (json, format!("{header}\n{body}"))
        }
        ProjectTab::Units => {
            let units = state.visible_units(&bundle.units);
            let facet = match state.section_facet().value() {
                Some(id) => bundle
                    .sections
                    .iter()
                    .find(|s| &s.id == id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| id.clone()),
                None => ALL_LABEL.to_string(),
            };
            let body = if units.is_empty() {
                "No units.".to_string()
            } else {
                units_table(&units)
            };
            let json = json!({
                "tab": tab.to_string(),
                "section": state.section_facet().value(),
                "units": units,
            });
            (json, format!("{header}{}\n\n{body}", format_field("section", Some(facet.as_str()))))
        }
        ProjectTab::Gallery => {
            let images = gallery_images(project, &bundle.images);
            if let Some(number) = image {
                let Some(view) = open_lightbox(&images, number) else {
                    let json = json!({ "tab": tab.to_string(), "image": null });
                    return (json, format!("{header}\nNo image #{number}."));
                };
                let lines = [
                    format!("{} {}", view.position.bold(), view.current.label.cyan()),
                    view.current.url.clone(),
                    format_field("previous", Some(view.previous.url.as_str())),
                    format_field("next", Some(view.next.url.as_str())),
                ];
                let json = json!({ "tab": tab.to_string(), "image": view });
                return (json, format!("{header}\n{}", lines.join("\n")));
            }
            let body = if images.is_empty() {
                "No images.".to_string()
            } else {
                images
                    .iter()
                    .enumerate()
                    .map(|(i, image)| format!("{:>3}. {} {}", i + 1, image.label.cyan(), image.url))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            let json = json!({ "tab": tab.to_string(), "images": images });
            (json, format!("{header}\n{body}"))
        }
        ProjectTab::Files => {
            let mut body = format_field("brochure", project.brochure.as_deref());
            if !bundle.files.is_empty() {
                body.push_str("\n\n");
                body.push_str(&files_table(&bundle.files));
            }
            let json = json!({
                "tab": tab.to_string(),
                "brochure": project.brochure,
                "files": bundle.files,
            });
            (json, format!("{header}\n{body}"))
        }
    }
}

/// Browse the unit gallery with the same text and project filters the
/// models page offers.
pub async fn cmd_units(
    project: Facet<String>,
    search: Option<String>,
    limit: Option<usize>,
    output: OutputOptions,
) -> Result<()> {
    let (_, store) = open_store()?;
    let cards = fetch_unit_cards(&store).await;

    let mut filter = UnitGalleryFilter::new();
    filter.project = project;
    if let Some(search) = search {
        filter.set_text(&search);
    }

    let matching = filter.apply(&cards).len();
    let shown = match limit {
        Some(limit) => {
            while filter.visible_count() < limit && filter.has_more(&cards) {
                filter.load_more();
            }
            let mut shown = filter.visible(&cards);
            shown.truncate(limit);
            shown
        }
        None => filter.visible(&cards),
    };

    let text = if shown.is_empty() {
        "No units found.".to_string()
    } else {
        let mut text = unit_cards_table(&shown);
        text.push_str(&format!("\n\n{} of {matching} unit(s)", shown.len()));
        if shown.len() < matching {
            text.push_str(&format!(" {}", "(use --limit to see more)".dimmed()));
        }
        text
    };

    let json = json!({
        "units": shown,
        "total": matching,
        "projects": UnitGalleryFilter::project_options(&cards),
    });
    CommandOutput::new(json).with_text(text).print(output)
}
