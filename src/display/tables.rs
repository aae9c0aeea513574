//! Table rendering for list output.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::fetcher::catalog::UnitCard;
use crate::types::{Project, ProjectFile, ProjectSection, Unit};
use crate::utils::text::{format_grouped, format_plain, truncate_string};

const DETAILS_WIDTH: usize = 40;

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct UnitCardRow {
    #[tabled(rename = "Unit")]
    title: String,
    #[tabled(rename = "Type")]
    unit_type: String,
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "Area (m²)")]
    area: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Type")]
    unit_type: String,
    #[tabled(rename = "Area (m²)")]
    area: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    file_type: String,
    #[tabled(rename = "URL")]
    url: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

pub fn projects_table(projects: &[&Project]) -> String {
    render(
        projects
            .iter()
            .map(|p| ProjectRow {
                id: p.id.clone(),
                name: p.display_name().to_string(),
                location: p.display_location().to_string(),
                year: or_dash(p.start_year.map(|y| y.to_string())),
                status: p.status.label().to_string(),
            })
            .collect(),
    )
}

pub fn unit_cards_table(cards: &[&UnitCard]) -> String {
    render(
        cards
            .iter()
            .map(|c| UnitCardRow {
                title: c.title.clone(),
                unit_type: c.unit_type.clone(),
                project: c.project_name.clone(),
                area: c.area_label(),
                price: c.price_label(),
                status: c.status.label().to_string(),
            })
            .collect(),
    )
}

pub fn units_table(units: &[&Unit]) -> String {
    render(
        units
            .iter()
            .map(|u| UnitRow {
                id: u.id.clone(),
                number: u.unit_number.clone(),
                unit_type: u.unit_type.clone(),
                area: or_dash(u.size.map(format_plain)),
                price: or_dash(u.price.map(format_grouped)),
                status: u.status.label().to_string(),
            })
            .collect(),
    )
}

pub fn sections_table(sections: &[ProjectSection]) -> String {
    render(
        sections
            .iter()
            .map(|s| SectionRow {
                id: s.id.clone(),
                name: s.name.clone(),
                description: truncate_string(&s.description, DETAILS_WIDTH),
            })
            .collect(),
    )
}

pub fn files_table(files: &[ProjectFile]) -> String {
    render(
        files
            .iter()
            .map(|f| FileRow {
                name: f.name.clone(),
                file_type: f.file_type.clone(),
                url: f.file_url.clone(),
            })
            .collect(),
    )
}
