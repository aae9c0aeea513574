//! Typed records for the listings catalog.

use serde::{Deserialize, Serialize};

use crate::enum_display_fromstr;
use crate::error::SafwaError;
use crate::store::Table;
use crate::store::row::{self, FromRow, Row};

pub const SAFWA_DIR: &str = ".safwa";

/// Display name used when a project has no name.
pub const FALLBACK_PROJECT_NAME: &str = "مشروع";
/// Display location used when a project has no location.
pub const FALLBACK_LOCATION: &str = "غير محدد";

// ============================================================================
// Status and kind enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

enum_display_fromstr!(ProjectStatus, SafwaError::InvalidStatus, {
    Upcoming => "upcoming",
    Ongoing => "ongoing",
    Completed => "completed",
});

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Upcoming,
        ProjectStatus::Ongoing,
        ProjectStatus::Completed,
    ];

    /// Lenient parse for stored values; anything unknown is upcoming.
    pub fn from_store(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Upcoming => "قريباً",
            ProjectStatus::Ongoing => "قيد الإنشاء",
            ProjectStatus::Completed => "مكتمل",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    #[default]
    Available,
    Reserved,
    Sold,
}

enum_display_fromstr!(UnitStatus, SafwaError::InvalidStatus, {
    Available => "available",
    Reserved => "reserved",
    Sold => "sold",
});

impl UnitStatus {
    /// Lenient parse for stored values. Anything that is neither available
    /// nor reserved is shown as sold.
    pub fn from_store(value: &str) -> Self {
        value.parse().unwrap_or(UnitStatus::Sold)
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitStatus::Available => "متاح",
            UnitStatus::Reserved => "محجوزة",
            UnitStatus::Sold => "مباعة",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    #[default]
    Interior,
    Exterior,
    Plan,
}

enum_display_fromstr!(ImageKind, SafwaError::InvalidImageKind, {
    Interior => "interior",
    Exterior => "exterior",
    Plan => "plan",
});

impl ImageKind {
    pub fn from_store(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            ImageKind::Interior => "صورة داخلية",
            ImageKind::Exterior => "صورة خارجية",
            ImageKind::Plan => "صورة",
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub location: String,
    /// Free-text map link as entered by an admin
    pub link: Option<String>,
    pub start_year: Option<i32>,
    pub status: ProjectStatus,
    pub main_image: Option<String>,
    pub brochure: Option<String>,
}

impl Project {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            FALLBACK_PROJECT_NAME
        } else {
            &self.name
        }
    }

    pub fn display_location(&self) -> &str {
        if self.location.trim().is_empty() {
            FALLBACK_LOCATION
        } else {
            &self.location
        }
    }
}

impl FromRow for Project {
    const TABLE: Table = Table::Projects;

    fn from_row(r: &Row) -> Option<Self> {
        Some(Self {
            id: row::id(r, "id")?,
            name: row::text(r, "name"),
            slug: row::text(r, "slug"),
            description: row::text(r, "description"),
            location: row::text(r, "location"),
            link: row::opt_text(r, "link"),
            start_year: row::year(r, "start_year"),
            status: ProjectStatus::from_store(&row::text(r, "status")),
            main_image: row::opt_text(r, "main_image"),
            brochure: row::opt_text(r, "brochure"),
        })
    }
}

/// A named subdivision of a project that groups units.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectSection {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub plan_image: Option<String>,
    pub brochure: Option<String>,
}

impl FromRow for ProjectSection {
    const TABLE: Table = Table::ProjectSections;

    fn from_row(r: &Row) -> Option<Self> {
        Some(Self {
            id: row::id(r, "id")?,
            project_id: row::id(r, "project_id").unwrap_or_default(),
            name: row::text(r, "name"),
            description: row::text(r, "description"),
            plan_image: row::opt_text(r, "plan_image"),
            brochure: row::opt_text(r, "brochure"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub project_id: String,
    pub section_id: Option<String>,
    pub unit_number: String,
    #[serde(rename = "type")]
    pub unit_type: String,
    pub size: Option<f64>,
    pub price: Option<f64>,
    pub status: UnitStatus,
    pub main_image: Option<String>,
    pub model_details: String,
    pub model_count: Option<u32>,
}

impl FromRow for Unit {
    const TABLE: Table = Table::Units;

    fn from_row(r: &Row) -> Option<Self> {
        Some(Self {
            id: row::id(r, "id")?,
            project_id: row::id(r, "project_id").unwrap_or_default(),
            section_id: row::id(r, "section_id"),
            unit_number: row::text(r, "unit_number"),
            unit_type: row::text(r, "type"),
            size: row::number(r, "size"),
            price: row::number(r, "price"),
            status: UnitStatus::from_store(&row::text(r, "status")),
            main_image: row::opt_text(r, "main_image"),
            model_details: row::text(r, "model_details"),
            model_count: row::count(r, "model_count"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectImage {
    pub id: String,
    pub project_id: String,
    pub image_url: String,
    #[serde(rename = "type")]
    pub kind: ImageKind,
}

impl FromRow for ProjectImage {
    const TABLE: Table = Table::ProjectImages;

    fn from_row(r: &Row) -> Option<Self> {
        Some(Self {
            id: row::id(r, "id")?,
            project_id: row::id(r, "project_id").unwrap_or_default(),
            image_url: row::text(r, "image_url"),
            kind: ImageKind::from_store(&row::text(r, "type")),
        })
    }
}

/// A downloadable document attached to a project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectFile {
    pub id: String,
    pub project_id: String,
    pub file_url: String,
    pub name: String,
    /// MIME subtype of the uploaded file (`pdf`, `png`, ...) or `unknown`
    #[serde(rename = "type")]
    pub file_type: String,
}

impl FromRow for ProjectFile {
    const TABLE: Table = Table::ProjectFiles;

    fn from_row(r: &Row) -> Option<Self> {
        let file_type = row::opt_text(r, "type").unwrap_or_else(|| "unknown".to_string());
        Some(Self {
            id: row::id(r, "id")?,
            project_id: row::id(r, "project_id").unwrap_or_default(),
            file_url: row::text(r, "file_url"),
            name: row::text(r, "name"),
            file_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_project_status_parsing() {
        assert_eq!("ongoing".parse::<ProjectStatus>().unwrap(), ProjectStatus::Ongoing);
        assert_eq!("Completed".parse::<ProjectStatus>().unwrap(), ProjectStatus::Completed);
        assert!("paused".parse::<ProjectStatus>().is_err());
        assert_eq!(ProjectStatus::from_store("paused"), ProjectStatus::Upcoming);
    }

    #[test]
    fn test_unit_status_unknown_is_sold() {
        assert_eq!(UnitStatus::from_store("available"), UnitStatus::Available);
        assert_eq!(UnitStatus::from_store("reserved"), UnitStatus::Reserved);
        assert_eq!(UnitStatus::from_store(""), UnitStatus::Sold);
        assert_eq!(UnitStatus::from_store("archived"), UnitStatus::Sold);
    }

    #[test]
    fn test_project_from_row_defaults_missing_fields() {
        let project = Project::from_row(&row(json!({
            "id": 7,
            "name": "Nuzha Residences",
            "status": "ongoing",
            "start_year": "2023",
            "unexpected": true,
        })))
        .unwrap();

        assert_eq!(project.id, "7");
        assert_eq!(project.status, ProjectStatus::Ongoing);
        assert_eq!(project.start_year, Some(2023));
        assert_eq!(project.location, "");
        assert_eq!(project.display_location(), FALLBACK_LOCATION);
        assert!(project.link.is_none());
    }

    #[test]
    fn test_project_from_row_requires_id() {
        assert!(Project::from_row(&row(json!({"name": "No id"}))).is_none());
    }

    #[test]
    fn test_unit_from_row() {
        let unit = Unit::from_row(&row(json!({
            "id": "u1",
            "project_id": "p1",
            "section_id": null,
            "unit_number": "A-12",
            "type": "Villa",
            "size": "312.5",
            "price": 1250000,
            "status": "reserved",
            "model_count": 4,
        })))
        .unwrap();

        assert_eq!(unit.section_id, None);
        assert_eq!(unit.unit_type, "Villa");
        assert_eq!(unit.size, Some(312.5));
        assert_eq!(unit.price, Some(1_250_000.0));
        assert_eq!(unit.status, UnitStatus::Reserved);
        assert_eq!(unit.model_count, Some(4));
    }

    #[test]
    fn test_image_kind_default_is_interior() {
        let image = ProjectImage::from_row(&row(json!({
            "id": "i1", "project_id": "p1", "image_url": "https://cdn/x.jpg", "type": "aerial"
        })))
        .unwrap();
        assert_eq!(image.kind, ImageKind::Interior);
    }

    #[test]
    fn test_file_type_defaults_to_unknown() {
        let file = ProjectFile::from_row(&row(json!({
            "id": "f1", "project_id": "p1", "file_url": "https://cdn/f", "name": "Brochure"
        })))
        .unwrap();
        assert_eq!(file.file_type, "unknown");
    }

    #[test]
    fn test_unit_serializes_type_column() {
        let unit = Unit {
            id: "u1".to_string(),
            unit_type: "Duplex".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&unit).unwrap();
        assert_eq!(value["type"], "Duplex");
        assert_eq!(value["status"], "available");
    }
}
