//! The concrete collections the site reads.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::Result;
use crate::store::{DataStore, Query, Table};
use crate::types::{Project, ProjectFile, ProjectImage, ProjectSection, Unit, UnitStatus};
use crate::utils::text::{format_grouped, format_plain};

use super::{fetch_collection, fetch_one, try_fetch_collection};

/// Title used for a unit card without a unit number.
pub const FALLBACK_UNIT_TITLE: &str = "نموذج سكني";
/// Type used for a unit card without a type.
pub const FALLBACK_UNIT_TYPE: &str = "وحدة سكنية";
/// Project name used for a unit card whose project is unknown.
pub const FALLBACK_UNIT_PROJECT: &str = "مشروع مساكن";

/// Every project, newest first.
pub fn projects_query() -> Query {
    Query::from(Table::Projects).order("created_at", false)
}

pub async fn fetch_projects<S: DataStore>(store: &S) -> Vec<Project> {
    fetch_collection(store, &projects_query()).await
}

/// Everything the project detail page shows for one project.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProjectBundle {
    pub project: Project,
    /// Cheapest first
    pub units: Vec<Unit>,
    pub images: Vec<ProjectImage>,
    /// Newest first
    pub files: Vec<ProjectFile>,
    pub sections: Vec<ProjectSection>,
}

/// Load a project and its child collections.
///
/// Returns `None` when the project itself cannot be found. Child
/// collections degrade to empty lists independently of each other.
pub async fn fetch_project_bundle<S: DataStore>(store: &S, project_id: &str) -> Option<ProjectBundle> {
    let project_query = Query::from(Table::Projects).eq("id", project_id);
    let units_query = Query::from(Table::Units)
        .eq("project_id", project_id)
        .order("price", true);
    let images_query = Query::from(Table::ProjectImages).eq("project_id", project_id);
    let files_query = Query::from(Table::ProjectFiles)
        .eq("project_id", project_id)
        .order("created_at", false);
    let sections_query = Query::from(Table::ProjectSections).eq("project_id", project_id);

    let (project, units, images, files, sections) = futures::join!(
        fetch_one::<_, Project>(store, project_query),
        fetch_collection::<_, Unit>(store, &units_query),
        fetch_collection::<_, ProjectImage>(store, &images_query),
        fetch_collection::<_, ProjectFile>(store, &files_query),
        fetch_collection::<_, ProjectSection>(store, &sections_query),
    );

    let project = project?;
    tracing::debug!(
        "loaded project {}: {} units, {} images, {} files, {} sections",
        project.id,
        units.len(),
        images.len(),
        files.len(),
        sections.len()
    );

    Some(ProjectBundle {
        project,
        units,
        images,
        files,
        sections,
    })
}

/// Sections of a project in creation order (admin editor).
pub async fn fetch_sections<S: DataStore>(store: &S, project_id: &str) -> Result<Vec<ProjectSection>> {
    let query = Query::from(Table::ProjectSections)
        .eq("project_id", project_id)
        .order("created_at", true);
    try_fetch_collection(store, &query).await
}

/// Units of a project in creation order (admin editor).
pub async fn fetch_units<S: DataStore>(store: &S, project_id: &str) -> Result<Vec<Unit>> {
    let query = Query::from(Table::Units)
        .eq("project_id", project_id)
        .order("created_at", true);
    try_fetch_collection(store, &query).await
}

/// Distinct ids in first-seen order.
pub fn distinct_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(String::from)
        .collect()
}

/// Look up several projects with one `in` query, keyed by id.
///
/// No query is issued for an empty id list.
pub async fn lookup_projects<S: DataStore>(
    store: &S,
    ids: &[String],
    columns: &str,
) -> Result<HashMap<String, Project>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let query = Query::from(Table::Projects)
        .select(columns)
        .in_list("id", ids.iter().cloned());
    let projects: Vec<Project> = try_fetch_collection(store, &query).await?;
    Ok(projects.into_iter().map(|p| (p.id.clone(), p)).collect())
}

/// A unit as the models gallery shows it, joined with its project.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UnitCard {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub unit_type: String,
    pub area: Option<f64>,
    pub price: Option<f64>,
    pub status: UnitStatus,
    pub image: Option<String>,
    pub details: String,
    pub count: Option<u32>,
    pub project_name: String,
    pub location: Option<String>,
    pub location_link: Option<String>,
}

impl UnitCard {
    pub fn new(unit: &Unit, project: Option<&Project>) -> Self {
        let non_empty = |s: &str, fallback: &str| {
            if s.trim().is_empty() {
                fallback.to_string()
            } else {
                s.to_string()
            }
        };

        Self {
            id: unit.id.clone(),
            project_id: unit.project_id.clone(),
            title: non_empty(&unit.unit_number, FALLBACK_UNIT_TITLE),
            unit_type: non_empty(&unit.unit_type, FALLBACK_UNIT_TYPE),
            area: unit.size,
            price: unit.price,
            status: unit.status,
            image: unit.main_image.clone(),
            details: unit.model_details.clone(),
            count: unit.model_count,
            project_name: non_empty(project.map(|p| p.name.as_str()).unwrap_or(""), FALLBACK_UNIT_PROJECT),
            location: project
                .map(|p| p.location.clone())
                .filter(|l| !l.trim().is_empty()),
            location_link: project.and_then(|p| p.link.clone()),
        }
    }

    /// Price with thousands separators, or `-`.
    pub fn price_label(&self) -> String {
        self.price.map(format_grouped).unwrap_or_else(|| "-".to_string())
    }

    pub fn area_label(&self) -> String {
        self.area.map(format_plain).unwrap_or_else(|| "-".to_string())
    }
}

/// Every unit for the models gallery, newest first, joined with its project.
///
/// Projects are resolved with a single batched lookup.
pub async fn fetch_unit_cards<S: DataStore>(store: &S) -> Vec<UnitCard> {
    let query = Query::from(Table::Units).order("created_at", false);
    let units: Vec<Unit> = fetch_collection(store, &query).await;

    let ids = distinct_ids(units.iter().map(|u| u.project_id.as_str()));
    let projects = lookup_projects(store, &ids, "id, name, location, link")
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to load projects for unit cards: {e}");
            HashMap::new()
        });

    units
        .iter()
        .map(|unit| UnitCard::new(unit, projects.get(&unit.project_id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_distinct_ids_keeps_first_seen_order() {
        let ids = distinct_ids(["p2", "p1", "p2", "", "p3", "p1"]);
        assert_eq!(ids, vec!["p2", "p1", "p3"]);
    }

    #[test]
    fn test_unit_card_fallbacks() {
        let unit = Unit {
            id: "u1".to_string(),
            price: Some(1_250_000.0),
            ..Default::default()
        };
        let card = UnitCard::new(&unit, None);
        assert_eq!(card.title, FALLBACK_UNIT_TITLE);
        assert_eq!(card.unit_type, FALLBACK_UNIT_TYPE);
        assert_eq!(card.project_name, FALLBACK_UNIT_PROJECT);
        assert_eq!(card.price_label(), "1,250,000");
        assert_eq!(card.area_label(), "-");
    }

    #[tokio::test]
    async fn test_lookup_projects_skips_empty_ids() {
        let store = MemoryStore::new();
        let found = lookup_projects(&store, &[], "id, name").await.unwrap();
        assert!(found.is_empty());
        assert!(store.queries().is_empty());
    }

    #[tokio::test]
    async fn test_missing_project_yields_none() {
        let store = MemoryStore::new();
        store.seed(Table::Units, [json!({"id": "u1", "project_id": "ghost"})]);
        assert!(fetch_project_bundle(&store, "ghost").await.is_none());
    }
}
