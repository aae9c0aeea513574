//! Site-wide search: projects and units matching a term.

use std::collections::HashMap;

use crate::error::Result;
use crate::fetcher::catalog::{distinct_ids, lookup_projects};
use crate::fetcher::try_fetch_collection;
use crate::store::{DataStore, Query, Table};
use crate::types::{Project, Unit};

use super::{SearchOutcome, SearchResults, SearchTerm, UnitHit};

const PROJECT_COLUMNS: &str = "id, name, location, main_image, description";
const PROJECT_SEARCH_COLUMNS: [&str; 3] = ["name", "location", "description"];
const UNIT_COLUMNS: &str = "id, type, project_id, size, model_details";
const UNIT_SEARCH_COLUMNS: [&str; 2] = ["type", "model_details"];

pub fn project_search_query(term: &SearchTerm, limit: usize) -> Query {
    Query::from(Table::Projects)
        .select(PROJECT_COLUMNS)
        .any_contains(&PROJECT_SEARCH_COLUMNS, term.as_str())
        .limit(limit)
}

pub fn unit_search_query(term: &SearchTerm, limit: usize) -> Query {
    Query::from(Table::Units)
        .select(UNIT_COLUMNS)
        .any_contains(&UNIT_SEARCH_COLUMNS, term.as_str())
        .limit(limit)
}

/// Match projects and units against `term`, at most `limit` of each.
///
/// Unit hits are enriched with project names through one batched lookup;
/// if that lookup fails the names are left empty rather than failing the
/// whole search.
pub async fn search_catalog<S: DataStore>(
    store: &S,
    term: &SearchTerm,
    limit: usize,
) -> Result<SearchResults> {
    let projects: Vec<Project> =
        try_fetch_collection(store, &project_search_query(term, limit)).await?;
    let units: Vec<Unit> = try_fetch_collection(store, &unit_search_query(term, limit)).await?;

    let ids = distinct_ids(units.iter().map(|u| u.project_id.as_str()));
    let owners = lookup_projects(store, &ids, "id, name")
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to resolve project names for search results: {e}");
            HashMap::new()
        });

    let units = units
        .into_iter()
        .map(|unit| {
            let project_name = owners
                .get(&unit.project_id)
                .map(|p| p.name.clone())
                .unwrap_or_default();
            UnitHit { unit, project_name }
        })
        .collect();

    tracing::debug!("search '{}' matched {} projects", term.as_str(), projects.len());
    Ok(SearchResults { projects, units })
}

/// Evaluate raw input into a panel outcome.
///
/// Blank input yields [`SearchOutcome::Prompt`] without touching the store.
pub async fn evaluate<S: DataStore>(store: &S, text: &str, limit: usize) -> Result<SearchOutcome> {
    let Some(term) = SearchTerm::parse(text) else {
        return Ok(SearchOutcome::Prompt);
    };

    let results = search_catalog(store, &term, limit).await?;
    if results.is_empty() {
        Ok(SearchOutcome::NoResults {
            term: term.as_str().to_string(),
        })
    } else {
        Ok(SearchOutcome::Results(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.seed(
            Table::Projects,
            [
                json!({"id": "p1", "name": "Hayat Villas", "location": "Riyadh", "description": ""}),
                json!({"id": "p2", "name": "Nuzha", "location": "Jeddah", "description": "villa community"}),
            ],
        );
        store.seed(
            Table::Units,
            [
                json!({"id": "u1", "project_id": "p1", "type": "Villa", "model_details": ""}),
                json!({"id": "u2", "project_id": "p1", "type": "villa corner", "model_details": ""}),
                json!({"id": "u3", "project_id": "ghost", "type": "Apartment", "model_details": "near a villa"}),
            ],
        );
        store
    }

    #[test]
    fn test_project_query_rendering() {
        let term = SearchTerm::parse("villa").unwrap();
        insta::assert_snapshot!(
            project_search_query(&term, 5).to_query_string(),
            @"select=id,name,location,main_image,description&or=(name.ilike.*villa*,location.ilike.*villa*,description.ilike.*villa*)&limit=5"
        );
    }

    #[tokio::test]
    async fn test_blank_input_issues_no_query() {
        let store = seeded();
        let outcome = evaluate(&store, "   ", 5).await.unwrap();
        assert_eq!(outcome, SearchOutcome::Prompt);
        assert!(store.queries().is_empty());
    }

    #[tokio::test]
    async fn test_unit_hits_get_project_names_in_one_lookup() {
        let store = seeded();
        let term = SearchTerm::parse("VILLA").unwrap();
        let results = search_catalog(&store, &term, 5).await.unwrap();

        assert_eq!(results.projects.len(), 2);
        assert_eq!(results.units.len(), 3);
        assert_eq!(results.units[0].project_name, "Hayat Villas");
        assert_eq!(results.units[1].project_name, "Hayat Villas");
        assert_eq!(results.units[2].project_name, "");
        // project search + one name lookup
        assert_eq!(store.query_count(Table::Projects), 2);
    }

    #[tokio::test]
    async fn test_limit_applies_per_side() {
        let store = seeded();
        let term = SearchTerm::parse("villa").unwrap();
        let results = search_catalog(&store, &term, 1).await.unwrap();
        assert_eq!(results.projects.len(), 1);
        assert_eq!(results.units.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_matches_is_no_results() {
        let store = seeded();
        let outcome = evaluate(&store, "نزهه", 5).await.unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::NoResults {
                term: "نزهه".to_string()
            }
        );
        // no units, so no name lookup
        assert_eq!(store.query_count(Table::Projects), 1);
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let store = seeded();
        store.fail_table(Table::Units);
        assert!(evaluate(&store, "villa", 5).await.is_err());
    }
}
