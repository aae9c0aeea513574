//! End-to-end behavior of the catalog against an in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use safwa::filter::{Facet, filter_projects};
use safwa::fetcher::catalog::{fetch_project_bundle, fetch_projects};
use safwa::links::resolve_map_target;
use safwa::links::map::{DEFAULT_LOCATION, MapTarget};
use safwa::search::{SearchOutcome, SearchSession, evaluate};
use safwa::store::{MemoryStore, Table};
use safwa::view::{ProjectDetailState, ProjectTab};
use safwa::ProjectStatus;

fn catalog() -> MemoryStore {
    let store = MemoryStore::new();
    store.seed(
        Table::Projects,
        [
            json!({"id": "p1", "name": "Hayat Villas", "location": "Riyadh", "status": "ongoing", "created_at": "2024-01-01"}),
            json!({"id": "p2", "name": "Nakheel Towers", "location": "Jeddah", "status": "upcoming", "created_at": "2024-02-01"}),
            json!({"id": "p3", "name": "Rawda", "location": "Riyadh", "status": "ongoing", "created_at": "2024-03-01"}),
            json!({"id": "p4", "name": "Marina", "location": "Khobar", "status": "completed", "created_at": "2024-04-01"}),
            json!({"id": "p5", "name": "Olaya", "location": "Riyadh", "status": "upcoming", "created_at": "2024-05-01"}),
        ],
    );
    store.seed(
        Table::ProjectSections,
        [
            json!({"id": "s1", "project_id": "p1", "name": "North"}),
            json!({"id": "s2", "project_id": "p1", "name": "South"}),
        ],
    );
    store.seed(
        Table::Units,
        [
            json!({"id": "u1", "project_id": "p1", "section_id": "s1", "unit_number": "A1", "type": "Villa"}),
            json!({"id": "u2", "project_id": "p1", "section_id": "s2", "unit_number": "B1", "type": "Villa"}),
            json!({"id": "u3", "project_id": "p1", "unit_number": "C1", "type": "Villa duplex"}),
            json!({"id": "u4", "project_id": "p3", "unit_number": "D1", "type": "Villa"}),
        ],
    );
    store
}

#[tokio::test]
async fn test_status_facet_renders_matching_projects() {
    let store = catalog();
    let projects = fetch_projects(&store).await;
    assert_eq!(projects.len(), 5);

    let ongoing = filter_projects(&projects, &Facet::Only(ProjectStatus::Ongoing));
    let ids: Vec<&str> = ongoing.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"p1") && ids.contains(&"p3"));
}

#[tokio::test]
async fn test_all_facet_is_identity() {
    let store = catalog();
    let projects = fetch_projects(&store).await;
    let all = filter_projects(&projects, &Facet::All);
    assert_eq!(all.len(), projects.len());
    assert!(all.iter().zip(&projects).all(|(a, b)| *a == b));
}

#[tokio::test]
async fn test_blank_search_issues_no_query() {
    let store = catalog();
    store.clear_queries();

    let outcome = evaluate(&store, "   ", 5).await.unwrap();
    assert_eq!(outcome, SearchOutcome::Prompt);
    assert!(store.queries().is_empty());
}

#[tokio::test]
async fn test_search_with_no_matches_shows_no_results() {
    let store = catalog();
    let outcome = evaluate(&store, "نزهه", 5).await.unwrap();
    assert_eq!(
        outcome,
        SearchOutcome::NoResults {
            term: "نزهه".to_string()
        }
    );
    assert!(outcome.message().is_some());
}

#[tokio::test]
async fn test_unit_search_resolves_project_names_in_one_lookup() {
    let store = catalog();
    store.clear_queries();

    let outcome = evaluate(&store, "villa", 10).await.unwrap();
    let results = outcome.results().expect("villa should match units");
    assert_eq!(results.units.len(), 4);
    assert!(results.units.iter().all(|hit| !hit.project_name.is_empty()));

    // One project search, plus one batched owner lookup.
    assert_eq!(store.query_count(Table::Projects), 2);
    assert_eq!(store.query_count(Table::Units), 1);
}

#[tokio::test(start_paused = true)]
async fn test_fast_keystrokes_evaluate_once_with_final_text() {
    let store = Arc::new(catalog());
    store.clear_queries();
    let session = SearchSession::new(store.clone(), Duration::from_millis(500), 5);
    let mut outcomes = session.subscribe();

    for text in ["R", "Ra", "Raw", "Rawd", "Rawda"] {
        session.input(text);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    tokio::time::sleep(Duration::from_millis(600)).await;

    while *outcomes.borrow_and_update() == SearchOutcome::Loading {
        outcomes.changed().await.unwrap();
    }

    assert_eq!(store.query_count(Table::Units), 1);
    let outcome = session.outcome();
    let results = outcome.results().expect("Rawda should match a project");
    assert_eq!(results.projects[0].id, "p3");
}

#[test]
fn test_map_link_resolution_precedence() {
    let embed = "https://www.google.com/maps/embed?pb=abc&q=ignored";
    assert_eq!(
        resolve_map_target(Some(embed), None, DEFAULT_LOCATION),
        MapTarget::Embed(embed.to_string())
    );

    let coords = resolve_map_target(Some("24.71,46.67"), Some("Riyadh"), DEFAULT_LOCATION);
    assert_eq!(
        coords,
        MapTarget::Coordinates {
            lat: "24.71".to_string(),
            lng: "46.67".to_string()
        }
    );
    assert!(coords.embed_url().contains("q=24.71,46.67"));
}

#[tokio::test]
async fn test_section_selection_carries_into_units_tab() {
    let store = catalog();
    let bundle = fetch_project_bundle(&store, "p1").await.unwrap();

    let mut state = ProjectDetailState::new();
    state.select_tab(ProjectTab::Sections);
    state.view_units_in_section("s1");

    assert_eq!(state.active_tab(), ProjectTab::Units);
    let visible = state.visible_units(&bundle.units);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "u1");

    state.set_section_facet(Facet::All);
    assert_eq!(state.visible_units(&bundle.units).len(), 3);
    assert_eq!(state.last_viewed_section(), Some("s1"));
}
