use serde::{Deserialize, Serialize};

use crate::admin;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::fetcher::catalog::projects_query;
use crate::store::DataStore;
use crate::types::Project;

/// Views of the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardView {
    #[default]
    List,
    Grid,
    Form,
}

/// Project list, current view and the project open in the form.
#[derive(Debug, Default)]
pub struct DashboardState {
    view: DashboardView,
    projects: Fetcher<(), Project>,
    editing: Option<Project>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> DashboardView {
        self.view
    }

    pub fn projects(&self) -> &[Project] {
        self.projects.state().items()
    }

    pub fn is_loading(&self) -> bool {
        self.projects.state().is_loading()
    }

    /// Project open in the form; `None` while creating a new one.
    pub fn editing(&self) -> Option<&Project> {
        self.editing.as_ref()
    }

    pub async fn refresh<S: DataStore>(&mut self, store: &S) -> bool {
        self.projects.refresh(store, (), &projects_query()).await
    }

    pub fn show_list(&mut self) {
        self.view = DashboardView::List;
    }

    pub fn show_grid(&mut self) {
        self.view = DashboardView::Grid;
    }

    pub fn new_project(&mut self) {
        self.editing = None;
        self.view = DashboardView::Form;
    }

    pub fn edit_project(&mut self, project: Project) {
        self.editing = Some(project);
        self.view = DashboardView::Form;
    }

    /// Leave the form for the list and reload projects.
    pub async fn close_form<S: DataStore>(&mut self, store: &S) -> bool {
        self.editing = None;
        self.view = DashboardView::List;
        self.refresh(store).await
    }

    /// Delete a project and drop it from the loaded list.
    pub async fn delete_project<S: DataStore>(&mut self, store: &S, id: &str) -> Result<()> {
        admin::projects::delete_project(store, id).await?;
        self.projects.update_items(|projects| projects.retain(|p| p.id != id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Table};
    use serde_json::json;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.seed(
            Table::Projects,
            [json!({"id": "p1", "name": "Old"}), json!({"id": "p2", "name": "New"})],
        );
        store
    }

    #[tokio::test]
    async fn test_refresh_lists_newest_first() {
        let store = store();
        let mut dashboard = DashboardState::new();
        assert_eq!(dashboard.view(), DashboardView::List);

        dashboard.refresh(&store).await;
        let ids: Vec<&str> = dashboard.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[tokio::test]
    async fn test_form_round_trip_refetches() {
        let store = store();
        let mut dashboard = DashboardState::new();
        dashboard.refresh(&store).await;

        let first = dashboard.projects()[0].clone();
        dashboard.edit_project(first);
        assert_eq!(dashboard.view(), DashboardView::Form);
        assert!(dashboard.editing().is_some());

        store.clear_queries();
        dashboard.close_form(&store).await;
        assert_eq!(dashboard.view(), DashboardView::List);
        assert!(dashboard.editing().is_none());
        assert_eq!(store.query_count(Table::Projects), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_from_list() {
        let store = store();
        let mut dashboard = DashboardState::new();
        dashboard.refresh(&store).await;

        dashboard.delete_project(&store, "p1").await.unwrap();
        assert_eq!(dashboard.projects().len(), 1);
        assert_eq!(store.rows(Table::Projects).len(), 1);
    }

    #[test]
    fn test_view_switching() {
        let mut dashboard = DashboardState::new();
        dashboard.show_grid();
        assert_eq!(dashboard.view(), DashboardView::Grid);
        dashboard.new_project();
        assert_eq!(dashboard.view(), DashboardView::Form);
        assert!(dashboard.editing().is_none());
    }
}
