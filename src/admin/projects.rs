//! Project create/update/delete.
//!
//! Some deployments run with a stale schema cache that does not know the
//! `link` column yet. A save rejected for that reason is retried without
//! `link`, and the caller gets a warning instead of a success message.

use std::sync::LazyLock;

use jiff::Zoned;
use regex::Regex;
use serde_json::Value;

use crate::error::{Result, SafwaError};
use crate::store::{DataStore, Row, Table, row};
use crate::types::{Project, ProjectStatus};

use super::{AdminMessage, generate_slug, optional_text, row_of};

pub const SAVED_MESSAGE: &str = "تم حفظ بيانات المشروع بنجاح";
pub const UPDATED_WITHOUT_LINK: &str =
    "تم الحفظ بدون حقل الرابط بسبب مشكلة كاش المخطط. يرجى تحديث كاش قاعدة البيانات ثم إعادة المحاولة.";
pub const CREATED_WITHOUT_LINK: &str =
    "تم إنشاء المشروع ولكن لم يتم حفظ الرابط بسبب تحديثات قاعدة البيانات. يرجى تعديل المشروع لإضافة الرابط لاحقاً.";

static SCHEMA_CACHE_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)schema cache|Could not find.*link.*column")
        .expect("schema cache regex should be valid")
});

/// Editable project fields as entered in the form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub location: String,
    pub link: String,
    pub start_year: Option<i32>,
    pub status: ProjectStatus,
    pub main_image: String,
    pub brochure: String,
}

impl Default for ProjectDraft {
    /// A blank draft dated to the current year.
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            location: String::new(),
            link: String::new(),
            start_year: Some(i32::from(Zoned::now().year())),
            status: ProjectStatus::Upcoming,
            main_image: String::new(),
            brochure: String::new(),
        }
    }
}

impl ProjectDraft {
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            slug: project.slug.clone(),
            description: project.description.clone(),
            location: project.location.clone(),
            link: project.link.clone().unwrap_or_default(),
            start_year: project.start_year,
            status: project.status,
            main_image: project.main_image.clone().unwrap_or_default(),
            brochure: project.brochure.clone().unwrap_or_default(),
        }
    }

    /// Set the name. Until the project is saved the slug follows the name.
    pub fn set_name(&mut self, name: &str, is_new: bool) {
        self.name = name.to_string();
        if is_new {
            self.slug = generate_slug(name);
        }
    }

    pub fn to_row(&self) -> Row {
        row_of([
            ("name", Value::from(self.name.trim())),
            ("slug", Value::from(self.slug.as_str())),
            ("description", Value::from(self.description.as_str())),
            ("location", Value::from(self.location.trim())),
            ("link", optional_text(&self.link)),
            ("start_year", self.start_year.map(Value::from).unwrap_or(Value::Null)),
            ("status", Value::from(self.status.to_string())),
            ("main_image", optional_text(&self.main_image)),
            ("brochure", optional_text(&self.brochure)),
        ])
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub project_id: String,
    pub message: AdminMessage,
}

pub fn is_schema_cache_error(err: &SafwaError) -> bool {
    match err {
        SafwaError::Api { message, .. } => SCHEMA_CACHE_ERROR.is_match(message),
        _ => false,
    }
}

async fn insert_project<S: DataStore>(store: &S, data: Row) -> Result<String> {
    let inserted = store.insert(Table::Projects, vec![data]).await?;
    inserted
        .first()
        .and_then(|r| row::id(r, "id"))
        .ok_or_else(|| SafwaError::Other("backend returned no row for the new project".to_string()))
}

/// Create (`id` is `None`) or update a project.
pub async fn save_project<S: DataStore>(
    store: &S,
    id: Option<&str>,
    draft: &ProjectDraft,
) -> Result<SaveOutcome> {
    let data = draft.to_row();
    let mut without_link = data.clone();
    without_link.remove("link");

    match id {
        Some(id) => match store.update(Table::Projects, id, data).await {
            Ok(()) => Ok(SaveOutcome {
                project_id: id.to_string(),
                message: AdminMessage::success(SAVED_MESSAGE),
            }),
            Err(e) if is_schema_cache_error(&e) => {
                tracing::warn!("project update rejected ({e}); retrying without link");
                store.update(Table::Projects, id, without_link).await?;
                Ok(SaveOutcome {
                    project_id: id.to_string(),
                    message: AdminMessage::warning(UPDATED_WITHOUT_LINK),
                })
            }
            Err(e) => Err(e),
        },
        None => match insert_project(store, data).await {
            Ok(project_id) => Ok(SaveOutcome {
                project_id,
                message: AdminMessage::success(SAVED_MESSAGE),
            }),
            Err(e) if is_schema_cache_error(&e) => {
                tracing::warn!("project insert rejected ({e}); retrying without link");
                let project_id = insert_project(store, without_link).await?;
                Ok(SaveOutcome {
                    project_id,
                    message: AdminMessage::warning(CREATED_WITHOUT_LINK),
                })
            }
            Err(e) => Err(e),
        },
    }
}

/// Delete a project row. Child rows are left to the backend.
pub async fn delete_project<S: DataStore>(store: &S, id: &str) -> Result<()> {
    store.delete(Table::Projects, id).await?;
    tracing::info!("deleted project {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::MessageKind;
    use crate::store::MemoryStore;

    fn draft() -> ProjectDraft {
        let mut draft = ProjectDraft {
            location: "Riyadh".to_string(),
            link: "https://maps.app.goo.gl/x".to_string(),
            ..Default::default()
        };
        draft.set_name("Hayat Villas", true);
        draft
    }

    #[test]
    fn test_slug_follows_name_only_for_new_projects() {
        let mut d = draft();
        assert_eq!(d.slug, "hayat-villas");
        d.set_name("Renamed", false);
        assert_eq!(d.slug, "hayat-villas");
    }

    #[test]
    fn test_schema_cache_detection() {
        let api = |message: &str| SafwaError::Api {
            status: 400,
            message: message.to_string(),
        };
        assert!(is_schema_cache_error(&api(
            "Could not find the 'link' column of 'projects' in the schema cache"
        )));
        assert!(is_schema_cache_error(&api("could not find LINK column")));
        assert!(!is_schema_cache_error(&api("duplicate key value")));
        assert!(!is_schema_cache_error(&SafwaError::Other("schema cache".to_string())));
    }

    #[tokio::test]
    async fn test_create_returns_id() {
        let store = MemoryStore::new();
        let outcome = save_project(&store, None, &draft()).await.unwrap();
        assert_eq!(outcome.message.kind, MessageKind::Success);

        let rows = store.rows(Table::Projects);
        assert_eq!(rows.len(), 1);
        assert_eq!(row::id(&rows[0], "id").unwrap(), outcome.project_id);
        assert_eq!(rows[0]["link"], "https://maps.app.goo.gl/x");
    }

    #[tokio::test]
    async fn test_create_falls_back_without_link() {
        let store = MemoryStore::new();
        store.reject_column(Table::Projects, "link");

        let outcome = save_project(&store, None, &draft()).await.unwrap();
        assert_eq!(outcome.message, AdminMessage::warning(CREATED_WITHOUT_LINK));

        let rows = store.rows(Table::Projects);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].contains_key("link"));
    }

    #[tokio::test]
    async fn test_update_falls_back_without_link() {
        let store = MemoryStore::new();
        let created = save_project(&store, None, &draft()).await.unwrap();
        store.reject_column(Table::Projects, "link");

        let mut edited = draft();
        edited.location = "Jeddah".to_string();
        let outcome = save_project(&store, Some(&created.project_id), &edited)
            .await
            .unwrap();

        assert_eq!(outcome.message.kind, MessageKind::Warning);
        assert_eq!(store.rows(Table::Projects)[0]["location"], "Jeddah");
    }

    #[tokio::test]
    async fn test_other_errors_propagate() {
        let store = MemoryStore::new();
        store.fail_table(Table::Projects);
        let err = save_project(&store, None, &draft()).await.unwrap_err();
        assert!(matches!(err, SafwaError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let created = save_project(&store, None, &draft()).await.unwrap();
        delete_project(&store, &created.project_id).await.unwrap();
        assert!(store.rows(Table::Projects).is_empty());
    }
}
