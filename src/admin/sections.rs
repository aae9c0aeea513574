use serde_json::Value;

use crate::error::{Result, SafwaError};
use crate::store::{DataStore, Row, Table};
use crate::types::ProjectSection;

use super::{optional_text, row_of};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionDraft {
    pub name: String,
    pub description: String,
    pub plan_image: String,
    pub brochure: String,
}

impl SectionDraft {
    pub fn from_section(section: &ProjectSection) -> Self {
        Self {
            name: section.name.clone(),
            description: section.description.clone(),
            plan_image: section.plan_image.clone().unwrap_or_default(),
            brochure: section.brochure.clone().unwrap_or_default(),
        }
    }

    pub fn to_row(&self, project_id: &str) -> Result<Row> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SafwaError::Validation("اسم القسم مطلوب".to_string()));
        }
        Ok(row_of([
            ("project_id", Value::from(project_id)),
            ("name", Value::from(name)),
            ("description", Value::from(self.description.as_str())),
            ("plan_image", optional_text(&self.plan_image)),
            ("brochure", optional_text(&self.brochure)),
        ]))
    }
}

/// Add a section to `project_id`, or update section `id` when given.
/// Returns the section id.
pub async fn save_section<S: DataStore>(
    store: &S,
    project_id: &str,
    id: Option<&str>,
    draft: &SectionDraft,
) -> Result<String> {
    let data = draft.to_row(project_id)?;
    match id {
        Some(id) => {
            store.update(Table::ProjectSections, id, data).await?;
            Ok(id.to_string())
        }
        None => {
            let inserted = store.insert(Table::ProjectSections, vec![data]).await?;
            inserted
                .first()
                .and_then(|r| crate::store::row::id(r, "id"))
                .ok_or_else(|| SafwaError::Other("backend returned no row for the new section".to_string()))
        }
    }
}

pub async fn delete_section<S: DataStore>(store: &S, id: &str) -> Result<()> {
    store.delete(Table::ProjectSections, id).await?;
    tracing::info!("deleted section {id}");
    Ok(())
}
