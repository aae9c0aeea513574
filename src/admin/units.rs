use serde_json::Value;

use crate::error::{Result, SafwaError};
use crate::store::{DataStore, Row, Table};
use crate::types::{Unit, UnitStatus};

use super::{optional_count, optional_number, optional_text, row_of};

pub const DEFAULT_UNIT_TYPE: &str = "Apartment";

pub const MISSING_PROJECT: &str = "لا يمكن حفظ الوحدة بدون مشروع معرف";
pub const MISSING_UNIT_NUMBER: &str = "رقم الوحدة مطلوب";

/// Unit form state. Numeric fields hold the raw text as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDraft {
    pub unit_number: String,
    pub unit_type: String,
    pub size: String,
    pub price: String,
    pub status: UnitStatus,
    pub section_id: String,
    pub main_image: String,
    pub model_details: String,
    pub model_count: String,
}

impl Default for UnitDraft {
    fn default() -> Self {
        Self {
            unit_number: String::new(),
            unit_type: DEFAULT_UNIT_TYPE.to_string(),
            size: String::new(),
            price: String::new(),
            status: UnitStatus::Available,
            section_id: String::new(),
            main_image: String::new(),
            model_details: String::new(),
            model_count: String::new(),
        }
    }
}

fn number_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl UnitDraft {
    pub fn from_unit(unit: &Unit) -> Self {
        Self {
            unit_number: unit.unit_number.clone(),
            unit_type: unit.unit_type.clone(),
            size: number_text(unit.size),
            price: number_text(unit.price),
            status: unit.status,
            section_id: unit.section_id.clone().unwrap_or_default(),
            main_image: unit.main_image.clone().unwrap_or_default(),
            model_details: unit.model_details.clone(),
            model_count: unit.model_count.map(|c| c.to_string()).unwrap_or_default(),
        }
    }

    /// Validate and build the row to store under `project_id`.
    pub fn to_row(&self, project_id: &str) -> Result<Row> {
        if project_id.trim().is_empty() {
            return Err(SafwaError::Validation(MISSING_PROJECT.to_string()));
        }
        if self.unit_number.trim().is_empty() {
            return Err(SafwaError::Validation(MISSING_UNIT_NUMBER.to_string()));
        }

        Ok(row_of([
            ("project_id", Value::from(project_id)),
            ("unit_number", Value::from(self.unit_number.trim())),
            ("type", Value::from(self.unit_type.as_str())),
            ("size", optional_number(&self.size, "size")?),
            ("price", optional_number(&self.price, "price")?),
            ("status", Value::from(self.status.to_string())),
            ("section_id", optional_text(&self.section_id)),
            ("main_image", optional_text(&self.main_image)),
            ("model_details", Value::from(self.model_details.as_str())),
            ("model_count", optional_count(&self.model_count, "model_count")?),
        ]))
    }
}

/// Add a unit to `project_id`, or update unit `id` when given. Returns the
/// unit id.
pub async fn save_unit<S: DataStore>(
    store: &S,
    project_id: &str,
    id: Option<&str>,
    draft: &UnitDraft,
) -> Result<String> {
    let data = draft.to_row(project_id)?;
    match id {
        Some(id) => {
            store.update(Table::Units, id, data).await?;
            Ok(id.to_string())
        }
        None => {
            let inserted = store.insert(Table::Units, vec![data]).await?;
            inserted
                .first()
                .and_then(|r| crate::store::row::id(r, "id"))
                .ok_or_else(|| SafwaError::Other("backend returned no row for the new unit".to_string()))
        }
    }
}

pub async fn delete_unit<S: DataStore>(store: &S, id: &str) -> Result<()> {
    store.delete(Table::Units, id).await?;
    tracing::info!("deleted unit {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::store::row::FromRow;

    fn draft() -> UnitDraft {
        UnitDraft {
            unit_number: "A-1".to_string(),
            size: "180.5".to_string(),
            price: "".to_string(),
            model_count: "12".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let d = UnitDraft::default();
        assert_eq!(d.unit_type, "Apartment");
        assert_eq!(d.status, UnitStatus::Available);
    }

    #[test]
    fn test_validation_order() {
        let err = UnitDraft::default().to_row("").unwrap_err();
        assert_eq!(err.to_string(), MISSING_PROJECT);

        let err = UnitDraft::default().to_row("p1").unwrap_err();
        assert_eq!(err.to_string(), MISSING_UNIT_NUMBER);
    }

    #[test]
    fn test_empty_inputs_become_null() {
        let row = draft().to_row("p1").unwrap();
        assert_eq!(row["price"], Value::Null);
        assert_eq!(row["section_id"], Value::Null);
        assert_eq!(row["size"], Value::from(180.5));
        assert_eq!(row["model_count"], Value::from(12));
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let mut d = draft();
        d.model_count = "2.5".to_string();
        assert!(matches!(d.to_row("p1"), Err(SafwaError::Validation(_))));
    }

    #[tokio::test]
    async fn test_save_round_trip_through_store() {
        let store = MemoryStore::new();
        let id = save_unit(&store, "p1", None, &draft()).await.unwrap();

        let stored = Unit::from_row(&store.rows(Table::Units)[0]).unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.unit_type, "Apartment");
        assert_eq!(stored.model_count, Some(12));
        assert_eq!(UnitDraft::from_unit(&stored).size, "180.5");

        let mut edited = UnitDraft::from_unit(&stored);
        edited.status = UnitStatus::Reserved;
        save_unit(&store, "p1", Some(&id), &edited).await.unwrap();
        assert_eq!(store.rows(Table::Units)[0]["status"], "reserved");

        delete_unit(&store, &id).await.unwrap();
        assert!(store.rows(Table::Units).is_empty());
    }
}
