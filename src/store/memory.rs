//! In-memory data store.
//!
//! Evaluates the same [`Query`] model as the backend (equality, membership,
//! case-insensitive contains, ordering, limit, projection) over rows held in
//! memory. Every call is recorded so callers can assert on how many queries
//! were issued, and individual tables can be made to fail.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{Result, SafwaError};

use super::query::{Filter, Query};
use super::row::Row;
use super::storage::Upload;
use super::{Bucket, DataStore, ObjectStorage, Table};

#[derive(Default)]
struct Inner {
    tables: HashMap<Table, Vec<Row>>,
    objects: HashMap<(Bucket, String), Upload>,
    next_id: u64,
    next_created: u64,
    queries: Vec<Query>,
    failing: HashSet<Table>,
    failing_uploads: bool,
    missing_columns: HashMap<Table, HashSet<String>>,
}

/// Thread-safe in-memory implementation of [`DataStore`] and [`ObjectStorage`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows directly, assigning `id` and `created_at` when missing.
    pub fn seed(&self, table: Table, rows: impl IntoIterator<Item = Value>) {
        let mut inner = self.inner.lock();
        for value in rows {
            if let Value::Object(row) = value {
                inner.store_row(table, row);
            }
        }
    }

    /// Rows currently stored in `table`.
    pub fn rows(&self, table: Table) -> Vec<Row> {
        self.inner
            .lock()
            .tables
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    /// Every read query issued so far, in order.
    pub fn queries(&self) -> Vec<Query> {
        self.inner.lock().queries.clone()
    }

    /// Number of read queries issued against `table`.
    pub fn query_count(&self, table: Table) -> usize {
        self.inner
            .lock()
            .queries
            .iter()
            .filter(|q| q.table == table)
            .count()
    }

    pub fn clear_queries(&self) {
        self.inner.lock().queries.clear();
    }

    /// Make every operation on `table` fail with a server error.
    pub fn fail_table(&self, table: Table) {
        self.inner.lock().failing.insert(table);
    }

    pub fn fail_uploads(&self) {
        self.inner.lock().failing_uploads = true;
    }

    /// Reject writes touching `column` the way a stale schema cache does.
    pub fn reject_column(&self, table: Table, column: &str) {
        self.inner
            .lock()
            .missing_columns
            .entry(table)
            .or_default()
            .insert(column.to_string());
    }

    /// Stored object at `bucket/path`, if any.
    pub fn object(&self, bucket: Bucket, path: &str) -> Option<Upload> {
        self.inner
            .lock()
            .objects
            .get(&(bucket, path.to_string()))
            .cloned()
    }
}

impl Inner {
    fn store_row(&mut self, table: Table, mut row: Row) -> Row {
        if !row.contains_key("id") {
            self.next_id += 1;
            row.insert("id".to_string(), Value::String(format!("{}-{}", table, self.next_id)));
        }
        if !row.contains_key("created_at") {
            self.next_created += 1;
            row.insert("created_at".to_string(), Value::from(self.next_created));
        }
        self.tables.entry(table).or_default().push(row.clone());
        row
    }

    fn check_available(&self, table: Table) -> Result<()> {
        if self.failing.contains(&table) {
            return Err(SafwaError::Api {
                status: 503,
                message: format!("{table} is unavailable"),
            });
        }
        Ok(())
    }

    fn check_columns(&self, table: Table, row: &Row) -> Result<()> {
        if let Some(missing) = self.missing_columns.get(&table)
            && let Some(column) = row.keys().find(|k| missing.contains(*k))
        {
            return Err(SafwaError::Api {
                status: 400,
                message: format!(
                    "Could not find the '{column}' column of '{table}' in the schema cache"
                ),
            });
        }
        Ok(())
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn matches(row: &Row, filter: &Filter) -> bool {
    match filter {
        Filter::Eq { column, value } => {
            row.get(column).and_then(value_text).as_deref() == Some(value.as_str())
        }
        Filter::In { column, values } => row
            .get(column)
            .and_then(value_text)
            .is_some_and(|v| values.contains(&v)),
        Filter::AnyContains { columns, term } => {
            let needle = term.to_lowercase();
            columns.iter().any(|column| {
                row.get(column)
                    .and_then(value_text)
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            })
        }
    }
}

/// Nulls sort last in both directions, as the backend does by default.
fn compare(a: Option<&Value>, b: Option<&Value>, ascending: bool) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => value_text(a).cmp(&value_text(b)),
            };
            if ascending { ordering } else { ordering.reverse() }
        }
    }
}

fn project(row: &Row, columns: &[String]) -> Row {
    if columns.is_empty() {
        return row.clone();
    }
    columns
        .iter()
        .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
        .collect()
}

impl DataStore for MemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Row>> {
        let mut inner = self.inner.lock();
        inner.queries.push(query.clone());
        inner.check_available(query.table)?;

        let mut rows: Vec<&Row> = inner
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| matches(row, f)))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| compare(a.get(&order.column), b.get(&order.column), order.ascending));
        }

        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(rows
            .into_iter()
            .take(limit)
            .map(|row| project(row, &query.columns))
            .collect())
    }

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>> {
        let mut inner = self.inner.lock();
        inner.check_available(table)?;
        for row in &rows {
            inner.check_columns(table, row)?;
        }
        Ok(rows
            .into_iter()
            .map(|row| inner.store_row(table, row))
            .collect())
    }

    async fn update(&self, table: Table, id: &str, patch: Row) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.check_available(table)?;
        inner.check_columns(table, &patch)?;

        if let Some(rows) = inner.tables.get_mut(&table) {
            for row in rows
                .iter_mut()
                .filter(|row| row.get("id").and_then(value_text).as_deref() == Some(id))
            {
                for (key, value) in &patch {
                    row.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: Table, id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.check_available(table)?;
        if let Some(rows) = inner.tables.get_mut(&table) {
            rows.retain(|row| row.get("id").and_then(value_text).as_deref() != Some(id));
        }
        Ok(())
    }
}

impl ObjectStorage for MemoryStore {
    async fn upload(&self, bucket: Bucket, path: &str, upload: &Upload) -> Result<String> {
        let mut inner = self.inner.lock();
        if inner.failing_uploads {
            return Err(SafwaError::Upload(format!("{bucket}/{path} rejected")));
        }
        inner
            .objects
            .insert((bucket, path.to_string()), upload.clone());
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("memory://{}/{path}", bucket.as_str())
    }
}
