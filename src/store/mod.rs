//! Access to the hosted backend.
//!
//! The backend owns persistence, storage and query execution. This module
//! exposes it through two seams:
//! - [`DataStore`]: tabular reads and mutations described by a [`Query`]
//! - [`ObjectStorage`]: bucket uploads and public URL resolution
//!
//! [`StoreClient`] talks to the real backend over HTTP; [`MemoryStore`]
//! evaluates the same query model in memory.

pub mod client;
pub mod memory;
pub mod query;
pub mod row;
pub mod storage;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use client::StoreClient;
pub use memory::MemoryStore;
pub use query::{Filter, Order, Query};
pub use row::{FromRow, Row};
pub use storage::{Upload, stored_file_name};

/// Collections exposed by the data store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Projects,
    ProjectSections,
    Units,
    ProjectImages,
    ProjectFiles,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Projects => "projects",
            Table::ProjectSections => "project_sections",
            Table::Units => "units",
            Table::ProjectImages => "project_images",
            Table::ProjectFiles => "project_files",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object storage buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Images,
    Files,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Images => "images",
            Bucket::Files => "files",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tabular data store with query-builder semantics.
pub trait DataStore: Send + Sync {
    /// Run a read query and return the matching rows.
    fn select(&self, query: &Query) -> impl Future<Output = Result<Vec<Row>>> + Send;

    /// Insert rows and return them as stored (with generated columns).
    fn insert(&self, table: Table, rows: Vec<Row>) -> impl Future<Output = Result<Vec<Row>>> + Send;

    /// Apply a partial update to the row whose `id` matches.
    fn update(
        &self,
        table: Table,
        id: &str,
        patch: Row,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete the row whose `id` matches.
    fn delete(&self, table: Table, id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Bucket storage. Uploads return the stored path; a separate call resolves
/// a path to a publicly fetchable URL.
pub trait ObjectStorage: Send + Sync {
    fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        upload: &Upload,
    ) -> impl Future<Output = Result<String>> + Send;

    fn public_url(&self, bucket: Bucket, path: &str) -> String;
}
