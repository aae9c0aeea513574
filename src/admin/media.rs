//! Uploads and the image/file rows that point at them.

use std::sync::atomic::{AtomicU64, Ordering};

use jiff::Timestamp;
use serde_json::Value;

use crate::error::{Result, SafwaError};
use crate::store::row::map_rows;
use crate::store::{Bucket, DataStore, ObjectStorage, Row, Table, Upload, stored_file_name};
use crate::types::{ImageKind, ProjectFile, ProjectImage};

use super::row_of;

pub const IMAGE_UPLOAD_FAILED: &str = "فشل رفع الصورة";
pub const FILE_UPLOAD_FAILED: &str = "فشل رفع الملف";
pub const GALLERY_UPLOAD_FAILED: &str = "فشل رفع الصور";

/// Where an upload is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    MainImage,
    Brochure,
    Gallery,
    Document,
    /// Section plan images and brochures
    Section,
    UnitImage,
}

impl UploadTarget {
    pub fn bucket(self) -> Bucket {
        match self {
            UploadTarget::MainImage | UploadTarget::Gallery => Bucket::Images,
            UploadTarget::Brochure
            | UploadTarget::Document
            | UploadTarget::Section
            | UploadTarget::UnitImage => Bucket::Files,
        }
    }

    pub fn folder(self) -> &'static str {
        match self {
            UploadTarget::MainImage => "main",
            UploadTarget::Brochure => "brochures",
            UploadTarget::Gallery => "gallery",
            UploadTarget::Document => "docs",
            UploadTarget::Section => "sections",
            UploadTarget::UnitImage => "units",
        }
    }
}

/// Uploads started by this process; part of every stored name.
static UPLOAD_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Upload one file and return its public URL.
pub async fn upload_file<S: ObjectStorage>(
    storage: &S,
    target: UploadTarget,
    upload: &Upload,
) -> Result<String> {
    let bucket = target.bucket();
    let sequence = UPLOAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let path = stored_file_name(target.folder(), &upload.name, Timestamp::now(), sequence);
    let stored = storage.upload(bucket, &path, upload).await?;
    tracing::debug!("uploaded {} to {bucket}/{stored}", upload.name);
    Ok(storage.public_url(bucket, &stored))
}

/// Upload gallery images and record them as interior shots.
///
/// All files are uploaded before anything is recorded; one failed upload
/// records none of them.
pub async fn add_gallery_images<S: DataStore + ObjectStorage>(
    store: &S,
    project_id: &str,
    uploads: &[Upload],
) -> Result<Vec<ProjectImage>> {
    if uploads.is_empty() {
        return Ok(Vec::new());
    }

    let mut rows = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let url = upload_file(store, UploadTarget::Gallery, upload)
            .await
            .map_err(|e| {
                tracing::warn!("gallery upload of {} failed: {e}", upload.name);
                SafwaError::Upload(GALLERY_UPLOAD_FAILED.to_string())
            })?;
        rows.push(row_of([
            ("project_id", Value::from(project_id)),
            ("image_url", Value::from(url)),
            ("type", Value::from(ImageKind::Interior.to_string())),
        ]));
    }

    let inserted = store.insert(Table::ProjectImages, rows).await?;
    Ok(map_rows(&inserted))
}

pub async fn set_image_kind<S: DataStore>(store: &S, id: &str, kind: ImageKind) -> Result<()> {
    let patch = row_of([("type", Value::from(kind.to_string()))]);
    store.update(Table::ProjectImages, id, patch).await
}

pub async fn delete_image<S: DataStore>(store: &S, id: &str) -> Result<()> {
    store.delete(Table::ProjectImages, id).await?;
    tracing::info!("deleted image {id}");
    Ok(())
}

/// Outcome of a multi-file upload.
#[derive(Debug, Default)]
pub struct FileBatch {
    pub added: Vec<ProjectFile>,
    /// Names of files that could not be uploaded or recorded
    pub failed: Vec<String>,
}

async fn add_project_file<S: DataStore + ObjectStorage>(
    store: &S,
    project_id: &str,
    upload: &Upload,
) -> Result<Vec<Row>> {
    let url = upload_file(store, UploadTarget::Document, upload).await?;
    let data = row_of([
        ("project_id", Value::from(project_id)),
        ("file_url", Value::from(url)),
        ("name", Value::from(upload.name.as_str())),
        ("type", Value::from(upload.subtype())),
    ]);
    store.insert(Table::ProjectFiles, vec![data]).await
}

/// Upload documents one by one. A file that fails is logged and skipped;
/// the rest continue.
pub async fn add_project_files<S: DataStore + ObjectStorage>(
    store: &S,
    project_id: &str,
    uploads: &[Upload],
) -> FileBatch {
    let mut batch = FileBatch::default();

    for upload in uploads {
        match add_project_file(store, project_id, upload).await {
            Ok(rows) => batch.added.extend(map_rows::<ProjectFile>(&rows)),
            Err(e) => {
                tracing::warn!("skipping {}: {e}", upload.name);
                batch.failed.push(upload.name.clone());
            }
        }
    }

    batch
}

pub async fn delete_file<S: DataStore>(store: &S, id: &str) -> Result<()> {
    store.delete(Table::ProjectFiles, id).await?;
    tracing::info!("deleted file {id}");
    Ok(())
}
