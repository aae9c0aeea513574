//! HTTP client for the hosted backend (PostgREST tables + storage API).
//!
//! # Security Note - Logging
//!
//! The backend key is sent as both the `apikey` header and a bearer token.
//! Header values are built through [`RedactedHeader`], whose `Display` and
//! `Debug` print `[REDACTED]`, so the key never reaches the logs even when
//! request tracing is turned up.

use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretBox};
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::{Result, SafwaError};

use super::query::Query;
use super::row::Row;
use super::storage::Upload;
use super::{Bucket, DataStore, ObjectStorage, Table};

const REST_PATH: &str = "rest/v1";
const STORAGE_PATH: &str = "storage/v1/object";

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    fn as_header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.value)
            .map_err(|_| SafwaError::Config("backend key contains invalid characters".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Error body returned by the REST and storage APIs.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    details: Option<String>,
}

/// Returned by the storage API after an upload.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: Option<String>,
}

/// Connection handle to the backend. Construct once and pass by reference.
pub struct StoreClient {
    client: Client,
    base_url: Url,
    key: SecretBox<String>,
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient")
            .field("base_url", &self.base_url.as_str())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl StoreClient {
    /// Create a client from configuration (environment overrides included).
    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config.backend_url().ok_or(SafwaError::BackendNotConfigured)?;
        let key = config.backend_key().ok_or(SafwaError::BackendNotConfigured)?;
        Self::new(&url, key)
    }

    /// Create a client for `base_url` authenticated with the public `key`.
    ///
    /// Configures a 30s connect timeout and 60s total timeout.
    pub fn new(base_url: &str, key: String) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url,
            key: SecretBox::new(Box::new(key)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn table_url(&self, table: Table) -> Result<Url> {
        Ok(self.base_url.join(&format!("{REST_PATH}/{}", table.as_str()))?)
    }

    fn object_url(&self, bucket: Bucket, path: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("{STORAGE_PATH}/{}/{path}", bucket.as_str()))?)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let key = RedactedHeader::new(self.key.expose_secret());
        let bearer = RedactedHeader::new(&format!("Bearer {}", self.key.expose_secret()));
        Ok(builder
            .header("apikey", key.as_header_value()?)
            .header(header::AUTHORIZATION, bearer.as_header_value()?))
    }

    /// Send a request and turn non-success statuses into [`SafwaError::Api`].
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.authorized(builder)?.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| {
                let main = body.message.or(body.error)?;
                Some(match body.details {
                    Some(details) if !details.is_empty() => format!("{main} ({details})"),
                    _ => main,
                })
            })
            .unwrap_or_else(|| {
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    text
                }
            });

        Err(SafwaError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl DataStore for StoreClient {
    async fn select(&self, query: &Query) -> Result<Vec<Row>> {
        let url = self.table_url(query.table)?;
        tracing::debug!("select {}?{}", query.table, query.to_query_string());

        let response = self
            .send(self.client.get(url).query(&query.to_params()))
            .await?;
        Ok(response.json::<Vec<Row>>().await?)
    }

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>> {
        let url = self.table_url(table)?;
        tracing::debug!("insert {} row(s) into {table}", rows.len());

        let response = self
            .send(
                self.client
                    .post(url)
                    .header("Prefer", "return=representation")
                    .json(&rows),
            )
            .await?;
        Ok(response.json::<Vec<Row>>().await?)
    }

    async fn update(&self, table: Table, id: &str, patch: Row) -> Result<()> {
        let url = self.table_url(table)?;
        tracing::debug!("update {table} id={id}");

        self.send(
            self.client
                .patch(url)
                .query(&[("id", format!("eq.{id}"))])
                .json(&patch),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, table: Table, id: &str) -> Result<()> {
        let url = self.table_url(table)?;
        tracing::debug!("delete {table} id={id}");

        self.send(self.client.delete(url).query(&[("id", format!("eq.{id}"))]))
            .await?;
        Ok(())
    }
}

impl ObjectStorage for StoreClient {
    async fn upload(&self, bucket: Bucket, path: &str, upload: &Upload) -> Result<String> {
        let url = self.object_url(bucket, path)?;
        tracing::debug!("upload {} bytes to {bucket}/{path}", upload.bytes.len());

        let response = self
            .send(
                self.client
                    .post(url)
                    .header(header::CONTENT_TYPE, upload.content_type.as_str())
                    .body(upload.bytes.clone()),
            )
            .await
            .map_err(|e| SafwaError::Upload(e.to_string()))?;

        // The API echoes `<bucket>/<path>`; the caller only needs the path.
        let stored = response
            .json::<UploadResponse>()
            .await
            .ok()
            .and_then(|r| r.key)
            .map(|key| {
                key.strip_prefix(&format!("{}/", bucket.as_str()))
                    .unwrap_or(&key)
                    .to_string()
            })
            .unwrap_or_else(|| path.to_string());
        Ok(stored)
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!(
            "{}{STORAGE_PATH}/public/{}/{path}",
            self.base_url,
            bucket.as_str()
        )
    }
}
