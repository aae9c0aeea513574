//! Upload payloads and stored object naming.

use std::path::Path;

use jiff::Timestamp;

use crate::error::{Result, SafwaError};

/// A file to be placed in object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name as chosen by the user
    pub name: String,
    /// MIME type, e.g. `application/pdf`
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a local file, guessing its content type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SafwaError::Upload(format!("not a file: {}", path.display())))?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(name, content_type, bytes))
    }

    /// The MIME subtype (`pdf` for `application/pdf`), or `unknown`.
    pub fn subtype(&self) -> String {
        self.content_type
            .split('/')
            .nth(1)
            .map(|s| s.split(';').next().unwrap_or(s).trim())
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown")
            .to_string()
    }
}

/// Build the stored object path: `<folder>/<millis>-<sequence>-<sanitized name>`.
///
/// Every character outside `[A-Za-z0-9.]` is dropped from the original name,
/// so an Arabic-only name keeps just its extension; `sequence` keeps such
/// names apart within one millisecond.
pub fn stored_file_name(folder: &str, original: &str, now: Timestamp, sequence: u64) -> String {
    let sanitized: String = original
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect();
    format!("{folder}/{}-{sequence}-{sanitized}", now.as_millisecond())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_name_sanitizes() {
        let now = Timestamp::from_millisecond(1_700_000_000_123).unwrap();
        assert_eq!(
            stored_file_name("docs", "مخطط الدور (1).pdf", now, 0),
            "docs/1700000000123-0-1.pdf"
        );
        assert_eq!(
            stored_file_name("gallery", "front view.JPG", now, 3),
            "gallery/1700000000123-3-frontview.JPG"
        );
    }

    #[test]
    fn test_arabic_names_in_same_millisecond_stay_distinct() {
        let now = Timestamp::from_millisecond(1_700_000_000_123).unwrap();
        let first = stored_file_name("gallery", "الواجهة.jpg", now, 0);
        let second = stored_file_name("gallery", "المدخل.jpg", now, 1);
        assert_eq!(first, "gallery/1700000000123-0-.jpg");
        assert_ne!(first, second);
    }

    #[test]
    fn test_subtype() {
        let pdf = Upload::new("a.pdf", "application/pdf", vec![]);
        assert_eq!(pdf.subtype(), "pdf");

        let charset = Upload::new("a.txt", "text/plain; charset=utf-8", vec![]);
        assert_eq!(charset.subtype(), "plain");

        let bare = Upload::new("a", "", vec![]);
        assert_eq!(bare.subtype(), "unknown");
    }
}
