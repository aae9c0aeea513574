pub mod text;

use std::fs;
use std::path::Path;

use crate::error::{Result, SafwaError};

/// Ensure the parent directory of a path exists, creating it if necessary.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            SafwaError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create directory at {}: {}", parent.display(), e),
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_parent_dir_creates_ancestors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("config.yaml");
        ensure_parent_dir(&path).unwrap();
        assert!(temp.path().join("a").join("b").is_dir());
    }

    #[test]
    fn test_ensure_parent_dir_bare_file_name() {
        ensure_parent_dir(Path::new("config.yaml")).unwrap();
    }
}
