//! RAII guards for process-global state in tests.
//!
//! The working directory decides which `.safwa/config.yaml` is read, and the
//! backend credentials can come from the environment. Tests touching either
//! snapshot the state on construction and restore it on drop, even when the
//! test panics. Such tests must still be `#[serial]`.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Switches into a directory and returns to the previous one on drop.
pub struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    /// Snapshot the current directory without changing it.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            original: env::current_dir()?,
        })
    }

    /// Snapshot the current directory, then move into `dir`.
    pub fn enter(dir: &Path) -> std::io::Result<Self> {
        let guard = Self::new()?;
        env::set_current_dir(dir)?;
        Ok(guard)
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.original);
    }
}

/// Restores one environment variable (or its absence) on drop.
pub struct EnvGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvGuard {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            original: env::var_os(key),
        }
    }

    /// # Safety
    /// Calls `std::env::set_var`; callers must be `#[serial]`.
    pub unsafe fn set(key: &str, value: impl AsRef<OsStr>) -> Self {
        let guard = Self::new(key);
        unsafe { env::set_var(key, value) };
        guard
    }

    /// # Safety
    /// Calls `std::env::remove_var`; callers must be `#[serial]`.
    pub unsafe fn remove(key: &str) -> Self {
        let guard = Self::new(key);
        unsafe { env::remove_var(key) };
        guard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: guarded tests run under #[serial].
        match &self.original {
            Some(value) => unsafe { env::set_var(&self.key, value) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

/// Clears both backend credential variables for the guard's lifetime.
///
/// # Safety
/// See [`EnvGuard::remove`].
pub unsafe fn without_backend_env() -> [EnvGuard; 2] {
    unsafe {
        [
            EnvGuard::remove(crate::config::BACKEND_URL_ENV),
            EnvGuard::remove(crate::config::BACKEND_KEY_ENV),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cwd_guard_restores_on_drop() {
        let original = env::current_dir().unwrap();
        {
            let tmp = tempfile::TempDir::new().unwrap();
            let _guard = CwdGuard::enter(tmp.path()).unwrap();
            assert_ne!(env::current_dir().unwrap(), original);
        }
        assert_eq!(env::current_dir().unwrap(), original);
    }

    #[test]
    #[serial]
    fn test_env_guard_restores_existing_var() {
        let key = "SAFWA_TEST_GUARD_EXISTING";
        unsafe { env::set_var(key, "original") };
        {
            let _guard = unsafe { EnvGuard::set(key, "changed") };
            assert_eq!(env::var(key).unwrap(), "changed");
        }
        assert_eq!(env::var(key).unwrap(), "original");
        unsafe { env::remove_var(key) };
    }

    #[test]
    #[serial]
    fn test_without_backend_env() {
        let _outer = unsafe { EnvGuard::set(crate::config::BACKEND_URL_ENV, "https://x.test") };
        {
            let _guards = unsafe { without_backend_env() };
            assert!(env::var(crate::config::BACKEND_URL_ENV).is_err());
        }
        assert_eq!(
            env::var(crate::config::BACKEND_URL_ENV).unwrap(),
            "https://x.test"
        );
    }
}
