//! Durable backing for the session store
//!
//! A storage holds one opaque serialized value (the principal JSON). The
//! file-backed implementation writes a single JSON document; on Unix the file
//! is created with 0600 permissions since it carries the bearer token.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage: Send + Sync {
    /// Raw stored value, `None` when nothing is stored
    fn read(&self) -> AppResult<Option<String>>;

    fn write(&self, value: &str) -> AppResult<()>;

    /// Remove the stored value; removing nothing is not an error
    fn remove(&self) -> AppResult<()>;
}

/// JSON file storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    file_path: PathBuf,
}

impl FileStorage {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SessionStorage for FileStorage {
    fn read(&self) -> AppResult<Option<String>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&self.file_path).map(Some).map_err(|e| {
            AppError::Storage(format!(
                "Failed to read session file {}: {}",
                self.file_path.display(),
                e
            ))
        })
    }

    fn write(&self, value: &str) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::Storage(format!(
                        "Failed to create session directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let write_error = |e: std::io::Error| {
            AppError::Storage(format!(
                "Failed to write session file {}: {}",
                self.file_path.display(),
                e
            ))
        };
        let mut file = options.open(&self.file_path).map_err(write_error)?;

        // mode only applies on creation; tighten a file left by an older run
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| {
                    AppError::Storage(format!("Failed to set session file permissions: {}", e))
                })?;
        }

        file.write_all(value.as_bytes()).map_err(write_error)?;

        Ok(())
    }

    fn remove(&self) -> AppResult<()> {
        match fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to remove session file {}: {}",
                self.file_path.display(),
                e
            ))),
        }
    }
}

/// In-process storage, used by tests and one-shot tools
#[derive(Debug, Default)]
pub struct MemoryStorage {
    value: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // a poisoned lock still holds a consistent Option
        self.value.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self) -> AppResult<Option<String>> {
        Ok(self.slot().clone())
    }

    fn write(&self, value: &str) -> AppResult<()> {
        *self.slot() = Some(value.to_string());
        Ok(())
    }

    fn remove(&self) -> AppResult<()> {
        *self.slot() = None;
        Ok(())
    }
}
