//! Durable key/value preference storage
//!
//! The locale resolver only needs `get`/`set` on a single key, so the store
//! is a small trait with a TOML-file implementation for real sessions and an
//! in-memory one for tests and throwaway sessions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Result, StoreError};

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Persist `value`; when this returns `Ok` the value is durable
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept in a flat TOML table
///
/// Thread-safe via `Arc<RwLock<..>>`; clones share the same state.
#[derive(Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: Arc<RwLock<BTreeMap<String, String>>>,
}

impl FilePreferenceStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store. A corrupted file is logged and
    /// treated as empty; it is overwritten on the next `set`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = Self::load(&path)?;
        Ok(Self {
            path,
            values: Arc::new(RwLock::new(values)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::StateFile(format!("Failed to read {}: {}", path.display(), e)))?;

        match toml::from_str::<BTreeMap<String, String>>(&content) {
            Ok(values) => Ok(values),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Corrupted preference file, using defaults: {}", e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::StateFile(format!("Failed to create directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(values)
            .map_err(|e| StoreError::StateFile(format!("Failed to serialize preferences: {}", e)))?;

        std::fs::write(&self.path, content)
            .map_err(|e| StoreError::StateFile(format!("Failed to write {}: {}", self.path.display(), e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o644);
            std::fs::set_permissions(&self.path, permissions)
                .map_err(|e| StoreError::StateFile(format!("Failed to set permissions: {}", e)))?;
        }

        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        let mut updated = values.clone();
        updated.insert(key.to_string(), value.to_string());

        // Memory only changes once the file write went through
        self.save(&updated)?;
        *values = updated;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryPreferenceStore {
    values: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
