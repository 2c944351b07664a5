use crate::errors::StorageError;
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use tracing::warn;

pub const STORAGE_KEY: &str = "hotelAppData";

/// Per-origin string key/value store, shaped after browser local storage.
pub trait Storage: Send + std::fmt::Debug {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_slice(&bytes)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    fn read_map_for_write(&self) -> Result<(Map<String, Value>, bool), StorageError> {
        match self.read_map() {
            Ok(map) => Ok((map, false)),
            Err(StorageError::Json(err)) => {
                warn!(path = %self.path.display(), "overwriting corrupt storage file: {err}");
                Ok((Map::new(), true))
            }
            Err(err) => Err(err),
        }
    }

    fn write_map(&self, map: Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_vec_pretty(&Value::Object(map))?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.read_map()?;
        Ok(map.get(key).and_then(Value::as_str).map(str::to_owned))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let (mut map, _) = self.read_map_for_write()?;
        map.insert(key.to_owned(), Value::String(value.to_owned()));
        self.write_map(map)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let (mut map, corrupt) = self.read_map_for_write()?;
        if map.remove(key).is_some() || corrupt {
            self.write_map(map)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    items: BTreeMap<String, String>,
    quota: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes larger than `quota` bytes fail with `QuotaExceeded`.
    pub fn with_quota(quota: usize) -> Self {
        let storage = Self::default();
        storage.set_quota(Some(quota));
        storage
    }

    pub fn set_quota(&self, quota: Option<usize>) {
        self.lock().quota = quota;
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if let Some(quota) = inner.quota {
            if value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                    size: value.len(),
                    quota,
                });
            }
        }
        inner.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.lock().items.remove(key);
        Ok(())
    }
}
