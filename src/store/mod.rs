//! # Local persisted state
//!
//! Bookmarks and solution links each live in one JSON document under a
//! fixed key. Stores never touch storage directly; they go through a
//! [`StorageBackend`] so tests run against memory and the service against
//! files.
//!
//! Document format: `{"version": 1, "data": ...}`. A bare payload (no
//! envelope) is also accepted on read. Malformed or newer-version documents
//! read as empty state. A failed load reads as empty only on display paths;
//! writers get the error and leave the document alone.
//!
//! Writes rewrite the whole document. Stores serialize their own writers,
//! but two processes sharing a data dir race and the last writer wins.

pub mod bookmarks;
pub mod solutions;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

pub const DOCUMENT_VERSION: u32 = 1;

/// Key → document string storage.
pub trait StorageBackend: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local storage for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    docs: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw document (used to simulate legacy or corrupt state).
    pub fn with_raw(self, key: &str, value: &str) -> Self {
        self.docs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(docs.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        docs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating data dir {}", self.dir.display()))?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

#[derive(Serialize)]
struct DocumentOut<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct DocumentIn<T> {
    version: u32,
    data: T,
}

/// Read a document, degrading to `T::default()` on any problem.
pub(crate) fn read_document<T>(backend: &dyn StorageBackend, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    try_read_document(backend, key).unwrap_or_else(|e| {
        tracing::warn!(target: "store", error = ?e, key, "storage read failed; using empty state");
        T::default()
    })
}

/// Like [`read_document`], but a backend load error is returned instead of
/// read as empty. Read-modify-write paths use this so a failed read never
/// overwrites stored data.
pub(crate) fn try_read_document<T>(backend: &dyn StorageBackend, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = backend
        .load(key)
        .with_context(|| format!("loading document {key}"))?
    else {
        return Ok(T::default());
    };

    if let Ok(doc) = serde_json::from_str::<DocumentIn<T>>(&raw) {
        if doc.version > DOCUMENT_VERSION {
            tracing::warn!(
                target: "store",
                key,
                version = doc.version,
                "document written by a newer version; using empty state"
            );
            return Ok(T::default());
        }
        return Ok(doc.data);
    }
    match serde_json::from_str::<T>(&raw) {
        Ok(data) => Ok(data),
        Err(e) => {
            tracing::warn!(target: "store", error = %e, key, "malformed document; using empty state");
            Ok(T::default())
        }
    }
}

pub(crate) fn write_document<T: Serialize>(
    backend: &dyn StorageBackend,
    key: &str,
    data: &T,
) -> Result<()> {
    let doc = DocumentOut {
        version: DOCUMENT_VERSION,
        data,
    };
    let raw = serde_json::to_string(&doc).context("serializing document")?;
    backend.save(key, &raw)
}
