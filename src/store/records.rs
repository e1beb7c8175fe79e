//! File-backed record store.
//!
//! Layout: `{data_dir}/{collection}/{key}.json`, one UTF-8 JSON document per
//! file with no envelope.
//!
//! Writes are a sequence of open → (truncate) → write → close. The sequence
//! is not atomic: a failure part way through may leave a partial file behind
//! and nothing here repairs it. There is no locking, so concurrent writers to
//! one key race and the last write wins.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::observability::metrics;
use crate::store::error::{validate_name, StoreError, StoreResult};

const RECORD_SUFFIX: &str = ".json";

/// CRUD over JSON documents stored one per file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding a collection's records.
    pub fn collection_path(&self, collection: &str) -> StoreResult<PathBuf> {
        validate_name("collection", collection)?;
        Ok(self.data_dir.join(collection))
    }

    /// File holding a single record.
    pub fn record_path(&self, collection: &str, key: &str) -> StoreResult<PathBuf> {
        validate_name("key", key)?;
        Ok(self
            .collection_path(collection)?
            .join(format!("{key}{RECORD_SUFFIX}")))
    }

    /// Create a new record. Fails with `AlreadyExists` if the key is taken.
    pub async fn create<T>(&self, collection: &str, key: &str, data: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        tracked("create", self.create_inner(collection, key, data).await)
    }

    /// Read a record as a JSON value.
    ///
    /// Content that is not valid JSON is returned as an empty object instead
    /// of an error. Callers that need to detect corruption should not rely on
    /// this method; the substitution is logged at `warn`.
    pub async fn read(&self, collection: &str, key: &str) -> StoreResult<Value> {
        tracked("read", self.read_inner(collection, key).await)
    }

    /// Read a record and deserialize it into `T`.
    pub async fn read_as<T>(&self, collection: &str, key: &str) -> StoreResult<T>
    where
        T: DeserializeOwned,
    {
        let value = self.read(collection, key).await?;
        serde_json::from_value(value).map_err(|source| StoreError::DecodeFailed {
            path: self
                .record_path(collection, key)
                .unwrap_or_else(|_| self.data_dir.clone()),
            source,
        })
    }

    /// Replace an existing record. Fails with `NotFound` if it does not exist.
    pub async fn update<T>(&self, collection: &str, key: &str, data: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        tracked("update", self.update_inner(collection, key, data).await)
    }

    pub async fn delete(&self, collection: &str, key: &str) -> StoreResult<()> {
        tracked("delete", self.delete_inner(collection, key).await)
    }

    /// Keys present in a collection, in no particular order.
    pub async fn list(&self, collection: &str) -> StoreResult<Vec<String>> {
        tracked("list", self.list_inner(collection).await)
    }

    async fn create_inner<T>(&self, collection: &str, key: &str, data: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        let path = self.record_path(collection, key)?;
        let bytes = encode(&path, data)?;

        let dir = self.collection_path(collection)?;
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::OpenFailed { path: dir, source })?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|source| match source.kind() {
                io::ErrorKind::AlreadyExists => StoreError::AlreadyExists { path: path.clone() },
                _ => StoreError::OpenFailed {
                    path: path.clone(),
                    source,
                },
            })?;

        write_all(&mut file, &bytes, &path).await?;
        close(file, &path).await
    }

    async fn read_inner(&self, collection: &str, key: &str) -> StoreResult<Value> {
        let path = self.record_path(collection, key)?;

        let bytes = fs::read(&path).await.map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound { path: path.clone() },
            _ => StoreError::ReadFailed {
                path: path.clone(),
                source,
            },
        })?;

        Ok(parse_permissive(&path, &bytes))
    }

    async fn update_inner<T>(&self, collection: &str, key: &str, data: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        let path = self.record_path(collection, key)?;
        let bytes = encode(&path, data)?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .await
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => StoreError::NotFound { path: path.clone() },
                _ => StoreError::OpenFailed {
                    path: path.clone(),
                    source,
                },
            })?;

        file.set_len(0)
            .await
            .map_err(|source| StoreError::TruncateFailed {
                path: path.clone(),
                source,
            })?;

        write_all(&mut file, &bytes, &path).await?;
        close(file, &path).await
    }

    async fn delete_inner(&self, collection: &str, key: &str) -> StoreResult<()> {
        let path = self.record_path(collection, key)?;

        fs::remove_file(&path)
            .await
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => StoreError::NotFound { path: path.clone() },
                _ => StoreError::DeleteFailed {
                    path: path.clone(),
                    source,
                },
            })
    }

    async fn list_inner(&self, collection: &str) -> StoreResult<Vec<String>> {
        let dir = self.collection_path(collection)?;
        let list_failed = |source| StoreError::ListDirFailed {
            path: dir.clone(),
            source,
        };

        let mut entries = fs::read_dir(&dir).await.map_err(list_failed)?;
        let mut keys = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(list_failed)? {
            let name = entry.file_name();
            if let Some(key) = name.to_str().and_then(|n| n.strip_suffix(RECORD_SUFFIX)) {
                keys.push(key.to_string());
            }
        }

        Ok(keys)
    }
}

fn encode<T>(path: &Path, data: &T) -> StoreResult<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    serde_json::to_vec(data).map_err(|source| StoreError::EncodeFailed {
        path: path.to_path_buf(),
        source,
    })
}

// tokio buffers writes on a blocking thread; flushing surfaces their errors
// as part of the write stage rather than the close stage.
async fn write_all(file: &mut File, bytes: &[u8], path: &Path) -> StoreResult<()> {
    let write_failed = |source| StoreError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    file.write_all(bytes).await.map_err(write_failed)?;
    file.flush().await.map_err(write_failed)
}

async fn close(file: File, path: &Path) -> StoreResult<()> {
    file.sync_all()
        .await
        .map_err(|source| StoreError::CloseFailed {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_permissive(path: &Path, bytes: &[u8]) -> Value {
    match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Stored record is not valid JSON, treating it as an empty document"
            );
            Value::Object(Map::new())
        }
    }
}

fn tracked<T>(op: &'static str, result: StoreResult<T>) -> StoreResult<T> {
    match &result {
        Ok(_) => metrics::record_store_operation(op, "ok"),
        Err(e) => {
            tracing::debug!(op, kind = e.kind().as_str(), error = %e, "Record store operation failed");
            metrics::record_store_operation(op, e.kind().as_str());
        }
    }
    result
}
