//! Append-only log streams with compressed archives.
//!
//! # Responsibilities
//! - Append lines to `{logs_dir}/{stream}.log`
//! - List active streams and, optionally, archives
//! - Snapshot a stream into `{logs_dir}/{stream}-{hex_ms}.gz.b64`
//! - Decode an archive back into text for inspection
//! - Truncate a stream once its content is archived
//!
//! # Design Decisions
//! - Archives are gzip members encoded as standard base64 text; concatenated
//!   members decode as one stream
//! - Archive creation is exclusive; an existing archive is never overwritten
//! - `append` and `rotate` share a per-stream async lock, so a rotation never
//!   truncates lines it did not archive (within this process)
//! - Errors are returned to the caller; nothing here logs through itself

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use dashmap::DashMap;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::logs::context::ContextLogger;
use crate::logs::error::{LogError, LogResult};

pub const ACTIVE_SUFFIX: &str = ".log";
pub const ARCHIVE_SUFFIX: &str = ".gz.b64";


/// Handle to a directory of log streams. Cheap to clone.
#[derive(Debug, Clone)]
pub struct LogManager {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    logs_dir: PathBuf,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl LogManager {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                logs_dir: logs_dir.into(),
                locks: DashMap::new(),
            }),
        }
    }

    pub fn logs_dir(&self) -> &Path {
        &self.inner.logs_dir
    }

    /// A per-module logger writing into streams named after `name`.
    pub fn context(&self, name: impl Into<String>) -> ContextLogger {
        ContextLogger::new(name, self.clone())
    }

    pub fn active_path(&self, stream: &str) -> PathBuf {
        self.inner.logs_dir.join(format!("{stream}{ACTIVE_SUFFIX}"))
    }

    pub fn archive_path(&self, archive_id: &str) -> PathBuf {
        self.inner.logs_dir.join(format!("{archive_id}{ARCHIVE_SUFFIX}"))
    }

    /// Append one line to a stream, creating the stream on first use.
    pub async fn append(&self, stream: &str, line: &str) -> LogResult<()> {
        validate_stream(stream)?;
        let lock = self.lock_for(stream);
        let _held = lock.lock().await;

        let path = self.active_path(stream);
        let mut file = match open_append(&path).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // Log directory not created yet.
                fs::create_dir_all(&self.inner.logs_dir)
                    .await
                    .map_err(|source| LogError::OpenFailed {
                        path: self.inner.logs_dir.clone(),
                        source,
                    })?;
                open_append(&path).await
            }
            other => other,
        }
        .map_err(|source| LogError::OpenFailed {
            path: path.clone(),
            source,
        })?;

        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');

        write_all(&mut file, record.as_bytes(), &path).await?;
        close(file, &path).await
    }

    /// Stream identifiers found in the log directory.
    ///
    /// Active streams are listed by name; archives, when requested, by their
    /// `{stream}-{hex}` identifier.
    pub async fn list(&self, include_archived: bool) -> LogResult<Vec<String>> {
        let dir = &self.inner.logs_dir;
        let list_failed = |source| LogError::ListDirFailed {
            path: dir.clone(),
            source,
        };

        let mut entries = fs::read_dir(dir).await.map_err(list_failed)?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(list_failed)? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };

            if let Some(id) = name.strip_suffix(ARCHIVE_SUFFIX) {
                if include_archived {
                    ids.push(id.to_string());
                }
            } else if let Some(id) = name.strip_suffix(ACTIVE_SUFFIX) {
                ids.push(id.to_string());
            }
        }

        Ok(ids)
    }

    /// Archive the current content of a stream. Returns the archive id.
    pub async fn compress(&self, stream: &str) -> LogResult<String> {
        validate_stream(stream)?;
        let lock = self.lock_for(stream);
        let _held = lock.lock().await;

        let content = self.read_active(stream).await?;
        self.write_archive(stream, &content).await
    }

    /// Decode an archive back into the text it was created from.
    pub async fn decompress(&self, archive_id: &str) -> LogResult<String> {
        validate_stream(archive_id)?;
        let path = self.archive_path(archive_id);

        let encoded = fs::read(&path).await.map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LogError::NotFound { path: path.clone() },
            _ => LogError::ReadFailed {
                path: path.clone(),
                source,
            },
        })?;

        let decompress_failed = |reason: String| LogError::DecompressFailed {
            path: path.clone(),
            reason,
        };

        let compressed = STANDARD
            .decode(encoded.trim_ascii())
            .map_err(|e| decompress_failed(format!("invalid base64: {e}")))?;
        let raw = gunzip(&compressed)
            .map_err(|e| decompress_failed(format!("invalid gzip data: {e}")))?;

        String::from_utf8(raw).map_err(|e| decompress_failed(format!("not UTF-8: {e}")))
    }

    /// Truncate a stream to zero length.
    pub async fn truncate(&self, stream: &str) -> LogResult<()> {
        validate_stream(stream)?;
        let lock = self.lock_for(stream);
        let _held = lock.lock().await;

        self.truncate_active(stream).await
    }

    /// Archive then truncate a stream while holding its lock.
    ///
    /// Returns `None` when the stream was empty and nothing was archived.
    pub async fn rotate(&self, stream: &str) -> LogResult<Option<String>> {
        validate_stream(stream)?;
        let lock = self.lock_for(stream);
        let _held = lock.lock().await;

        let content = self.read_active(stream).await?;
        if content.is_empty() {
            return Ok(None);
        }

        let archive_id = self.write_archive(stream, &content).await?;
        self.truncate_active(stream).await?;
        Ok(Some(archive_id))
    }

    pub(crate) fn lock_for(&self, stream: &str) -> Arc<Mutex<()>> {
        self.inner
            .locks
            .entry(stream.to_string())
            .or_default()
            .clone()
    }

    async fn read_active(&self, stream: &str) -> LogResult<Vec<u8>> {
        let path = self.active_path(stream);
        fs::read(&path).await.map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LogError::NotFound { path: path.clone() },
            _ => LogError::ReadFailed {
                path: path.clone(),
                source,
            },
        })
    }

    async fn write_archive(&self, stream: &str, content: &[u8]) -> LogResult<String> {
        let source_path = self.active_path(stream);
        let compressed = gzip(content).map_err(|source| LogError::CompressFailed {
            path: source_path,
            source,
        })?;
        let encoded = STANDARD.encode(compressed);

        let archive_id = format!("{stream}-{:x}", unix_millis());
        let path = self.archive_path(&archive_id);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|source| match source.kind() {
                io::ErrorKind::AlreadyExists => LogError::AlreadyExists { path: path.clone() },
                _ => LogError::OpenFailed {
                    path: path.clone(),
                    source,
                },
            })?;

        write_all(&mut file, encoded.as_bytes(), &path).await?;
        close(file, &path).await?;
        Ok(archive_id)
    }

    async fn truncate_active(&self, stream: &str) -> LogResult<()> {
        let path = self.active_path(stream);

        let file = OpenOptions::new()
            .write(true)
            .open(&path)
            .await
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => LogError::NotFound { path: path.clone() },
                _ => LogError::OpenFailed {
                    path: path.clone(),
                    source,
                },
            })?;

        file.set_len(0)
            .await
            .map_err(|source| LogError::TruncateFailed { path, source })
    }
}

fn gzip(content: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content)?;
    encoder.finish()
}

fn gunzip(compressed: &[u8]) -> io::Result<Vec<u8>> {
    let mut raw = Vec::new();
    MultiGzDecoder::new(compressed).read_to_end(&mut raw)?;
    Ok(raw)
}

/// Milliseconds since the Unix epoch.
pub(crate) fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn validate_stream(stream: &str) -> LogResult<()> {
    let invalid = stream.is_empty()
        || stream == "."
        || stream == ".."
        || stream.contains(['/', '\\', '\0']);

    if invalid {
        return Err(LogError::InvalidName {
            name: stream.to_string(),
        });
    }
    Ok(())
}

async fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path).await
}

async fn write_all(file: &mut File, bytes: &[u8], path: &Path) -> LogResult<()> {
    let write_failed = |source| LogError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    file.write_all(bytes).await.map_err(write_failed)?;
    file.flush().await.map_err(write_failed)
}

async fn close(file: File, path: &Path) -> LogResult<()> {
    file.sync_all().await.map_err(|source| LogError::CloseFailed {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (TempDir, LogManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = LogManager::new(dir.path());
        (dir, manager)
    }

    #[tokio::test]
    async fn test_append_creates_directory_and_stream() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LogManager::new(dir.path().join("nested").join("logs"));

        manager.append("server", "{\"a\":1}").await.unwrap();
        manager.append("server", "{\"a\":2}").await.unwrap();

        let content = std::fs::read_to_string(manager.active_path("server")).unwrap();
        assert_eq!(content, "{\"a\":1}\n{\"a\":2}\n");
    }

    #[tokio::test]
    async fn test_list_contains_stream_once() {
        let (_dir, manager) = manager();
        for i in 0..25 {
            manager.append("workers", &format!("line {i}")).await.unwrap();
        }
        manager.append("server-access", "x").await.unwrap();

        let mut streams = manager.list(false).await.unwrap();
        streams.sort();
        assert_eq!(streams, vec!["server-access", "workers"]);
    }

    #[tokio::test]
    async fn test_compress_decompress_round_trip() {
        let (_dir, manager) = manager();
        let lines = ["{\"module\":\"server\",\"param\":[\"é\"]}", "", "tail line"];
        for line in lines {
            manager.append("server", line).await.unwrap();
        }
        let original = std::fs::read_to_string(manager.active_path("server")).unwrap();

        let archive_id = manager.compress("server").await.unwrap();
        assert!(archive_id.starts_with("server-"));
        assert_eq!(manager.decompress(&archive_id).await.unwrap(), original);

        // Compress alone leaves the active stream untouched.
        let after = std::fs::read_to_string(manager.active_path("server")).unwrap();
        assert_eq!(after, original);

        let mut all = manager.list(true).await.unwrap();
        all.sort();
        assert_eq!(all, vec!["server".to_string(), archive_id]);
    }

    #[tokio::test]
    async fn test_archive_id_uses_hex_timestamp() {
        let (_dir, manager) = manager();
        manager.append("a", "x").await.unwrap();
        let archive_id = manager.compress("a").await.unwrap();

        let suffix = archive_id.strip_prefix("a-").unwrap();
        let millis = u64::from_str_radix(suffix, 16).unwrap();
        assert!(millis <= unix_millis());
    }

    #[tokio::test]
    async fn test_truncate_empties_active_file() {
        let (_dir, manager) = manager();
        manager.append("a", "x").await.unwrap();
        manager.truncate("a").await.unwrap();
        assert_eq!(std::fs::metadata(manager.active_path("a")).unwrap().len(), 0);

        let err = manager.truncate("missing").await.unwrap_err();
        assert!(matches!(err, LogError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rotate_archives_and_truncates() {
        let (_dir, manager) = manager();
        manager.append("a", "one").await.unwrap();
        manager.append("a", "two").await.unwrap();

        let archive_id = manager.rotate("a").await.unwrap().unwrap();
        assert_eq!(manager.decompress(&archive_id).await.unwrap(), "one\ntwo\n");
        assert_eq!(std::fs::metadata(manager.active_path("a")).unwrap().len(), 0);

        // Nothing new to archive.
        assert!(manager.rotate("a").await.unwrap().is_none());

        manager.append("a", "three").await.unwrap();
        let content = std::fs::read_to_string(manager.active_path("a")).unwrap();
        assert_eq!(content, "three\n");
    }

    #[tokio::test]
    async fn test_decompress_rejects_garbage() {
        let (dir, manager) = manager();
        std::fs::write(dir.path().join(format!("junk-1{ARCHIVE_SUFFIX}")), "@@not base64@@").unwrap();

        let err = manager.decompress("junk-1").await.unwrap_err();
        assert!(matches!(err, LogError::DecompressFailed { .. }));

        let err = manager.decompress("absent-1").await.unwrap_err();
        assert!(matches!(err, LogError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_decompress_reads_plain_gzip_archive() {
        let (dir, manager) = manager();
        // gzip of "line one\nline two\n", base64 encoded
        std::fs::write(
            dir.path().join("server-18f0.gz.b64"),
            "H4sIAAAAAAACA8vJzEtVyM9L5coBMUrK87kAi9f0dRIAAAA=\n",
        )
        .unwrap();

        assert_eq!(manager.list(true).await.unwrap(), vec!["server-18f0".to_string()]);
        assert_eq!(
            manager.decompress("server-18f0").await.unwrap(),
            "line one\nline two\n"
        );
    }

    #[tokio::test]
    async fn test_decompress_joins_gzip_members() {
        let (dir, manager) = manager();
        let mut members = gzip(b"first\n").unwrap();
        members.extend(gzip(b"second\n").unwrap());
        std::fs::write(
            dir.path().join(format!("a-1{ARCHIVE_SUFFIX}")),
            STANDARD.encode(members),
        )
        .unwrap();

        assert_eq!(manager.decompress("a-1").await.unwrap(), "first\nsecond\n");
    }

    #[tokio::test]
    async fn test_existing_archive_is_never_overwritten() {
        let (dir, manager) = manager();
        manager.append("a", "keep me").await.unwrap();

        let start = unix_millis();
        for millis in start..start + 1000 {
            std::fs::write(dir.path().join(format!("a-{millis:x}{ARCHIVE_SUFFIX}")), "existing").unwrap();
        }

        let err = manager.compress("a").await.unwrap_err();
        assert!(matches!(err, LogError::AlreadyExists { .. }));

        let err = manager.rotate("a").await.unwrap_err();
        assert!(matches!(err, LogError::AlreadyExists { .. }));

        for millis in start..start + 1000 {
            let bytes = std::fs::read(dir.path().join(format!("a-{millis:x}{ARCHIVE_SUFFIX}"))).unwrap();
            assert_eq!(bytes, b"existing");
        }
        assert_eq!(
            std::fs::read_to_string(manager.active_path("a")).unwrap(),
            "keep me\n"
        );
    }

    #[tokio::test]
    async fn test_compress_missing_stream_fails() {
        let (_dir, manager) = manager();
        let err = manager.compress("nope").await.unwrap_err();
        assert!(matches!(err, LogError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_stream_names() {
        let (_dir, manager) = manager();
        assert!(matches!(
            manager.append("../escape", "x").await,
            Err(LogError::InvalidName { .. })
        ));
    }
}
