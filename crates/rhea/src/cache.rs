//! Thread-safe file content cache with staleness detection.
//!
//! The cache keeps one `FileRecord` per path. Every access stats the file; a
//! record whose mtime no longer matches the disk is replaced by a fresh one
//! (new generation, nothing loaded). Bytes, decoded text and the SHA-256 hash
//! are loaded lazily and memoized on the record.
//!
//! ## Locking
//!
//! One mutex guards the map, and it is never held across disk I/O. A miss
//! records the generation it saw, releases the lock, reads or hashes, then
//! re-locks and stores the value only if the record is still that
//! generation. If another thread filled the field first, its value wins, so
//! repeated calls keep returning the same `Arc`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};
use tracing::trace;

/// How much of a record has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordState {
    /// Only metadata is known
    StatOnly,
    /// Bytes or text are cached
    ContentLoaded,
    /// The content hash is cached
    HashComputed,
}

/// Cached state for one file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    path: PathBuf,
    mtime_ns: u128,
    size: u64,
    generation: u64,
    hash: Option<String>,
    bytes: Option<Arc<[u8]>>,
    text: Option<Arc<str>>,
}

impl FileRecord {
    fn new(path: &Path, meta: &FileMeta, generation: u64) -> Self {
        Self {
            path: path.to_path_buf(),
            mtime_ns: meta.mtime_ns,
            size: meta.size,
            generation,
            hash: None,
            bytes: None,
            text: None,
        }
    }

    /// Path this record describes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time in nanoseconds since the Unix epoch.
    #[must_use]
    pub fn mtime_ns(&self) -> u128 {
        self.mtime_ns
    }

    /// File size in bytes at stat time.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Identity of this record instance; changes whenever the record is replaced.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Lowercase hex SHA-256 of the content, if computed.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Raw content, if loaded.
    #[must_use]
    pub fn bytes(&self) -> Option<&Arc<[u8]>> {
        self.bytes.as_ref()
    }

    /// Decoded content, if loaded.
    #[must_use]
    pub fn text(&self) -> Option<&Arc<str>> {
        self.text.as_ref()
    }

    /// How far this record has been loaded.
    #[must_use]
    pub fn state(&self) -> RecordState {
        if self.hash.is_some() {
            RecordState::HashComputed
        } else if self.bytes.is_some() || self.text.is_some() {
            RecordState::ContentLoaded
        } else {
            RecordState::StatOnly
        }
    }
}

struct FileMeta {
    mtime_ns: u128,
    size: u64,
}

impl FileMeta {
    fn read(path: &Path) -> io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self::from_metadata(&metadata))
    }

    fn from_metadata(metadata: &Metadata) -> Self {
        let mtime_ns = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_nanos());
        Self {
            mtime_ns,
            size: metadata.len(),
        }
    }
}

/// Per-path cache of file metadata and content.
#[derive(Debug, Default)]
pub struct FileCache {
    records: Mutex<HashMap<PathBuf, FileRecord>>,
    next_generation: AtomicU64,
}

impl FileCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stat `path` and return its (possibly fresh) record.
    ///
    /// A changed mtime discards the old record along with its content and hash.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from `stat`.
    pub fn stat(&self, path: &Path) -> io::Result<FileRecord> {
        let meta = FileMeta::read(path)?;
        let mut records = self.lock();
        Ok(self.refresh(&mut records, path, &meta).clone())
    }

    /// Raw content of `path`, read from disk only on a cache miss.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from `stat` or `read`.
    pub fn bytes(&self, path: &Path) -> io::Result<Arc<[u8]>> {
        let meta = FileMeta::read(path)?;
        let generation = {
            let mut records = self.lock();
            let record = self.refresh(&mut records, path, &meta);
            if let Some(bytes) = &record.bytes {
                return Ok(Arc::clone(bytes));
            }
            record.generation
        };

        trace!(path = %path.display(), "File cache miss, reading content");
        let bytes: Arc<[u8]> = std::fs::read(path)?.into();

        let mut records = self.lock();
        Ok(match records.get_mut(path) {
            Some(record) if record.generation == generation => {
                Arc::clone(record.bytes.get_or_insert(bytes))
            }
            _ => bytes,
        })
    }

    /// Decoded content of `path`.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD; decoding never fails.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from `stat` or `read`.
    pub fn text(&self, path: &Path) -> io::Result<Arc<str>> {
        let meta = FileMeta::read(path)?;
        let generation = {
            let mut records = self.lock();
            let record = self.refresh(&mut records, path, &meta);
            if let Some(text) = &record.text {
                return Ok(Arc::clone(text));
            }
            record.generation
        };

        let bytes = self.bytes(path)?;
        trace!(path = %path.display(), "File cache miss, decoding text");
        let text: Arc<str> = String::from_utf8_lossy(&bytes).into();

        let mut records = self.lock();
        Ok(match records.get_mut(path) {
            Some(record) if record.generation == generation => {
                Arc::clone(record.text.get_or_insert(text))
            }
            _ => text,
        })
    }

    /// Lowercase hex SHA-256 of the content of `path`, memoized per record.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from `stat` or `read`.
    pub fn hash(&self, path: &Path) -> io::Result<String> {
        let meta = FileMeta::read(path)?;
        let generation = {
            let mut records = self.lock();
            let record = self.refresh(&mut records, path, &meta);
            if let Some(hash) = &record.hash {
                return Ok(hash.clone());
            }
            record.generation
        };

        let bytes = self.bytes(path)?;
        trace!(path = %path.display(), "File cache miss, hashing content");
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());

        let mut records = self.lock();
        Ok(match records.get_mut(path) {
            Some(record) if record.generation == generation => {
                record.hash.get_or_insert(hash).clone()
            }
            _ => hash,
        })
    }

    /// Drop the record for `path`. Returns whether one existed.
    pub fn invalidate(&self, path: &Path) -> bool {
        self.lock().remove(path).is_some()
    }

    /// Whether a record for `path` is cached.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    /// Snapshot of the cached record for `path`, without touching the disk.
    #[must_use]
    pub fn record(&self, path: &Path) -> Option<FileRecord> {
        self.lock().get(path).cloned()
    }

    /// Number of cached records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, FileRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reuse the record for `path` if its mtime still matches, else replace it.
    fn refresh<'a>(
        &self,
        records: &'a mut HashMap<PathBuf, FileRecord>,
        path: &Path,
        meta: &FileMeta,
    ) -> &'a mut FileRecord {
        let fresh = || {
            let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
            FileRecord::new(path, meta, generation)
        };
        match records.entry(path.to_path_buf()) {
            Entry::Occupied(mut entry) => {
                if entry.get().mtime_ns != meta.mtime_ns {
                    trace!(path = %path.display(), "File changed on disk, dropping cached record");
                    entry.insert(fresh());
                }
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(fresh()),
        }
    }
}
