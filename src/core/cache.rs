//! Engine-owned caches.
//!
//! - `ConfigCache`: configuration per project, fresh for a fixed window
//! - `DictionaryCache`: dictionary files, valid while mtime and size match
//! - `UsageCache`: usage scan results per project and key, short TTL
//!
//! Time-based caches read the time from an injected [`Clock`].

use std::{
    collections::HashMap,
    fs,
    hash::Hash,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant, SystemTime},
};

use crate::{
    config::Config,
    core::{
        data::{DictionaryRecord, UsageLocation},
        parsers::json::load_dictionary_file,
    },
};

pub const CONFIG_FRESHNESS: Duration = Duration::from_secs(2);
pub const USAGE_TTL: Duration = Duration::from_secs(5);

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }
}

/// Values that expire a fixed time after insertion.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Value for `key` if it was inserted less than the TTL before `now`.
    pub fn get(&self, key: &K, now: Instant) -> Option<V> {
        self.entries
            .get(key)
            .filter(|(inserted, _)| now.saturating_duration_since(*inserted) < self.ttl)
            .map(|(_, value)| value.clone())
    }

    pub fn insert(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(key, (now, value));
    }

    pub fn invalidate(&mut self, key: &K) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Configuration per absolute project root.
pub type ConfigCache = TtlCache<PathBuf, Arc<Config>>;

/// Usage scan results per (project root, dictionary key).
pub type UsageCache = TtlCache<(PathBuf, String), Arc<Vec<UsageLocation>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: SystemTime,
    len: u64,
}

impl FileStamp {
    fn of(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        Some(Self {
            modified: metadata.modified().ok()?,
            len: metadata.len(),
        })
    }
}

/// Dictionary files keyed by absolute path, revalidated with a stat on every
/// read.
#[derive(Debug, Default)]
pub struct DictionaryCache {
    entries: HashMap<PathBuf, (FileStamp, Arc<Vec<DictionaryRecord>>)>,
}

impl DictionaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of the dictionary file at `path`.
    ///
    /// A missing file is `None`. A malformed one is logged and also `None`,
    /// and is retried once it changes on disk.
    pub fn load(&mut self, path: &Path) -> Option<Arc<Vec<DictionaryRecord>>> {
        let Some(stamp) = FileStamp::of(path) else {
            self.entries.remove(path);
            return None;
        };

        if let Some((cached, records)) = self.entries.get(path)
            && *cached == stamp
        {
            tracing::debug!(path = %path.display(), "dictionary cache hit");
            return Some(records.clone());
        }

        tracing::debug!(path = %path.display(), "dictionary cache miss");
        match load_dictionary_file(path) {
            Ok(records) => {
                let records = Arc::new(records);
                self.entries
                    .insert(path.to_path_buf(), (stamp, records.clone()));
                Some(records)
            }
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!(path = %path.display(), %error, "skipping malformed dictionary");
                self.entries.remove(path);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
