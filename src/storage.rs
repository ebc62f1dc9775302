//! Key-value blob persistence.
//!
//! All durable state lives in four independent blobs, each rewritten in
//! full on every mutation of its owning collection and read once at load.
//! The [`BlobStore`] port is constructor-injected into the repositories so
//! tests can swap the directory-backed store for an in-memory one.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Storage keys for the four persisted blobs.
pub mod keys {
    /// Instrument collection.
    pub const INSTRUMENTS: &str = "instruments";
    /// Remote source URL string.
    pub const SHEET_URL: &str = "sheet_url";
    /// Trading plan collection.
    pub const TRADING_PLANS: &str = "trading_plans";
    /// Daily risk settings object.
    pub const DAILY_SETTINGS: &str = "daily_settings";
}

/// Persistence port for string blobs keyed by name.
pub trait BlobStore {
    /// Reads a blob. Read failures degrade to `None` — a missing or
    /// unreadable blob is never fatal.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a blob, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> std::io::Result<()>;
}

/// Lets several repositories share one store in a single-threaded host.
impl<S: BlobStore> BlobStore for std::rc::Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> std::io::Result<()> {
        (**self).put(key, value)
    }
}

/// Directory-backed store: one file per key inside a data directory.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// The data directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BlobStore for DirStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key, path = %path.display(), error = %e, "failed to read blob");
                None
            }
        }
    }

    fn put(&self, key: &str, value: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)
    }
}

/// In-memory store used by tests and ephemeral hosts.
#[derive(Default)]
pub struct MemStore {
    cells: RefCell<HashMap<String, String>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds a key, e.g. to simulate state left by a previous session.
    pub fn seed(self, key: &str, value: &str) -> Self {
        self.cells.borrow_mut().insert(key.to_string(), value.to_string());
        self
    }
}

impl BlobStore for MemStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cells.borrow().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.cells.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
