//! Progress persistence: the contract the session needs plus local backends.
//!
//! Layout mirrors browser local storage: two keys, each holding a JSON
//! document.
//!   - `bh_user`     → `{username, email, avatarId, joinedAt}`
//!   - `bh_progress` → `{completedLevels, score, streak, lives}`
//!
//! Stores report failures as `StoreError`; the session decides to swallow
//! them. Nothing here retries.

use std::{
    collections::{BTreeSet, HashMap},
    fs,
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::StorageCfg;
use crate::domain::{GameState, User};
use crate::protocol::ProgressRecord;

pub const USER_KEY: &str = "bh_user";
pub const PROGRESS_KEY: &str = "bh_progress";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
    #[error("storage json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend unavailable: {0}")]
    Backend(String),
}

/// What the session requires from persistence.
pub trait ProgressStore {
    fn load_user(&self) -> Result<Option<User>, StoreError>;
    fn save_user(&mut self, user: &User) -> Result<(), StoreError>;
    /// Forget the identity. Progress is kept.
    fn logout_user(&mut self) -> Result<(), StoreError>;
    fn load_progress(&self) -> Result<Option<ProgressRecord>, StoreError>;
    fn save_progress(&mut self, completed: &BTreeSet<u32>, state: &GameState) -> Result<(), StoreError>;
}

/// String key/value backend (the local-storage shape).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory backend; lives as long as the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryKv {
    map: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.map.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`. Writes go through a temp file
/// and a rename so a crash never leaves half a document behind.
#[derive(Clone, Debug)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// `ProgressStore` over any key/value backend using the JSON layout above.
#[derive(Clone, Debug, Default)]
pub struct LocalStore<K> {
    kv: K,
}

impl<K: KeyValueStore> LocalStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn backend(&self) -> &K {
        &self.kv
    }

    pub fn backend_mut(&mut self) -> &mut K {
        &mut self.kv
    }
}

impl LocalStore<MemoryKv> {
    pub fn in_memory() -> Self {
        Self::new(MemoryKv::new())
    }
}

impl LocalStore<FileKv> {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileKv::new(dir))
    }

    pub fn from_config(cfg: &StorageCfg) -> Self {
        debug!(target: "store", dir = %cfg.dir.display(), "Using file store");
        Self::in_dir(cfg.dir.clone())
    }
}

impl<K: KeyValueStore> ProgressStore for LocalStore<K> {
    #[instrument(level = "debug", skip(self))]
    fn load_user(&self) -> Result<Option<User>, StoreError> {
        match self.kv.get(USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    #[instrument(level = "debug", skip(self, user), fields(username = %user.username))]
    fn save_user(&mut self, user: &User) -> Result<(), StoreError> {
        let raw = serde_json::to_string(user)?;
        self.kv.set(USER_KEY, &raw)
    }

    #[instrument(level = "debug", skip(self))]
    fn logout_user(&mut self) -> Result<(), StoreError> {
        self.kv.remove(USER_KEY)
    }

    #[instrument(level = "debug", skip(self))]
    fn load_progress(&self) -> Result<Option<ProgressRecord>, StoreError> {
        match self.kv.get(PROGRESS_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    #[instrument(level = "debug", skip(self, completed, state), fields(completed = completed.len(), score = state.score))]
    fn save_progress(&mut self, completed: &BTreeSet<u32>, state: &GameState) -> Result<(), StoreError> {
        let record = ProgressRecord::capture(completed, state);
        let raw = serde_json::to_string(&record)?;
        self.kv.set(PROGRESS_KEY, &raw)?;
        debug!(target: "store", bytes = raw.len(), "Progress saved");
        Ok(())
    }
}
