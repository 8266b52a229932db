//! Durable key-value settings store and typed sync state
//!
//! The orchestrator reads configuration (server URL, token) at the start of
//! every attempt and writes its outcome at the end. The store contract is
//! deliberately small: string keys, string values, synchronous access, and
//! durability on every `set` (flush-on-write), so the agent never has to
//! reason about an unflushed mutation surviving a process teardown.

use healthsync_shared::SyncError;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Store handle shared between the orchestrator and whatever surfaces
/// status to the user
pub type SharedStore = Arc<Mutex<Box<dyn SettingsStore>>>;

/// Wrap a concrete store for shared use
pub fn shared(store: impl SettingsStore + 'static) -> SharedStore {
    Arc::new(Mutex::new(Box::new(store)))
}

/// Well-known keys used by the sync orchestrator
pub mod keys {
    pub const SERVER_URL: &str = "server_url";
    pub const TOKEN: &str = "token";
    pub const LAST_SYNC: &str = "last_sync";
    pub const LAST_ERROR: &str = "last_error";
    pub const NUTRITION_SOURCE: &str = "nutrition_source";
    pub const NUTRITION_ORIGINS: &str = "nutrition_origins";
}

/// String-keyed store with a flush-on-write durability contract
pub trait SettingsStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    /// Persist `value` under `key`; durable before this returns
    fn set(&mut self, key: &str, value: &str) -> Result<(), SyncError>;
}

/// JSON-file backed store; every `set` rewrites the file via temp + rename
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open an existing store file or start empty if none exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| SyncError::Store(format!("corrupt store file: {e}")))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(SyncError::Store(e.to_string())),
        };
        Ok(Self { path, values })
    }

    fn persist(&self) -> Result<(), SyncError> {
        let contents = serde_json::to_string_pretty(&self.values)
            .map_err(|e| SyncError::Store(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(|e| SyncError::Store(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| SyncError::Store(e.to_string()))?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SyncError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// HashMap-backed store for tests
#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SyncError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed accessor over any [`SettingsStore`]
///
/// Empty strings are treated as absent on read; setters trim surrounding
/// whitespace the way a settings screen would.
pub struct SyncState<'a> {
    store: &'a mut dyn SettingsStore,
}

impl<'a> SyncState<'a> {
    pub fn new(store: &'a mut dyn SettingsStore) -> Self {
        Self { store }
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.store
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn server_url(&self) -> Option<String> {
        self.non_empty(keys::SERVER_URL)
    }

    pub fn token(&self) -> Option<String> {
        self.non_empty(keys::TOKEN)
    }

    pub fn last_sync(&self) -> Option<String> {
        self.non_empty(keys::LAST_SYNC)
    }

    pub fn last_error(&self) -> Option<String> {
        self.non_empty(keys::LAST_ERROR)
    }

    pub fn nutrition_source(&self) -> Option<String> {
        self.non_empty(keys::NUTRITION_SOURCE)
    }

    pub fn nutrition_origins(&self) -> Vec<String> {
        self.store
            .get(keys::NUTRITION_ORIGINS)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_server_url(&mut self, url: &str) -> Result<(), SyncError> {
        self.store.set(keys::SERVER_URL, url.trim())
    }

    pub fn set_token(&mut self, token: &str) -> Result<(), SyncError> {
        self.store.set(keys::TOKEN, token.trim())
    }

    /// Record a fully successful attempt: stamp the sync time, clear the
    /// error, and remember which nutrition source fed today's summary
    pub fn record_success(
        &mut self,
        timestamp: &str,
        nutrition_source: Option<&str>,
        nutrition_origins: &[String],
    ) -> Result<(), SyncError> {
        self.store.set(keys::LAST_SYNC, timestamp)?;
        self.store.set(keys::LAST_ERROR, "")?;
        self.store
            .set(keys::NUTRITION_SOURCE, nutrition_source.unwrap_or(""))?;
        self.store
            .set(keys::NUTRITION_ORIGINS, &nutrition_origins.join(","))?;
        Ok(())
    }

    /// Record a failed attempt; `last_sync` is deliberately left untouched
    pub fn record_failure(&mut self, message: &str) -> Result<(), SyncError> {
        self.store.set(keys::LAST_ERROR, message)
    }
}
