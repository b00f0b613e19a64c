//! Persistence of the bridge address.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;
use serde_json::{Map, Value};

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// A single named slot holding the bridge address as a plain string.
pub trait AddressStore {
    fn get_address(&self) -> Result<Option<String>>;

    fn set_address(&self, address: &str) -> Result<()>;

    fn clear_address(&self) -> Result<()>;
}

/// In-memory store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    address: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(address: &str) -> Self {
        MemoryStore {
            address: Mutex::new(Some(address.to_string())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.address
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AddressStore for MemoryStore {
    fn get_address(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn set_address(&self, address: &str) -> Result<()> {
        *self.slot() = Some(address.to_string());
        Ok(())
    }

    fn clear_address(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// JSON file store: an object mapping slot names to address strings.
///
/// Other slots in the same file are preserved on write.
///
/// # Example
///
/// ```
/// use hue_bridge_rs::{AddressStore, FileStore};
///
/// let path = std::env::temp_dir().join(format!("hue-bridge-doc-{}.json", std::process::id()));
/// let store = FileStore::new(&path);
/// assert_eq!(store.get_address().unwrap(), None);
///
/// store.set_address("http://localhost:80").unwrap();
/// assert_eq!(store.get_address().unwrap().as_deref(), Some("http://localhost:80"));
///
/// store.clear_address().unwrap();
/// assert_eq!(store.get_address().unwrap(), None);
/// # std::fs::remove_file(&path).ok();
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    slot: String,
}

impl FileStore {
    pub const DEFAULT_SLOT: &'static str = "url";

    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_slot(path, Self::DEFAULT_SLOT)
    }

    pub fn with_slot(path: impl AsRef<Path>, slot: &str) -> Self {
        FileStore {
            path: path.as_ref().to_path_buf(),
            slot: slot.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(Error::store("read", e)),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&raw).map_err(Error::JsonLoad)
    }

    fn save(&self, slots: &Map<String, Value>) -> Result<()> {
        let raw = serde_json::to_string_pretty(slots).map_err(Error::JsonDump)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::store("create_dir", e))?;
        }
        fs::write(&self.path, raw).map_err(|e| Error::store("write", e))
    }
}

impl AddressStore for FileStore {
    fn get_address(&self) -> Result<Option<String>> {
        let slots = self.load()?;
        Ok(slots
            .get(&self.slot)
            .and_then(Value::as_str)
            .map(String::from))
    }

    fn set_address(&self, address: &str) -> Result<()> {
        let mut slots = self.load()?;
        slots.insert(self.slot.clone(), Value::String(address.to_string()));
        debug!("storing bridge address in {}", self.path.display());
        self.save(&slots)
    }

    fn clear_address(&self) -> Result<()> {
        let mut slots = self.load()?;
        if slots.remove(&self.slot).is_some() {
            self.save(&slots)?;
        }
        Ok(())
    }
}
