//! Local key-value storage and first-run detection.
//!
//! The only thing ever persisted is the password-setup flag. The rest of the
//! app receives an `AppState` built once at startup instead of reading storage
//! on its own.

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::wallet::DEFAULT_NETWORK;

pub const SETUP_FLAG_KEY: &str = "crypto-app-password-setup";
pub const STORAGE_FILE: &str = "local_storage.json";

static DATA_DIR_OVERRIDE: OnceCell<PathBuf> = OnceCell::new();

/// Returns false if an override was already installed.
pub fn set_data_dir_override(dir: PathBuf) -> bool {
    DATA_DIR_OVERRIDE.set(dir).is_ok()
}

pub fn data_dir() -> Result<PathBuf> {
    let dir = match DATA_DIR_OVERRIDE.get() {
        Some(dir) => dir.clone(),
        None => dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?
            .join("walletchat"),
    };
    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    Ok(dir)
}

/// String-to-string map persisted as a JSON object.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Store backed by `path` with nothing loaded. Nothing is written until `set`.
    pub fn empty(path: &Path) -> Self {
        LocalStore {
            path: path.to_path_buf(),
            entries: BTreeMap::new(),
        }
    }

    /// Loads `path`, treating a missing file as empty storage.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::empty(path));
        }
        let contents = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        info!("Loaded {} local storage entries from {}", entries.len(), path.display());
        Ok(LocalStore {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn in_data_dir() -> Result<Self> {
        Self::open(&data_dir()?.join(STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.flush()?;
        }
        Ok(existed)
    }

    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

/// Any non-empty stored value counts as "already set up".
pub fn is_setup_completed(store: &LocalStore) -> bool {
    store.get(SETUP_FLAG_KEY).map_or(false, |value| !value.is_empty())
}

pub fn mark_setup_completed(store: &mut LocalStore) -> Result<()> {
    store.set(SETUP_FLAG_KEY, "true")?;
    info!("Password setup marked as completed");
    Ok(())
}

pub fn reset_setup(store: &mut LocalStore) -> Result<()> {
    if store.remove(SETUP_FLAG_KEY)? {
        warn!("Password setup flag cleared");
    }
    Ok(())
}

/// Startup facts handed to the UI shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub setup_completed: bool,
    pub network: String,
}

impl AppState {
    pub fn load(store: &LocalStore, network: Option<&str>) -> Self {
        AppState {
            setup_completed: is_setup_completed(store),
            network: network.unwrap_or(DEFAULT_NETWORK).to_string(),
        }
    }
}
