//! Persisted UI preferences (boolean flags such as dark mode).

use crate::error::{GridError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the dark-mode flag
pub const DARK_MODE_KEY: &str = "datagrid.darkMode";

/// Key/value storage for boolean preferences
pub trait PreferenceStore {
    fn get_flag(&self, key: &str) -> Option<bool>;
    fn set_flag(&mut self, key: &str, value: bool) -> Result<()>;
}

/// Dark mode is off unless stored otherwise
pub fn dark_mode(prefs: &dyn PreferenceStore) -> bool {
    prefs.get_flag(DARK_MODE_KEY).unwrap_or(false)
}

pub fn set_dark_mode(prefs: &mut dyn PreferenceStore, enabled: bool) -> Result<()> {
    prefs.set_flag(DARK_MODE_KEY, enabled)
}

/// Flip dark mode and return the new value
pub fn toggle_dark_mode(prefs: &mut dyn PreferenceStore) -> Result<bool> {
    let enabled = !dark_mode(prefs);
    set_dark_mode(prefs, enabled)?;
    Ok(enabled)
}

/// Preferences that live only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    flags: BTreeMap<String, bool>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_flag(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }

    fn set_flag(&mut self, key: &str, value: bool) -> Result<()> {
        self.flags.insert(key.to_string(), value);
        Ok(())
    }
}

/// Preferences stored as a JSON object of flags, written through on every
/// change.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
    flags: BTreeMap<String, bool>,
}

impl JsonFilePreferences {
    /// Load from `path`. A missing file starts empty; an unreadable or
    /// malformed one is reported and replaced on the next write.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let flags = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed preferences");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read preferences");
                BTreeMap::new()
            }
        };
        Self { path, flags }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.flags)
            .map_err(|e| GridError::Preferences(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get_flag(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }

    fn set_flag(&mut self, key: &str, value: bool) -> Result<()> {
        self.flags.insert(key.to_string(), value);
        self.save()
    }
}
