//! Persisted light/dark preference.

use crate::config::config_dir;
use crate::error::{MjcError, Result};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Storage key holding the theme preference.
pub const THEME_KEY: &str = "theme";

const PREFERENCES_FILENAME: &str = "preferences.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Parse a stored value. Anything other than `"dark"` reads as light.
    pub fn from_stored(value: &str) -> Self {
        match value.trim() {
            "dark" => ThemePreference::Dark,
            _ => ThemePreference::Light,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Label for the toggle control: names the theme a press switches to.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            ThemePreference::Light => "Dark mode",
            ThemePreference::Dark => "Light mode",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal key/value persistence.
pub trait PreferenceStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: PreferenceStorage + ?Sized> PreferenceStorage for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Preferences kept in `~/.config/mjc/preferences.toml`.
pub struct PreferenceFile {
    path: PathBuf,
}

impl PreferenceFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The default preferences file under the config directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(config_dir()?.join(PREFERENCES_FILENAME)))
    }

    fn read_all(&self) -> Result<toml::Table> {
        if !self.path.exists() {
            return Ok(toml::Table::new());
        }
        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            MjcError::Preferences(format!("Failed to parse {:?}: {}", self.path, e))
        })
    }
}

impl PreferenceStorage for PreferenceFile {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(values) => values.get(key).and_then(|v| v.as_str()).map(str::to_string),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable preferences");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Other keys, whatever their type, are written back untouched.
        let mut values = self.read_all()?;
        values.insert(key.to_string(), toml::Value::String(value.to_string()));
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(&values)
            .map_err(|e| MjcError::Preferences(format!("Failed to encode preferences: {}", e)))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Volatile storage that forgets everything on drop.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Owns the theme preference and keeps it in sync with storage.
pub struct ThemePreferenceStore<S: PreferenceStorage> {
    storage: S,
    current: ThemePreference,
}

impl<S: PreferenceStorage> ThemePreferenceStore<S> {
    /// Read the stored preference, defaulting to light.
    pub fn load(storage: S) -> Self {
        let current = storage
            .get(THEME_KEY)
            .map(|v| ThemePreference::from_stored(&v))
            .unwrap_or_default();
        Self { storage, current }
    }

    pub fn current(&self) -> ThemePreference {
        self.current
    }

    /// Flip the preference, persist it and return the new value.
    ///
    /// The in-memory value only changes once the write succeeded.
    pub fn toggle(&mut self) -> Result<ThemePreference> {
        let next = self.current.toggled();
        self.storage.set(THEME_KEY, next.as_str())?;
        self.current = next;
        tracing::info!(theme = %next, "theme preference changed");
        Ok(next)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_to_light() {
        let store = ThemePreferenceStore::load(MemoryStorage::default());
        assert_eq!(store.current(), ThemePreference::Light);
    }

    #[test]
    fn test_load_reads_dark() {
        let mut storage = MemoryStorage::default();
        storage.set(THEME_KEY, "dark").unwrap();
        let store = ThemePreferenceStore::load(storage);
        assert_eq!(store.current(), ThemePreference::Dark);
    }

    #[test]
    fn test_unknown_stored_value_reads_light() {
        assert_eq!(ThemePreference::from_stored("solarized"), ThemePreference::Light);
    }

    #[test]
    fn test_toggle_persists_new_value() {
        let mut store = ThemePreferenceStore::load(MemoryStorage::default());
        assert_eq!(store.toggle().unwrap(), ThemePreference::Dark);
        assert_eq!(store.storage().get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_toggle_twice_restores_original() {
        let mut store = ThemePreferenceStore::load(MemoryStorage::default());
        store.toggle().unwrap();
        store.toggle().unwrap();
        assert_eq!(store.current(), ThemePreference::Light);
        assert_eq!(store.storage().get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_toggle_labels() {
        assert_eq!(ThemePreference::Light.toggle_label(), "Dark mode");
        assert_eq!(ThemePreference::Dark.toggle_label(), "Light mode");
    }

    #[test]
    fn test_preference_file_survives_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(PREFERENCES_FILENAME);

        let mut store = ThemePreferenceStore::load(PreferenceFile::new(path.clone()));
        store.toggle().unwrap();

        let reloaded = ThemePreferenceStore::load(PreferenceFile::new(path.clone()));
        assert_eq!(reloaded.current(), ThemePreference::Dark);
        assert_eq!(fs::read_to_string(path).unwrap().trim(), r#"theme = "dark""#);
    }

    #[test]
    fn test_preference_file_keeps_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(PREFERENCES_FILENAME);
        fs::write(&path, "font = \"mono\"\n").unwrap();

        let mut file = PreferenceFile::new(path);
        file.set(THEME_KEY, "dark").unwrap();

        assert_eq!(file.get("font").as_deref(), Some("mono"));
        assert_eq!(file.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_preference_file_reads_as_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(PREFERENCES_FILENAME);
        fs::write(&path, "theme = [").unwrap();

        let store = ThemePreferenceStore::load(PreferenceFile::new(path));
        assert_eq!(store.current(), ThemePreference::Light);
    }

    #[test]
    fn test_toggle_keeps_non_string_preferences() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(PREFERENCES_FILENAME);
        fs::write(&path, "font_size = 14\ntheme = \"light\"\n").unwrap();

        let mut store = ThemePreferenceStore::load(PreferenceFile::new(path.clone()));
        assert_eq!(store.toggle().unwrap(), ThemePreference::Dark);

        let saved: toml::Table = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.get("font_size").and_then(|v| v.as_integer()), Some(14));
        assert_eq!(saved.get(THEME_KEY).and_then(|v| v.as_str()), Some("dark"));
    }

    #[test]
    fn test_toggle_refuses_to_overwrite_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(PREFERENCES_FILENAME);
        fs::write(&path, "theme = [").unwrap();

        let mut store = ThemePreferenceStore::load(PreferenceFile::new(path.clone()));
        assert!(matches!(store.toggle(), Err(MjcError::Preferences(_))));
        assert_eq!(store.current(), ThemePreference::Light);
        assert_eq!(fs::read_to_string(path).unwrap(), "theme = [");
    }
}
