//! Editor preferences that survive restarts.
//!
//! Two values are kept: the chosen theme and whether recommendations are
//! shown. Losing them is harmless, so the store never reports failure to
//! its callers; problems are logged and the defaults used instead.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::theme::{Appearance, ThemeId};

/// The persisted editor preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preference {
    pub theme_id: ThemeId,
    pub recommendations_enabled: bool,
}

impl Preference {
    /// What a fresh install starts with.
    pub fn default_for(ambient: Appearance) -> Self {
        Self {
            theme_id: ambient.default_theme(),
            recommendations_enabled: true,
        }
    }
}

/// Durable storage for [`Preference`].
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored preference, or the default when nothing usable is
    /// stored.
    fn load(&self) -> Preference;

    /// Stores `pref`. The next `load` returns it, even if writing it out
    /// failed.
    fn save(&self, pref: &Preference);
}

/// Opens the file store in the platform config directory, or an in-memory
/// store when the platform has none.
pub fn open_default(ambient: Appearance) -> Box<dyn PreferenceStore> {
    match dirs::config_dir() {
        Some(dir) => Box::new(FilePreferenceStore::new(
            dir.join("pylearn").join("preferences.toml"),
            ambient,
        )),
        None => {
            tracing::warn!("No config directory, preferences will not persist");
            Box::new(MemoryPreferenceStore::new(ambient))
        }
    }
}

/// Preference store backed by a small TOML file.
///
/// ```toml
/// theme = "nord"
/// recommendations_enabled = false
/// ```
///
/// Each key is read on its own, so a bad theme id does not throw away the
/// recommendations flag.
pub struct FilePreferenceStore {
    path: PathBuf,
    ambient: Appearance,
    cache: RwLock<Option<Preference>>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>, ambient: Appearance) -> Self {
        Self {
            path: path.into(),
            ambient,
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Preference {
        let default = Preference::default_for(self.ambient);

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return default,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                return default;
            }
        };

        let table: toml::Table = match content.parse() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", self.path.display(), e);
                return default;
            }
        };

        let theme_id = table
            .get("theme")
            .and_then(toml::Value::as_str)
            .map(|id| ThemeId::parse_or_default(id, self.ambient))
            .unwrap_or(default.theme_id);
        let recommendations_enabled = table
            .get("recommendations_enabled")
            .and_then(toml::Value::as_bool)
            .unwrap_or(default.recommendations_enabled);

        Preference {
            theme_id,
            recommendations_enabled,
        }
    }

    fn write_file(&self, pref: &Preference) -> std::io::Result<()> {
        let mut table = toml::Table::new();
        table.insert("theme".into(), pref.theme_id.as_str().into());
        table.insert(
            "recommendations_enabled".into(),
            pref.recommendations_enabled.into(),
        );

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, table.to_string())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Preference {
        if let Some(pref) = *self.cache.read().unwrap_or_else(|e| e.into_inner()) {
            return pref;
        }

        let pref = self.read_file();
        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = Some(pref);
        pref
    }

    fn save(&self, pref: &Preference) {
        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = Some(*pref);

        if let Err(e) = self.write_file(pref) {
            tracing::warn!("Failed to save preferences to {}: {}", self.path.display(), e);
        }
    }
}

/// Preference store that lives as long as the process.
pub struct MemoryPreferenceStore {
    ambient: Appearance,
    value: RwLock<Option<Preference>>,
}

impl MemoryPreferenceStore {
    pub fn new(ambient: Appearance) -> Self {
        Self {
            ambient,
            value: RwLock::new(None),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Preference {
        let stored = *self.value.read().unwrap_or_else(|e| e.into_inner());
        stored.unwrap_or_else(|| Preference::default_for(self.ambient))
    }

    fn save(&self, pref: &Preference) {
        *self.value.write().unwrap_or_else(|e| e.into_inner()) = Some(*pref);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NORD_OFF: Preference = Preference {
        theme_id: ThemeId::Nord,
        recommendations_enabled: false,
    };

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryPreferenceStore::new(Appearance::Dark);
        assert_eq!(
            store.load(),
            Preference {
                theme_id: ThemeId::OneDark,
                recommendations_enabled: true,
            }
        );

        store.save(&NORD_OFF);
        assert_eq!(store.load(), NORD_OFF);
    }

    #[test]
    fn test_pristine_file_store_uses_ambient_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.toml"), Appearance::Light);
        assert_eq!(store.load(), Preference::default_for(Appearance::Light));
        assert_eq!(store.load().theme_id, ThemeId::GithubLight);
    }

    #[test]
    fn test_file_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("prefs.toml");

        let store = FilePreferenceStore::new(&path, Appearance::Dark);
        store.save(&NORD_OFF);
        assert_eq!(store.load(), NORD_OFF);

        let reopened = FilePreferenceStore::new(&path, Appearance::Dark);
        assert_eq!(reopened.load(), NORD_OFF);
    }

    #[test]
    fn test_unknown_theme_keeps_other_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "theme = \"monokai\"\nrecommendations_enabled = false\n").unwrap();

        let store = FilePreferenceStore::new(&path, Appearance::Dark);
        assert_eq!(
            store.load(),
            Preference {
                theme_id: ThemeId::OneDark,
                recommendations_enabled: false,
            }
        );
    }

    #[test]
    fn test_malformed_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "theme = [unterminated").unwrap();

        let store = FilePreferenceStore::new(&path, Appearance::Dark);
        assert_eq!(store.load(), Preference::default_for(Appearance::Dark));
    }

    #[test]
    fn test_failed_write_is_swallowed_but_visible() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the write fail.
        let path = dir.path().join("prefs.toml");
        std::fs::create_dir(&path).unwrap();

        let store = FilePreferenceStore::new(&path, Appearance::Dark);
        store.save(&NORD_OFF);
        assert_eq!(store.load(), NORD_OFF);
    }
}
