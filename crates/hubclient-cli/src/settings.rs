//! File-backed learned settings
//!
//! Persists the learned dialect and the attached hub application as a small
//! JSON document so that the next invocation starts where this one left off.

use hubclient_core::{Dialect, SettingsStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

/// On-disk shape of the settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredSettings {
    pub dialect: Dialect,
    pub hub_application: Option<String>,
}

/// [`SettingsStore`] that writes through to a JSON file on every change
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    current: RwLock<StoredSettings>,
}

impl FileSettings {
    /// Open the settings at `path`.
    ///
    /// A missing file starts from defaults. An unreadable one is logged and
    /// also starts from defaults; it is overwritten on the next change.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current: StoredSettings = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable settings file");
                StoredSettings::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredSettings::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read settings file");
                StoredSettings::default()
            }
        };
        debug!(path = %path.display(), ?current, "Settings loaded");

        Self {
            path,
            current: RwLock::new(current),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the stored values
    pub fn snapshot(&self) -> StoredSettings {
        self.current
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Forget everything and remove the file
    pub fn reset(&self) -> hubclient_core::Result<()> {
        self.update(|s| *s = StoredSettings::default())?;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply `change` and write the result under the same lock
    fn update(&self, change: impl FnOnce(&mut StoredSettings)) -> hubclient_core::Result<()> {
        let mut guard = self
            .current
            .write()
            .map_err(|_| hubclient_core::Error::settings("settings lock poisoned", None))?;
        change(&mut *guard);
        self.persist(&guard)
    }

    fn persist(&self, settings: &StoredSettings) -> hubclient_core::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn dialect(&self) -> Dialect {
        self.snapshot().dialect
    }

    fn set_dialect(&self, dialect: Dialect) -> hubclient_core::Result<()> {
        self.update(|s| s.dialect = dialect)
    }

    fn hub_application(&self) -> Option<String> {
        self.snapshot().hub_application
    }

    fn set_hub_application(&self, host: Option<String>) -> hubclient_core::Result<()> {
        self.update(|s| s.hub_application = host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_starts_from_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = FileSettings::open(dir.path().join("settings.json"));
        assert_eq!(settings.dialect(), Dialect::Aspx);
        assert_eq!(settings.hub_application(), None);
    }

    #[test]
    fn test_changes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = FileSettings::open(&path);
        settings.set_dialect(Dialect::Jsf).unwrap();
        settings
            .set_hub_application(Some("tenant.outsystems.net".to_string()))
            .unwrap();

        let reopened = FileSettings::open(&path);
        assert_eq!(reopened.dialect(), Dialect::Jsf);
        assert_eq!(
            reopened.hub_application().as_deref(),
            Some("tenant.outsystems.net")
        );
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let settings = FileSettings::open(&path);
        assert_eq!(settings.snapshot(), StoredSettings::default());
    }

    #[test]
    fn test_reset_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let settings = FileSettings::open(&path);
        settings.set_dialect(Dialect::Jsf).unwrap();
        assert!(path.exists());

        settings.reset().unwrap();
        assert!(!path.exists());
        assert_eq!(settings.dialect(), Dialect::Aspx);
    }

    #[test]
    fn test_concurrent_changes_match_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let settings = std::sync::Arc::new(FileSettings::open(&path));

        let workers: Vec<_> = (0..8)
            .map(|i| {
                let settings = settings.clone();
                std::thread::spawn(move || {
                    for j in 0..25 {
                        settings
                            .set_hub_application(Some(format!("hub-{}-{}.example.com", i, j)))
                            .unwrap();
                        if j % 5 == 0 {
                            settings.set_dialect(Dialect::Jsf).unwrap();
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(FileSettings::open(&path).snapshot(), settings.snapshot());
    }

    #[test]
    fn test_file_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        FileSettings::open(&path).set_dialect(Dialect::Jsf).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["dialect"], "jsf");
        assert_eq!(value["hub_application"], serde_json::Value::Null);
    }
}
