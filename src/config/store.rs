use crate::config::ConfigError;
use crate::shared::fs_atomic::atomic_write_file;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// Typed accessor over the persisted section/key store. The store owns the
/// on-disk representation exclusively; engines receive an instance instead of
/// reaching for ambient global state. Values are kept as strings, matching
/// the persisted format.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    backup_path: PathBuf,
    sections: Sections,
}

fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("config.yaml"));
    name.push(".backup");
    path.with_file_name(name)
}

fn read_sections(path: &Path) -> Result<Sections, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

impl ConfigStore {
    /// Loads the store from `path` when the file exists; a missing file is an
    /// empty store, not an error.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        let sections = if path.exists() {
            read_sections(path)?
        } else {
            Sections::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            backup_path: backup_path_for(path),
            sections,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, section: &str, key: &str, fallback: &'a str) -> &'a str {
        self.get(section, key).unwrap_or(fallback)
    }

    pub fn get_int_or(&self, section: &str, key: &str, fallback: i64) -> i64 {
        self.get(section, key)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(fallback)
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Stages a value in memory; the section is created when absent. Nothing
    /// reaches disk until `commit`.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Copies the live file to the backup path iff one exists, then writes the
    /// staged state atomically. A failed commit aborts the current operation
    /// only; the process keeps running.
    pub fn commit(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
        if self.path.exists() {
            fs::copy(&self.path, &self.backup_path).map_err(|source| ConfigError::Backup {
                path: self.backup_path.display().to_string(),
                source,
            })?;
        }
        let body = serde_yaml::to_string(&self.sections).map_err(|source| ConfigError::Encode {
            path: self.path.display().to_string(),
            source,
        })?;
        atomic_write_file(&self.path, body.as_bytes()).map_err(|source| ConfigError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Copies the backup over the live path and reloads. Single-generation
    /// undo: only the state as of the previous commit can be recovered.
    pub fn restore_backup(&mut self) -> Result<(), ConfigError> {
        if !self.backup_path.exists() {
            return Err(ConfigError::MissingBackup {
                path: self.backup_path.display().to_string(),
            });
        }
        fs::copy(&self.backup_path, &self.path).map_err(|source| ConfigError::Backup {
            path: self.path.display().to_string(),
            source,
        })?;
        self.sections = read_sections(&self.path)?;
        Ok(())
    }

    /// Discards staged state and re-reads the file.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.sections = if self.path.exists() {
            read_sections(&self.path)?
        } else {
            Sections::new()
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store(temp: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::open(&temp.path().join("config.yaml")).expect("open store")
    }

    #[test]
    fn missing_file_opens_empty_and_get_falls_back() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = open_store(&temp);
        assert_eq!(store.get("GENERAL", "cantidad_chats"), None);
        assert_eq!(store.get_or("GENERAL", "cantidad_chats", "2"), "2");
        assert_eq!(store.get_int_or("GENERAL", "cantidad_chats", 2), 2);
    }

    #[test]
    fn set_commit_and_reopen_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        store.set("GENERAL", "cantidad_chats", "3");
        store.set("PLANTILLAS", "chat_1_tipo", "Frontend");
        store.commit().expect("commit");

        let reopened = open_store(&temp);
        assert_eq!(reopened.get("GENERAL", "cantidad_chats"), Some("3"));
        assert_eq!(reopened.get("PLANTILLAS", "chat_1_tipo"), Some("Frontend"));
        assert_eq!(reopened.get_int_or("GENERAL", "cantidad_chats", 2), 3);
    }

    #[test]
    fn first_commit_writes_no_backup() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        store.set("GENERAL", "cantidad_chats", "2");
        store.commit().expect("commit");
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn backup_holds_exactly_one_prior_generation() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        store.set("GENERAL", "cantidad_chats", "2");
        store.commit().expect("first commit");
        store.set("GENERAL", "cantidad_chats", "4");
        store.commit().expect("second commit");
        store.set("GENERAL", "cantidad_chats", "6");
        store.commit().expect("third commit");

        store.restore_backup().expect("restore");
        assert_eq!(store.get("GENERAL", "cantidad_chats"), Some("4"));
    }

    #[test]
    fn restore_without_backup_fails_typed() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut store = open_store(&temp);
        let err = store.restore_backup().expect_err("no backup yet");
        assert!(matches!(err, ConfigError::MissingBackup { .. }));
    }
}
