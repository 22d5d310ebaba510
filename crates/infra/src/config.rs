//! Configuration loading and representation.
//!
//! Settings come from `WERKDESK_*` environment variables; every one of them
//! has a default so a bare `werkdesk-api` starts with file storage in the
//! user's data directory.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::export::CompanyProfile;
use crate::persistence::{
    DEFAULT_STORAGE_KEY, FileKeyValueStore, InMemoryKeyValueStore, KeyValuePersistence,
    PersistenceError, PersistencePort,
};

pub const ENV_BIND_ADDR: &str = "WERKDESK_BIND_ADDR";
pub const ENV_STORAGE: &str = "WERKDESK_STORAGE";
pub const ENV_DATA_DIR: &str = "WERKDESK_DATA_DIR";
pub const ENV_STORAGE_KEY: &str = "WERKDESK_STORAGE_KEY";
pub const ENV_COMPANY_NAME: &str = "WERKDESK_COMPANY_NAME";
pub const ENV_COMPANY_ADDRESS: &str = "WERKDESK_COMPANY_ADDRESS";
pub const ENV_COMPANY_CONTACT: &str = "WERKDESK_COMPANY_CONTACT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value:?}")]
    InvalidBindAddr { var: &'static str, value: String },

    #[error("{var} must be 'file' or 'memory', got {value:?}")]
    InvalidStorage { var: &'static str, value: String },

    #[error("no data directory: set {0}")]
    NoDataDir(&'static str),
}

/// Where the ticket collection is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per key under `data_dir`.
    File,
    /// Process memory; lost on exit.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub company: CompanyProfile,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key → value lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::InvalidBindAddr {
            var: ENV_BIND_ADDR,
            value: bind_raw.clone(),
        })?;

        let storage = match get(ENV_STORAGE).as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("file") => StorageBackend::File,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidStorage {
                    var: ENV_STORAGE,
                    value: other.to_string(),
                });
            }
        };

        let data_dir = match get(ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|dir| dir.join("werkdesk"))
                .ok_or(ConfigError::NoDataDir(ENV_DATA_DIR))?,
        };

        let storage_key = get(ENV_STORAGE_KEY).unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());

        let defaults = CompanyProfile::default();
        let company = CompanyProfile {
            name: get(ENV_COMPANY_NAME).unwrap_or(defaults.name),
            address: get(ENV_COMPANY_ADDRESS).unwrap_or(defaults.address),
            contact: get(ENV_COMPANY_CONTACT).unwrap_or(defaults.contact),
        };

        Ok(Self {
            bind_addr,
            storage,
            data_dir,
            storage_key,
            company,
        })
    }

    /// In-memory settings for tests and demos.
    pub fn in_memory() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            storage: StorageBackend::Memory,
            data_dir: PathBuf::new(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            company: CompanyProfile::default(),
        }
    }

    /// Open the configured persistence backend.
    pub fn open_persistence(&self) -> Result<Box<dyn PersistencePort>, PersistenceError> {
        Ok(match self.storage {
            StorageBackend::Memory => Box::new(KeyValuePersistence::new(
                InMemoryKeyValueStore::new(),
                self.storage_key.clone(),
            )),
            StorageBackend::File => Box::new(KeyValuePersistence::new(
                FileKeyValueStore::open(&self.data_dir)?,
                self.storage_key.clone(),
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = settings(&[(ENV_DATA_DIR, "/var/lib/werkdesk")]).unwrap();
        assert_eq!(s.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(s.storage, StorageBackend::File);
        assert_eq!(s.data_dir, PathBuf::from("/var/lib/werkdesk"));
        assert_eq!(s.storage_key, "werkdeskTickets");
        assert_eq!(s.company, CompanyProfile::default());
    }

    #[test]
    fn overrides_are_read() {
        let s = settings(&[
            (ENV_BIND_ADDR, "127.0.0.1:9000"),
            (ENV_STORAGE, "Memory"),
            (ENV_DATA_DIR, "/tmp/wd"),
            (ENV_STORAGE_KEY, "shopTickets"),
            (ENV_COMPANY_NAME, "Fixit GmbH"),
            (ENV_COMPANY_CONTACT, "  "),
        ])
        .unwrap();
        assert_eq!(s.bind_addr.port(), 9000);
        assert_eq!(s.storage, StorageBackend::Memory);
        assert_eq!(s.storage_key, "shopTickets");
        assert_eq!(s.company.name, "Fixit GmbH");
        assert_eq!(s.company.contact, CompanyProfile::default().contact);
    }

    #[test]
    fn blank_storage_key_falls_back_to_default() {
        let s = settings(&[(ENV_DATA_DIR, "/tmp/wd"), (ENV_STORAGE_KEY, "   ")]).unwrap();
        assert_eq!(s.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            settings(&[(ENV_BIND_ADDR, "localhost"), (ENV_DATA_DIR, "/tmp")]),
            Err(ConfigError::InvalidBindAddr { .. })
        ));
        assert!(matches!(
            settings(&[(ENV_STORAGE, "redis"), (ENV_DATA_DIR, "/tmp")]),
            Err(ConfigError::InvalidStorage { .. })
        ));
    }

    #[test]
    fn file_persistence_opens_in_data_dir() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("werkdesk");
        let s = settings(&[(ENV_DATA_DIR, dir.to_str().unwrap())]).unwrap();

        let port = s.open_persistence().unwrap();
        assert!(port.load().unwrap().is_none());
        port.save(&[]).unwrap();
        assert!(dir.join("werkdeskTickets.json").exists());
    }
}
