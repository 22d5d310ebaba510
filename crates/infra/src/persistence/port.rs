use std::sync::Arc;

use thiserror::Error;
use werkdesk_repairs::Ticket;

use super::kv::KeyValueStore;

/// Persistence operation error.
///
/// These are **infrastructure errors** (I/O, encoding, corrupt payloads) as
/// opposed to domain errors (validation). They are surfaced to the caller and
/// never retried here.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage i/o failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode collection for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored payload under key '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage backend unavailable: {0}")]
    Backend(String),
}

/// Whole-collection persistence for tickets.
///
/// `load` returns `Ok(None)` when nothing has been stored yet, which is how the
/// store knows to seed its fixtures. `save` replaces the stored collection
/// wholesale: there are no deltas and no version checks, so with several
/// writers the last full snapshot wins.
///
/// Next to the collection the port records the highest ticket sequence number
/// ever issued, so ids of deleted tickets are not handed out again after a
/// restart.
pub trait PersistencePort: Send + Sync {
    fn load(&self) -> Result<Option<Vec<Ticket>>, PersistenceError>;

    fn save(&self, tickets: &[Ticket]) -> Result<(), PersistenceError>;

    /// `Ok(None)` when no id has been issued through this backend yet.
    fn load_high_water(&self) -> Result<Option<u64>, PersistenceError>;

    fn save_high_water(&self, issued: u64) -> Result<(), PersistenceError>;
}

impl<P> PersistencePort for Arc<P>
where
    P: PersistencePort + ?Sized,
{
    fn load(&self) -> Result<Option<Vec<Ticket>>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, tickets: &[Ticket]) -> Result<(), PersistenceError> {
        (**self).save(tickets)
    }

    fn load_high_water(&self) -> Result<Option<u64>, PersistenceError> {
        (**self).load_high_water()
    }

    fn save_high_water(&self, issued: u64) -> Result<(), PersistenceError> {
        (**self).save_high_water(issued)
    }
}

impl<P> PersistencePort for Box<P>
where
    P: PersistencePort + ?Sized,
{
    fn load(&self) -> Result<Option<Vec<Ticket>>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, tickets: &[Ticket]) -> Result<(), PersistenceError> {
        (**self).save(tickets)
    }

    fn load_high_water(&self) -> Result<Option<u64>, PersistenceError> {
        (**self).load_high_water()
    }

    fn save_high_water(&self, issued: u64) -> Result<(), PersistenceError> {
        (**self).save_high_water(issued)
    }
}

/// [`PersistencePort`] keeping the collection as one JSON array under one key.
///
/// The id high-water mark lives under `{key}.seq` in the same store.
#[derive(Debug, Clone)]
pub struct KeyValuePersistence<S> {
    store: S,
    key: String,
    seq_key: String,
}

impl<S: KeyValueStore> KeyValuePersistence<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            store,
            seq_key: format!("{key}.seq"),
            key,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> PersistencePort for KeyValuePersistence<S> {
    fn load(&self) -> Result<Option<Vec<Ticket>>, PersistenceError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| PersistenceError::Corrupt {
                key: self.key.clone(),
                source,
            })
    }

    fn save(&self, tickets: &[Ticket]) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(tickets).map_err(|source| PersistenceError::Encode {
            key: self.key.clone(),
            source,
        })?;
        self.store.set(&self.key, &raw)
    }

    fn load_high_water(&self) -> Result<Option<u64>, PersistenceError> {
        let Some(raw) = self.store.get(&self.seq_key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| PersistenceError::Corrupt {
                key: self.seq_key.clone(),
                source,
            })
    }

    fn save_high_water(&self, issued: u64) -> Result<(), PersistenceError> {
        self.store.set(&self.seq_key, &issued.to_string())
    }
}
