//! Persistence boundary for the ticket collection.
//!
//! The store talks to a narrow [`PersistencePort`] (`load` / `save` of the whole
//! collection). The shipped port keeps the collection as one JSON array under
//! one fixed key of a [`KeyValueStore`], so the local stand-in can later be
//! swapped for a real database without touching the store.

pub mod kv;
pub mod port;

pub use kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
pub use port::{KeyValuePersistence, PersistenceError, PersistencePort};

/// Key the ticket collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "werkdeskTickets";
