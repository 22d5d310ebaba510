//! Infrastructure layer: persistence backends, the ticket store, the query
//! engine, exports and configuration.

pub mod config;
pub mod export;
pub mod persistence;
pub mod query;
pub mod store;

pub use config::{ConfigError, Settings, StorageBackend};
pub use persistence::{PersistenceError, PersistencePort};
pub use query::{FieldFilter, SortDirection, SortKey, SortState, TicketQuery};
pub use store::{RepairOrderStore, StoreError};
