//! Spare-parts inventory.
//!
//! Pure domain logic for the parts catalog: stock levels, restocking and the
//! search/filter view used by the inventory page. No IO.

pub mod catalog;
pub mod part;

pub use catalog::{InventoryStats, PartCatalog, PartFilter};
pub use part::{DEFAULT_RESTOCK, NewPart, Part, PartId, PartPatch};
