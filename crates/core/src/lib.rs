//! `werkdesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the shared error model, prefixed record identifiers and the lenient number
//! handling used by every money/quantity field.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::{Entity, position_of};
pub use error::{DomainError, DomainResult};
pub use id::{IdSequence, RecordId};
pub use money::{coerce_amount, format_money, lenient_amount, optional_amount};
