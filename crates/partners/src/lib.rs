//! Partner directory: the repair shops that submit tickets on behalf of
//! their customers.
//!
//! Pure domain logic held in memory (no IO, no HTTP, no storage).

pub mod directory;
pub mod partner;

pub use directory::PartnerDirectory;
pub use partner::{NewPartner, Partner, PartnerId, PartnerPatch, is_valid_email};
