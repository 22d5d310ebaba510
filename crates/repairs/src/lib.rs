//! `werkdesk-repairs` — repair tickets and their repair orders.
//!
//! Pure domain code: the ticket/order data model, line-item arithmetic and
//! pre-save validation. Storage, querying and export live in `werkdesk-infra`.

pub mod dates;
pub mod fixtures;
pub mod line_item;
pub mod order;
pub mod ticket;
pub mod validation;

pub use line_item::{LineItem, LineItemId, balance_due, grand_total, recompute_line};
pub use order::{DEFAULT_LOCALE, DeviceType, RepairOrder};
pub use ticket::{
    IN_HOUSE_PARTNER, NewTicket, StatusCounts, Ticket, TicketId, TicketPatch, TicketStatus, partners,
    status_counts,
};
pub use validation::{validate_new_ticket, validate_repair_order, validate_ticket_patch};
