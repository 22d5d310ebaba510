//! Query engine for the tickets table.
//!
//! A query is search text plus field filters and a single sort key. Applying
//! it derives a fresh, ordered list; the collection itself is never touched.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use werkdesk_core::DomainError;
use werkdesk_repairs::Ticket;

/// Filter value meaning "no constraint".
pub const ALL: &str = "all";

/// Exact-match filter on one text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldFilter {
    #[default]
    All,
    Exact(String),
}

impl FieldFilter {
    /// `"all"` (or nothing) means no constraint.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some(ALL) => FieldFilter::All,
            Some(v) => FieldFilter::Exact(v.to_string()),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Exact(expected) => expected == value,
        }
    }
}

/// Column a ticket list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Id,
    Date,
    Status,
    Partner,
    Customer,
    Phone,
    Device,
    Serial,
    Service,
    Price,
}

impl SortKey {
    fn compare(self, a: &Ticket, b: &Ticket) -> Ordering {
        match self {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
            SortKey::Partner => a.partner.cmp(&b.partner),
            SortKey::Customer => a.customer.cmp(&b.customer),
            SortKey::Phone => a.phone.cmp(&b.phone),
            SortKey::Device => a.device.cmp(&b.device),
            SortKey::Serial => a.serial.cmp(&b.serial),
            SortKey::Service => a.service.cmp(&b.service),
            SortKey::Price => a.price.total_cmp(&b.price),
        }
    }
}

impl core::str::FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" | "ticket" => Ok(SortKey::Id),
            "date" => Ok(SortKey::Date),
            "status" => Ok(SortKey::Status),
            "partner" => Ok(SortKey::Partner),
            "customer" => Ok(SortKey::Customer),
            "phone" => Ok(SortKey::Phone),
            "device" => Ok(SortKey::Device),
            "serial" => Ok(SortKey::Serial),
            "service" => Ok(SortKey::Service),
            "price" => Ok(SortKey::Price),
            _ => Err(DomainError::validation(format!("unknown sort key: {s:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl core::str::FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(DomainError::validation(format!("unknown sort direction: {s:?}"))),
        }
    }
}

/// The active `(key, direction)` pair of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    /// Newest tickets first.
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// State after the user clicks the `key` column header: the active
    /// ascending key flips to descending, anything else sorts `key` ascending.
    pub fn request(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { key, direction }
    }
}

/// Search text, filters and sort for one view of the tickets table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketQuery {
    pub search: String,
    /// Compared against the status label, so an unknown label matches nothing.
    pub status: FieldFilter,
    pub partner: FieldFilter,
    pub date: Option<NaiveDate>,
    pub sort: SortState,
}

impl TicketQuery {
    /// Case-insensitive substring match on id, customer or device. The text is
    /// used as typed, surrounding spaces included.
    fn matches_search(&self, ticket: &Ticket) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [ticket.id.as_str(), ticket.customer.as_str(), ticket.device.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.matches_search(ticket)
            && self.status.matches(ticket.status.as_str())
            && self.partner.matches(&ticket.partner)
            && self.date.is_none_or(|d| ticket.date == d)
    }

    /// Filter and sort `tickets` into a new list.
    ///
    /// The sort is stable and the direction only flips the key comparison, so
    /// tickets with equal keys keep their input order in both directions.
    pub fn apply(&self, tickets: &[Ticket]) -> Vec<Ticket> {
        let mut view: Vec<Ticket> = tickets.iter().filter(|t| self.matches(t)).cloned().collect();
        let SortState { key, direction } = self.sort;
        view.sort_by(|a, b| direction.apply(key.compare(a, b)));
        view
    }
}
