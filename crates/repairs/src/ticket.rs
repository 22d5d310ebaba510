//! Tickets: the tracking record for a customer's repair request.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use werkdesk_core::money::{lenient_amount, optional_amount};
use werkdesk_core::{DomainError, Entity};

use crate::dates::{calendar_date, optional_calendar_date};
use crate::order::RepairOrder;

werkdesk_core::record_id!(
    /// Ticket identifier (`T001`, `T002`, ...).
    TicketId,
    "T"
);

/// Partner recorded on tickets created in-house.
pub const IN_HOUSE_PARTNER: &str = "Self (Admin)";

/// Ticket status lifecycle.
///
/// Nominal flow is `New → In Progress → Ready for Pickup`, with `Cancelled`
/// reachable from anywhere. Transitions are not enforced: staff may set any
/// status from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    New,
    InProgress,
    ReadyForPickup,
    Cancelled,
}

impl TicketStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::New,
        TicketStatus::InProgress,
        TicketStatus::ReadyForPickup,
        TicketStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::ReadyForPickup => "Ready for Pickup",
            TicketStatus::Cancelled => "Cancelled",
        }
    }
}

impl core::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for TicketStatus {
    type Err = DomainError;

    /// Accepts display labels as well as `in_progress` / `InProgress` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "new" => Ok(TicketStatus::New),
            "inprogress" => Ok(TicketStatus::InProgress),
            "readyforpickup" => Ok(TicketStatus::ReadyForPickup),
            "cancelled" | "canceled" => Ok(TicketStatus::Cancelled),
            _ => Err(DomainError::validation(format!("unknown ticket status: {s:?}"))),
        }
    }
}

impl Serialize for TicketStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TicketStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Ticket record as shown in the tickets table.
///
/// The repair order, once drafted, is embedded by value: editing one ticket's
/// order never touches another ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    #[serde(deserialize_with = "calendar_date")]
    pub date: NaiveDate,
    pub status: TicketStatus,
    #[serde(default)]
    pub partner: String,
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub service: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub repair_order_data: Option<RepairOrder>,
}

impl Entity for Ticket {
    type Id = TicketId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Fields supplied when opening a new ticket.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTicket {
    pub customer: String,
    pub phone: String,
    pub device: String,
    pub serial: String,
    pub service: String,
    #[serde(deserialize_with = "optional_amount")]
    pub price: Option<f64>,
    pub summary: String,
    pub partner: Option<String>,
    #[serde(deserialize_with = "optional_calendar_date")]
    pub date: Option<NaiveDate>,
    pub status: Option<TicketStatus>,
}

/// Partial update of a ticket's own fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketPatch {
    #[serde(deserialize_with = "optional_calendar_date")]
    pub date: Option<NaiveDate>,
    pub status: Option<TicketStatus>,
    pub partner: Option<String>,
    pub customer: Option<String>,
    pub phone: Option<String>,
    pub device: Option<String>,
    pub serial: Option<String>,
    pub service: Option<String>,
    #[serde(deserialize_with = "optional_amount")]
    pub price: Option<f64>,
    pub summary: Option<String>,
}

impl TicketPatch {
    pub fn status(status: TicketStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Ticket {
    /// Open a ticket: dated `today` unless a date was given, status `New`
    /// unless one was given, partner defaults to in-house.
    pub fn open(id: TicketId, new: NewTicket, today: NaiveDate) -> Self {
        Self {
            id,
            date: new.date.unwrap_or(today),
            status: new.status.unwrap_or(TicketStatus::New),
            partner: new
                .partner
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| IN_HOUSE_PARTNER.to_string()),
            customer: new.customer,
            phone: new.phone,
            device: new.device,
            serial: new.serial,
            service: new.service,
            price: new.price.unwrap_or(0.0),
            summary: new.summary,
            repair_order_data: None,
        }
    }

    /// Set the status. Any status may follow any other.
    pub fn set_status(&mut self, status: TicketStatus) {
        self.status = status;
    }

    pub fn apply_patch(&mut self, patch: &TicketPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(status) = patch.status {
            self.set_status(status);
        }
        let fields = [
            (&mut self.partner, &patch.partner),
            (&mut self.customer, &patch.customer),
            (&mut self.phone, &patch.phone),
            (&mut self.device, &patch.device),
            (&mut self.serial, &patch.serial),
            (&mut self.service, &patch.service),
            (&mut self.summary, &patch.summary),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value.clone();
            }
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }

    /// Embed `order` and mirror its customer, phone, price and summary onto
    /// the ticket so the table view stays consistent. Blank (or zero) order
    /// values keep the ticket's current value.
    pub fn attach_repair_order(&mut self, order: RepairOrder) {
        if !order.customer_name.trim().is_empty() {
            self.customer = order.customer_name.clone();
        }
        if !order.customer_phone.trim().is_empty() {
            self.phone = order.customer_phone.clone();
        }
        if order.estimated_cost != 0.0 {
            self.price = order.estimated_cost;
        }
        if !order.reason.trim().is_empty() {
            self.summary = order.reason.clone();
        }
        self.repair_order_data = Some(order);
    }

    pub fn repair_order(&self) -> Option<&RepairOrder> {
        self.repair_order_data.as_ref()
    }
}

/// Number of tickets per status, every status present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    #[serde(rename = "New")]
    pub new: usize,
    #[serde(rename = "In Progress")]
    pub in_progress: usize,
    #[serde(rename = "Ready for Pickup")]
    pub ready_for_pickup: usize,
    #[serde(rename = "Cancelled")]
    pub cancelled: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TicketStatus) -> usize {
        match status {
            TicketStatus::New => self.new,
            TicketStatus::InProgress => self.in_progress,
            TicketStatus::ReadyForPickup => self.ready_for_pickup,
            TicketStatus::Cancelled => self.cancelled,
        }
    }

    pub fn total(&self) -> usize {
        TicketStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

pub fn status_counts(tickets: &[Ticket]) -> StatusCounts {
    tickets.iter().fold(StatusCounts::default(), |mut acc, t| {
        match t.status {
            TicketStatus::New => acc.new += 1,
            TicketStatus::InProgress => acc.in_progress += 1,
            TicketStatus::ReadyForPickup => acc.ready_for_pickup += 1,
            TicketStatus::Cancelled => acc.cancelled += 1,
        }
        acc
    })
}

/// Distinct non-blank partners, sorted, for filter choices.
pub fn partners(tickets: &[Ticket]) -> Vec<String> {
    tickets
        .iter()
        .map(|t| t.partner.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
