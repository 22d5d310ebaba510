//! Repair order: the itemized billing/service document for one device repair.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use werkdesk_core::money::lenient_amount;

use crate::dates::lenient_calendar_date;
use crate::line_item::{self, LineItem, LineItemId};
use crate::ticket::Ticket;

/// Display-language tag used when nothing else is known.
pub const DEFAULT_LOCALE: &str = "en";

/// Kind of device brought in for repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Smartphone,
    Laptop,
    Tablet,
    DesktopPc,
    GamingConsole,
    Other,
}

impl DeviceType {
    pub const ALL: [DeviceType; 6] = [
        DeviceType::Smartphone,
        DeviceType::Laptop,
        DeviceType::Tablet,
        DeviceType::DesktopPc,
        DeviceType::GamingConsole,
        DeviceType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Smartphone => "Smartphone",
            DeviceType::Laptop => "Laptop",
            DeviceType::Tablet => "Tablet",
            DeviceType::DesktopPc => "Desktop PC",
            DeviceType::GamingConsole => "Gaming Console",
            DeviceType::Other => "Other",
        }
    }

    /// Match a stored label, case-insensitively.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(label))
    }
}

impl core::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device type is stored as its label; `""` means "not chosen yet".
mod device_type_field {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DeviceType;

    pub fn serialize<S>(value: &Option<DeviceType>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.map(|t| t.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DeviceType>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(DeviceType::parse))
    }
}

/// A repair order, embedded by value in its owning [`Ticket`].
///
/// Stored records are accepted as they are: required fields may be blank and
/// numbers may be strings. Totals are recomputed by [`RepairOrder::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepairOrder {
    /// `None` when a stored order carries a blank or unreadable date.
    #[serde(deserialize_with = "lenient_calendar_date")]
    pub order_date: Option<NaiveDate>,
    pub customer_name: String,
    pub customer_phone: String,
    pub reason: String,
    #[serde(with = "device_type_field")]
    pub device_type: Option<DeviceType>,
    pub device_brand: String,
    pub device_model: String,
    pub serial_or_imei: String,
    pub device_color: String,
    pub display_code_or_password: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub estimated_cost: f64,
    #[serde(deserialize_with = "lenient_amount")]
    pub prepayment: f64,
    pub notes: String,
    #[serde(rename = "partsAndServices", alias = "lineItems")]
    line_items: Vec<LineItem>,
    pub locale: String,
}

impl Default for RepairOrder {
    fn default() -> Self {
        Self {
            order_date: None,
            customer_name: String::new(),
            customer_phone: String::new(),
            reason: String::new(),
            device_type: None,
            device_brand: String::new(),
            device_model: String::new(),
            serial_or_imei: String::new(),
            device_color: String::new(),
            display_code_or_password: String::new(),
            estimated_cost: 0.0,
            prepayment: 0.0,
            notes: String::new(),
            line_items: vec![LineItem::blank(LineItemId(1))],
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl RepairOrder {
    /// Blank order dated `order_date` with a single empty line item.
    pub fn blank(order_date: NaiveDate, locale: impl Into<String>) -> Self {
        Self {
            order_date: Some(order_date),
            locale: locale.into(),
            ..Self::default()
        }
    }

    /// Default a new order from the ticket it will belong to.
    ///
    /// The ticket's device string is split on the first space into brand and
    /// model (`"Samsung Galaxy S22"` → `"Samsung"`, `"Galaxy S22"`).
    pub fn draft_for_ticket(ticket: &Ticket, today: NaiveDate, locale: impl Into<String>) -> Self {
        let mut words = ticket.device.split_whitespace();
        let device_brand = words.next().unwrap_or_default().to_string();
        let device_model = words.collect::<Vec<_>>().join(" ");

        Self {
            customer_name: ticket.customer.clone(),
            customer_phone: ticket.phone.clone(),
            serial_or_imei: ticket.serial.clone(),
            device_brand,
            device_model,
            reason: ticket.summary.clone(),
            estimated_cost: ticket.price,
            ..Self::blank(today, locale)
        }
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn line_item(&self, id: LineItemId) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.id == id)
    }

    /// Mutable access to one line item; its setters keep `total` in sync.
    pub fn line_item_mut(&mut self, id: LineItemId) -> Option<&mut LineItem> {
        self.line_items.iter_mut().find(|item| item.id == id)
    }

    fn next_line_item_id(&self) -> LineItemId {
        let highest = self.line_items.iter().map(|item| item.id.0).max().unwrap_or(0);
        LineItemId(highest + 1)
    }

    /// Append an empty editor row and return its id.
    pub fn add_blank_line_item(&mut self) -> LineItemId {
        let id = self.next_line_item_id();
        self.line_items.push(LineItem::blank(id));
        id
    }

    /// Append a filled-in line item and return its id.
    pub fn push_line_item(&mut self, description: impl Into<String>, qty: f64, unit_price: f64) -> LineItemId {
        let id = self.next_line_item_id();
        self.line_items.push(LineItem::new(id, description, qty, unit_price));
        id
    }

    /// Remove a line item; returns whether anything was removed.
    pub fn remove_line_item(&mut self, id: LineItemId) -> bool {
        let before = self.line_items.len();
        self.line_items.retain(|item| item.id != id);
        self.line_items.len() != before
    }

    pub fn grand_total(&self) -> f64 {
        line_item::grand_total(&self.line_items)
    }

    pub fn balance_due(&self) -> f64 {
        line_item::balance_due(self.grand_total(), self.prepayment)
    }

    /// Bring a stored or edited order back in line with its invariants:
    /// totals recomputed, line item ids unique, at least one line item.
    pub fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        let mut highest = self.line_items.iter().map(|item| item.id.0).max().unwrap_or(0);

        let items = std::mem::take(&mut self.line_items);
        self.line_items = items
            .into_iter()
            .map(|mut item| {
                if !seen.insert(item.id) {
                    highest += 1;
                    item.id = LineItemId(highest);
                    seen.insert(item.id);
                }
                line_item::recompute_line(item)
            })
            .collect();

        if self.line_items.is_empty() {
            self.line_items.push(LineItem::blank(LineItemId(1)));
        }

        if self.locale.trim().is_empty() {
            self.locale = DEFAULT_LOCALE.to_string();
        }
    }

    /// Consuming variant of [`RepairOrder::normalize`].
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }
}
