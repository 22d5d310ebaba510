//! Billable line items and the totals derived from them.
//!
//! A line item's `total` is never set directly: every change to `qty` or
//! `unit_price` goes through a setter that recomputes it, so
//! `total == qty * unit_price` holds whenever the item is observable.

use serde::{Deserialize, Serialize};

use werkdesk_core::money::{coerce_amount, lenient_amount, non_negative};

/// Identifier of a line item, unique within its repair order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(pub u64);

impl core::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One billable part or service entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineItemId,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    qty: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    unit_price: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    total: f64,
}

impl LineItem {
    pub fn new(id: LineItemId, description: impl Into<String>, qty: f64, unit_price: f64) -> Self {
        recompute_line(Self {
            id,
            description: description.into(),
            qty,
            unit_price,
            total: 0.0,
        })
    }

    /// A fresh editor row: empty description, quantity 1, price 0.
    pub fn blank(id: LineItemId) -> Self {
        Self::new(id, "", 1.0, 0.0)
    }

    pub fn qty(&self) -> f64 {
        self.qty
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn set_qty(&mut self, qty: f64) {
        self.qty = non_negative(qty);
        self.total = line_total(self.qty, self.unit_price);
    }

    pub fn set_unit_price(&mut self, unit_price: f64) {
        self.unit_price = non_negative(unit_price);
        self.total = line_total(self.qty, self.unit_price);
    }

    /// Set the quantity from raw form text; non-numeric text counts as 0.
    pub fn set_qty_text(&mut self, raw: &str) {
        self.set_qty(coerce_amount(raw));
    }

    /// Set the unit price from raw form text; non-numeric text counts as 0.
    pub fn set_unit_price_text(&mut self, raw: &str) {
        self.set_unit_price(coerce_amount(raw));
    }
}

fn line_total(qty: f64, unit_price: f64) -> f64 {
    non_negative(qty) * non_negative(unit_price)
}

/// Re-derive `total` from `qty` and `unit_price`, clamping both to `>= 0`.
///
/// Never fails: NaN and infinities are treated as 0.
pub fn recompute_line(mut item: LineItem) -> LineItem {
    item.qty = non_negative(item.qty);
    item.unit_price = non_negative(item.unit_price);
    item.total = line_total(item.qty, item.unit_price);
    item
}

/// Sum of all line totals; an empty list yields 0.
pub fn grand_total(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::total).sum()
}

/// Grand total minus prepayment. Not clamped: a negative value means the
/// customer has overpaid.
pub fn balance_due(grand_total: f64, prepayment: f64) -> f64 {
    grand_total - prepayment
}
