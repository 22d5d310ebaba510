use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use werkdesk_infra::{FieldFilter, SortDirection, SortKey, SortState, TicketQuery};
use werkdesk_inventory::{Part, PartFilter};
use werkdesk_repairs::{DEFAULT_LOCALE, Ticket, dates::parse_calendar_date};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// Query string of `GET /tickets`. Every field is optional; `"all"` or an
/// empty value means no constraint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TicketListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub partner: Option<String>,
    pub date: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

fn constraint(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(werkdesk_infra::query::ALL))
}

impl TicketListParams {
    pub fn into_query(self) -> Result<TicketQuery, axum::response::Response> {
        let bad_request = |msg: String| errors::json_error(StatusCode::BAD_REQUEST, "invalid_query", msg);

        let date = match constraint(&self.date) {
            Some(raw) => Some(
                parse_calendar_date(raw).ok_or_else(|| bad_request(format!("date: {raw:?} is not a date")))?,
            ),
            None => None,
        };

        let mut sort = SortState::default();
        if let Some(raw) = constraint(&self.sort) {
            let key: SortKey = raw.parse().map_err(|e| bad_request(format!("sort: {e}")))?;
            sort = SortState::new(key, SortDirection::Ascending);
        }
        if let Some(raw) = constraint(&self.direction) {
            sort.direction = raw.parse().map_err(|e| bad_request(format!("direction: {e}")))?;
        }

        Ok(TicketQuery {
            search: self.search.unwrap_or_default(),
            status: FieldFilter::from_param(self.status.as_deref()),
            partner: FieldFilter::from_param(self.partner.as_deref()),
            date,
            sort,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DraftParams {
    pub locale: Option<String>,
}

impl DraftParams {
    pub fn locale(&self) -> String {
        self.locale
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOCALE)
            .to_string()
    }
}

/// Query string of `GET /inventory/parts`.
pub type PartListParams = PartFilter;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TicketList {
    pub count: usize,
    pub tickets: Vec<Ticket>,
}

impl From<Vec<Ticket>> for TicketList {
    fn from(tickets: Vec<Ticket>) -> Self {
        Self {
            count: tickets.len(),
            tickets,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PartList {
    pub count: usize,
    pub parts: Vec<Part>,
    pub categories: Vec<String>,
    pub suppliers: Vec<String>,
}
