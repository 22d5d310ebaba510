use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Local;

use werkdesk_infra::export::tickets_to_csv;
use werkdesk_repairs::{NewTicket, RepairOrder, TicketId, TicketPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_tickets).post(create_ticket))
        .route("/stats", get(ticket_stats))
        .route("/partners", get(list_partners))
        .route("/export.csv", get(export_tickets))
        .route(
            "/:id",
            get(get_ticket).patch(update_ticket).delete(delete_ticket),
        )
        .route("/:id/repair-order/draft", get(draft_repair_order))
        .route("/:id/repair-order", axum::routing::put(save_repair_order))
        .route("/:id/repair-order/print", get(print_repair_order))
}

pub async fn list_tickets(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::TicketListParams>,
) -> axum::response::Response {
    let query = match params.into_query() {
        Ok(q) => q,
        Err(resp) => return resp,
    };
    let store = match services.tickets() {
        Ok(s) => s,
        Err(e) => return errors::lock_error_to_response(e),
    };

    (StatusCode::OK, Json(dto::TicketList::from(store.query(&query)))).into_response()
}

pub async fn create_ticket(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewTicket>,
) -> axum::response::Response {
    let mut store = match services.tickets() {
        Ok(s) => s,
        Err(e) => return errors::lock_error_to_response(e),
    };

    match store.create(body, Local::now().date_naive()) {
        Ok(ticket) => (StatusCode::CREATED, Json(ticket)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn ticket_stats(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.tickets() {
        Ok(store) => (StatusCode::OK, Json(store.status_counts())).into_response(),
        Err(e) => errors::lock_error_to_response(e),
    }
}

pub async fn list_partners(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.tickets() {
        Ok(store) => (StatusCode::OK, Json(store.partners())).into_response(),
        Err(e) => errors::lock_error_to_response(e),
    }
}

/// The current table view (same filters and sort as `GET /tickets`) as CSV.
pub async fn export_tickets(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::TicketListParams>,
) -> axum::response::Response {
    let query = match params.into_query() {
        Ok(q) => q,
        Err(resp) => return resp,
    };
    let view = match services.tickets() {
        Ok(store) => store.query(&query),
        Err(e) => return errors::lock_error_to_response(e),
    };

    super::csv_attachment("tickets.csv", tickets_to_csv(&view))
}

pub async fn get_ticket(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let store = match services.tickets() {
        Ok(s) => s,
        Err(e) => return errors::lock_error_to_response(e),
    };

    match store.get(&TicketId::new(id.as_str())) {
        Some(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        None => errors::not_found("ticket", &id),
    }
}

pub async fn update_ticket(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<TicketPatch>,
) -> axum::response::Response {
    let mut store = match services.tickets() {
        Ok(s) => s,
        Err(e) => return errors::lock_error_to_response(e),
    };

    match store.update(&TicketId::new(id.as_str()), &patch) {
        Ok(Some(ticket)) => (StatusCode::OK, Json(ticket)).into_response(),
        Ok(None) => errors::not_found("ticket", &id),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Idempotent: deleting an unknown ticket is still `204 No Content`.
pub async fn delete_ticket(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let mut store = match services.tickets() {
        Ok(s) => s,
        Err(e) => return errors::lock_error_to_response(e),
    };

    match store.delete(&TicketId::new(id.as_str())) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// The ticket's saved order, or a fresh draft prefilled from the ticket.
pub async fn draft_repair_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(params): Query<dto::DraftParams>,
) -> axum::response::Response {
    let store = match services.tickets() {
        Ok(s) => s,
        Err(e) => return errors::lock_error_to_response(e),
    };
    let Some(ticket) = store.get(&TicketId::new(id.as_str())) else {
        return errors::not_found("ticket", &id);
    };

    let order = match ticket.repair_order() {
        Some(saved) => saved.clone(),
        None => RepairOrder::draft_for_ticket(ticket, Local::now().date_naive(), params.locale()),
    };
    (StatusCode::OK, Json(order)).into_response()
}

pub async fn save_repair_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(order): Json<RepairOrder>,
) -> axum::response::Response {
    let mut store = match services.tickets() {
        Ok(s) => s,
        Err(e) => return errors::lock_error_to_response(e),
    };

    match store.save_repair_order(&TicketId::new(id.as_str()), order) {
        Ok(Some(ticket)) => (StatusCode::OK, Json(ticket)).into_response(),
        Ok(None) => errors::not_found("ticket", &id),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn print_repair_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let store = match services.tickets() {
        Ok(s) => s,
        Err(e) => return errors::lock_error_to_response(e),
    };
    let Some(ticket) = store.get(&TicketId::new(id.as_str())) else {
        return errors::not_found("ticket", &id);
    };

    match services.exporter().render_to_pdf(ticket) {
        Ok(doc) => ([(header::CONTENT_TYPE, doc.content_type)], doc.bytes).into_response(),
        Err(e) => errors::export_error_to_response(e),
    }
}
