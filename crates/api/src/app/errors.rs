use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use werkdesk_core::DomainError;
use werkdesk_infra::{StoreError, export::ExportError};

use crate::app::services::LockPoisoned;

pub fn domain_error_to_response(err: &DomainError) -> axum::response::Response {
    match err {
        DomainError::MissingField(field) => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "missing_field",
            format!("{field} is required"),
        ),
        DomainError::Validation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone())
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg.clone()),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match &err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::Persistence(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "persistence_error", e.to_string())
        }
        StoreError::Fixtures(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "fixtures_error", e.to_string())
        }
    }
}

pub fn export_error_to_response(err: ExportError) -> axum::response::Response {
    match err {
        ExportError::NoRepairOrder(_) => {
            json_error(StatusCode::NOT_FOUND, "no_repair_order", err.to_string())
        }
        ExportError::Render(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "render_error", msg),
    }
}

pub fn lock_error_to_response(err: LockPoisoned) -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "lock_poisoned",
        format!("{} lock poisoned", err.0),
    )
}

pub fn not_found(what: &str, id: &str) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} {id} not found"))
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
