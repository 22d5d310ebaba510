use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use werkdesk_partners::{NewPartner, PartnerId, PartnerPatch};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_partners).post(create_partner))
        .route("/:id", patch(update_partner).delete(delete_partner))
}

pub async fn list_partners(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.partners() {
        Ok(dir) => (StatusCode::OK, Json(dir.partners().to_vec())).into_response(),
        Err(e) => errors::lock_error_to_response(e),
    }
}

pub async fn create_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewPartner>,
) -> axum::response::Response {
    let mut dir = match services.partners() {
        Ok(d) => d,
        Err(e) => return errors::lock_error_to_response(e),
    };

    match dir.create(body) {
        Ok(partner) => {
            tracing::info!(partner_id = %partner.id, "partner created");
            (StatusCode::CREATED, Json(partner)).into_response()
        }
        Err(e) => errors::domain_error_to_response(&e),
    }
}

pub async fn update_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<PartnerPatch>,
) -> axum::response::Response {
    let mut dir = match services.partners() {
        Ok(d) => d,
        Err(e) => return errors::lock_error_to_response(e),
    };

    match dir.update(&PartnerId::new(id.as_str()), &patch) {
        Ok(Some(partner)) => (StatusCode::OK, Json(partner)).into_response(),
        Ok(None) => errors::not_found("partner", &id),
        Err(e) => errors::domain_error_to_response(&e),
    }
}

pub async fn delete_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let mut dir = match services.partners() {
        Ok(d) => d,
        Err(e) => return errors::lock_error_to_response(e),
    };

    if dir.delete(&PartnerId::new(id.as_str())) {
        tracing::info!(partner_id = %id, "partner deleted");
    }
    StatusCode::NO_CONTENT.into_response()
}
