use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use werkdesk_infra::export::parts_to_csv;
use werkdesk_inventory::{NewPart, PartId, PartPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/stats", get(inventory_stats))
        .route("/parts", get(list_parts).post(create_part))
        .route("/parts/export.csv", get(export_parts))
        .route("/parts/:id", patch(update_part).delete(delete_part))
        .route("/parts/:id/restock", post(restock_part))
}

pub async fn list_parts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<dto::PartListParams>,
) -> axum::response::Response {
    let catalog = match services.parts() {
        Ok(c) => c,
        Err(e) => return errors::lock_error_to_response(e),
    };

    let parts = catalog.search(&filter);
    (
        StatusCode::OK,
        Json(dto::PartList {
            count: parts.len(),
            parts,
            categories: catalog.categories(),
            suppliers: catalog.suppliers(),
        }),
    )
        .into_response()
}

pub async fn create_part(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewPart>,
) -> axum::response::Response {
    let mut catalog = match services.parts() {
        Ok(c) => c,
        Err(e) => return errors::lock_error_to_response(e),
    };

    match catalog.create(body) {
        Ok(part) => {
            tracing::info!(part_id = %part.id, "part created");
            (StatusCode::CREATED, Json(part)).into_response()
        }
        Err(e) => errors::domain_error_to_response(&e),
    }
}

pub async fn export_parts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<dto::PartListParams>,
) -> axum::response::Response {
    let parts = match services.parts() {
        Ok(catalog) => catalog.search(&filter),
        Err(e) => return errors::lock_error_to_response(e),
    };

    super::csv_attachment("inventory.csv", parts_to_csv(&parts))
}

pub async fn inventory_stats(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.parts() {
        Ok(catalog) => (StatusCode::OK, Json(catalog.stats())).into_response(),
        Err(e) => errors::lock_error_to_response(e),
    }
}

pub async fn update_part(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<PartPatch>,
) -> axum::response::Response {
    let mut catalog = match services.parts() {
        Ok(c) => c,
        Err(e) => return errors::lock_error_to_response(e),
    };

    match catalog.update(&PartId::new(id.as_str()), &patch) {
        Ok(Some(part)) => (StatusCode::OK, Json(part)).into_response(),
        Ok(None) => errors::not_found("part", &id),
        Err(e) => errors::domain_error_to_response(&e),
    }
}

pub async fn delete_part(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let mut catalog = match services.parts() {
        Ok(c) => c,
        Err(e) => return errors::lock_error_to_response(e),
    };

    if catalog.delete(&PartId::new(id.as_str())) {
        tracing::info!(part_id = %id, "part deleted");
    }
    StatusCode::NO_CONTENT.into_response()
}

pub async fn restock_part(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let mut catalog = match services.parts() {
        Ok(c) => c,
        Err(e) => return errors::lock_error_to_response(e),
    };

    match catalog.restock(&PartId::new(id.as_str())) {
        Some(part) => {
            tracing::info!(part_id = %part.id, stock = part.stock, "part restocked");
            (StatusCode::OK, Json(part)).into_response()
        }
        None => errors::not_found("part", &id),
    }
}
