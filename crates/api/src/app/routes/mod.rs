use axum::Router;

pub mod inventory;
pub mod partners;
pub mod system;
pub mod tickets;

/// Router for all tickets, inventory and partner endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/tickets", tickets::router())
        .nest("/inventory", inventory::router())
        .nest("/partners", partners::router())
}

/// `text/csv` attachment response.
pub(crate) fn csv_attachment(filename: &str, body: String) -> axum::response::Response {
    use axum::http::header;
    use axum::response::IntoResponse;

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
