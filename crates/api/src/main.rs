use anyhow::Context;

use werkdesk_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    werkdesk_observability::init();

    let settings = Settings::from_env().context("reading WERKDESK_* configuration")?;
    let app = werkdesk_api::app::build_app(&settings).context("opening the ticket store")?;

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;
    tracing::info!(addr = %settings.bind_addr, storage = ?settings.storage, "werkdesk-api listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
