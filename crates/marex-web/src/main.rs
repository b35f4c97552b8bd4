use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Observability
    marex_obs::init("marex");

    // Config
    let cfg = match marex_config::AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "invalid config file, using defaults");
            marex_config::AppConfig::default()
        }
    };
    let http_bind = cfg.http_bind();
    let default_mode = cfg.default_mode();
    tracing::info!(
        database = %marex_config::redact_url(&cfg.database_url()),
        %default_mode,
        "Loaded configuration"
    );

    // Build app and state
    let session = marex_web::session_from_config(&cfg);
    let (app, state) = marex_web::build_app(session, default_mode)?;

    // Warm the default source so the first request does not pay for it
    match state.session().load(default_mode).await {
        Ok(outcome) => tracing::info!(
            records = outcome.dataset().len(),
            fallback = outcome.is_fallback(),
            "default source loaded"
        ),
        Err(e) => tracing::error!(error = %e, "failed to load default source"),
    }

    // Start HTTP server
    let addr: SocketAddr = http_bind
        .parse()
        .with_context(|| format!("Invalid HTTP bind address: {http_bind}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    // Mark ready just before serving
    marex_web::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
