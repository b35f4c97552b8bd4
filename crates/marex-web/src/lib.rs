use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use marex_config::AppConfig;
use marex_core::{Selection, SourceMode};
use marex_db::PoolSettings;
use marex_source::{Session, SourceError};
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::{Deserialize, Serialize};

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    fallbacks_total: Counter<u64>,
    session: Session,
    default_mode: SourceMode,
}

impl AppState {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn default_mode(&self) -> SourceMode {
        self.default_mode
    }
}

/// Session wired to the configured Postgres database
pub fn session_from_config(cfg: &AppConfig) -> Session {
    let settings = PoolSettings {
        max_connections: cfg.max_connections(),
        acquire_timeout: cfg.connect_timeout(),
    };
    Session::with_postgres(cfg.database_url(), settings)
}

pub fn build_app(session: Session, default_mode: SourceMode) -> Result<(Router, Arc<AppState>)> {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter().with_registry(registry.clone()).build()?;
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("marex-web");

    let requests_total = meter
        .u64_counter("marex_requests_total")
        .with_description("Total HTTP requests served")
        .init();
    let fallbacks_total = meter
        .u64_counter("marex_source_fallbacks_total")
        .with_description("Dashboard responses served from the mock fallback")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        fallbacks_total,
        session,
        default_mode,
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/sources", get(sources))
        .route("/api/v1/filters", get(filters))
        .route("/api/v1/dashboard", get(dashboard))
        .with_state(Arc::clone(&state));

    Ok((router, state))
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

/// Source failures that could not fall back to mock data
struct ApiError(SourceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        ApiError(err)
    }
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    state.requests_total.add(1, &[]);
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

#[derive(Serialize)]
struct SourceEntry {
    mode: SourceMode,
    label: &'static str,
    default: bool,
}

async fn sources(State(state): State<Arc<AppState>>) -> Json<Vec<SourceEntry>> {
    state.requests_total.add(1, &[]);
    let entries = SourceMode::ALL
        .into_iter()
        .map(|mode| SourceEntry {
            mode,
            label: mode.label(),
            default: mode == state.default_mode,
        })
        .collect();
    Json(entries)
}

#[derive(Deserialize)]
struct FiltersQuery {
    source: Option<SourceMode>,
}

async fn filters(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FiltersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    state.requests_total.add(1, &[]);
    let mode = q.source.unwrap_or(state.default_mode);
    let view = state.session.filters(mode).await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    source: Option<SourceMode>,
    species: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DashboardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    state.requests_total.add(1, &[]);
    let mode = q.source.unwrap_or(state.default_mode);
    let selection = Selection {
        species: q.species,
        from: q.from,
        to: q.to,
    };

    let view = state.session.explore(mode, &selection).await?;
    if view.filters.warning.is_some() {
        state.fallbacks_total.add(1, &[]);
    }
    tracing::info!(%mode, summary = %view.summary, "dashboard served");
    Ok(Json(view))
}
