mod common;

use axum::{body::to_bytes, http::StatusCode};
use common::{app_with_unreachable_db, get};

#[tokio::test]
async fn health_ready_metrics_endpoints() {
    let (app, state) = app_with_unreachable_db();

    // /healthz returns 200 and increments a counter
    let res = get(&app, "/healthz").await;
    assert_eq!(res.status(), StatusCode::OK);

    // /readyz initially 503
    let res = get(&app, "/readyz").await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Set ready
    marex_web::set_ready(&state, true);

    // /readyz now 200
    let res = get(&app, "/readyz").await;
    assert_eq!(res.status(), StatusCode::OK);

    // /metrics returns prometheus text and contains our counter
    let res = get(&app, "/metrics").await;
    assert_eq!(res.status(), StatusCode::OK);
    let ct = res.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/plain"));
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("marex_requests_total"));
}

/// Value of the first sample line for `name` in a Prometheus text body
fn sample_value(text: &str, name: &str) -> Option<f64> {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .find(|line| line.starts_with(name))
        .and_then(|line| line.split_whitespace().last())
        .and_then(|value| value.parse().ok())
}

#[tokio::test]
async fn fallback_is_counted() {
    let (app, _state) = app_with_unreachable_db();

    let res = get(&app, "/api/v1/dashboard?source=postgres").await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = get(&app, "/api/v1/dashboard?source=mock").await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = get(&app, "/metrics").await;
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert_eq!(sample_value(&text, "marex_source_fallbacks_total"), Some(1.0));
}
