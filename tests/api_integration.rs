//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use shadow_price::api::{AppState, router};
use shadow_price::config::CalculatorConfig;

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(Arc::clone(state));
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn preset_state_prices_its_initial_sliders() {
    let cfg = CalculatorConfig::from_preset("outage").unwrap();
    let state = Arc::new(AppState::new(cfg));

    let (status, json) = get(&state, "/price").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["inputs"]["availability_pct"], 70.0);
    assert_eq!(json["result"]["system_lambda"], 343.0);
    assert_eq!(json["result"]["congestion_cost"], 48.0);
}

#[tokio::test]
async fn config_file_state_uses_its_fleet() {
    let cfg =
        CalculatorConfig::from_toml_file(Path::new("scenarios/expanded_fleet.toml")).unwrap();
    let state = Arc::new(AppState::new(cfg));

    let (status, json) = get(&state, "/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["generators"]["coal"]["capacity_mw"], 150.0);

    // demand slider now reaches 400
    let (_, json) = get(&state, "/price?demand=400").await;
    assert_eq!(json["inputs"]["demand"], 400.0);
}

#[tokio::test]
async fn sweep_matches_single_prices() {
    let state = Arc::new(AppState::new(CalculatorConfig::default()));

    let (status, sweep) = get(&state, "/sweep?from=150&to=300&step=50").await;
    assert_eq!(status, StatusCode::OK);
    let points = sweep.as_array().cloned().unwrap();
    assert_eq!(points.len(), 4);

    for point in &points {
        let demand = point["demand"].as_f64().unwrap();
        let (_, single) = get(&state, &format!("/price?demand={demand}")).await;
        assert_eq!(point["result"], single["result"]);
    }
}
