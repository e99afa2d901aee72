//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use super::AppState;
use super::types::{ErrorResponse, PriceQuery, PriceResponse, SweepQuery};
use crate::charts::spec::{ChartKind, ChartSpec, default_spec};
use crate::config::CalculatorConfig;
use crate::market::insights::assess;
use crate::market::sweep::DemandSweep;

/// Largest number of points a single sweep request may price.
const MAX_SWEEP_POINTS: usize = 10_000;

/// Prices one snapshot.
///
/// `GET /price?demand=&transmission=&availability=&hour=&weather=` → 200 +
/// `PriceResponse` JSON. Values are clamped into the slider ranges.
pub async fn get_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriceQuery>,
) -> Json<PriceResponse> {
    let inputs = query.to_parameters(&state.config.sliders);
    let result = state.pricer.price(&inputs);
    let insights = assess(
        &inputs,
        &result,
        state.pricer.fleet(),
        &state.config.weather_labels,
    );
    Json(PriceResponse {
        inputs,
        result,
        insights,
    })
}

/// Prices a demand range with the other parameters at their initial values.
///
/// `GET /sweep` → 200 + sweep over the demand slider range
/// `GET /sweep?from=150&to=300&step=10` → explicit range
/// `GET /sweep?from=300&to=150` → 400 + `ErrorResponse`
pub async fn get_sweep(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SweepQuery>,
) -> impl IntoResponse {
    let demand = &state.config.sliders.demand;
    let from = query.from.unwrap_or(demand.min);
    let to = query.to.unwrap_or(demand.max);
    let step = query.step.unwrap_or(demand.step);

    let sweep = match DemandSweep::new(from, to, step) {
        Ok(sweep) => sweep,
        Err(e) => return Err(bad_request(e.to_string())),
    };
    if sweep.point_count() > MAX_SWEEP_POINTS {
        return Err(bad_request(format!(
            "sweep would price {} points, limit is {MAX_SWEEP_POINTS}",
            sweep.point_count()
        )));
    }

    let base = state.config.sliders.initial_parameters();
    Ok(Json(sweep.run(&state.pricer, &base)))
}

/// Returns the active configuration.
///
/// `GET /config` → 200 + `CalculatorConfig` JSON
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<CalculatorConfig> {
    Json(state.config.clone())
}

/// Returns the default spec of one chart kind for the active fleet.
///
/// `GET /chart/merit-order` → 200 + `ChartSpec` JSON
/// `GET /chart/pie` → 404 + `ErrorResponse`
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<ChartSpec>, (StatusCode, Json<ErrorResponse>)> {
    let kind = kind.parse::<ChartKind>().map_err(|e| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;
    Ok(Json(default_spec(kind, &state.pricer)))
}

fn bad_request(error: String) -> (StatusCode, Json<ErrorResponse>) {
    warn!(%error, "rejected request");
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}
