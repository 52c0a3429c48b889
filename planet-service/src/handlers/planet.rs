use axum::{body::Bytes, extract::State, Json};
use metrics::counter;
use serde_json::Value;
use service_core::error::AppError;

use crate::models::{coerce_id, valid_id_range, Planet};
use crate::startup::AppState;

pub const PLANET_DATA_ERROR: &str = "Error in Planet Data";

/// Guidance returned when no planet matches the requested id.
pub fn not_found_message() -> String {
    let range = valid_id_range();
    format!(
        "Planet not found. Select a number from {} - {}",
        range.start(),
        range.end()
    )
}

/// Pull a usable id out of the raw request body. Bodies that are not JSON,
/// lack `id`, or carry a non-integer `id` have none.
fn requested_id(body: &[u8]) -> Option<i64> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    payload.get("id").and_then(coerce_id)
}

/// `POST /planet` with `{"id": <integer>}`.
#[tracing::instrument(skip(state, body))]
pub async fn lookup_planet(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Planet>, AppError> {
    let Some(id) = requested_id(&body) else {
        tracing::debug!("Planet lookup without a usable id");
        counter!("planet_lookups_total", "outcome" => "not_found").increment(1);
        return Err(AppError::NotFound(not_found_message()));
    };

    match state.store.find_by_id(id).await {
        Ok(Some(planet)) => {
            counter!("planet_lookups_total", "outcome" => "found").increment(1);
            Ok(Json(planet))
        }
        Ok(None) => {
            tracing::debug!(planet_id = id, "Planet not found");
            counter!("planet_lookups_total", "outcome" => "not_found").increment(1);
            Err(AppError::NotFound(not_found_message()))
        }
        Err(e) => {
            counter!("planet_lookups_total", "outcome" => "error").increment(1);
            Err(AppError::opaque(PLANET_DATA_ERROR, e))
        }
    }
}
