use axum::{extract::State, Json};
use serde_json::Value;
use service_core::error::AppError;

use crate::startup::AppState;

pub const DOCS_READ_ERROR: &str = "Error reading file";

/// `GET /api-docs`: the OpenAPI document from disk, re-read per request.
pub async fn api_docs(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let path = state.api_docs_path.as_path();

    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::opaque(
            DOCS_READ_ERROR,
            anyhow::Error::new(e).context(format!("reading {}", path.display())),
        )
    })?;

    let document = serde_json::from_str(&raw).map_err(|e| {
        AppError::opaque(
            DOCS_READ_ERROR,
            anyhow::Error::new(e).context(format!("parsing {}", path.display())),
        )
    })?;

    Ok(Json(document))
}
