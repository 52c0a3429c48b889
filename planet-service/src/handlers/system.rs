use axum::{extract::State, Json};
use serde::Serialize;
use sysinfo::System;

use crate::startup::AppState;

#[derive(Debug, Serialize)]
pub struct HostInfo {
    pub os: String,
    pub env: String,
}

fn hostname() -> String {
    System::host_name()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

/// `GET /os`: the serving host's name and the runtime environment label.
pub async fn host_info(State(state): State<AppState>) -> Json<HostInfo> {
    Json(HostInfo {
        os: hostname(),
        env: state.environment.to_string(),
    })
}
