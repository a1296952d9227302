use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use replayq_core::{PoolView, SanitizedConfig};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<PoolView> {
    Json(state.session().view())
}

pub async fn metrics() -> String {
    crate::metrics::encode_metrics()
}
