use axum::extract::State;
use axum::Json;
use serde::Serialize;

use facewatch_core::shared::constants::FACES_TOPIC;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub subscribers: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        subscribers: state.registry.subscriber_count(FACES_TOPIC),
    })
}
