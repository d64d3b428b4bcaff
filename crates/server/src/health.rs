//! Liveness and storage reachability.

use api_types::health::{Health, Unhealthy};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::server::ServerState;

pub async fn healthcheck(State(state): State<ServerState>) -> Response {
    match state.engine.healthcheck().await {
        Ok(timestamp) => Json(Health {
            status: "healthy".to_string(),
            timestamp,
        })
        .into_response(),
        Err(err) => {
            tracing::error!("healthcheck failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Unhealthy {
                    status: "unhealthy".to_string(),
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}
