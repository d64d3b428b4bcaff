//! Users API endpoints.

use api_types::user::{User, UserCreate};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::{ServerError, server::ServerState};

fn map_user(user: engine::User) -> User {
    User {
        id: user.id,
        name: user.name,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(body), _): WithRejection<Json<UserCreate>, ServerError>,
) -> Result<(StatusCode, Json<User>), ServerError> {
    let user = state.engine.create_user(&Value::from(body)).await?;
    Ok((StatusCode::CREATED, Json(map_user(user))))
}

pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<User>, ServerError> {
    let user = state.engine.user(id).await?;
    Ok(Json(map_user(user)))
}

pub async fn delete(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<User>>, ServerError> {
    let users = state
        .engine
        .users()
        .await?
        .into_iter()
        .map(map_user)
        .collect();
    Ok(Json(users))
}
