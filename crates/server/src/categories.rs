//! Categories API endpoints.

use api_types::category::{Category, CategoryCreate, CategoryDelete};
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::{ServerError, server::ServerState};

fn map_category(category: engine::Category) -> Category {
    Category {
        id: category.id,
        name: category.name,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(body), _): WithRejection<Json<CategoryCreate>, ServerError>,
) -> Result<(StatusCode, Json<Category>), ServerError> {
    let category = state.engine.create_category(&Value::from(body)).await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<Category>>, ServerError> {
    let categories = state
        .engine
        .categories()
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(categories))
}

/// `DELETE /category` takes the id in the body: `{id}`.
pub async fn delete(
    State(state): State<ServerState>,
    WithRejection(Json(body), _): WithRejection<Json<CategoryDelete>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(&Value::from(body)).await?;
    Ok(StatusCode::NO_CONTENT)
}
