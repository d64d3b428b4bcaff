//! Records API endpoints.

use api_types::record::{Record, RecordCreate, RecordQuery};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{EngineError, RecordFilter};
use serde_json::Value;

use crate::{ServerError, server::ServerState};

fn map_record(record: engine::Record) -> Record {
    Record {
        id: record.id,
        user_id: record.user_id,
        category_id: record.category_id,
        amount: record.amount,
        timestamp: record.timestamp,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(body), _): WithRejection<Json<RecordCreate>, ServerError>,
) -> Result<(StatusCode, Json<Record>), ServerError> {
    let record = state.engine.create_record(&Value::from(body)).await?;
    Ok((StatusCode::CREATED, Json(map_record(record))))
}

pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Record>, ServerError> {
    let record = state.engine.record(id).await?;
    Ok(Json(map_record(record)))
}

pub async fn delete(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_record(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /record?user_id=&category_id=`; without filters every record is listed.
pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<RecordQuery>, ServerError>,
) -> Result<Json<Vec<Record>>, ServerError> {
    let filter = RecordFilter::parse(query.user_id.as_deref(), query.category_id.as_deref())
        .map_err(EngineError::from)?;
    let records = state
        .engine
        .records(&filter)
        .await?
        .into_iter()
        .map(map_record)
        .collect();
    Ok(Json(records))
}
