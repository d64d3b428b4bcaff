//! Accounts API endpoints.

use api_types::account::{Account, Deposit};
use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::{ServerError, server::ServerState};

fn map_account(account: engine::Account) -> Account {
    Account {
        user_id: account.user_id,
        balance: account.balance,
    }
}

pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Account>, ServerError> {
    let account = state.engine.account(user_id).await?;
    Ok(Json(map_account(account)))
}

pub async fn deposit(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(body), _): WithRejection<Json<Deposit>, ServerError>,
) -> Result<Json<Account>, ServerError> {
    let account = state.engine.deposit(user_id, &Value::from(body)).await?;
    Ok(Json(map_account(account)))
}
