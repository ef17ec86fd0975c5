use axum::{extract::State, Json};
use serde_json::Value;
use tracing::error;

use crate::database::{Order, Table};
use crate::error::ApiResult;
use crate::middleware::JsonObject;
use crate::models::PROJECT;
use crate::state::AppState;

/// GET /api/projects - every project, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let rows = state
        .store
        .select_all(Table::Projects, Order::desc("created_at"))
        .await
        .map_err(|e| {
            error!("select from {} failed: {}", Table::Projects, e);
            e
        })?;

    Ok(Json(rows))
}

/// POST /api/projects - body `{ name, description? }`
pub async fn create(State(state): State<AppState>, body: JsonObject) -> ApiResult<Json<Value>> {
    super::create(&state, &PROJECT, body).await.map(Json)
}
