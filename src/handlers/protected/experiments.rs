use axum::{extract::State, Json};
use serde_json::Value;

use crate::error::ApiResult;
use crate::middleware::JsonObject;
use crate::models::EXPERIMENT;
use crate::state::AppState;

/// POST /api/experiments
pub async fn create(State(state): State<AppState>, body: JsonObject) -> ApiResult<Json<Value>> {
    super::create(&state, &EXPERIMENT, body).await.map(Json)
}
