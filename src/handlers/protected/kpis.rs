use axum::{extract::State, Json};
use serde_json::Value;

use crate::error::ApiResult;
use crate::middleware::JsonObject;
use crate::models::KPI_TARGET;
use crate::state::AppState;

/// POST /api/kpis/targets - body `{ project_id, type, metric, target_value, due_date? }`
///
/// `target_value` only has to be present, so `0` is a valid target.
pub async fn create_target(State(state): State<AppState>, body: JsonObject) -> ApiResult<Json<Value>> {
    super::create(&state, &KPI_TARGET, body).await.map(Json)
}
