// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Security Level: static bearer token (see middleware::auth)
// Route Prefix: /api/*
// Middleware: require_bearer, applied as a route layer in app::router

pub mod experiments;
pub mod kpis;
pub mod projects;

use serde_json::Value;
use tracing::{error, info};

use crate::error::ApiResult;
use crate::middleware::JsonObject;
use crate::models::Entity;
use crate::state::AppState;

/// Shared create flow: check required fields, insert once, echo the stored row.
pub(crate) async fn create(state: &AppState, entity: &Entity, JsonObject(body): JsonObject) -> ApiResult<Value> {
    let row = entity.build_row(&body)?;

    match state.store.insert_one(entity.table, row).await {
        Ok(created) => {
            info!("created row in {}", entity.table);
            Ok(created)
        }
        Err(e) => {
            error!("insert into {} failed: {}", entity.table, e);
            Err(e.into())
        }
    }
}
