use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Health {
    pub ok: bool,
}

/// GET /health - liveness only; never touches the store or checks auth.
pub async fn health() -> Json<Health> {
    Json(Health { ok: true })
}
