use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Static bearer-token gate for the `/api/*` routes.
///
/// The request only reaches the handler when the presented token equals the
/// configured secret. With no secret configured every request is rejected.
pub async fn require_bearer(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers).unwrap_or("");

    let authorized = match state.bearer_token.as_deref() {
        Some(secret) if !token.is_empty() => tokens_match(token, secret),
        _ => false,
    };

    if !authorized {
        debug!("rejected {} {}: bad or missing bearer token", request.method(), request.uri().path());
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Token from the Authorization header with any `Bearer` prefix removed.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    Some(strip_bearer_prefix(value))
}

/// Strips a case-insensitive `Bearer` followed by at least one whitespace
/// character. Values without that prefix are returned unchanged.
fn strip_bearer_prefix(value: &str) -> &str {
    match value.get(..6) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {
            let rest = &value[6..];
            let token = rest.trim_start();
            if token.len() < rest.len() {
                token
            } else {
                value
            }
        }
        _ => value,
    }
}

fn tokens_match(presented: &str, secret: &str) -> bool {
    presented.as_bytes().ct_eq(secret.as_bytes()).into()
}
