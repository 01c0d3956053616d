use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use super::jwt::{self, AuthError};
use crate::routes::AppState;

/// Middleware that requires valid JWT authentication
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let claims = bearer_token(&req)
        .and_then(|token| jwt::validate_token(&state.auth.jwt_secret, token))
        .map_err(|e| {
            tracing::debug!("Rejected request to {}: {}", req.uri().path(), e);
            StatusCode::UNAUTHORIZED
        })?;

    // Add claims to request extensions for use in handlers
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<Body>) -> Result<&str, AuthError> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}
