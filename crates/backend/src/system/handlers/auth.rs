use axum::{extract::State, http::StatusCode, Json};
use contracts::system::auth::{DevTokenRequest, DevTokenResponse, SessionInfo};

use crate::routes::AppState;
use crate::system::auth::jwt;

/// POST /api/system/auth/dev-token
///
/// Issues a token for any tenant/user pair. Answers 404 unless
/// `auth.allow_dev_tokens` is on.
pub async fn dev_token(
    State(state): State<AppState>,
    Json(request): Json<DevTokenRequest>,
) -> Result<Json<DevTokenResponse>, StatusCode> {
    if !state.auth.allow_dev_tokens {
        return Err(StatusCode::NOT_FOUND);
    }

    let session = SessionInfo {
        tenant_id: request.tenant_id.trim().to_string(),
        user_id: request.user_id.trim().to_string(),
    };
    if session.tenant_id.is_empty() || session.user_id.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let access_token = jwt::generate_access_token(
        &state.auth.jwt_secret,
        &session,
        state.auth.token_lifetime_hours,
    )
    .map_err(|e| {
        tracing::error!("Failed to issue dev token: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!(
        "Dev token issued for user {} in tenant {}",
        session.user_id,
        session.tenant_id
    );
    Ok(Json(DevTokenResponse {
        access_token,
        session,
    }))
}
