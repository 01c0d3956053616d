use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::auth::{SessionInfo, TokenClaims};

/// Tenant and user of the authenticated request.
/// Usage in handlers: `async fn handler(CurrentSession(session): CurrentSession) -> Response`
pub struct CurrentSession(pub SessionInfo);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Claims are put into extensions by `require_auth`
        parts
            .extensions
            .get::<TokenClaims>()
            .map(|claims| CurrentSession(claims.session()))
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
