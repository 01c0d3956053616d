use serde::{Deserialize, Serialize};

/// Tenant and user the current request acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionInfo {
    pub tenant_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    pub org: String, // tenant_id
    pub exp: usize,  // expiration timestamp
    pub iat: usize,  // issued at
}

impl TokenClaims {
    pub fn session(&self) -> SessionInfo {
        SessionInfo {
            tenant_id: self.org.clone(),
            user_id: self.sub.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevTokenRequest {
    pub tenant_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevTokenResponse {
    pub access_token: String,
    pub session: SessionInfo,
}
