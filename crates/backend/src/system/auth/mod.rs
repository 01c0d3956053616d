pub mod extractor;
pub mod jwt;
pub mod middleware;

use crate::shared::config::AuthConfig;

/// Resolved authentication settings held in the application state.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_lifetime_hours: i64,
    pub allow_dev_tokens: bool,
}

impl AuthSettings {
    pub fn from_config(config: &AuthConfig) -> Self {
        let jwt_secret = if config.jwt_secret.trim().is_empty() {
            tracing::warn!("No JWT secret configured, generated one; tokens will not survive a restart");
            jwt::generate_jwt_secret()
        } else {
            config.jwt_secret.clone()
        };
        if config.allow_dev_tokens {
            tracing::warn!("Dev token endpoint is enabled");
        }
        Self {
            jwt_secret,
            token_lifetime_hours: config.token_lifetime_hours,
            allow_dev_tokens: config.allow_dev_tokens,
        }
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"***")
            .field("token_lifetime_hours", &self.token_lifetime_hours)
            .field("allow_dev_tokens", &self.allow_dev_tokens)
            .finish()
    }
}
