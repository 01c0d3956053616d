use chrono::Utc;
use contracts::system::auth::{SessionInfo, TokenClaims};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token has no tenant or user")]
    IncompleteClaims,
}

/// Generate JWT access token for the session
pub fn generate_access_token(
    secret: &str,
    session: &SessionInfo,
    lifetime_hours: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = (now + chrono::Duration::hours(lifetime_hours)).timestamp() as usize;
    let iat = now.timestamp() as usize;

    let claims = TokenClaims {
        sub: session.user_id.clone(),
        org: session.tenant_id.clone(),
        exp,
        iat,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Validate JWT token (HS256, expiry checked) and extract claims
pub fn validate_token(secret: &str, token: &str) -> Result<TokenClaims, AuthError> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    let claims = token_data.claims;
    if claims.sub.trim().is_empty() || claims.org.trim().is_empty() {
        return Err(AuthError::IncompleteClaims);
    }
    Ok(claims)
}

/// Generate a random JWT secret (256 bits)
pub fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionInfo {
        SessionInfo {
            tenant_id: "tenant-a".into(),
            user_id: "user-1".into(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let secret = generate_jwt_secret();
        let token = generate_access_token(&secret, &session(), 1).unwrap();
        let claims = validate_token(&secret, &token).unwrap();
        assert_eq!(claims.session(), session());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = generate_access_token("one", &session(), 1).unwrap();
        assert!(matches!(
            validate_token("two", &token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // beyond the default 60s leeway
        let token = generate_access_token("s", &session(), -1).unwrap();
        assert!(validate_token("s", &token).is_err());
    }

    #[test]
    fn test_empty_tenant_rejected() {
        let mut s = session();
        s.tenant_id = String::new();
        let token = generate_access_token("s", &s, 1).unwrap();
        assert!(matches!(
            validate_token("s", &token),
            Err(AuthError::IncompleteClaims)
        ));
    }

    #[test]
    fn test_generated_secrets_differ() {
        assert_ne!(generate_jwt_secret(), generate_jwt_secret());
    }
}
