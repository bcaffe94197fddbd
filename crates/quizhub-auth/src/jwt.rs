//! HS256 access tokens.
//!
//! Verification failures are returned unclassified so the error classifier
//! can tell an expired token ("Token expired") from any other decoding
//! failure ("Invalid token").

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use quizhub_config::JwtConfig;
use quizhub_core::{AppError, Role};

use crate::claims::Claims;

pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {}", e)))
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(AppError::unclassified)
}

/// Strips an optional `Bearer ` scheme from an `Authorization` header value.
pub fn bearer_token(header_value: &str) -> &str {
    let value = header_value.trim();
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use quizhub_core::errors::{INVALID_TOKEN, TOKEN_EXPIRED};

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn create_then_verify() {
        let config = config();
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, "t@example.com", Role::Teacher, &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "t@example.com");
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = verify_token("not-a-jwt", &config()).unwrap_err();
        let classified = err.classify();
        assert_eq!(classified.status, StatusCode::UNAUTHORIZED);
        assert_eq!(classified.message, INVALID_TOKEN);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token =
            create_access_token(Uuid::new_v4(), "t@example.com", Role::Admin, &config()).unwrap();
        let other = JwtConfig {
            secret: "a-completely-different-secret-value!!".to_string(),
            access_token_expiry: 3600,
        };
        let classified = verify_token(&token, &other).unwrap_err().classify();
        assert_eq!(classified.message, INVALID_TOKEN);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let config = config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "old@example.com".to_string(),
            role: Role::Student,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let classified = verify_token(&token, &config).unwrap_err().classify();
        assert_eq!(classified.status, StatusCode::UNAUTHORIZED);
        assert_eq!(classified.message, TOKEN_EXPIRED);
    }

    #[test]
    fn bearer_prefix_is_optional() {
        assert_eq!(bearer_token("Bearer abc.def"), "abc.def");
        assert_eq!(bearer_token("bearer abc.def"), "abc.def");
        assert_eq!(bearer_token("  abc.def "), "abc.def");
    }
}
