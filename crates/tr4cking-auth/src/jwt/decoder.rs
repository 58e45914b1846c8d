//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use tr4cking_core::config::AuthConfig;
use tr4cking_core::error::AppError;

use super::claims::Claims;

/// Validates signed access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock skew
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use tr4cking_core::error::ErrorKind;
    use tr4cking_core::types::UserId;
    use tr4cking_entity::user::UserRole;

    use super::*;
    use crate::jwt::JwtEncoder;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_round_trip_keeps_claims() {
        let cfg = config("a-very-long-test-secret");
        let issued = JwtEncoder::new(&cfg)
            .generate_access_token(UserId::new(7), UserRole::Clerk, "taquilla1")
            .expect("encode");

        let claims = JwtDecoder::new(&cfg)
            .decode_access_token(&issued.access_token)
            .expect("decode");
        assert_eq!(claims.user_id(), UserId::new(7));
        assert_eq!(claims.role, UserRole::Clerk);
        assert_eq!(claims.username, "taquilla1");
        assert!(!claims.is_expired());
        assert_eq!(claims.expires_at().timestamp(), issued.expires_at.timestamp());
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let issued = JwtEncoder::new(&config("first-secret-0123456"))
            .generate_access_token(UserId::new(1), UserRole::Admin, "admin")
            .expect("encode");

        let err = JwtDecoder::new(&config("second-secret-0123456"))
            .decode_access_token(&issued.access_token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_garbage_is_unauthorized() {
        let err = JwtDecoder::new(&config("a-very-long-test-secret"))
            .decode_access_token("not.a.token")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}
