//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use filetrack_core::config::AuthConfig;
use filetrack_core::error::AppError;

use super::claims::Claims;

/// Validates access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
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
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use filetrack_core::ErrorKind;
    use filetrack_entity::{Department, User, UserRole};

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_access_ttl_minutes: 60,
        }
    }

    #[test]
    fn test_issue_then_decode_yields_principal() {
        let user = User::new("Hana", None, Department::Hr, UserRole::Admin);
        let (token, _) = JwtEncoder::new(&config("s3cret")).issue(&user).unwrap();
        let claims = JwtDecoder::new(&config("s3cret")).decode(&token).unwrap();
        let principal = claims.principal();
        assert_eq!(principal.id, user.id);
        assert_eq!(principal.department, Department::Hr);
        assert_eq!(principal.role, UserRole::Admin);
    }

    #[test]
    fn test_wrong_secret_is_authentication_error() {
        let user = User::new("Hana", None, Department::Hr, UserRole::Admin);
        let (token, _) = JwtEncoder::new(&config("one")).issue(&user).unwrap();
        let err = JwtDecoder::new(&config("two")).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = JwtDecoder::new(&config("x")).decode("not-a-jwt").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
