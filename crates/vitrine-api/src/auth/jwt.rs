//! HS256 token issuance and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use vitrine_core::{AppError, Principal, User};

use super::models::JwtClaims;

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// Sign a token for `user`, valid for the configured number of hours.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature and expiry and turn the claims into a [`Principal`].
    pub fn verify(&self, token: &str) -> Result<Principal, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("JWT validation failed: {}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Token has expired".to_string())
                }
                _ => AppError::Unauthorized("Invalid token".to_string()),
            }
        })?;

        let claims = token_data.claims;
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(Principal::new(user_id, claims.username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "an-hs256-secret-that-is-long-enough";

    fn user() -> User {
        let now = Utc::now();
        User {
            id: 42,
            username: "alice".to_string(),
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issued_token_verifies_to_principal() {
        let jwt = JwtService::new(SECRET, 24);
        let token = jwt.issue(&user()).unwrap();

        let principal = jwt.verify(&token).unwrap();
        assert_eq!(principal, Principal::new(42, "alice"));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = JwtService::new("another-secret-that-is-long-enough!", 24)
            .issue(&user())
            .unwrap();

        let err = JwtService::new(SECRET, 24).verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = JwtService::new(SECRET, -1);
        let token = jwt.issue(&user()).unwrap();

        let err = jwt.verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref msg) if msg.contains("expired")));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = JwtService::new(SECRET, 24).verify("not-a-token").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
