//! Bearer token service.
//!
//! Tokens are signed JWTs carrying the user's id, username, and email with a
//! fixed lifetime. Verification is a synchronous `Ok(Claims) | Err` call;
//! there is no refresh or rotation beyond logging in again.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use wanderblog_db::entities::user;
use wanderblog_common::{AppError, AppResult};

/// What a token is good for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    /// Ordinary bearer token for protected routes.
    #[default]
    Access,
    /// Emailed password-reset token; only resetPass accepts it.
    Reset,
}

/// Token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub id: i32,
    /// Username at issue time.
    pub username: String,
    /// Email at issue time.
    pub email: String,
    /// Token purpose.
    #[serde(default)]
    pub purpose: TokenPurpose,
    /// Expiry, seconds since the Unix epoch.
    pub exp: u64,
}

/// Token issuance and verification.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_secs: u64,
}

impl TokenService {
    /// Create a new token service from the shared secret.
    #[must_use]
    pub fn new(secret: &str, expiry_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_secs,
        }
    }

    /// Issue a signed token for the user.
    pub fn issue(&self, user: &user::Model, purpose: TokenPurpose) -> AppResult<String> {
        let exp = chrono::Utc::now().timestamp() as u64 + self.expiry_secs;

        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            purpose,
            exp,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a token, returning its claims. Any failure (bad signature,
    /// malformed, expired) is Unauthorized.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> user::Model {
        user::Model {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: "0811111111".to_string(),
            password: "$argon2id$fake".to_string(),
            verified_at: Some(Utc::now().into()),
            photo_profile: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let svc = TokenService::new("test-secret", 3600);
        let token = svc.issue(&test_user(), TokenPurpose::Access).unwrap();

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.id, 1);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.purpose, TokenPurpose::Access);
    }

    #[test]
    fn test_reset_purpose_survives_roundtrip() {
        let svc = TokenService::new("test-secret", 3600);
        let token = svc.issue(&test_user(), TokenPurpose::Reset).unwrap();

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.purpose, TokenPurpose::Reset);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new("secret-a", 3600);
        let verifier = TokenService::new("secret-b", 3600);

        let token = issuer.issue(&test_user(), TokenPurpose::Access).unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let svc = TokenService::new("test-secret", 3600);
        assert!(matches!(
            svc.verify("not.a.token"),
            Err(AppError::Unauthorized)
        ));
    }
}
