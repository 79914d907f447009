use anyhow::{anyhow, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::entity::{AppError, UserRecord};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing and verification keys plus token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_secs: i64) -> Result<Self> {
        if secret.is_empty() {
            return Err(anyhow!("JWT secret must not be empty"));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        })
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Signed token for `user`, valid from now for the configured lifetime
    pub fn issue(&self, user: &UserRecord) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| anyhow!("Failed to sign token: {}", e))
    }

    /// Claims of a valid, unexpired token
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserRecord {
        UserRecord {
            id: "user-1".to_string(),
            email: "holder@example.com".to_string(),
            password_hash: String::new(),
            totp_secret: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_verifies() {
        let keys = JwtKeys::new("test-secret", 3600).unwrap();
        let token = keys.issue(&user()).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "holder@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn other_secret_or_expiry_is_rejected() {
        let token = JwtKeys::new("one", 3600).unwrap().issue(&user()).unwrap();
        let err = JwtKeys::new("two", 3600).unwrap().verify(&token).unwrap_err();
        assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::Unauthorized)));

        // default validation leeway is 60 s
        let expired = JwtKeys::new("one", -120).unwrap();
        let token = expired.issue(&user()).unwrap();
        assert!(expired.verify(&token).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(JwtKeys::new("", 60).is_err());
    }
}
