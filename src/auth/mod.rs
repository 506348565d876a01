pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use password::Passwords;

/// Lifetime of an issued token.
pub const TOKEN_TTL_SECONDS: i64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: &str, issued_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(TOKEN_TTL_SECONDS)).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret is not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Signs and checks HS256 session tokens with a single shared secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, JwtError> {
        self.issue_at(user_id, email, Utc::now())
    }

    pub fn issue_at(&self, user_id: Uuid, email: &str, issued_at: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, email, issued_at);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret").unwrap()
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(TokenIssuer::new(""), Err(JwtError::MissingSecret)));
    }

    #[test]
    fn token_round_trips_claims() {
        let id = Uuid::new_v4();
        let token = issuer().issue(id, "a@x.com").unwrap();
        let claims = issuer().verify(&token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued_at = Utc::now() - Duration::hours(2);
        let token = issuer().issue_at(Uuid::new_v4(), "a@x.com", issued_at).unwrap();
        assert!(matches!(issuer().verify(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = issuer().issue(Uuid::new_v4(), "a@x.com").unwrap();
        let other = TokenIssuer::new("another-secret").unwrap();
        assert!(matches!(other.verify(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = issuer().issue(Uuid::new_v4(), "a@x.com").unwrap();
        let forged = issuer().issue(Uuid::new_v4(), "root@x.com").unwrap();

        // header and signature from one token, claims from another
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(matches!(issuer().verify(&spliced), Err(JwtError::Invalid(_))));
    }
}
