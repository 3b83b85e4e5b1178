//! JWT issue and validation.

use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // email
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity recovered from a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub role: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        crate::models::is_admin_role(&self.role)
    }
}

/// Signing key plus token lifetime. Loaded once at startup, read-only afterwards.
#[derive(Clone)]
pub struct JwtSecret {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtSecret {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::try_seconds(ttl_secs).unwrap_or(Duration::MAX),
        }
    }

    pub fn issue(&self, subject: &str, role: &str, now: DateTime<Utc>) -> AppResult<String> {
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("token expiry out of range")))?;
        let claims = Claims {
            sub: subject.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("jwt encode: {}", e)))
    }

    /// Checks the signature, then expiry against `now` rather than the system clock.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> AppResult<Identity> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            AppError::Auth("Invalid token".to_string())
        })?;

        if now.timestamp() > data.claims.exp {
            return Err(AppError::Auth("Token expired".to_string()));
        }

        Ok(Identity {
            subject: data.claims.sub,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-jwt-secret-min-32-chars!!!!";

    #[test]
    fn issue_and_validate() {
        let jwt = JwtSecret::new(SECRET, 3600);
        let now = Utc::now();
        let token = jwt.issue("a@x.com", "USER", now).unwrap();
        let identity = jwt.validate(&token, now).unwrap();
        assert_eq!(identity.subject, "a@x.com");
        assert_eq!(identity.role, "USER");
    }

    #[test]
    fn expiry_is_ttl_after_issue() {
        let jwt = JwtSecret::new(SECRET, 60);
        let now = Utc::now();
        let token = jwt.issue("a@x.com", "USER", now).unwrap();

        assert!(jwt.validate(&token, now + Duration::seconds(59)).is_ok());
        assert!(jwt.validate(&token, now + Duration::seconds(60)).is_ok());
        let err = jwt.validate(&token, now + Duration::seconds(61)).unwrap_err();
        assert!(matches!(err, AppError::Auth(ref m) if m == "Token expired"));
    }

    #[test]
    fn tampering_any_byte_invalidates() {
        let jwt = JwtSecret::new(SECRET, 3600);
        let now = Utc::now();
        let token = jwt.issue("a@x.com", "ADMIN", now).unwrap();

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert!(
                jwt.validate(&tampered, now).is_err(),
                "tampered byte {} still validated",
                i
            );
        }
    }

    #[test]
    fn oversized_ttl_is_an_error_not_a_panic() {
        let now = Utc::now();
        let err = JwtSecret::new(SECRET, 10_000_000_000_000)
            .issue("a@x.com", "USER", now)
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(JwtSecret::new(SECRET, i64::MAX).issue("a@x.com", "USER", now).is_err());
    }

    #[test]
    fn other_key_rejects() {
        let now = Utc::now();
        let token = JwtSecret::new(SECRET, 3600).issue("a@x.com", "USER", now).unwrap();
        let rotated = JwtSecret::new("another-secret-also-32-chars-long", 3600);
        assert!(rotated.validate(&token, now).is_err());
    }

    #[test]
    fn garbage_rejected() {
        let jwt = JwtSecret::new(SECRET, 3600);
        assert!(jwt.validate("invalid-token", Utc::now()).is_err());
        assert!(jwt.validate("", Utc::now()).is_err());
    }
}
