//! Stakeholder session artifacts
//!
//! Externally invited stakeholders have no platform account. Their portal
//! cookie carries an HS256 JWT scoped to exactly one space and one email.
//! The claims establish identity only; authorization is re-proven against
//! the live membership row on every call, so revoking the row revokes
//! access immediately even for a cryptographically valid, unexpired token.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::{GangwayError, Result};

/// Payload stored in a stakeholder session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Space the session is scoped to
    pub space_id: String,
    /// Invited email the session identifies
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Signer and verifier for stakeholder session tokens
#[derive(Clone)]
pub struct SessionSigner {
    secret: String,
    expiry_seconds: u64,
}

impl SessionSigner {
    /// Create a new signer
    ///
    /// Returns an error if the secret is empty or too short
    pub fn new(secret: String, expiry_seconds: u64) -> Result<Self> {
        if secret.is_empty() {
            return Err(GangwayError::Config(
                "SESSION_SECRET is required in production mode".into(),
            ));
        }

        if secret.len() < 32 {
            return Err(GangwayError::Config(
                "SESSION_SECRET must be at least 32 characters".into(),
            ));
        }

        Ok(Self {
            secret,
            expiry_seconds,
        })
    }

    /// Create a signer for dev mode (fixed insecure secret)
    pub fn new_dev() -> Self {
        Self {
            secret: "dev-mode-secret-not-for-production-use-123456".into(),
            expiry_seconds: 14 * 24 * 60 * 60,
        }
    }

    /// Issue a session token for an invited stakeholder
    pub fn issue(&self, space_id: &str, email: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| GangwayError::Session(format!("System time error: {}", e)))?
            .as_secs();

        let claims = SessionClaims {
            space_id: space_id.to_string(),
            email: email.to_lowercase(),
            iat: now,
            exp: now + self.expiry_seconds,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| GangwayError::Session(format!("Failed to issue session: {}", e)))?;

        Ok(token)
    }

    /// Verify and decode a session token. A valid result identifies the
    /// caller; it does not authorize anything by itself.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let validation = Validation::default();

        match decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => Ok(data.claims),
            Err(err) => {
                use jsonwebtoken::errors::ErrorKind;
                let msg = match err.kind() {
                    ErrorKind::ExpiredSignature => "Session expired",
                    ErrorKind::InvalidToken => "Invalid session token",
                    ErrorKind::InvalidSignature => "Invalid session signature",
                    _ => "Session validation failed",
                };
                Err(GangwayError::Session(msg.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signer() -> SessionSigner {
        SessionSigner::new(
            "test-secret-that-is-at-least-32-characters-long".into(),
            3600,
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = test_signer();
        let token = signer.issue("space-1", "Client@Example.com").unwrap();
        assert!(!token.is_empty());

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.space_id, "space-1");
        assert_eq!(claims.email, "client@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let signer = test_signer();
        assert!(matches!(
            signer.verify("not-a-token"),
            Err(GangwayError::Session(_))
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer1 = test_signer();
        let signer2 = SessionSigner::new(
            "different-secret-that-is-at-least-32-chars".into(),
            3600,
        )
        .unwrap();

        let token = signer1.issue("space-1", "client@example.com").unwrap();
        assert!(signer2.verify(&token).is_err());
    }

    #[test]
    fn test_secret_validation() {
        assert!(SessionSigner::new("short".into(), 3600).is_err());
        assert!(SessionSigner::new("".into(), 3600).is_err());
        assert!(SessionSigner::new("this-secret-is-at-least-32-chars-long".into(), 3600).is_ok());
    }
}
