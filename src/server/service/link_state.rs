//! Signed, expiring OAuth `state` tokens for the account-linking flow.
//!
//! The state carries the email of the member who started linking. It is an HS256 JWT
//! signed with `LINK_STATE_SECRET` and valid for ten minutes, so the callback can trust
//! it without server-side storage.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::server::error::{link::ResolutionFailure, AppError};

/// How long a link state token remains valid after issue.
pub const LINK_STATE_TTL_SECS: i64 = 600;

#[derive(Debug, Serialize, Deserialize)]
struct LinkStateClaims {
    /// Email of the member who initiated linking.
    sub: String,
    iat: i64,
    exp: i64,
    /// Random value making every issued state unique.
    nonce: String,
}

#[derive(Clone)]
pub struct LinkStateService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl LinkStateService {
    /// Creates a signer for the given secret with the default ten minute lifetime.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(LINK_STATE_TTL_SECS),
        }
    }

    /// Overrides the token lifetime.
    #[cfg(test)]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issues a state token for the member with `email`.
    ///
    /// # Returns
    /// - `Ok(String)` - Encoded token to send as the OAuth `state`
    /// - `Err(AppError::JwtErr)` - Signing failed
    pub fn issue(&self, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = LinkStateClaims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            nonce: format!("{:032x}", rand::rng().random::<u128>()),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verifies a state token and returns the email it carries.
    ///
    /// Expiry is checked without leeway.
    ///
    /// # Returns
    /// - `Ok(String)` - Signature valid, not expired, syntactically valid email
    /// - `Err(ResolutionFailure::StateInvalid)` - Any other token
    pub fn verify(&self, token: &str) -> Result<String, ResolutionFailure> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<LinkStateClaims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!("Rejected link state: {}", e);
            ResolutionFailure::StateInvalid
        })?;

        let email = data.claims.sub;
        if !email.validate_email() {
            tracing::debug!("Link state carries a malformed email");
            return Err(ResolutionFailure::StateInvalid);
        }

        Ok(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-link-state-secret-0123456789abcdef";

    #[test]
    fn verifies_issued_state() {
        let service = LinkStateService::new(SECRET);

        let token = service.issue("alice@example.com").unwrap();

        assert_eq!(service.verify(&token), Ok("alice@example.com".to_string()));
    }

    #[test]
    fn issued_states_are_unique() {
        let service = LinkStateService::new(SECRET);

        let first = service.issue("alice@example.com").unwrap();
        let second = service.issue("alice@example.com").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn rejects_expired_state() {
        let service = LinkStateService::new(SECRET).with_ttl(Duration::seconds(-5));

        let token = service.issue("alice@example.com").unwrap();

        assert_eq!(service.verify(&token), Err(ResolutionFailure::StateInvalid));
    }

    #[test]
    fn rejects_state_signed_with_other_secret() {
        let issuer = LinkStateService::new("another-secret-another-secret-0000");
        let verifier = LinkStateService::new(SECRET);

        let token = issuer.issue("alice@example.com").unwrap();

        assert_eq!(verifier.verify(&token), Err(ResolutionFailure::StateInvalid));
    }

    #[test]
    fn rejects_raw_email_state() {
        let service = LinkStateService::new(SECRET);

        assert_eq!(
            service.verify("alice@example.com"),
            Err(ResolutionFailure::StateInvalid)
        );
    }

    #[test]
    fn rejects_state_with_malformed_email() {
        let service = LinkStateService::new(SECRET);

        let token = service.issue("not-an-email").unwrap();

        assert_eq!(service.verify(&token), Err(ResolutionFailure::StateInvalid));
    }
}
