//! services/api/src/token.rs
//!
//! Issues and verifies the HS256 session tokens handed out at login.
//! The claims layout matches the tokens the mobile client already holds:
//! `{user_id, email, tipo, exp}` plus an issued-at timestamp.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use receita_core::domain::Role;

/// Tokens live exactly this long after issuance.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub tipo: Role,
    /// Absent in tokens issued by older deployments.
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies session tokens with the configured secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The 24 hour lifetime is exact; no clock-skew allowance.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token expiring [`TOKEN_TTL_HOURS`] from now.
    pub fn issue(
        &self,
        user_id: i64,
        email: &str,
        role: Role,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            tipo: role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verifies signature and expiry, returning the embedded claims.
    ///
    /// The embedded role is informational only; callers must re-resolve the
    /// user's current role from storage before making permission decisions.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret")
    }

    #[test]
    fn issued_tokens_verify() {
        let tokens = service();
        let token = tokens.issue(7, "ana@example.com", Role::Physician).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.tipo, Role::Physician);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn expired_tokens_are_rejected_as_expired() {
        let tokens = service();
        let now = Utc::now();
        let claims = Claims {
            user_id: 7,
            email: "ana@example.com".to_string(),
            tipo: Role::Patient,
            iat: (now - Duration::hours(25)).timestamp(),
            exp: (now - Duration::minutes(1)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding_key).unwrap();
        assert!(matches!(
            tokens.verify(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn tokens_near_the_expiry_boundary_still_verify() {
        let tokens = service();
        let now = Utc::now();
        let claims = Claims {
            user_id: 7,
            email: "ana@example.com".to_string(),
            tipo: Role::Patient,
            iat: (now - Duration::hours(23) - Duration::minutes(59)).timestamp(),
            exp: (now + Duration::minutes(1)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding_key).unwrap();
        assert!(tokens.verify(&token).is_ok());
    }

    #[test]
    fn foreign_signatures_are_rejected_as_invalid() {
        let token = TokenService::new("another-secret")
            .issue(7, "ana@example.com", Role::Patient)
            .unwrap();
        assert!(matches!(
            service().verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_is_rejected_as_invalid() {
        assert!(matches!(
            service().verify("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
