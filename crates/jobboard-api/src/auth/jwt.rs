//! Token issuing and verification
//!
//! Tokens are HMAC-SHA256 signed JWTs carrying a role-tagged identity claim.
//! Expiry is optional: tokens issued with `TokenLifetime::Unbounded` carry no
//! `exp` claim and still verify.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use jobboard_core::{AuthConfig, Role};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Identity embedded in a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Identifier of the credential record
    pub id: Uuid,
    pub email: String,
    /// Display name, present for admin tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Issued at (Unix epoch seconds)
    pub iat: u64,
    /// Expiration (Unix epoch seconds), absent for unbounded tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    pub role: Role,
    pub identity: Identity,
}

/// How long an issued token stays valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLifetime {
    Unbounded,
    Days(u64),
}

impl TokenLifetime {
    /// `None` and `Some(0)` both select an unbounded lifetime
    pub fn from_days(days: Option<u64>) -> Self {
        match days {
            None | Some(0) => TokenLifetime::Unbounded,
            Some(d) => TokenLifetime::Days(d),
        }
    }

    fn expires_at(&self, now: u64) -> Option<u64> {
        match self {
            TokenLifetime::Unbounded => None,
            TokenLifetime::Days(d) => Some(now.saturating_add(d.saturating_mul(SECONDS_PER_DAY))),
        }
    }
}

/// Token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// Signing configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Token issuer identifier
    pub issuer: String,
    /// Lifetime of tokens issued at login
    pub login_lifetime: TokenLifetime,
    /// Lifetime of tokens issued at signup
    pub signup_lifetime: TokenLifetime,
}

impl From<&AuthConfig> for JwtConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            secret: auth.jwt_secret.clone(),
            issuer: auth.jwt_issuer.clone(),
            login_lifetime: TokenLifetime::from_days(auth.login_token_ttl_days),
            signup_lifetime: TokenLifetime::from_days(auth.signup_token_ttl_days),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

/// Issues and verifies tokens with a process-wide secret
#[derive(Clone)]
pub struct TokenService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Sign a claim for `identity` acting as `role`
    pub fn issue(
        &self,
        role: Role,
        identity: Identity,
        lifetime: TokenLifetime,
    ) -> Result<String, JwtError> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        let claims = Claims {
            iss: self.config.issuer.clone(),
            iat: now,
            exp: lifetime.expires_at(now),
            role,
            identity,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Token for a successful login
    pub fn issue_login(&self, role: Role, identity: Identity) -> Result<String, JwtError> {
        self.issue(role, identity, self.config.login_lifetime)
    }

    /// Token for a freshly registered account
    pub fn issue_signup(&self, role: Role, identity: Identity) -> Result<String, JwtError> {
        self.issue(role, identity, self.config.signup_lifetime)
    }

    /// Check the signature, issuer and (when present) expiry of a token
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.required_spec_claims = HashSet::from(["iss".to_string()]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: &str) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: None,
        }
    }

    #[test]
    fn test_issue_and_verify_token() {
        let tokens = TokenService::new(JwtConfig::default());
        let id = identity("a@b.com");

        let token = tokens
            .issue(Role::Company, id.clone(), TokenLifetime::Days(365))
            .unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.role, Role::Company);
        assert_eq!(claims.identity, id);
        assert_eq!(claims.iss, "jobboard-api");
        assert_eq!(claims.exp, Some(claims.iat + 365 * SECONDS_PER_DAY));
    }

    #[test]
    fn test_unbounded_token_has_no_expiry() {
        let tokens = TokenService::new(JwtConfig::default());
        let admin = Identity {
            name: Some("root".to_string()),
            ..identity("admin@b.com")
        };

        let token = tokens
            .issue(Role::Admin, admin.clone(), TokenLifetime::Unbounded)
            .unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.exp, None);
        assert_eq!(claims.identity.name.as_deref(), Some("root"));
    }

    #[test]
    fn test_invalid_token() {
        let tokens = TokenService::new(JwtConfig::default());
        let result = tokens.verify("invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret() {
        let issuer = TokenService::new(JwtConfig {
            secret: "secret1".to_string(),
            ..Default::default()
        });
        let verifier = TokenService::new(JwtConfig {
            secret: "secret2".to_string(),
            ..Default::default()
        });

        let token = issuer
            .issue(Role::Student, identity("s@b.com"), TokenLifetime::Days(1))
            .unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let tokens = TokenService::new(JwtConfig::default());
        let student = tokens
            .issue(Role::Student, identity("s@b.com"), TokenLifetime::Unbounded)
            .unwrap();
        let admin = tokens
            .issue(Role::Admin, identity("a@b.com"), TokenLifetime::Unbounded)
            .unwrap();

        // Admin payload with the student's signature
        let s: Vec<&str> = student.split('.').collect();
        let a: Vec<&str> = admin.split('.').collect();
        let forged = format!("{}.{}.{}", s[0], a[1], s[2]);

        assert!(matches!(
            tokens.verify(&forged),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token() {
        let config = JwtConfig::default();
        let tokens = TokenService::new(config.clone());
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let claims = Claims {
            iss: config.issuer.clone(),
            iat: now - 7200,
            exp: Some(now - 3600),
            role: Role::Company,
            identity: identity("a@b.com"),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(tokens.verify(&token), Err(JwtError::ExpiredToken)));
    }

    #[test]
    fn test_lifetime_from_days() {
        assert_eq!(TokenLifetime::from_days(None), TokenLifetime::Unbounded);
        assert_eq!(TokenLifetime::from_days(Some(0)), TokenLifetime::Unbounded);
        assert_eq!(TokenLifetime::from_days(Some(30)), TokenLifetime::Days(30));
        assert_eq!(TokenLifetime::Unbounded.expires_at(100), None);
        assert_eq!(TokenLifetime::Days(1).expires_at(100), Some(100 + SECONDS_PER_DAY));
    }
}
