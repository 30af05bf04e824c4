//! Route guards for the three actor roles
//!
//! A guard reads the token from the configured header, verifies it, checks the
//! role it was issued for and then confirms the identity still exists in the
//! matching credential collection. On success the `Principal` is added to the
//! request extensions for handlers to pick up with `Extension<Principal>`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jobboard_core::{store::CredentialLookup, JobBoardError, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::jwt::{JwtError, TokenService};
use crate::audit::{audit_log, AuditContext, AuditEvent};
use crate::error::{ApiError, INTERNAL_ERROR_MESSAGE};
use crate::state::AppState;

/// Actor resolved from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub role: Role,
    pub id: Uuid,
    pub email: String,
    /// Present for admins
    pub name: Option<String>,
}

/// Authentication failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No token authentication denied")]
    MissingToken,

    #[error("Token is not valid: {0}")]
    InvalidToken(#[from] JwtError),

    #[error("Token issued for {actual} used on {expected} routes")]
    WrongRole { expected: Role, actual: Role },

    #[error("Invalid token")]
    UnknownIdentity,

    #[error("Credential lookup failed: {0}")]
    Store(#[from] JobBoardError),
}

impl AuthError {
    fn status_and_body(&self) -> (StatusCode, ApiError) {
        match self {
            AuthError::MissingToken => (
                StatusCode::BAD_REQUEST,
                ApiError::new("MISSING_TOKEN", "No token authentication denied"),
            ),
            AuthError::InvalidToken(_) | AuthError::WrongRole { .. } => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("INVALID_TOKEN", "Token is not valid"),
            ),
            AuthError::UnknownIdentity => (
                StatusCode::BAD_REQUEST,
                ApiError::new("UNKNOWN_IDENTITY", "Invalid token"),
            ),
            AuthError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", INTERNAL_ERROR_MESSAGE),
            ),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Store(err) = &self {
            tracing::error!(error = %err, "Credential lookup failed during authentication");
        }

        let (status, body) = self.status_and_body();
        body.into_response_with(status)
    }
}

/// Resolve a raw header value into a principal of `expected_role`
pub async fn verify_principal<L>(
    tokens: &TokenService,
    lookup: &L,
    expected_role: Role,
    token: Option<&str>,
) -> Result<Principal, AuthError>
where
    L: CredentialLookup + ?Sized,
{
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = tokens.verify(token)?;

    if claims.role != expected_role {
        return Err(AuthError::WrongRole {
            expected: expected_role,
            actual: claims.role,
        });
    }

    if !lookup
        .credential_exists(claims.role, claims.identity.id)
        .await?
    {
        return Err(AuthError::UnknownIdentity);
    }

    Ok(Principal {
        role: claims.role,
        id: claims.identity.id,
        email: claims.identity.email,
        name: claims.identity.name,
    })
}

async fn authenticate(
    state: &AppState,
    expected_role: Role,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header_name = state.config.auth.token_header.as_str();
    let token = request
        .headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match verify_principal(&state.tokens, &*state.store, expected_role, token.as_deref())
        .await
    {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            Ok(next.run(request).await)
        }
        Err(err) => {
            let ctx = AuditContext::from_headers(request.headers());
            match &err {
                AuthError::InvalidToken(_) | AuthError::WrongRole { .. } => {
                    audit_log(&AuditEvent::InvalidToken {
                        expected_role,
                        reason: err.to_string(),
                        ip_address: ctx.ip_address,
                        user_agent: ctx.user_agent,
                    });
                }
                AuthError::UnknownIdentity => {
                    if let Some(claims) = token.as_deref().and_then(|t| state.tokens.verify(t).ok())
                    {
                        audit_log(&AuditEvent::UnknownIdentity {
                            role: claims.role,
                            user_id: claims.identity.id,
                            email: claims.identity.email,
                            ip_address: ctx.ip_address,
                            user_agent: ctx.user_agent,
                        });
                    }
                }
                AuthError::MissingToken | AuthError::Store(_) => {}
            }
            Err(err)
        }
    }
}

/// Guard for `/admin` protected routes
pub async fn admin_auth(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    authenticate(&state, Role::Admin, request, next).await
}

/// Guard for `/company` protected routes
pub async fn company_auth(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    authenticate(&state, Role::Company, request, next).await
}

/// Guard for `/student` protected routes
pub async fn student_auth(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    authenticate(&state, Role::Student, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{Identity, JwtConfig};
    use async_trait::async_trait;
    use std::collections::HashSet;

    struct KnownIds(HashSet<(Role, Uuid)>);

    #[async_trait]
    impl CredentialLookup for KnownIds {
        async fn credential_exists(&self, role: Role, id: Uuid) -> jobboard_core::Result<bool> {
            Ok(self.0.contains(&(role, id)))
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl CredentialLookup for BrokenStore {
        async fn credential_exists(&self, _: Role, _: Uuid) -> jobboard_core::Result<bool> {
            Err(JobBoardError::DatabaseError("unreachable".to_string()))
        }
    }

    fn tokens() -> TokenService {
        TokenService::new(JwtConfig {
            secret: "middleware-test-secret".to_string(),
            ..JwtConfig::default()
        })
    }

    fn identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "s@b.com".to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn test_missing_token() {
        let lookup = KnownIds(HashSet::new());
        let err = verify_principal(&tokens(), &lookup, Role::Student, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));

        let err = verify_principal(&tokens(), &lookup, Role::Student, Some("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_valid_token_resolves_principal() {
        let tokens = tokens();
        let identity = identity();
        let lookup = KnownIds(HashSet::from([(Role::Student, identity.id)]));
        let token = tokens.issue_login(Role::Student, identity.clone()).unwrap();

        let principal = verify_principal(&tokens, &lookup, Role::Student, Some(&token))
            .await
            .unwrap();
        assert_eq!(principal.id, identity.id);
        assert_eq!(principal.role, Role::Student);
        assert_eq!(principal.email, "s@b.com");
    }

    #[tokio::test]
    async fn test_wrong_role_rejected() {
        let tokens = tokens();
        let identity = identity();
        let lookup = KnownIds(HashSet::from([(Role::Student, identity.id)]));
        let token = tokens.issue_login(Role::Student, identity).unwrap();

        let err = verify_principal(&tokens, &lookup, Role::Company, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::WrongRole {
                expected: Role::Company,
                actual: Role::Student
            }
        ));
        assert_eq!(err.status_and_body().0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_deleted_identity_rejected() {
        let tokens = tokens();
        let token = tokens.issue_login(Role::Student, identity()).unwrap();
        let lookup = KnownIds(HashSet::new());

        let err = verify_principal(&tokens, &lookup, Role::Student, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownIdentity));

        let (status, body) = err.status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Invalid token");
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let lookup = KnownIds(HashSet::new());
        let err = verify_principal(&tokens(), &lookup, Role::Admin, Some("not.a.jwt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
        assert_eq!(err.status_and_body().1.message, "Token is not valid");
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let tokens = tokens();
        let token = tokens.issue_login(Role::Admin, identity()).unwrap();

        let err = verify_principal(&tokens, &BrokenStore, Role::Admin, Some(&token))
            .await
            .unwrap_err();
        let (status, body) = err.status_and_body();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.message.contains("unreachable"));
    }
}
