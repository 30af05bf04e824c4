//! Security audit logging
//!
//! Structured audit events for logins, signups, token failures and admin
//! deletions. Every event is logged at INFO level with the "audit" target so it
//! can be filtered and routed separately from application logs.
//!
//! ```ignore
//! use jobboard_api::audit::{audit_log, AuditEvent};
//!
//! audit_log(&AuditEvent::LoginSuccess {
//!     role: Role::Company,
//!     user_id: company.id,
//!     email: company.email.clone(),
//!     ip_address: Some("192.168.1.1".to_string()),
//!     user_agent: None,
//! });
//! ```
//!
//! Author: hephaex@gmail.com

use axum::http::HeaderMap;
use chrono::Utc;
use jobboard_core::Role;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Security audit events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Successful login
    LoginSuccess {
        role: Role,
        user_id: Uuid,
        email: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Failed login attempt
    LoginFailure {
        role: Role,
        email: Option<String>,
        reason: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Successful account registration
    SignupSuccess {
        role: Role,
        user_id: Uuid,
        email: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Rejected account registration
    SignupFailure {
        role: Role,
        email: Option<String>,
        reason: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Token that failed verification or was presented to the wrong route group
    InvalidToken {
        expected_role: Role,
        reason: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Validly signed token whose account no longer exists
    UnknownIdentity {
        role: Role,
        user_id: Uuid,
        email: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Record removed by an admin, with the dependents removed alongside it
    RecordDeleted {
        admin_id: Uuid,
        record: String,
        record_id: Uuid,
        jobs_removed: usize,
        applications_removed: usize,
        ip_address: Option<String>,
    },
}

/// Request metadata attached to audit events
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl AuditContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            ip_address: extract_ip_address(headers),
            user_agent: extract_user_agent(headers),
        }
    }
}

/// Log a security audit event with structured fields
pub fn audit_log(event: &AuditEvent) {
    let timestamp = Utc::now();

    let event_json = serde_json::to_string(event)
        .unwrap_or_else(|e| format!("{{\"error\":\"Failed to serialize audit event: {e}\"}}"));

    match event {
        AuditEvent::LoginSuccess {
            role,
            user_id,
            email,
            ip_address,
            ..
        } => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                role = %role,
                user_id = %user_id,
                email = %email,
                ip_address = ?ip_address,
                "Login successful"
            );
        }
        AuditEvent::LoginFailure {
            role,
            email,
            reason,
            ip_address,
            ..
        } => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                role = %role,
                email = ?email,
                reason = %reason,
                ip_address = ?ip_address,
                "Login failed"
            );
        }
        AuditEvent::SignupSuccess {
            role,
            user_id,
            email,
            ip_address,
            ..
        } => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                role = %role,
                user_id = %user_id,
                email = %email,
                ip_address = ?ip_address,
                "Signup successful"
            );
        }
        AuditEvent::SignupFailure {
            role,
            email,
            reason,
            ip_address,
            ..
        } => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                role = %role,
                email = ?email,
                reason = %reason,
                ip_address = ?ip_address,
                "Signup failed"
            );
        }
        AuditEvent::InvalidToken {
            expected_role,
            reason,
            ip_address,
            ..
        } => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                expected_role = %expected_role,
                reason = %reason,
                ip_address = ?ip_address,
                "Invalid token"
            );
        }
        AuditEvent::UnknownIdentity {
            role,
            user_id,
            email,
            ip_address,
            ..
        } => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                role = %role,
                user_id = %user_id,
                email = %email,
                ip_address = ?ip_address,
                "Token references a deleted account"
            );
        }
        AuditEvent::RecordDeleted {
            admin_id,
            record,
            record_id,
            jobs_removed,
            applications_removed,
            ip_address,
        } => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                admin_id = %admin_id,
                record = %record,
                record_id = %record_id,
                jobs_removed = %jobs_removed,
                applications_removed = %applications_removed,
                ip_address = ?ip_address,
                "Record deleted"
            );
        }
    }
}

/// Extract the client IP address from proxy headers
///
/// Checks X-Forwarded-For (first hop), then X-Real-IP.
pub fn extract_ip_address(headers: &HeaderMap) -> Option<String> {
    if let Some(xff) = headers.get("x-forwarded-for") {
        if let Ok(xff_str) = xff.to_str() {
            if let Some(first_ip) = xff_str.split(',').next() {
                return Some(first_ip.trim().to_string());
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(ip_str) = real_ip.to_str() {
            return Some(ip_str.to_string());
        }
    }

    None
}

/// Extract the user agent from request headers
pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_event_serialization() {
        let event = AuditEvent::LoginSuccess {
            role: Role::Student,
            user_id: Uuid::new_v4(),
            email: "s@b.com".to_string(),
            ip_address: Some("192.168.1.1".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event_type\":\"login_success\""));
        assert!(json.contains("\"role\":\"student\""));
        assert!(json.contains("s@b.com"));
    }

    #[test]
    fn test_audit_log_all_variants() {
        let id = Uuid::new_v4();
        let events = vec![
            AuditEvent::LoginFailure {
                role: Role::Company,
                email: Some("a@b.com".to_string()),
                reason: "Invalid Password".to_string(),
                ip_address: None,
                user_agent: None,
            },
            AuditEvent::SignupSuccess {
                role: Role::Company,
                user_id: id,
                email: "a@b.com".to_string(),
                ip_address: None,
                user_agent: None,
            },
            AuditEvent::SignupFailure {
                role: Role::Student,
                email: None,
                reason: "PLease fill the email".to_string(),
                ip_address: None,
                user_agent: None,
            },
            AuditEvent::InvalidToken {
                expected_role: Role::Admin,
                reason: "Invalid token signature".to_string(),
                ip_address: None,
                user_agent: None,
            },
            AuditEvent::UnknownIdentity {
                role: Role::Student,
                user_id: id,
                email: "s@b.com".to_string(),
                ip_address: None,
                user_agent: None,
            },
            AuditEvent::RecordDeleted {
                admin_id: Uuid::new_v4(),
                record: "company".to_string(),
                record_id: id,
                jobs_removed: 2,
                applications_removed: 3,
                ip_address: Some("10.0.0.1".to_string()),
            },
        ];

        for event in &events {
            audit_log(event);
        }
    }

    #[test]
    fn test_extract_ip_from_x_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.1, 198.51.100.1".parse().unwrap(),
        );

        assert_eq!(extract_ip_address(&headers), Some("203.0.113.1".to_string()));
    }

    #[test]
    fn test_extract_ip_from_x_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "203.0.113.1".parse().unwrap());

        assert_eq!(extract_ip_address(&headers), Some("203.0.113.1".to_string()));
    }

    #[test]
    fn test_audit_context_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::USER_AGENT,
            "Mozilla/5.0 (Test)".parse().unwrap(),
        );

        let ctx = AuditContext::from_headers(&headers);
        assert_eq!(ctx.user_agent.as_deref(), Some("Mozilla/5.0 (Test)"));
        assert_eq!(ctx.ip_address, None);

        let empty = AuditContext::from_headers(&HeaderMap::new());
        assert!(empty.ip_address.is_none() && empty.user_agent.is_none());
    }
}
