//! API handlers
//!
//! Handlers stay thin: unpack the body, call a service, wrap the result in the
//! `{success, message, ...}` envelope. JSON bodies are taken as
//! `Result<Json<T>, JsonRejection>` so malformed input still answers with the
//! standard error envelope.
//!
//! Author: hephaex@gmail.com

pub mod admin;
pub mod company;
pub mod health;
pub mod jobs;
pub mod student;

use jobboard_core::{CompanyPublic, Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::audit::{audit_log, AuditContext, AuditEvent};
use crate::error::AppError;

/// All registered companies
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompaniesResponse {
    pub success: bool,
    pub companies: Vec<CompanyPublic>,
}

fn audit_login(
    role: Role,
    email: Option<String>,
    outcome: Result<Uuid, &AppError>,
    ctx: AuditContext,
) {
    let event = match outcome {
        Ok(user_id) => AuditEvent::LoginSuccess {
            role,
            user_id,
            email: email.unwrap_or_default(),
            ip_address: ctx.ip_address,
            user_agent: ctx.user_agent,
        },
        Err(err) => AuditEvent::LoginFailure {
            role,
            email,
            reason: err.to_string(),
            ip_address: ctx.ip_address,
            user_agent: ctx.user_agent,
        },
    };
    audit_log(&event);
}

fn audit_signup(
    role: Role,
    email: Option<String>,
    outcome: Result<Uuid, &AppError>,
    ctx: AuditContext,
) {
    let event = match outcome {
        Ok(user_id) => AuditEvent::SignupSuccess {
            role,
            user_id,
            email: email.unwrap_or_default(),
            ip_address: ctx.ip_address,
            user_agent: ctx.user_agent,
        },
        Err(err) => AuditEvent::SignupFailure {
            role,
            email,
            reason: err.to_string(),
            ip_address: ctx.ip_address,
            user_agent: ctx.user_agent,
        },
    };
    audit_log(&event);
}
