//! Job board core - domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the job board:
//! - Credential holders (admin, company, student) and their public projections
//! - Job postings and job applications
//! - Common error types
//! - Store traits implemented by the document store backends
//! - Configuration management

pub mod config;
pub mod models;
pub mod store;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, StoreBackend};
pub use models::{
    Admin, AdminPublic, Application, ApplicationDetails, Company, CompanyJobs, CompanyPublic, Job,
    JobWithCompany, Role, Student, StudentPublic,
};
pub use store::{
    AdminStore, ApplicationStore, CompanyStore, CredentialLookup, DocumentStore, JobStore,
    StudentStore, EMAIL_TAKEN,
};

use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for job board operations
#[derive(Error, Debug)]
pub enum JobBoardError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidId(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, JobBoardError>;

// ============================================================================
// Identifiers
// ============================================================================

/// Parse a client-supplied record identifier.
///
/// Malformed identifiers fail with `InvalidId` so callers can tell them apart
/// from well-formed identifiers that reference nothing (`NotFound`).
pub fn parse_record_id(raw: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| JobBoardError::InvalidId(format!("Invalid {what} ID")))
}
