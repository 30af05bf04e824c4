//! Domain models for the job board
//!
//! Credential holders (admins, companies, students) carry an Argon2 password
//! hash. The hash is stored with the document but never leaves the service:
//! every read path converts records into their `*Public` projection first.
//!
//! Identifiers serialize as `_id` and field names as camelCase, matching the
//! JSON shape clients of the job board already consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Roles
// ============================================================================

/// Actor role carried in tokens and used to pick the credential collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Company,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Company => "company",
            Role::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "company" => Ok(Role::Company),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

// ============================================================================
// Credential holders
// ============================================================================

/// Administrator account, provisioned out of band
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub admin_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn new(admin_name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            admin_name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_public(&self) -> AdminPublic {
        AdminPublic {
            id: self.id,
            admin_name: self.admin_name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Admin as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminPublic {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub admin_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Company account
///
/// The email is stored lowercased and trimmed, and is unique across companies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub company_name: String,
    pub email: String,
    pub password_hash: String,
    pub business_phone_number: u64,
    pub business_details: String,
    pub company_address: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn to_public(&self) -> CompanyPublic {
        CompanyPublic {
            id: self.id,
            company_name: self.company_name.clone(),
            email: self.email.clone(),
            business_phone_number: self.business_phone_number,
            business_details: self.business_details.clone(),
            company_address: self.company_address.clone(),
            city: self.city.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Company as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPublic {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub company_name: String,
    pub email: String,
    pub business_phone_number: u64,
    pub business_details: String,
    pub company_address: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub student_name: String,
    pub father_name: String,
    pub email: String,
    pub password_hash: String,
    pub college_name: String,
    pub majors: Vec<String>,
    pub gender: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn to_public(&self) -> StudentPublic {
        StudentPublic {
            id: self.id,
            student_name: self.student_name.clone(),
            father_name: self.father_name.clone(),
            email: self.email.clone(),
            college_name: self.college_name.clone(),
            majors: self.majors.clone(),
            gender: self.gender.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Student as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentPublic {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub student_name: String,
    pub father_name: String,
    pub email: String,
    pub college_name: String,
    pub majors: Vec<String>,
    pub gender: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Jobs
// ============================================================================

/// Job posting owned by exactly one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub required_position: String,
    pub required_experience: String,
    /// Owning company
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(required_position: String, required_experience: String, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            required_position,
            required_experience,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Job together with the public profile of its owning company
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobWithCompany {
    #[serde(flatten)]
    pub job: Job,
    pub company: CompanyPublic,
}

/// All jobs of one company, as listed to admins and students
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyJobs {
    pub company_id: Uuid,
    pub company_name: String,
    pub total_jobs: Vec<Job>,
}

// ============================================================================
// Applications
// ============================================================================

/// A student's application to a job
///
/// `created_for` always equals the owning company of `job_id`; it is stamped
/// from the job record and never read from client input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub total_experience: String,
    pub area_of_interest: Vec<String>,
    pub experience_in_specified_field: String,
    /// Fresh-graduate flag
    #[serde(rename = "freshie", default = "default_true")]
    pub is_fresh_graduate: bool,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub job_id: Uuid,
    /// Company owning the job
    pub created_for: Uuid,
    /// Applying student
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Application joined with the identities it references
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationDetails {
    #[serde(flatten)]
    pub application: Application,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentPublic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyPublic>,
}
