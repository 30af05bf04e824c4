//! Store traits for the job board document collections
//!
//! Each collection gets its own trait so services only name what they need.
//! Backends implement all of them and are used as `Arc<dyn DocumentStore>`.
//!
//! No operation here spans more than one document write; callers that need
//! multi-step behavior (cascading deletes) sequence the calls themselves.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Admin, Application, Company, Job, Role, Student};
use crate::Result;

/// Conflict message for an email already registered under the same role
pub const EMAIL_TAKEN: &str = "Email already existed";

/// Admin credential collection
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn insert_admin(&self, admin: Admin) -> Result<Admin>;

    async fn find_admin(&self, id: Uuid) -> Result<Option<Admin>>;

    /// Login lookup by the normalized (name, email) pair
    async fn find_admin_by_login(&self, admin_name: &str, email: &str) -> Result<Option<Admin>>;
}

/// Company credential collection
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Fails with `Conflict(EMAIL_TAKEN)` if another company holds the email
    async fn insert_company(&self, company: Company) -> Result<Company>;

    async fn find_company(&self, id: Uuid) -> Result<Option<Company>>;

    async fn find_company_by_email(&self, email: &str) -> Result<Option<Company>>;

    async fn list_companies(&self) -> Result<Vec<Company>>;

    /// Delete a company, returning the removed record if it existed
    async fn delete_company(&self, id: Uuid) -> Result<Option<Company>>;
}

/// Student credential collection
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Fails with `Conflict(EMAIL_TAKEN)` if another student holds the email
    async fn insert_student(&self, student: Student) -> Result<Student>;

    async fn find_student(&self, id: Uuid) -> Result<Option<Student>>;

    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>>;

    async fn list_students(&self) -> Result<Vec<Student>>;

    async fn delete_student(&self, id: Uuid) -> Result<Option<Student>>;
}

/// Job postings
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert_job(&self, job: Job) -> Result<Job>;

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>>;

    async fn list_jobs_by_company(&self, company_id: Uuid) -> Result<Vec<Job>>;

    async fn list_jobs(&self) -> Result<Vec<Job>>;

    async fn delete_job(&self, id: Uuid) -> Result<Option<Job>>;
}

/// Job applications
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert_application(&self, application: Application) -> Result<Application>;

    async fn list_applications_by_student(&self, student_id: Uuid) -> Result<Vec<Application>>;

    async fn list_applications_by_company(&self, company_id: Uuid) -> Result<Vec<Application>>;

    async fn list_applications_by_job(&self, job_id: Uuid) -> Result<Vec<Application>>;

    async fn list_applications(&self) -> Result<Vec<Application>>;

    async fn delete_application(&self, id: Uuid) -> Result<Option<Application>>;
}

/// Existence check used to re-resolve token identities on every request
#[async_trait]
pub trait CredentialLookup: Send + Sync {
    async fn credential_exists(&self, role: Role, id: Uuid) -> Result<bool>;
}

#[async_trait]
impl<T> CredentialLookup for T
where
    T: AdminStore + CompanyStore + StudentStore,
{
    async fn credential_exists(&self, role: Role, id: Uuid) -> Result<bool> {
        let exists = match role {
            Role::Admin => self.find_admin(id).await?.is_some(),
            Role::Company => self.find_company(id).await?.is_some(),
            Role::Student => self.find_student(id).await?.is_some(),
        };
        Ok(exists)
    }
}

/// Every collection the job board persists
pub trait DocumentStore:
    AdminStore + CompanyStore + StudentStore + JobStore + ApplicationStore + CredentialLookup
{
}

impl<T> DocumentStore for T where
    T: AdminStore + CompanyStore + StudentStore + JobStore + ApplicationStore + CredentialLookup
{
}
