//! SurrealDB implementation of the job board document store
//!
//! Provides connection management and CRUD operations for the admin, company,
//! student, job and application tables. Records are keyed by the domain UUID
//! (`table:⟨uuid⟩`); references between records are stored as UUID strings.
//!
//! Author: hephaex@gmail.com

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobboard_core::{
    Admin, AdminStore, Application, ApplicationStore, Company, CompanyStore, DatabaseConfig, Job,
    JobBoardError, JobStore, Result, Student, StudentStore, EMAIL_TAKEN,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use surrealdb::sql::{Id, Thing};
use surrealdb::Surreal;
use uuid::Uuid;

const ADMIN_TABLE: &str = "admin";
const COMPANY_TABLE: &str = "company";
const STUDENT_TABLE: &str = "student";
const JOB_TABLE: &str = "job";
const APPLICATION_TABLE: &str = "application";

const COMPANY_EMAIL_INDEX: &str = "idx_company_email";
const STUDENT_EMAIL_INDEX: &str = "idx_student_email";

/// SurrealDB document store implementation
pub struct SurrealDbStore {
    client: Surreal<Client>,
}

impl SurrealDbStore {
    /// Create a new SurrealDB connection
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        // Remove ws:// or wss:// prefix if present (surrealdb crate adds it automatically)
        let url = config
            .surrealdb_url
            .strip_prefix("ws://")
            .or_else(|| config.surrealdb_url.strip_prefix("wss://"))
            .unwrap_or(&config.surrealdb_url);

        let client = Surreal::new::<Ws>(url)
            .await
            .map_err(|e| db_error("SurrealDB connection failed", e))?;

        client
            .signin(Root {
                username: &config.surrealdb_user,
                password: &config.surrealdb_pass,
            })
            .await
            .map_err(|e| db_error("SurrealDB auth failed", e))?;

        client
            .use_ns(&config.surrealdb_namespace)
            .use_db(&config.surrealdb_database)
            .await
            .map_err(|e| db_error("SurrealDB namespace error", e))?;

        Ok(Self { client })
    }

    /// Initialize schema (idempotent, run on startup and by the CLI)
    pub async fn init_schema(&self) -> Result<()> {
        self.client
            .query(
                r#"
                DEFINE TABLE IF NOT EXISTS admin SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS idx_admin_login ON admin FIELDS admin_name, email;

                DEFINE TABLE IF NOT EXISTS company SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS idx_company_email ON company FIELDS email UNIQUE;

                DEFINE TABLE IF NOT EXISTS student SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS idx_student_email ON student FIELDS email UNIQUE;

                DEFINE TABLE IF NOT EXISTS job SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS idx_job_created_by ON job FIELDS created_by;

                DEFINE TABLE IF NOT EXISTS application SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS idx_application_job ON application FIELDS job_id;
                DEFINE INDEX IF NOT EXISTS idx_application_student ON application FIELDS created_by;
                DEFINE INDEX IF NOT EXISTS idx_application_company ON application FIELDS created_for;
            "#,
            )
            .await
            .map_err(|e| db_error("Schema init failed", e))?
            .check()
            .map_err(|e| db_error("Schema init failed", e))?;

        Ok(())
    }

    async fn create_record<R>(&self, table: &'static str, id: Uuid, record: R) -> Result<()>
    where
        R: Serialize + DeserializeOwned + 'static,
    {
        let _: Option<R> = self
            .client
            .create((table, id.to_string()))
            .content(record)
            .await
            .map_err(|e| create_error(table, e))?;
        Ok(())
    }

    async fn select_record<R>(&self, table: &'static str, id: Uuid) -> Result<Option<R>>
    where
        R: DeserializeOwned + 'static,
    {
        self.client
            .select((table, id.to_string()))
            .await
            .map_err(|e| db_error(&format!("Failed to get {table}"), e))
    }

    async fn delete_record<R>(&self, table: &'static str, id: Uuid) -> Result<Option<R>>
    where
        R: DeserializeOwned + 'static,
    {
        self.client
            .delete((table, id.to_string()))
            .await
            .map_err(|e| db_error(&format!("Failed to delete {table}"), e))
    }

    /// Run `SELECT * FROM <table> WHERE <field> = $value ORDER BY created_at`
    async fn select_where<R>(
        &self,
        table: &'static str,
        field: &'static str,
        value: String,
    ) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
    {
        let query = format!("SELECT * FROM {table} WHERE {field} = $value ORDER BY created_at");
        self.client
            .query(query)
            .bind(("value", value))
            .await
            .map_err(|e| db_error("Query failed", e))?
            .take(0)
            .map_err(|e| db_error("Result extraction failed", e))
    }

    async fn select_all<R>(&self, table: &'static str) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
    {
        let query = format!("SELECT * FROM {table} ORDER BY created_at");
        self.client
            .query(query)
            .await
            .map_err(|e| db_error("Query failed", e))?
            .take(0)
            .map_err(|e| db_error("Result extraction failed", e))
    }
}

fn db_error(context: &str, e: impl std::fmt::Display) -> JobBoardError {
    JobBoardError::DatabaseError(format!("{context}: {e}"))
}

/// A write that loses a signup race trips the UNIQUE email index
fn create_error(table: &str, e: impl std::fmt::Display) -> JobBoardError {
    let message = e.to_string();
    let email_index = match table {
        COMPANY_TABLE => Some(COMPANY_EMAIL_INDEX),
        STUDENT_TABLE => Some(STUDENT_EMAIL_INDEX),
        _ => None,
    };

    match email_index {
        Some(index) if message.contains(index) && message.contains("already contains") => {
            JobBoardError::Conflict(EMAIL_TAKEN.to_string())
        }
        _ => db_error(&format!("Failed to store {table}"), message),
    }
}

/// Recover the domain UUID from a record id such as `company:⟨…⟩`
fn thing_to_uuid(thing: Option<&Thing>) -> Result<Uuid> {
    let thing = thing.ok_or_else(|| JobBoardError::DatabaseError("Record without id".into()))?;
    let raw = match &thing.id {
        Id::String(s) => s.clone(),
        other => other.to_string(),
    };
    let trimmed = raw.trim_matches(|c| c == '⟨' || c == '⟩' || c == '`');
    Uuid::parse_str(trimmed)
        .map_err(|e| JobBoardError::DatabaseError(format!("Invalid record id {thing}: {e}")))
}

fn parse_ref(raw: &str, field: &str) -> Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| JobBoardError::DatabaseError(format!("Invalid {field} reference {raw}: {e}")))
}

fn collect<R, T>(records: Vec<R>, convert: impl Fn(R) -> Result<T>) -> Result<Vec<T>> {
    records.into_iter().map(convert).collect()
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AdminRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Thing>,
    admin_name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Admin> for AdminRecord {
    fn from(a: &Admin) -> Self {
        Self {
            id: None,
            admin_name: a.admin_name.clone(),
            email: a.email.clone(),
            password_hash: a.password_hash.clone(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

impl AdminRecord {
    fn into_admin(self) -> Result<Admin> {
        Ok(Admin {
            id: thing_to_uuid(self.id.as_ref())?,
            admin_name: self.admin_name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CompanyRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Thing>,
    company_name: String,
    email: String,
    password_hash: String,
    business_phone_number: u64,
    business_details: String,
    company_address: String,
    city: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Company> for CompanyRecord {
    fn from(c: &Company) -> Self {
        Self {
            id: None,
            company_name: c.company_name.clone(),
            email: c.email.clone(),
            password_hash: c.password_hash.clone(),
            business_phone_number: c.business_phone_number,
            business_details: c.business_details.clone(),
            company_address: c.company_address.clone(),
            city: c.city.clone(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl CompanyRecord {
    fn into_company(self) -> Result<Company> {
        Ok(Company {
            id: thing_to_uuid(self.id.as_ref())?,
            company_name: self.company_name,
            email: self.email,
            password_hash: self.password_hash,
            business_phone_number: self.business_phone_number,
            business_details: self.business_details,
            company_address: self.company_address,
            city: self.city,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StudentRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Thing>,
    student_name: String,
    father_name: String,
    email: String,
    password_hash: String,
    college_name: String,
    majors: Vec<String>,
    gender: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Student> for StudentRecord {
    fn from(s: &Student) -> Self {
        Self {
            id: None,
            student_name: s.student_name.clone(),
            father_name: s.father_name.clone(),
            email: s.email.clone(),
            password_hash: s.password_hash.clone(),
            college_name: s.college_name.clone(),
            majors: s.majors.clone(),
            gender: s.gender.clone(),
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

impl StudentRecord {
    fn into_student(self) -> Result<Student> {
        Ok(Student {
            id: thing_to_uuid(self.id.as_ref())?,
            student_name: self.student_name,
            father_name: self.father_name,
            email: self.email,
            password_hash: self.password_hash,
            college_name: self.college_name,
            majors: self.majors,
            gender: self.gender,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JobRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Thing>,
    required_position: String,
    required_experience: String,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Job> for JobRecord {
    fn from(j: &Job) -> Self {
        Self {
            id: None,
            required_position: j.required_position.clone(),
            required_experience: j.required_experience.clone(),
            created_by: j.created_by.to_string(),
            created_at: j.created_at,
            updated_at: j.updated_at,
        }
    }
}

impl JobRecord {
    fn into_job(self) -> Result<Job> {
        Ok(Job {
            id: thing_to_uuid(self.id.as_ref())?,
            required_position: self.required_position,
            required_experience: self.required_experience,
            created_by: parse_ref(&self.created_by, "created_by")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApplicationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Thing>,
    total_experience: String,
    area_of_interest: Vec<String>,
    experience_in_specified_field: String,
    is_fresh_graduate: bool,
    certifications: Vec<String>,
    job_id: String,
    created_for: String,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Application> for ApplicationRecord {
    fn from(a: &Application) -> Self {
        Self {
            id: None,
            total_experience: a.total_experience.clone(),
            area_of_interest: a.area_of_interest.clone(),
            experience_in_specified_field: a.experience_in_specified_field.clone(),
            is_fresh_graduate: a.is_fresh_graduate,
            certifications: a.certifications.clone(),
            job_id: a.job_id.to_string(),
            created_for: a.created_for.to_string(),
            created_by: a.created_by.to_string(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

impl ApplicationRecord {
    fn into_application(self) -> Result<Application> {
        Ok(Application {
            id: thing_to_uuid(self.id.as_ref())?,
            total_experience: self.total_experience,
            area_of_interest: self.area_of_interest,
            experience_in_specified_field: self.experience_in_specified_field,
            is_fresh_graduate: self.is_fresh_graduate,
            certifications: self.certifications,
            job_id: parse_ref(&self.job_id, "job_id")?,
            created_for: parse_ref(&self.created_for, "created_for")?,
            created_by: parse_ref(&self.created_by, "created_by")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ============================================================================
// Store trait implementations
// ============================================================================

#[async_trait]
impl AdminStore for SurrealDbStore {
    async fn insert_admin(&self, admin: Admin) -> Result<Admin> {
        self.create_record(ADMIN_TABLE, admin.id, AdminRecord::from(&admin))
            .await?;
        Ok(admin)
    }

    async fn find_admin(&self, id: Uuid) -> Result<Option<Admin>> {
        let record: Option<AdminRecord> = self.select_record(ADMIN_TABLE, id).await?;
        record.map(AdminRecord::into_admin).transpose()
    }

    async fn find_admin_by_login(&self, admin_name: &str, email: &str) -> Result<Option<Admin>> {
        let records: Vec<AdminRecord> = self
            .client
            .query("SELECT * FROM admin WHERE admin_name = $admin_name AND email = $email LIMIT 1")
            .bind(("admin_name", admin_name.to_string()))
            .bind(("email", email.to_string()))
            .await
            .map_err(|e| db_error("Query failed", e))?
            .take(0)
            .map_err(|e| db_error("Result extraction failed", e))?;

        records
            .into_iter()
            .next()
            .map(AdminRecord::into_admin)
            .transpose()
    }
}

#[async_trait]
impl CompanyStore for SurrealDbStore {
    async fn insert_company(&self, company: Company) -> Result<Company> {
        self.create_record(COMPANY_TABLE, company.id, CompanyRecord::from(&company))
            .await?;
        Ok(company)
    }

    async fn find_company(&self, id: Uuid) -> Result<Option<Company>> {
        let record: Option<CompanyRecord> = self.select_record(COMPANY_TABLE, id).await?;
        record.map(CompanyRecord::into_company).transpose()
    }

    async fn find_company_by_email(&self, email: &str) -> Result<Option<Company>> {
        let records: Vec<CompanyRecord> = self
            .select_where(COMPANY_TABLE, "email", email.to_string())
            .await?;
        records
            .into_iter()
            .next()
            .map(CompanyRecord::into_company)
            .transpose()
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        let records: Vec<CompanyRecord> = self.select_all(COMPANY_TABLE).await?;
        collect(records, CompanyRecord::into_company)
    }

    async fn delete_company(&self, id: Uuid) -> Result<Option<Company>> {
        let record: Option<CompanyRecord> = self.delete_record(COMPANY_TABLE, id).await?;
        record.map(CompanyRecord::into_company).transpose()
    }
}

#[async_trait]
impl StudentStore for SurrealDbStore {
    async fn insert_student(&self, student: Student) -> Result<Student> {
        self.create_record(STUDENT_TABLE, student.id, StudentRecord::from(&student))
            .await?;
        Ok(student)
    }

    async fn find_student(&self, id: Uuid) -> Result<Option<Student>> {
        let record: Option<StudentRecord> = self.select_record(STUDENT_TABLE, id).await?;
        record.map(StudentRecord::into_student).transpose()
    }

    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        let records: Vec<StudentRecord> = self
            .select_where(STUDENT_TABLE, "email", email.to_string())
            .await?;
        records
            .into_iter()
            .next()
            .map(StudentRecord::into_student)
            .transpose()
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let records: Vec<StudentRecord> = self.select_all(STUDENT_TABLE).await?;
        collect(records, StudentRecord::into_student)
    }

    async fn delete_student(&self, id: Uuid) -> Result<Option<Student>> {
        let record: Option<StudentRecord> = self.delete_record(STUDENT_TABLE, id).await?;
        record.map(StudentRecord::into_student).transpose()
    }
}

#[async_trait]
impl JobStore for SurrealDbStore {
    async fn insert_job(&self, job: Job) -> Result<Job> {
        self.create_record(JOB_TABLE, job.id, JobRecord::from(&job))
            .await?;
        Ok(job)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>> {
        let record: Option<JobRecord> = self.select_record(JOB_TABLE, id).await?;
        record.map(JobRecord::into_job).transpose()
    }

    async fn list_jobs_by_company(&self, company_id: Uuid) -> Result<Vec<Job>> {
        let records: Vec<JobRecord> = self
            .select_where(JOB_TABLE, "created_by", company_id.to_string())
            .await?;
        collect(records, JobRecord::into_job)
    }

    async fn list_jobs(&self) -> Result<Vec<Job>> {
        let records: Vec<JobRecord> = self.select_all(JOB_TABLE).await?;
        collect(records, JobRecord::into_job)
    }

    async fn delete_job(&self, id: Uuid) -> Result<Option<Job>> {
        let record: Option<JobRecord> = self.delete_record(JOB_TABLE, id).await?;
        record.map(JobRecord::into_job).transpose()
    }
}

#[async_trait]
impl ApplicationStore for SurrealDbStore {
    async fn insert_application(&self, application: Application) -> Result<Application> {
        self.create_record(
            APPLICATION_TABLE,
            application.id,
            ApplicationRecord::from(&application),
        )
        .await?;
        Ok(application)
    }

    async fn list_applications_by_student(&self, student_id: Uuid) -> Result<Vec<Application>> {
        let records: Vec<ApplicationRecord> = self
            .select_where(APPLICATION_TABLE, "created_by", student_id.to_string())
            .await?;
        collect(records, ApplicationRecord::into_application)
    }

    async fn list_applications_by_company(&self, company_id: Uuid) -> Result<Vec<Application>> {
        let records: Vec<ApplicationRecord> = self
            .select_where(APPLICATION_TABLE, "created_for", company_id.to_string())
            .await?;
        collect(records, ApplicationRecord::into_application)
    }

    async fn list_applications_by_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        let records: Vec<ApplicationRecord> = self
            .select_where(APPLICATION_TABLE, "job_id", job_id.to_string())
            .await?;
        collect(records, ApplicationRecord::into_application)
    }

    async fn list_applications(&self) -> Result<Vec<Application>> {
        let records: Vec<ApplicationRecord> = self.select_all(APPLICATION_TABLE).await?;
        collect(records, ApplicationRecord::into_application)
    }

    async fn delete_application(&self, id: Uuid) -> Result<Option<Application>> {
        let record: Option<ApplicationRecord> = self.delete_record(APPLICATION_TABLE, id).await?;
        record.map(ApplicationRecord::into_application).transpose()
    }
}
