//! Accounts: signup, login, profiles and admin removal of companies and students
//!
//! Author: hephaex@gmail.com

use chrono::Utc;
use jobboard_core::{
    parse_record_id, Admin, AdminPublic, Company, CompanyPublic, DocumentStore, Role, Student,
    StudentPublic, EMAIL_TAKEN,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, Identity, PasswordConfig, TokenService};
use crate::error::AppError;
use crate::requests::{AdminLoginRequest, CompanySignupRequest, LoginRequest, StudentSignupRequest};
use crate::services::applications::ApplicationService;
use crate::services::jobs::{CascadeCounts, JobService};
use crate::validation;

const UNKNOWN_EMAIL: &str = "login failed check your email";
const UNKNOWN_ADMIN: &str = "login failed check your email or username";
const WRONG_PASSWORD: &str = "Invalid Password";

/// Public profile plus a freshly issued token
#[derive(Debug, Clone)]
pub struct Authenticated<T> {
    pub profile: T,
    pub token: String,
}

/// Removed record and the dependents removed with it
#[derive(Debug, Clone)]
pub struct Deletion<T> {
    pub record: T,
    pub counts: CascadeCounts,
}

pub struct AccountService<'a> {
    store: &'a dyn DocumentStore,
    tokens: &'a TokenService,
    passwords: &'a PasswordConfig,
}

impl<'a> AccountService<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        tokens: &'a TokenService,
        passwords: &'a PasswordConfig,
    ) -> Self {
        Self {
            store,
            tokens,
            passwords,
        }
    }

    // ========================================================================
    // Signup
    // ========================================================================

    pub async fn signup_company(
        &self,
        request: CompanySignupRequest,
    ) -> Result<Authenticated<CompanyPublic>, AppError> {
        let form = validation::company_signup(request)?;

        // skips hashing for known emails; the insert is what enforces uniqueness
        if self.store.find_company_by_email(&form.email).await?.is_some() {
            return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let now = Utc::now();
        let company = self
            .store
            .insert_company(Company {
                id: Uuid::new_v4(),
                company_name: form.company_name,
                email: form.email,
                password_hash: hash_password(&form.password, self.passwords)?,
                business_phone_number: form.business_phone_number,
                business_details: form.business_details,
                company_address: form.company_address,
                city: form.city,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let token = self.tokens.issue_signup(
            Role::Company,
            Identity {
                id: company.id,
                email: company.email.clone(),
                name: None,
            },
        )?;

        info!(company_id = %company.id, "Company registered");
        Ok(Authenticated {
            profile: company.to_public(),
            token,
        })
    }

    pub async fn signup_student(
        &self,
        request: StudentSignupRequest,
    ) -> Result<Authenticated<StudentPublic>, AppError> {
        let form = validation::student_signup(request)?;

        // skips hashing for known emails; the insert is what enforces uniqueness
        if self.store.find_student_by_email(&form.email).await?.is_some() {
            return Err(AppError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let now = Utc::now();
        let student = self
            .store
            .insert_student(Student {
                id: Uuid::new_v4(),
                student_name: form.student_name,
                father_name: form.father_name,
                email: form.email,
                password_hash: hash_password(&form.password, self.passwords)?,
                college_name: form.college_name,
                majors: form.majors,
                gender: form.gender,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let token = self.tokens.issue_signup(
            Role::Student,
            Identity {
                id: student.id,
                email: student.email.clone(),
                name: None,
            },
        )?;

        info!(student_id = %student.id, "Student registered");
        Ok(Authenticated {
            profile: student.to_public(),
            token,
        })
    }

    // ========================================================================
    // Login
    // ========================================================================

    pub async fn login_admin(
        &self,
        request: AdminLoginRequest,
    ) -> Result<Authenticated<AdminPublic>, AppError> {
        let form = validation::admin_login(request)?;

        let admin = self
            .store
            .find_admin_by_login(&form.admin_name, &form.email)
            .await?
            .ok_or_else(|| AppError::InvalidCredentials(UNKNOWN_ADMIN.to_string()))?;

        check_password(&form.password, &admin.password_hash)?;

        let token = self.tokens.issue_login(
            Role::Admin,
            Identity {
                id: admin.id,
                email: admin.email.clone(),
                name: Some(admin.admin_name.clone()),
            },
        )?;

        Ok(Authenticated {
            profile: admin.to_public(),
            token,
        })
    }

    pub async fn login_company(
        &self,
        request: LoginRequest,
    ) -> Result<Authenticated<CompanyPublic>, AppError> {
        let form = validation::login(request)?;

        let company = self
            .store
            .find_company_by_email(&form.email)
            .await?
            .ok_or_else(|| AppError::InvalidCredentials(UNKNOWN_EMAIL.to_string()))?;

        check_password(&form.password, &company.password_hash)?;

        let token = self.tokens.issue_login(
            Role::Company,
            Identity {
                id: company.id,
                email: company.email.clone(),
                name: None,
            },
        )?;

        Ok(Authenticated {
            profile: company.to_public(),
            token,
        })
    }

    pub async fn login_student(
        &self,
        request: LoginRequest,
    ) -> Result<Authenticated<StudentPublic>, AppError> {
        let form = validation::login(request)?;

        let student = self
            .store
            .find_student_by_email(&form.email)
            .await?
            .ok_or_else(|| AppError::InvalidCredentials(UNKNOWN_EMAIL.to_string()))?;

        check_password(&form.password, &student.password_hash)?;

        let token = self.tokens.issue_login(
            Role::Student,
            Identity {
                id: student.id,
                email: student.email.clone(),
                name: None,
            },
        )?;

        Ok(Authenticated {
            profile: student.to_public(),
            token,
        })
    }

    // ========================================================================
    // Profiles and listings
    // ========================================================================

    pub async fn admin_profile(&self, id: Uuid) -> Result<AdminPublic, AppError> {
        self.store
            .find_admin(id)
            .await?
            .map(|a| a.to_public())
            .ok_or_else(|| AppError::NotFound("You are Not an admin".to_string()))
    }

    pub async fn company_profile(&self, id: Uuid) -> Result<CompanyPublic, AppError> {
        self.store
            .find_company(id)
            .await?
            .map(|c| c.to_public())
            .ok_or_else(|| AppError::NotFound("No company found!".to_string()))
    }

    pub async fn student_profile(&self, id: Uuid) -> Result<StudentPublic, AppError> {
        self.store
            .find_student(id)
            .await?
            .map(|s| s.to_public())
            .ok_or_else(|| AppError::NotFound("No student found!".to_string()))
    }

    pub async fn list_companies(&self) -> Result<Vec<CompanyPublic>, AppError> {
        let companies = self.store.list_companies().await?;
        Ok(companies.iter().map(Company::to_public).collect())
    }

    pub async fn list_students(&self) -> Result<Vec<StudentPublic>, AppError> {
        let students = self.store.list_students().await?;
        Ok(students.iter().map(Student::to_public).collect())
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Delete a company after its jobs and their applications
    pub async fn delete_company(&self, raw_id: &str) -> Result<Deletion<CompanyPublic>, AppError> {
        let company_id = parse_record_id(raw_id, "Company")?;
        let not_found =
            || AppError::NotFound("No Company find against the given Company ID".to_string());

        if self.store.find_company(company_id).await?.is_none() {
            return Err(not_found());
        }

        let counts = JobService::new(self.store)
            .delete_jobs_for_company(company_id)
            .await?;

        let company = self
            .store
            .delete_company(company_id)
            .await?
            .ok_or_else(not_found)?;

        Ok(Deletion {
            record: company.to_public(),
            counts,
        })
    }

    /// Delete a student after their applications
    pub async fn delete_student(&self, raw_id: &str) -> Result<Deletion<StudentPublic>, AppError> {
        let student_id = parse_record_id(raw_id, "Student")?;
        let not_found =
            || AppError::NotFound("No Student find against the given Student ID".to_string());

        if self.store.find_student(student_id).await?.is_none() {
            return Err(not_found());
        }

        let applications = ApplicationService::new(self.store)
            .delete_applications_for_student(student_id)
            .await?;

        let student = self
            .store
            .delete_student(student_id)
            .await?
            .ok_or_else(not_found)?;

        Ok(Deletion {
            record: student.to_public(),
            counts: CascadeCounts {
                jobs: 0,
                applications,
            },
        })
    }

    // ========================================================================
    // Provisioning
    // ========================================================================

    /// Create an admin account; admins have no HTTP signup
    pub async fn provision_admin(
        &self,
        admin_name: &str,
        email: &str,
        password: &str,
    ) -> Result<AdminPublic, AppError> {
        let form = validation::admin_login(AdminLoginRequest {
            admin_name: Some(admin_name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        })?;
        validation::check_email_format(&form.email)?;
        validation::reject_whitespace(&form.password, "Space is not allowed in Password")?;

        if self
            .store
            .find_admin_by_login(&form.admin_name, &form.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Admin already exists".to_string()));
        }

        let password_hash = hash_password(&form.password, self.passwords)?;
        let admin = self
            .store
            .insert_admin(Admin::new(form.admin_name, form.email, password_hash))
            .await?;

        info!(admin_id = %admin.id, "Admin provisioned");
        Ok(admin.to_public())
    }
}

fn check_password(password: &str, hash: &str) -> Result<(), AppError> {
    match verify_password(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::InvalidCredentials(WRONG_PASSWORD.to_string())),
        Err(e) => {
            warn!(error = %e, "Stored password hash could not be read");
            Err(AppError::InvalidCredentials(WRONG_PASSWORD.to_string()))
        }
    }
}
