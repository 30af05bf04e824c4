//! Admin routes
//!
//! Admins log in with name, email and password and can list or remove any
//! record. Deletions cascade to dependents and are written to the audit log.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Extension, Json,
};
use jobboard_core::{
    AdminPublic, ApplicationDetails, CompanyJobs, CompanyPublic, Job, Role, StudentPublic,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{audit_login, CompaniesResponse};
use crate::audit::{audit_log, AuditContext, AuditEvent};
use crate::auth::Principal;
use crate::error::AppError;
use crate::requests::AdminLoginRequest;
use crate::services::{AccountService, ApplicationService, CascadeCounts, JobService};
use crate::state::AppState;

/// All jobs, grouped under their companies
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminJobsResponse {
    pub success: bool,
    pub message: String,
    pub total_jobs: Vec<CompanyJobs>,
}

/// All students and every application with its student and company
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStudentsResponse {
    pub success: bool,
    pub students: Vec<StudentPublic>,
    pub students_job_applications: Vec<ApplicationDetails>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfileResponse {
    pub success: bool,
    pub admin_profile: AdminPublic,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginResponse {
    pub success: bool,
    pub message: String,
    pub admin_data: AdminPublic,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDeletedResponse {
    pub success: bool,
    pub message: String,
    pub job_to_delete: Job,
    pub applications_removed: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDeletedResponse {
    pub success: bool,
    pub message: String,
    pub company_to_delete: CompanyPublic,
    pub jobs_removed: usize,
    pub applications_removed: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDeletedResponse {
    pub success: bool,
    pub message: String,
    pub student_to_delete: StudentPublic,
    pub applications_removed: usize,
}

fn accounts(state: &AppState) -> AccountService<'_> {
    AccountService::new(state.store.as_ref(), &state.tokens, &state.passwords)
}

fn audit_deletion(
    admin: &Principal,
    record: &str,
    record_id: Uuid,
    counts: CascadeCounts,
    headers: &HeaderMap,
) {
    audit_log(&AuditEvent::RecordDeleted {
        admin_id: admin.id,
        record: record.to_string(),
        record_id,
        jobs_removed: counts.jobs,
        applications_removed: counts.applications,
        ip_address: AuditContext::from_headers(headers).ip_address,
    });
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/jobs",
    tag = "admin",
    security(("auth_token" = [])),
    responses(
        (status = 200, description = "Jobs grouped by company", body = AdminJobsResponse),
        (status = 400, description = "Missing token or unknown admin", body = crate::error::ApiError),
        (status = 401, description = "Invalid token", body = crate::error::ApiError),
    )
)]
pub async fn jobs(State(state): State<Arc<AppState>>) -> Result<Json<AdminJobsResponse>, AppError> {
    let total_jobs = JobService::new(state.store.as_ref())
        .list_all_grouped_by_company()
        .await?;

    Ok(Json(AdminJobsResponse {
        success: true,
        message: "total jobs".to_string(),
        total_jobs,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/companies",
    tag = "admin",
    security(("auth_token" = [])),
    responses(
        (status = 200, description = "All companies", body = CompaniesResponse),
    )
)]
pub async fn companies(State(state): State<Arc<AppState>>) -> Result<Json<CompaniesResponse>, AppError> {
    let companies = accounts(&state).list_companies().await?;

    Ok(Json(CompaniesResponse {
        success: true,
        companies,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/students",
    tag = "admin",
    security(("auth_token" = [])),
    responses(
        (status = 200, description = "All students and applications", body = AdminStudentsResponse),
    )
)]
pub async fn students(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdminStudentsResponse>, AppError> {
    let account_service = accounts(&state);
    let applications = ApplicationService::new(state.store.as_ref());
    let (students, students_job_applications) = futures::try_join!(
        account_service.list_students(),
        applications.list_all_detailed()
    )?;

    Ok(Json(AdminStudentsResponse {
        success: true,
        students,
        students_job_applications,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/profile",
    tag = "admin",
    security(("auth_token" = [])),
    responses(
        (status = 200, description = "Admin profile", body = AdminProfileResponse),
    )
)]
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<AdminProfileResponse>, AppError> {
    let admin_profile = accounts(&state).admin_profile(principal.id).await?;

    Ok(Json(AdminProfileResponse {
        success: true,
        admin_profile,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    tag = "admin",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AdminLoginResponse),
        (status = 400, description = "Invalid input or credentials", body = crate::error::ApiError),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<AdminLoginRequest>, JsonRejection>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    let Json(request) = payload?;
    let email = request.email.clone();

    let result = accounts(&state).login_admin(request).await;
    audit_login(
        Role::Admin,
        email,
        result.as_ref().map(|a| a.profile.id),
        AuditContext::from_headers(&headers),
    );
    let authenticated = result?;

    Ok(Json(AdminLoginResponse {
        success: true,
        message: "Admin logged-in successfully".to_string(),
        admin_data: authenticated.profile,
        token: authenticated.token,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/delete-job/{id}",
    tag = "admin",
    security(("auth_token" = [])),
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job and its applications deleted", body = JobDeletedResponse),
        (status = 400, description = "Invalid or unknown job ID", body = crate::error::ApiError),
    )
)]
pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<JobDeletedResponse>, AppError> {
    let (job, counts) = JobService::new(state.store.as_ref()).delete_job(&id).await?;
    audit_deletion(&principal, "job", job.id, counts, &headers);

    Ok(Json(JobDeletedResponse {
        success: true,
        message: "Job has been Deleted".to_string(),
        job_to_delete: job,
        applications_removed: counts.applications,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/delete-company/{id}",
    tag = "admin",
    security(("auth_token" = [])),
    params(("id" = String, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Company, its jobs and their applications deleted", body = CompanyDeletedResponse),
        (status = 400, description = "Invalid or unknown company ID", body = crate::error::ApiError),
    )
)]
pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<CompanyDeletedResponse>, AppError> {
    let deletion = accounts(&state).delete_company(&id).await?;
    audit_deletion(
        &principal,
        "company",
        deletion.record.id,
        deletion.counts,
        &headers,
    );

    Ok(Json(CompanyDeletedResponse {
        success: true,
        message: "Company has been Deleted".to_string(),
        company_to_delete: deletion.record,
        jobs_removed: deletion.counts.jobs,
        applications_removed: deletion.counts.applications,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/delete-student/{id}",
    tag = "admin",
    security(("auth_token" = [])),
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student and their applications deleted", body = StudentDeletedResponse),
        (status = 400, description = "Invalid or unknown student ID", body = crate::error::ApiError),
    )
)]
pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<StudentDeletedResponse>, AppError> {
    let deletion = accounts(&state).delete_student(&id).await?;
    audit_deletion(
        &principal,
        "student",
        deletion.record.id,
        deletion.counts,
        &headers,
    );

    Ok(Json(StudentDeletedResponse {
        success: true,
        message: "Student has been Deleted".to_string(),
        student_to_delete: deletion.record,
        applications_removed: deletion.counts.applications,
    }))
}
