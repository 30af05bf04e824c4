//! Student routes
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Extension, Json,
};
use jobboard_core::{Application, CompanyJobs, Role, StudentPublic};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{audit_login, audit_signup, CompaniesResponse};
use crate::audit::AuditContext;
use crate::auth::Principal;
use crate::error::AppError;
use crate::requests::{LoginRequest, StudentSignupRequest};
use crate::services::{AccountService, ApplicationService, JobService};
use crate::state::AppState;

/// Every job grouped by company, plus the student's own applications
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentJobsResponse {
    pub success: bool,
    pub message: String,
    pub total_jobs: Vec<CompanyJobs>,
    pub applied_jobs: Vec<Application>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfileResponse {
    pub success: bool,
    pub student_profile: StudentPublic,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentLoginResponse {
    pub success: bool,
    pub message: String,
    pub student: StudentPublic,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentSignupResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub student: StudentPublic,
}

#[utoipa::path(
    get,
    path = "/api/v1/student/jobs",
    tag = "student",
    security(("auth_token" = [])),
    responses(
        (status = 200, description = "Jobs by company and own applications", body = StudentJobsResponse),
        (status = 400, description = "Missing token or unknown student", body = crate::error::ApiError),
        (status = 401, description = "Invalid token", body = crate::error::ApiError),
    )
)]
pub async fn jobs(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<StudentJobsResponse>, AppError> {
    let jobs = JobService::new(state.store.as_ref());
    let applications = ApplicationService::new(state.store.as_ref());
    let (total_jobs, applied_jobs) = futures::try_join!(
        jobs.list_all_grouped_by_company(),
        applications.list_for_student(principal.id)
    )?;

    Ok(Json(StudentJobsResponse {
        success: true,
        message: "total jobs".to_string(),
        total_jobs,
        applied_jobs,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/student/companies",
    tag = "student",
    security(("auth_token" = [])),
    responses(
        (status = 200, description = "All companies", body = CompaniesResponse),
    )
)]
pub async fn companies(State(state): State<Arc<AppState>>) -> Result<Json<CompaniesResponse>, AppError> {
    let companies = AccountService::new(state.store.as_ref(), &state.tokens, &state.passwords)
        .list_companies()
        .await?;

    Ok(Json(CompaniesResponse {
        success: true,
        companies,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/student/profile",
    tag = "student",
    security(("auth_token" = [])),
    responses(
        (status = 200, description = "Student profile", body = StudentProfileResponse),
    )
)]
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<StudentProfileResponse>, AppError> {
    let student_profile = AccountService::new(state.store.as_ref(), &state.tokens, &state.passwords)
        .student_profile(principal.id)
        .await?;

    Ok(Json(StudentProfileResponse {
        success: true,
        student_profile,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/student/signup",
    tag = "student",
    request_body = StudentSignupRequest,
    responses(
        (status = 200, description = "Student registered", body = StudentSignupResponse),
        (status = 400, description = "Invalid input or email taken", body = crate::error::ApiError),
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<StudentSignupRequest>, JsonRejection>,
) -> Result<Json<StudentSignupResponse>, AppError> {
    let Json(request) = payload?;
    let email = request.email.clone();

    let result = AccountService::new(state.store.as_ref(), &state.tokens, &state.passwords)
        .signup_student(request)
        .await;
    audit_signup(
        Role::Student,
        email,
        result.as_ref().map(|a| a.profile.id),
        AuditContext::from_headers(&headers),
    );
    let authenticated = result?;

    Ok(Json(StudentSignupResponse {
        success: true,
        message: "Student registered Successfully".to_string(),
        token: authenticated.token,
        student: authenticated.profile,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/student/login",
    tag = "student",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = StudentLoginResponse),
        (status = 400, description = "Invalid input or credentials", body = crate::error::ApiError),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<StudentLoginResponse>, AppError> {
    let Json(request) = payload?;
    let email = request.email.clone();

    let result = AccountService::new(state.store.as_ref(), &state.tokens, &state.passwords)
        .login_student(request)
        .await;
    audit_login(
        Role::Student,
        email,
        result.as_ref().map(|a| a.profile.id),
        AuditContext::from_headers(&headers),
    );
    let authenticated = result?;

    Ok(Json(StudentLoginResponse {
        success: true,
        message: "Student logged-in successfully".to_string(),
        student: authenticated.profile,
        token: authenticated.token,
    }))
}
