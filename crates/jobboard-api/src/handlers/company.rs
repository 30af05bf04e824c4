//! Company routes
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Extension, Json,
};
use jobboard_core::{Application, CompanyPublic, Job, Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{audit_login, audit_signup};
use crate::audit::AuditContext;
use crate::auth::Principal;
use crate::error::AppError;
use crate::requests::{CompanySignupRequest, LoginRequest};
use crate::services::{AccountService, ApplicationService, JobService};
use crate::state::AppState;

/// A company's own jobs and the applications they received
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyJobsResponse {
    pub success: bool,
    pub message: String,
    pub jobs: Vec<Job>,
    pub job_applications: Vec<Application>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfileResponse {
    pub success: bool,
    pub company_profile: CompanyPublic,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompanyLoginResponse {
    pub success: bool,
    pub message: String,
    pub company: CompanyPublic,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompanySignupResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub company: CompanyPublic,
}

/// Jobs posted by the authenticated company
#[utoipa::path(
    get,
    path = "/api/v1/company/jobs",
    tag = "company",
    security(("auth_token" = [])),
    responses(
        (status = 200, description = "Own jobs and received applications", body = CompanyJobsResponse),
        (status = 400, description = "Missing token or unknown company", body = crate::error::ApiError),
        (status = 401, description = "Invalid token", body = crate::error::ApiError),
    )
)]
pub async fn jobs(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<CompanyJobsResponse>, AppError> {
    let jobs = JobService::new(state.store.as_ref());
    let applications = ApplicationService::new(state.store.as_ref());
    let (jobs, job_applications) = futures::try_join!(
        jobs.list_jobs_by_creator(principal.id),
        applications.list_for_company(principal.id)
    )?;

    Ok(Json(CompanyJobsResponse {
        success: true,
        message: "total jobs".to_string(),
        jobs,
        job_applications,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/company/profile",
    tag = "company",
    security(("auth_token" = [])),
    responses(
        (status = 200, description = "Company profile", body = CompanyProfileResponse),
        (status = 400, description = "Missing token or unknown company", body = crate::error::ApiError),
    )
)]
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<CompanyProfileResponse>, AppError> {
    let company_profile = AccountService::new(state.store.as_ref(), &state.tokens, &state.passwords)
        .company_profile(principal.id)
        .await?;

    Ok(Json(CompanyProfileResponse {
        success: true,
        company_profile,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/company/login",
    tag = "company",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = CompanyLoginResponse),
        (status = 400, description = "Invalid input or credentials", body = crate::error::ApiError),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<CompanyLoginResponse>, AppError> {
    let Json(request) = payload?;
    let email = request.email.clone();

    let result = AccountService::new(state.store.as_ref(), &state.tokens, &state.passwords)
        .login_company(request)
        .await;
    audit_login(
        Role::Company,
        email,
        result.as_ref().map(|a| a.profile.id),
        AuditContext::from_headers(&headers),
    );
    let authenticated = result?;

    Ok(Json(CompanyLoginResponse {
        success: true,
        message: "Company logged-in successfully".to_string(),
        company: authenticated.profile,
        token: authenticated.token,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/company/signup",
    tag = "company",
    request_body = CompanySignupRequest,
    responses(
        (status = 200, description = "Company registered", body = CompanySignupResponse),
        (status = 400, description = "Invalid input or email taken", body = crate::error::ApiError),
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CompanySignupRequest>, JsonRejection>,
) -> Result<Json<CompanySignupResponse>, AppError> {
    let Json(request) = payload?;
    let email = request.email.clone();

    let result = AccountService::new(state.store.as_ref(), &state.tokens, &state.passwords)
        .signup_company(request)
        .await;
    audit_signup(
        Role::Company,
        email,
        result.as_ref().map(|a| a.profile.id),
        AuditContext::from_headers(&headers),
    );
    let authenticated = result?;

    Ok(Json(CompanySignupResponse {
        success: true,
        message: "Company registered Successfully".to_string(),
        token: authenticated.token,
        company: authenticated.profile,
    }))
}
