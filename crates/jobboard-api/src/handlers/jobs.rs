//! Job posting and application routes
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use jobboard_core::{ApplicationDetails, JobWithCompany};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Principal;
use crate::error::AppError;
use crate::requests::{ApplyJobRequest, CreateJobRequest};
use crate::services::{ApplicationService, JobService};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub success: bool,
    pub message: String,
    pub new_job: JobWithCompany,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyJobResponse {
    pub success: bool,
    pub message: String,
    pub job_detail: ApplicationDetails,
}

/// Post a job as the authenticated company
#[utoipa::path(
    post,
    path = "/api/v1/jobs/create-jobs",
    tag = "jobs",
    security(("auth_token" = [])),
    request_body = CreateJobRequest,
    responses(
        (status = 200, description = "Job created", body = CreateJobResponse),
        (status = 400, description = "Invalid input or missing token", body = crate::error::ApiError),
        (status = 401, description = "Invalid token", body = crate::error::ApiError),
    )
)]
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<Json<CreateJobResponse>, AppError> {
    let Json(request) = payload?;
    let new_job = JobService::new(state.store.as_ref())
        .create_job(principal.id, request)
        .await?;

    Ok(Json(CreateJobResponse {
        success: true,
        message: "Job created Successfully".to_string(),
        new_job,
    }))
}

/// Apply to a job as the authenticated student
#[utoipa::path(
    post,
    path = "/api/v1/jobs/apply-for-job/{id}",
    tag = "jobs",
    security(("auth_token" = [])),
    params(("id" = String, Path, description = "Job ID")),
    request_body = ApplyJobRequest,
    responses(
        (status = 200, description = "Application stored", body = ApplyJobResponse),
        (status = 400, description = "Invalid job ID, unknown job, duplicate application or missing fields", body = crate::error::ApiError),
        (status = 401, description = "Invalid token", body = crate::error::ApiError),
    )
)]
pub async fn apply_for_job(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Result<Json<ApplyJobRequest>, JsonRejection>,
) -> Result<Json<ApplyJobResponse>, AppError> {
    let Json(request) = payload?;
    let job_detail = ApplicationService::new(state.store.as_ref())
        .apply(principal.id, &id, request)
        .await?;

    Ok(Json(ApplyJobResponse {
        success: true,
        message: "Job Application Successful".to_string(),
        job_detail,
    }))
}
