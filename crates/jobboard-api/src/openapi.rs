//! OpenAPI document served at `/api-docs/openapi.json`
//!
//! Author: hephaex@gmail.com

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{admin, company, health, jobs, student, CompaniesResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Board API",
        description = "Companies post jobs, students apply, admins moderate",
    ),
    paths(
        health::health_check,
        health::readiness_check,
        health::metrics,
        admin::login,
        admin::profile,
        admin::jobs,
        admin::companies,
        admin::students,
        admin::delete_job,
        admin::delete_company,
        admin::delete_student,
        company::signup,
        company::login,
        company::profile,
        company::jobs,
        student::signup,
        student::login,
        student::profile,
        student::jobs,
        student::companies,
        jobs::create_job,
        jobs::apply_for_job,
    ),
    components(schemas(
        crate::error::ApiError,
        crate::requests::CompanySignupRequest,
        crate::requests::StudentSignupRequest,
        crate::requests::AdminLoginRequest,
        crate::requests::LoginRequest,
        crate::requests::CreateJobRequest,
        crate::requests::ApplyJobRequest,
        jobboard_core::Role,
        jobboard_core::AdminPublic,
        jobboard_core::CompanyPublic,
        jobboard_core::StudentPublic,
        jobboard_core::Job,
        jobboard_core::JobWithCompany,
        jobboard_core::CompanyJobs,
        jobboard_core::Application,
        jobboard_core::ApplicationDetails,
        CompaniesResponse,
        health::HealthResponse,
        health::BuildInfo,
        health::ReadinessResponse,
        health::ReadinessChecks,
        health::MetricsResponse,
        admin::AdminJobsResponse,
        admin::AdminStudentsResponse,
        admin::AdminProfileResponse,
        admin::AdminLoginResponse,
        admin::JobDeletedResponse,
        admin::CompanyDeletedResponse,
        admin::StudentDeletedResponse,
        company::CompanyJobsResponse,
        company::CompanyProfileResponse,
        company::CompanyLoginResponse,
        company::CompanySignupResponse,
        student::StudentJobsResponse,
        student::StudentProfileResponse,
        student::StudentLoginResponse,
        student::StudentSignupResponse,
        jobs::CreateJobResponse,
        jobs::ApplyJobResponse,
    )),
    modifiers(&TokenHeader),
    tags(
        (name = "health", description = "Liveness, readiness and metrics"),
        (name = "admin", description = "Admin login, listings and deletions"),
        (name = "company", description = "Company accounts and their jobs"),
        (name = "student", description = "Student accounts and job browsing"),
        (name = "jobs", description = "Posting and applying to jobs"),
    )
)]
pub struct ApiDoc;

/// Registers the `auth_token` scheme referenced by protected paths
struct TokenHeader;

impl Modify for TokenHeader {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "auth_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-auth-header"))),
            );
        }
    }
}
