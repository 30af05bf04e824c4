//! Request bodies accepted by the API
//!
//! Every field is optional at the serde level so missing fields reach the
//! validator and fail with a field-specific message instead of a generic
//! deserialization error. Older clients send a few misspelled field names;
//! those are accepted as aliases.
//!
//! Author: hephaex@gmail.com

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Company registration
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySignupRequest {
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Must be a JSON number
    #[serde(alias = "buisnessPhoneNumber")]
    #[schema(value_type = Option<u64>)]
    pub business_phone_number: Option<serde_json::Value>,
    #[serde(alias = "buisnessDetails")]
    pub business_details: Option<String>,
    pub company_address: Option<String>,
    pub city: Option<String>,
}

/// Student registration
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSignupRequest {
    pub student_name: Option<String>,
    pub father_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub college_name: Option<String>,
    pub majors: Option<Vec<String>>,
    pub gender: Option<String>,
}

/// Admin login, by name and email
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    pub admin_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Company or student login
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// New job posting
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub required_position: Option<String>,
    pub required_experience: Option<String>,
}

/// Application to a job
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyJobRequest {
    pub total_experience: Option<String>,
    pub area_of_interest: Option<Vec<String>>,
    pub experience_in_specified_field: Option<String>,
    /// Fresh-graduate flag, defaults to true
    #[serde(rename = "freshie", alias = "isFreshGraduate")]
    pub is_fresh_graduate: Option<bool>,
    #[serde(alias = "certificatons")]
    pub certifications: Option<Vec<String>>,
}
