//! Input validation pipeline
//!
//! Each request body goes through the same stages, in order:
//!
//! 1. presence of required fields, with a field-specific message
//! 2. normalization (emails and admin names lowercased and trimmed, other
//!    text trimmed)
//! 3. structural rules declared with `validator` (types, minimum password
//!    length, non-empty majors)
//! 4. manual checks (no whitespace in passwords or emails, exactly one `@`)
//!
//! The first failure short-circuits. Nothing here touches the store; duplicate
//! email checks happen in the account service once validation has passed.
//!
//! Author: hephaex@gmail.com

use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::requests::{
    AdminLoginRequest, ApplyJobRequest, CompanySignupRequest, CreateJobRequest, LoginRequest,
    StudentSignupRequest,
};

/// A rejected request body, carrying the message shown to the client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;

pub const PASSWORD_MIN_LENGTH: u64 = 8;

// ============================================================================
// Validated forms
// ============================================================================

/// Company registration after validation
#[derive(Debug, Clone, Validate)]
pub struct CompanySignup {
    #[validate(length(min = 1, message = "\"companyName\" is not allowed to be empty"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "\"email\" is not allowed to be empty"))]
    pub email: String,
    #[validate(length(min = 8, message = "\"password\" length must be at least 8 characters long"))]
    pub password: String,
    pub business_phone_number: u64,
    #[validate(length(min = 1, message = "\"buisnessDetails\" is not allowed to be empty"))]
    pub business_details: String,
    #[validate(length(min = 1, message = "\"companyAddress\" is not allowed to be empty"))]
    pub company_address: String,
    #[validate(length(min = 1, message = "\"city\" is not allowed to be empty"))]
    pub city: String,
}

impl CompanySignup {
    const FIELDS: &'static [&'static str] = &[
        "company_name",
        "email",
        "password",
        "business_details",
        "company_address",
        "city",
    ];
}

/// Student registration after validation
#[derive(Debug, Clone, Validate)]
pub struct StudentSignup {
    #[validate(length(min = 1, message = "\"studentName\" is not allowed to be empty"))]
    pub student_name: String,
    #[validate(length(min = 1, message = "\"fatherName\" is not allowed to be empty"))]
    pub father_name: String,
    #[validate(length(min = 1, message = "\"email\" is not allowed to be empty"))]
    pub email: String,
    #[validate(length(min = 8, message = "\"password\" length must be at least 8 characters long"))]
    pub password: String,
    #[validate(length(min = 1, message = "\"collegeName\" is not allowed to be empty"))]
    pub college_name: String,
    #[validate(length(min = 1, message = "Please select your major course"))]
    pub majors: Vec<String>,
    #[validate(length(min = 1, message = "\"gender\" is not allowed to be empty"))]
    pub gender: String,
}

impl StudentSignup {
    const FIELDS: &'static [&'static str] = &[
        "student_name",
        "father_name",
        "email",
        "password",
        "college_name",
        "majors",
        "gender",
    ];
}

/// Admin credentials after validation
#[derive(Debug, Clone, Validate)]
pub struct AdminLogin {
    #[validate(length(min = 1, message = "\"adminName\" is not allowed to be empty"))]
    pub admin_name: String,
    #[validate(length(min = 1, message = "\"email\" is not allowed to be empty"))]
    pub email: String,
    #[validate(length(min = 8, message = "\"password\" length must be at least 8 characters long"))]
    pub password: String,
}

impl AdminLogin {
    const FIELDS: &'static [&'static str] = &["admin_name", "password", "email"];
}

/// Company or student credentials after validation
#[derive(Debug, Clone, Validate)]
pub struct Login {
    #[validate(length(min = 1, message = "\"email\" is not allowed to be empty"))]
    pub email: String,
    #[validate(length(min = 8, message = "\"password\" length must be at least 8 characters long"))]
    pub password: String,
}

impl Login {
    const FIELDS: &'static [&'static str] = &["password", "email"];
}

/// Job posting after validation
#[derive(Debug, Clone, Validate)]
pub struct NewJob {
    #[validate(length(min = 1, message = "\"requiredPosition\" is not allowed to be empty"))]
    pub required_position: String,
    #[validate(length(min = 1, message = "\"requiredExperience\" is not allowed to be empty"))]
    pub required_experience: String,
}

impl NewJob {
    const FIELDS: &'static [&'static str] = &["required_position", "required_experience"];
}

/// Job application fields after validation
#[derive(Debug, Clone, Validate)]
pub struct JobApplicationForm {
    #[validate(length(min = 1, message = "Please fill the required fields"))]
    pub total_experience: String,
    pub area_of_interest: Vec<String>,
    #[validate(length(min = 1, message = "Please fill the required fields"))]
    pub experience_in_specified_field: String,
    pub is_fresh_graduate: bool,
    pub certifications: Vec<String>,
}

impl JobApplicationForm {
    const FIELDS: &'static [&'static str] = &["total_experience", "experience_in_specified_field"];
}

// ============================================================================
// Pipelines
// ============================================================================

pub fn company_signup(req: CompanySignupRequest) -> Result<CompanySignup> {
    let email = require(req.email, "PLease fill the email")?;
    let company_name = require(req.company_name, "\"companyName\" is required")?;
    let password = require(req.password, "\"password\" is required")?;
    let phone = req
        .business_phone_number
        .ok_or_else(|| ValidationError::new("\"buisnessPhoneNumber\" is required"))?;
    let business_details = require(req.business_details, "\"buisnessDetails\" is required")?;
    let company_address = require(req.company_address, "\"companyAddress\" is required")?;
    let city = require(req.city, "\"city\" is required")?;

    let form = CompanySignup {
        company_name: normalize_text(&company_name),
        email: normalize_email(&email),
        password,
        business_phone_number: parse_phone(&phone)?,
        business_details: normalize_text(&business_details),
        company_address: normalize_text(&company_address),
        city: normalize_text(&city),
    };
    check_structure(&form, CompanySignup::FIELDS)?;

    check_credentials(&form.email, &form.password)?;
    Ok(form)
}

pub fn student_signup(req: StudentSignupRequest) -> Result<StudentSignup> {
    let email = require(req.email, "PLease fill the email")?;
    let student_name = require(req.student_name, "\"studentName\" is not allowed to be empty")?;
    let father_name = require(req.father_name, "\"fatherName\" is not allowed to be empty")?;
    let college_name = require(req.college_name, "\"collegeName\" is not allowed to be empty")?;
    let password = require(req.password, "\"password\" is required")?;
    let majors = req
        .majors
        .ok_or_else(|| ValidationError::new("\"majors\" is required"))?;
    let gender = require(req.gender, "\"gender\" is required")?;

    let form = StudentSignup {
        student_name: normalize_text(&student_name),
        father_name: normalize_text(&father_name),
        email: normalize_email(&email),
        password,
        college_name: normalize_text(&college_name),
        majors: normalize_list(majors),
        gender: normalize_text(&gender),
    };
    check_structure(&form, StudentSignup::FIELDS)?;

    check_credentials(&form.email, &form.password)?;
    Ok(form)
}

pub fn admin_login(req: AdminLoginRequest) -> Result<AdminLogin> {
    let email = require(req.email, "\"email\" is not allowed to be empty")?;
    let admin_name = require(req.admin_name, "\"adminName\" is not allowed to be empty")?;
    let password = require(req.password, "\"password\" is required")?;

    let form = AdminLogin {
        admin_name: normalize_email(&admin_name),
        email: normalize_email(&email),
        password,
    };
    check_structure(&form, AdminLogin::FIELDS)?;
    Ok(form)
}

pub fn login(req: LoginRequest) -> Result<Login> {
    let email = require(req.email, "Please enter the email address")?;
    let password = require(req.password, "\"password\" is required")?;

    let form = Login {
        email: normalize_email(&email),
        password,
    };
    check_structure(&form, Login::FIELDS)?;
    Ok(form)
}

pub fn new_job(req: CreateJobRequest) -> Result<NewJob> {
    let required_experience = require(
        req.required_experience,
        "\"requiredExperience\" is not allowed to be empty",
    )?;
    let required_position = require(
        req.required_position,
        "\"requiredPosition\" is not allowed to be empty",
    )?;

    let form = NewJob {
        required_position: normalize_text(&required_position),
        required_experience: normalize_text(&required_experience),
    };
    check_structure(&form, NewJob::FIELDS)?;
    Ok(form)
}

pub fn job_application(req: ApplyJobRequest) -> Result<JobApplicationForm> {
    let total_experience = require(req.total_experience, "Please fill the required fields")?;
    let experience_in_specified_field = require(
        req.experience_in_specified_field,
        "Please fill the required fields",
    )?;

    let form = JobApplicationForm {
        total_experience: normalize_text(&total_experience),
        area_of_interest: normalize_list(req.area_of_interest.unwrap_or_default()),
        experience_in_specified_field: normalize_text(&experience_in_specified_field),
        is_fresh_graduate: req.is_fresh_graduate.unwrap_or(true),
        certifications: normalize_list(req.certifications.unwrap_or_default()),
    };
    check_structure(&form, JobApplicationForm::FIELDS)?;
    Ok(form)
}

// ============================================================================
// Building blocks
// ============================================================================

/// Required text field: absent or blank fails with `message`
pub fn require(value: Option<String>, message: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::new(message)),
    }
}

/// Lowercase and trim; used for emails and admin names
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_string()
}

fn normalize_list(items: Vec<String>) -> Vec<String> {
    items
        .iter()
        .map(|s| normalize_text(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Phone numbers must arrive as JSON numbers, not numeric strings.
/// Whole-valued floats such as `555.0` are accepted; fractions and negatives are not.
pub fn parse_phone(value: &Value) -> Result<u64> {
    let whole_float = || {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    };
    value
        .as_u64()
        .or_else(whole_float)
        .ok_or_else(|| ValidationError::new("Enter the valid phone number"))
}

pub fn reject_whitespace(value: &str, message: &str) -> Result<()> {
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::new(message));
    }
    Ok(())
}

/// Exactly one `@`
pub fn check_email_format(email: &str) -> Result<()> {
    if email.split('@').count() != 2 {
        return Err(ValidationError::new("Incorrect format of Email"));
    }
    Ok(())
}

fn check_credentials(email: &str, password: &str) -> Result<()> {
    reject_whitespace(password, "Space is not allowed in Password")?;
    reject_whitespace(email, "Space is not allowed in Email")?;
    check_email_format(email)
}

fn check_structure<T: Validate>(form: &T, field_order: &[&str]) -> Result<()> {
    form.validate()
        .map_err(|errors| first_message(&errors, field_order))
}

/// First failing field in declaration order, so messages are deterministic
fn first_message(errors: &ValidationErrors, field_order: &[&str]) -> ValidationError {
    let fields = errors.field_errors();

    field_order
        .iter()
        .filter_map(|name| {
            fields
                .iter()
                .find(|(field, _)| field.to_string() == *name)
                .map(|(_, errs)| *errs)
        })
        .chain(fields.values().copied())
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .map(ValidationError)
        .unwrap_or_else(|| ValidationError::new("Invalid request body"))
}
