//! API Integration Tests
//!
//! Every test drives the full router against the in-memory store.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use jobboard_api::services::AccountService;
use jobboard_api::state::AppState;
use jobboard_api::{create_router_for_testing, create_router_with_state};
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN_HEADER: &str = "x-auth-header";

/// Helper to create a test request
fn create_json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header(TOKEN_HEADER, token);
    }

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn company_signup_body(email: &str) -> Value {
    json!({
        "companyName": "Acme",
        "email": email,
        "password": "longpass1",
        "buisnessPhoneNumber": 555,
        "buisnessDetails": "d",
        "companyAddress": "a",
        "city": "c"
    })
}

fn student_signup_body(email: &str) -> Value {
    json!({
        "studentName": "Sara",
        "fatherName": "Ali",
        "email": email,
        "password": "longpass1",
        "collegeName": "NED",
        "majors": ["cs"],
        "gender": "female"
    })
}

fn application_body() -> Value {
    json!({
        "totalExperience": "1 year",
        "areaOfInterest": ["backend"],
        "experienceInSpecifiedField": "6 months",
        "freshie": false,
        "certifications": ["aws"]
    })
}

async fn signup_company(app: &Router, email: &str) -> (String, String) {
    let (status, json) = send(
        app,
        create_json_request("POST", "/api/v1/company/signup", None, Some(company_signup_body(email))),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    (
        json["token"].as_str().unwrap().to_string(),
        json["company"]["_id"].as_str().unwrap().to_string(),
    )
}

async fn signup_student(app: &Router, email: &str) -> (String, String) {
    let (status, json) = send(
        app,
        create_json_request("POST", "/api/v1/student/signup", None, Some(student_signup_body(email))),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    (
        json["token"].as_str().unwrap().to_string(),
        json["student"]["_id"].as_str().unwrap().to_string(),
    )
}

async fn create_job(app: &Router, company_token: &str, position: &str) -> String {
    let (status, json) = send(
        app,
        create_json_request(
            "POST",
            "/api/v1/jobs/create-jobs",
            Some(company_token),
            Some(json!({"requiredPosition": position, "requiredExperience": "2 years"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    json["newJob"]["_id"].as_str().unwrap().to_string()
}

async fn seeded_admin_token(state: &Arc<AppState>, app: &Router) -> String {
    AccountService::new(state.store.as_ref(), &state.tokens, &state.passwords)
        .provision_admin("root", "admin@jobs.io", "adminpass1")
        .await
        .unwrap();

    let (status, json) = send(
        app,
        create_json_request(
            "POST",
            "/api/v1/admin/login",
            None,
            Some(json!({"adminName": "Root", "email": " ADMIN@jobs.io", "password": "adminpass1"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert!(json["adminData"].get("passwordHash").is_none());
    json["token"].as_str().unwrap().to_string()
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_router_for_testing();

    let (status, json) = send(&app, create_json_request("GET", "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_readiness_with_memory_store() {
    let app = create_router_for_testing();

    let (status, json) = send(&app, create_json_request("GET", "/ready", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ready"], true);
    assert_eq!(json["checks"]["store"], true);
    assert_eq!(json["checks"]["signing_secret_configured"], true);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = create_router_for_testing();

    let (status, json) = send(
        &app,
        create_json_request("GET", "/api-docs/openapi.json", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/api/v1/company/signup"].is_object());
}

// =============================================================================
// Routing and Envelope Tests
// =============================================================================

#[tokio::test]
async fn test_unknown_route_returns_envelope() {
    let app = create_router_for_testing();

    let (status, json) = send(&app, create_json_request("GET", "/api/v1/nowhere", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "API route not found");
    assert_eq!(json["route"], "/api/v1/nowhere");
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = create_router_for_testing();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/company/signup")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(create_json_request("GET", "/health", None, None))
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

// =============================================================================
// Signup and Login Tests
// =============================================================================

#[tokio::test]
async fn test_company_signup_normalizes_and_rejects_duplicates() {
    let app = create_router_for_testing();

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            "/api/v1/company/signup",
            None,
            Some(company_signup_body("A@B.com ")),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["company"]["email"], "a@b.com");
    assert!(json["company"].get("passwordHash").is_none());
    assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            "/api/v1/company/signup",
            None,
            Some(company_signup_body("  a@B.COM")),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Email already existed");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_signups_keep_email_unique() {
    let state = Arc::new(AppState::for_testing());
    let app = create_router_with_state(state.clone());

    let attempts: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            let email = if i % 2 == 0 { "race@x.com" } else { " RACE@x.com" };
            tokio::spawn(async move {
                send(
                    &app,
                    create_json_request(
                        "POST",
                        "/api/v1/company/signup",
                        None,
                        Some(company_signup_body(email)),
                    ),
                )
                .await
            })
        })
        .collect();

    let mut created = 0;
    for attempt in attempts {
        let (status, json) = attempt.await.unwrap();
        if status == StatusCode::OK {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::BAD_REQUEST, "{json}");
            assert_eq!(json["message"], "Email already existed");
        }
    }

    assert_eq!(created, 1);
    assert_eq!(state.store.list_companies().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_student_signup_rejects_duplicate_email() {
    let app = create_router_for_testing();

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            "/api/v1/student/signup",
            None,
            Some(student_signup_body("St@X.com ")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["student"]["email"], "st@x.com");

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            "/api/v1/student/signup",
            None,
            Some(student_signup_body("  st@x.COM")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Email already existed");

    // the same email is free for the other role
    let (status, _) = send(
        &app,
        create_json_request(
            "POST",
            "/api/v1/company/signup",
            None,
            Some(company_signup_body("st@x.com")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_company_signup_requires_numeric_phone() {
    let app = create_router_for_testing();
    let mut body = company_signup_body("p@q.com");
    body["buisnessPhoneNumber"] = json!("555-1234");

    let (status, json) = send(
        &app,
        create_json_request("POST", "/api/v1/company/signup", None, Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Enter the valid phone number");
}

#[tokio::test]
async fn test_student_signup_short_password() {
    let app = create_router_for_testing();
    let mut body = student_signup_body("s@x.com");
    body["password"] = json!("short");

    let (status, json) = send(
        &app,
        create_json_request("POST", "/api/v1/student/signup", None, Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "\"password\" length must be at least 8 characters long"
    );
}

#[tokio::test]
async fn test_login_flows() {
    let app = create_router_for_testing();
    signup_student(&app, "s@x.com").await;

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            "/api/v1/student/login",
            None,
            Some(json!({"email": "S@X.com", "password": "longpass1"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["student"]["email"], "s@x.com");
    let token = json["token"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        create_json_request("GET", "/api/v1/student/profile", Some(token.as_str()), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["studentProfile"]["studentName"], "Sara");

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            "/api/v1/student/login",
            None,
            Some(json!({"email": "s@x.com", "password": "wrongpass1"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid Password");

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            "/api/v1/company/login",
            None,
            Some(json!({"email": "nobody@x.com", "password": "longpass1"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "login failed check your email");
}

// =============================================================================
// Authorization Tests
// =============================================================================

#[tokio::test]
async fn test_missing_token() {
    let app = create_router_for_testing();

    let (status, json) = send(
        &app,
        create_json_request("GET", "/api/v1/company/profile", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "No token authentication denied");
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let app = create_router_for_testing();
    let (token, _) = signup_company(&app, "t@x.com").await;

    let (signed_part, _) = token.rsplit_once('.').unwrap();
    let tampered = format!("{signed_part}.c2lnbmF0dXJlLWZyb20tZWxzZXdoZXJl");

    let (status, json) = send(
        &app,
        create_json_request("GET", "/api/v1/company/profile", Some(tampered.as_str()), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Token is not valid");
}

#[tokio::test]
async fn test_token_of_other_role_rejected() {
    let app = create_router_for_testing();
    let (student_token, _) = signup_student(&app, "r@x.com").await;

    let (status, _) = send(
        &app,
        create_json_request(
            "POST",
            "/api/v1/jobs/create-jobs",
            Some(student_token.as_str()),
            Some(json!({"requiredPosition": "dev", "requiredExperience": "1"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Job and Application Tests
// =============================================================================

#[tokio::test]
async fn test_create_job_includes_company() {
    let app = create_router_for_testing();
    let (token, company_id) = signup_company(&app, "jobs@acme.io").await;

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            "/api/v1/jobs/create-jobs",
            Some(token.as_str()),
            Some(json!({"requiredPosition": "Backend Dev", "requiredExperience": "2 years"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Job created Successfully");
    assert_eq!(json["newJob"]["createdBy"], company_id.as_str());
    assert_eq!(json["newJob"]["company"]["companyName"], "Acme");
    assert!(json["newJob"]["company"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_apply_duplicate_then_other_job() {
    let app = create_router_for_testing();
    let (company_token, company_id) = signup_company(&app, "hr@acme.io").await;
    let j1 = create_job(&app, &company_token, "Backend").await;
    let j2 = create_job(&app, &company_token, "Frontend").await;
    let (student_token, student_id) = signup_student(&app, "st@x.com").await;

    let apply = |job: &str| {
        create_json_request(
            "POST",
            &format!("/api/v1/jobs/apply-for-job/{job}"),
            Some(student_token.as_str()),
            Some(application_body()),
        )
    };

    let (status, json) = send(&app, apply(&j1)).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["jobDetail"]["jobId"], j1.as_str());
    assert_eq!(json["jobDetail"]["createdFor"], company_id.as_str());
    assert_eq!(json["jobDetail"]["createdBy"], student_id.as_str());
    assert_eq!(json["jobDetail"]["student"]["email"], "st@x.com");

    let mut changed = application_body();
    changed["totalExperience"] = json!("10 years");
    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            &format!("/api/v1/jobs/apply-for-job/{j1}"),
            Some(student_token.as_str()),
            Some(changed),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "You Already have applied to this Job");

    let (status, _) = send(&app, apply(&j2)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(
        &app,
        create_json_request("GET", "/api/v1/company/jobs", Some(company_token.as_str()), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["jobs"].as_array().unwrap().len(), 2);
    assert_eq!(json["jobApplications"].as_array().unwrap().len(), 2);

    let (status, json) = send(
        &app,
        create_json_request("GET", "/api/v1/student/jobs", Some(student_token.as_str()), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalJobs"].as_array().unwrap().len(), 1);
    assert_eq!(json["appliedJobs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_apply_with_invalid_or_unknown_job() {
    let app = create_router_for_testing();
    let (student_token, _) = signup_student(&app, "lost@x.com").await;

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            "/api/v1/jobs/apply-for-job/not-an-id",
            Some(student_token.as_str()),
            Some(application_body()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid Job ID");

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            &format!("/api/v1/jobs/apply-for-job/{}", uuid::Uuid::new_v4()),
            Some(student_token.as_str()),
            Some(application_body()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "No Job found against the specified Job id");
}

// =============================================================================
// Admin Tests
// =============================================================================

#[tokio::test]
async fn test_admin_deletes_company_with_cascade() {
    let state = Arc::new(AppState::for_testing());
    let app = create_router_with_state(state.clone());
    let admin_token = seeded_admin_token(&state, &app).await;

    let (company_token, company_id) = signup_company(&app, "gone@acme.io").await;
    let job = create_job(&app, &company_token, "Backend").await;
    create_job(&app, &company_token, "Ops").await;
    let (student_token, _) = signup_student(&app, "applicant@x.com").await;
    let (status, _) = send(
        &app,
        create_json_request(
            "POST",
            &format!("/api/v1/jobs/apply-for-job/{job}"),
            Some(student_token.as_str()),
            Some(application_body()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(
        &app,
        create_json_request(
            "DELETE",
            &format!("/api/v1/admin/delete-company/{company_id}"),
            Some(admin_token.as_str()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["message"], "Company has been Deleted");
    assert_eq!(json["jobsRemoved"], 2);
    assert_eq!(json["applicationsRemoved"], 1);

    let (status, json) = send(
        &app,
        create_json_request("GET", "/api/v1/admin/jobs", Some(admin_token.as_str()), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["totalJobs"].as_array().unwrap().is_empty());

    let (_, json) = send(
        &app,
        create_json_request("GET", "/api/v1/admin/students", Some(admin_token.as_str()), None),
    )
    .await;
    assert!(json["studentsJobApplications"]
        .as_array()
        .unwrap()
        .is_empty());

    // The deleted company's token is still signed but no longer resolves
    let (status, json) = send(
        &app,
        create_json_request("GET", "/api/v1/company/profile", Some(company_token.as_str()), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid token");

    let (status, json) = send(
        &app,
        create_json_request(
            "DELETE",
            &format!("/api/v1/admin/delete-company/{company_id}"),
            Some(admin_token.as_str()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "No Company find against the given Company ID");
}

#[tokio::test]
async fn test_admin_deletes_student_with_applications() {
    let state = Arc::new(AppState::for_testing());
    let app = create_router_with_state(state.clone());
    let admin_token = seeded_admin_token(&state, &app).await;

    let (company_token, _) = signup_company(&app, "hiring@acme.io").await;
    let job = create_job(&app, &company_token, "Backend").await;
    let (student_token, student_id) = signup_student(&app, "leaving@x.com").await;
    let (status, _) = send(
        &app,
        create_json_request(
            "POST",
            &format!("/api/v1/jobs/apply-for-job/{job}"),
            Some(student_token.as_str()),
            Some(application_body()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let delete_uri = format!("/api/v1/admin/delete-student/{student_id}");
    let (status, json) = send(
        &app,
        create_json_request("DELETE", &delete_uri, Some(admin_token.as_str()), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["message"], "Student has been Deleted");
    assert_eq!(json["studentToDelete"]["email"], "leaving@x.com");
    assert_eq!(json["applicationsRemoved"], 1);

    let (status, json) = send(
        &app,
        create_json_request("GET", "/api/v1/company/jobs", Some(company_token.as_str()), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["jobs"].as_array().unwrap().len(), 1);
    assert!(json["jobApplications"].as_array().unwrap().is_empty());

    let (status, json) = send(
        &app,
        create_json_request("GET", "/api/v1/student/profile", Some(student_token.as_str()), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid token");

    let (status, json) = send(
        &app,
        create_json_request("DELETE", &delete_uri, Some(admin_token.as_str()), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "No Student find against the given Student ID");

    let (status, json) = send(
        &app,
        create_json_request(
            "DELETE",
            "/api/v1/admin/delete-student/not-a-student",
            Some(admin_token.as_str()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid Student ID");
}

#[tokio::test]
async fn test_admin_profile_and_invalid_delete_id() {
    let state = Arc::new(AppState::for_testing());
    let app = create_router_with_state(state.clone());
    let admin_token = seeded_admin_token(&state, &app).await;

    let (status, json) = send(
        &app,
        create_json_request("GET", "/api/v1/admin/profile", Some(admin_token.as_str()), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["adminProfile"]["adminName"], "root");

    let (status, json) = send(
        &app,
        create_json_request(
            "DELETE",
            "/api/v1/admin/delete-job/123abc",
            Some(admin_token.as_str()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid Job ID");
}

#[tokio::test]
async fn test_student_token_cannot_reach_admin_routes() {
    let app = create_router_for_testing();
    let (student_token, _) = signup_student(&app, "curious@x.com").await;

    let (status, json) = send(
        &app,
        create_json_request("GET", "/api/v1/admin/companies", Some(student_token.as_str()), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Token is not valid");
}
