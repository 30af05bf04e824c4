//! API route definitions
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::auth::{admin_auth, company_auth, student_auth};
use crate::handlers::{admin, company, jobs, student};
use crate::state::AppState;

/// Create API v1 routes
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/admin", admin_routes(state.clone()))
        .nest("/company", company_routes(state.clone()))
        .nest("/student", student_routes(state.clone()))
        .nest("/jobs", job_routes(state))
}

fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public_routes = Router::new().route("/login", post(admin::login));

    let protected_routes = Router::new()
        .route("/profile", get(admin::profile))
        .route("/jobs", get(admin::jobs))
        .route("/companies", get(admin::companies))
        .route("/students", get(admin::students))
        .route("/delete-job/:id", delete(admin::delete_job))
        .route("/delete-company/:id", delete(admin::delete_company))
        .route("/delete-student/:id", delete(admin::delete_student))
        .route_layer(middleware::from_fn_with_state(state, admin_auth));

    Router::new().merge(public_routes).merge(protected_routes)
}

fn company_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public_routes = Router::new()
        .route("/signup", post(company::signup))
        .route("/login", post(company::login));

    let protected_routes = Router::new()
        .route("/profile", get(company::profile))
        .route("/jobs", get(company::jobs))
        .route_layer(middleware::from_fn_with_state(state, company_auth));

    Router::new().merge(public_routes).merge(protected_routes)
}

fn student_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public_routes = Router::new()
        .route("/signup", post(student::signup))
        .route("/login", post(student::login));

    let protected_routes = Router::new()
        .route("/profile", get(student::profile))
        .route("/jobs", get(student::jobs))
        .route("/companies", get(student::companies))
        .route_layer(middleware::from_fn_with_state(state, student_auth));

    Router::new().merge(public_routes).merge(protected_routes)
}

fn job_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let company_only = Router::new()
        .route("/create-jobs", post(jobs::create_job))
        .route_layer(middleware::from_fn_with_state(state.clone(), company_auth));

    let student_only = Router::new()
        .route("/apply-for-job/:id", post(jobs::apply_for_job))
        .route_layer(middleware::from_fn_with_state(state, student_auth));

    Router::new().merge(company_only).merge(student_only)
}
