//! Domain services
//!
//! Services borrow the store and the auth primitives from `AppState` for the
//! duration of a request. They return `AppError` so handlers can pass results
//! straight through with `?`.
//!
//! Author: hephaex@gmail.com

pub mod account;
pub mod applications;
pub mod jobs;

pub use account::{AccountService, Authenticated, Deletion};
pub use applications::ApplicationService;
pub use jobs::{CascadeCounts, JobService};
