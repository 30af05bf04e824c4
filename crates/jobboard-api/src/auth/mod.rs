//! Authentication and authorization module
//!
//! - Token issuing and verification (`jwt`)
//! - Password hashing with Argon2 (`password`)
//! - Per-role route guards that re-resolve the token identity (`middleware`)

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, Identity, JwtConfig, JwtError, TokenLifetime, TokenService};
pub use middleware::{
    admin_auth, company_auth, student_auth, verify_principal, AuthError, Principal,
};
pub use password::{hash_password, verify_password, PasswordConfig, PasswordError};
