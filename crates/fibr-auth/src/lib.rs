//! # fibr-auth
//!
//! Credential handling for Fibr.
//!
//! ## Modules
//!
//! - `password` — bcrypt password hashing and verification
//! - `basic` — HTTP Basic `Authorization` header parsing
//! - `authenticator` — owner authentication against configured users

pub mod authenticator;
pub mod basic;
pub mod password;

pub use authenticator::{Authenticator, BasicUserAuthenticator};
pub use basic::{AuthError, BasicCredentials, extract_basic_credentials};
pub use password::PasswordHasher;
