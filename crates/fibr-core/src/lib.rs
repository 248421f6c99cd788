//! # fibr-core
//!
//! Core crate for Fibr. Contains the storage trait, configuration schemas,
//! the share entity, thumbnail job types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Fibr crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

/// Name of the hidden directory, directly under the served root, that holds
/// the share registry and the thumbnail shadow tree.
pub const METADATA_DIRECTORY_NAME: &str = ".metadata";
