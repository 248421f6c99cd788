//! Custom Axum extractors.

pub mod access;

pub use access::RequestAccess;
