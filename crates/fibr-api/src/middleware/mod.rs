//! Axum middleware stack.

pub mod challenge;
pub mod logging;
