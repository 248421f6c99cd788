//! # fibr-api
//!
//! HTTP layer for Fibr built on Axum.
//!
//! Every path of the served tree is handled by the same method router:
//! GET lists or serves, POST uploads (or overrides the method through a form
//! field), PUT creates a directory, PATCH renames and DELETE deletes. Access
//! is decided once per request by the [`extractors::RequestAccess`]
//! extractor; handlers render the typed view models as JSON.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
