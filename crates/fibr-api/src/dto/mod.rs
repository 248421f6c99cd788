//! Request payloads decoded from query strings and forms.

pub mod request;

pub use request::{BrowseQuery, MutationForm};
