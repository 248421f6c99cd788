//! # fibr-storage
//!
//! Storage side of Fibr: the local filesystem provider, the path resolver
//! that keeps every request inside its root, and the thumbnail engine that
//! maintains the shadow tree of previews.

pub mod path;
pub mod providers;
pub mod thumbnail;

pub use path::{PathResolver, Resolved, sanitize_name};
pub use providers::LocalStorage;
pub use thumbnail::{ImageRenderer, PreviewRenderer, Thumbnailer};
