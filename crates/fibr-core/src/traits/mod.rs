//! Core traits defined in `fibr-core` and implemented by other crates.

pub mod jobs;
pub mod storage;

pub use jobs::JobSubmitter;
pub use storage::{ByteStream, Storage};
