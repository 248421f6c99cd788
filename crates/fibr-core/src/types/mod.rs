//! Shared domain types.

pub mod item;
pub mod job;
pub mod media;
pub mod share;

pub use item::StorageItem;
pub use job::ThumbnailJob;
pub use share::Share;
