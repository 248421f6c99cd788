//! # fibr-service
//!
//! Business logic of Fibr: every request is turned into a [`RequestContext`]
//! by the [`AccessService`], then handled by the [`CrudService`], which
//! returns typed view models.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod crud;
pub mod share;
pub mod view;

pub use context::RequestContext;
pub use crud::{CrudService, ShareForm, UploadBatch};
pub use share::{
    Access, AccessService, JsonFileShareStore, LinkService, MemoryShareStore, PublicAsset,
    ShareRegistry, ShareStore,
};
pub use view::{Layout, Listing, ListingItem, Message, MessageLevel, Outcome, PageMeta};
