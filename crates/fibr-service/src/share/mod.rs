//! Share management: identifiers, persistence, registry and access control.

pub mod access;
pub mod link;
pub mod registry;
pub mod store;

pub use access::{Access, AccessService, PublicAsset};
pub use link::LinkService;
pub use registry::ShareRegistry;
pub use store::{JsonFileShareStore, MemoryShareStore, ShareStore};
