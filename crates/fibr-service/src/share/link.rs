//! Share identifier generation.

use sha1::{Digest, Sha1};
use uuid::Uuid;

/// Generates share identifiers.
#[derive(Debug, Clone)]
pub struct LinkService;

impl LinkService {
    /// Creates a new link service.
    pub fn new() -> Self {
        Self
    }

    /// Generates an identifier: SHA-1 hex digest of a random UUID.
    pub fn generate_id(&self) -> String {
        let uuid = Uuid::new_v4();
        hex::encode(Sha1::digest(uuid.to_string().as_bytes()))
    }
}

impl Default for LinkService {
    fn default() -> Self {
        Self::new()
    }
}
