//! Share entity, persisted in the share registry file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A narrower access grant exposing a sub-tree under its own identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Opaque identifier, the first URL segment of shared requests.
    pub id: String,
    /// Shared sub-tree, relative to the global root.
    pub path: String,
    /// Whether anonymous visitors may mutate the sub-tree.
    pub edit: bool,
    /// bcrypt hash of the share password; empty means no password.
    #[serde(default)]
    pub password: String,
    /// Instant after which the share stops matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,
}

impl Share {
    /// Whether a password must be presented to use this share anonymously.
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// Whether the share has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration.is_some_and(|expiration| expiration <= now)
    }
}
