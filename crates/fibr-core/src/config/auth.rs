//! Owner authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Owner accounts as `login:bcrypt-hash` entries.
    #[serde(default)]
    pub users: Vec<String>,
    /// Realm announced in `WWW-Authenticate` challenges.
    #[serde(default = "default_realm")]
    pub realm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            realm: default_realm(),
        }
    }
}

fn default_realm() -> String {
    "fibr".to_string()
}
