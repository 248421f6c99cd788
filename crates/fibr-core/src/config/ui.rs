//! Page metadata configuration.

use serde::{Deserialize, Serialize};

/// Values used to compute page titles and public URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Public URL the server is reachable at.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Base page title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Base page description.
    #[serde(default = "default_description")]
    pub description: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            public_url: default_public_url(),
            title: default_title(),
            description: default_description(),
        }
    }
}

fn default_public_url() -> String {
    "http://localhost:1080".to_string()
}

fn default_title() -> String {
    "fibr".to_string()
}

fn default_description() -> String {
    "FIle BRowser".to_string()
}
