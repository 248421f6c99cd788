//! Thumbnail pipeline configuration.

use serde::{Deserialize, Serialize};

/// Thumbnail generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Whether thumbnails are generated at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Edge length in pixels of the square preview.
    #[serde(default = "default_size")]
    pub size: u32,
    /// Capacity of the job queue; submissions beyond it are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Whether a full reconciliation walk is queued at startup.
    #[serde(default = "default_true")]
    pub walk_on_startup: bool,
    /// Optional cron expression (with seconds) for periodic walks.
    #[serde(default)]
    pub walk_schedule: Option<String>,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: default_size(),
            queue_capacity: default_queue_capacity(),
            walk_on_startup: true,
            walk_schedule: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_size() -> u32 {
    150
}

fn default_queue_capacity() -> usize {
    256
}
