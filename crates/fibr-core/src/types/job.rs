//! Thumbnail pipeline jobs.

use serde::{Deserialize, Serialize};

/// A unit of background thumbnail work, identified by store pathnames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThumbnailJob {
    /// Generate the thumbnail of one file if it does not exist yet.
    Generate { pathname: String },
    /// Remove the shadow entry of a file or directory.
    Delete { pathname: String },
    /// Move the shadow entry after a rename.
    Move { from: String, to: String },
    /// Full-tree reconciliation pass.
    Walk,
}

impl ThumbnailJob {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate",
            Self::Delete { .. } => "delete",
            Self::Move { .. } => "move",
            Self::Walk => "walk",
        }
    }

    /// Whether the job removes or relocates existing thumbnails. Losing one
    /// leaves a stale shadow entry until the next walk.
    pub fn is_cleanup(&self) -> bool {
        matches!(self, Self::Delete { .. } | Self::Move { .. })
    }
}
