//! Typed results handed to the HTTP layer for rendering.

use serde::{Deserialize, Serialize};

use fibr_core::types::StorageItem;

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Success,
    Error,
}

/// A message displayed above a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub level: MessageLevel,
    pub content: String,
}

impl Message {
    /// A success message.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    /// An error message.
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }

    /// Rebuild a message carried in a redirect query string.
    pub fn from_query(content: Option<&str>, level: Option<&str>) -> Option<Self> {
        let content = content.filter(|content| !content.is_empty())?;
        match level {
            Some("error") => Some(Self::error(content)),
            _ => Some(Self::success(content)),
        }
    }
}

/// Display layout of a listing, selected with the `d` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Grid,
    List,
}

impl Layout {
    /// Parse the query value, falling back to the grid layout.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("list") => Self::List,
            _ => Self::Grid,
        }
    }
}

/// Page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub public_url: String,
}

/// One entry of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListingItem {
    #[serde(flatten)]
    pub item: StorageItem,
    /// URL path of the entry.
    pub uri: String,
    /// Whether a thumbnail has been generated for the entry.
    pub has_thumbnail: bool,
    /// Key of the entry in a batched thumbnail map.
    pub fingerprint: String,
}

/// A directory listing.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    /// The listed directory.
    pub current: StorageItem,
    /// Its children, directories first.
    pub items: Vec<ListingItem>,
    /// Breadcrumb segments of the request-relative path.
    pub path_parts: Vec<String>,
    pub layout: Layout,
    pub message: Option<Message>,
    pub meta: PageMeta,
    pub can_edit: bool,
    pub can_share: bool,
}

/// Result of a mutating operation.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Render the refreshed listing.
    Listing(Box<Listing>),
    /// Redirect to the given location.
    Redirect(String),
}
