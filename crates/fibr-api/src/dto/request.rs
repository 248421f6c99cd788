//! Query and form payloads.

use serde::Deserialize;

use fibr_service::{Layout, Message, ShareForm};

/// Query parameters understood on every path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    /// Display layout, `grid` or `list`.
    pub d: Option<String>,
    /// Message carried over a redirect.
    pub message: Option<String>,
    /// Level of the carried message.
    #[serde(rename = "messageLevel")]
    pub message_level: Option<String>,
    /// Present when thumbnails are requested.
    pub thumbnail: Option<String>,
}

impl BrowseQuery {
    /// Requested layout.
    pub fn layout(&self) -> Layout {
        Layout::from_query(self.d.as_deref())
    }

    /// Message carried over a redirect, if any.
    pub fn message(&self) -> Option<Message> {
        Message::from_query(self.message.as_deref(), self.message_level.as_deref())
    }

    /// Whether thumbnails are requested instead of content.
    pub fn wants_thumbnail(&self) -> bool {
        self.thumbnail.is_some()
    }
}

/// URL-encoded form of every mutation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationForm {
    /// Method override on POST: `PUT`, `PATCH`, `DELETE`, `SHARE` or `UNSHARE`.
    pub method: Option<String>,
    /// Directory name on create, entry name on delete.
    pub name: Option<String>,
    /// Rename target, relative to the request root.
    #[serde(rename = "newName")]
    pub new_name: Option<String>,
    /// Share edit flag.
    pub edit: Option<String>,
    /// Share password.
    pub password: Option<String>,
    /// Share lifetime in hours.
    pub duration: Option<String>,
    /// Share id on removal.
    pub id: Option<String>,
}

impl MutationForm {
    /// Share creation values of this form.
    pub fn share(&self) -> ShareForm {
        ShareForm {
            edit: self.edit.clone(),
            password: self.password.clone(),
            duration: self.duration.clone(),
        }
    }
}
