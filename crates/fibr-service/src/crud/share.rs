use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

use fibr_auth::password::PasswordHasher;
use fibr_core::error::{AppError, ErrorKind};
use fibr_core::result::AppResult;

use super::CrudService;
use crate::context::RequestContext;
use crate::view::{Layout, Message, Outcome};

/// Form values of a share creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShareForm {
    /// Whether anonymous visitors may edit; absent means `false`.
    pub edit: Option<String>,
    /// Plaintext password; absent or empty means none.
    pub password: Option<String>,
    /// Lifetime in hours; absent or `0` means forever.
    pub duration: Option<String>,
}

impl CrudService {
    /// Share the requested entry.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        form: &ShareForm,
        layout: Layout,
    ) -> AppResult<Outcome> {
        if !ctx.can_share {
            return Err(AppError::not_authorized());
        }

        let edit = match form.edit.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(value) => parse_bool(value).ok_or_else(|| {
                AppError::validation(format!("Invalid value for edit: {value}"))
            })?,
        };

        let expiration = match form.duration.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => match value.parse::<u32>() {
                Ok(0) => None,
                Ok(hours) => Some(expires_in(hours).ok_or_else(|| {
                    AppError::validation(format!("Invalid value for duration: {value}"))
                })?),
                Err(_) => {
                    return Err(AppError::validation(format!(
                        "Invalid value for duration: {value}"
                    )));
                }
            },
        };

        let password_hash = match form.password.as_deref().filter(|p| !p.is_empty()) {
            None => String::new(),
            Some(password) => {
                let password = password.to_string();
                tokio::task::spawn_blocking(move || PasswordHasher::new().hash_password(&password))
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Internal, "Password hashing panicked", e)
                    })??
            }
        };

        let target = self.lookup(ctx).await?;
        let share = self
            .registry
            .create(&target.pathname, edit, password_hash, expiration)
            .await?;

        let message = Message::success(format!("Share successfully created with ID: {}", share.id));
        let listing = self.listing(ctx, layout, Some(message)).await?;
        Ok(Outcome::Listing(Box::new(listing)))
    }

    /// Remove the share `id`.
    pub async fn delete_share(
        &self,
        ctx: &RequestContext,
        id: &str,
        layout: Layout,
    ) -> AppResult<Outcome> {
        if !ctx.can_share {
            return Err(AppError::not_authorized());
        }

        let share = self.registry.remove(id.trim()).await?;

        let message = Message::success(format!("Share {} successfully deleted", share.id));
        let listing = self.listing(ctx, layout, Some(message)).await?;
        Ok(Outcome::Listing(Box::new(listing)))
    }
}

/// Expiration `hours` from now, `None` when it falls outside the calendar.
fn expires_in(hours: u32) -> Option<DateTime<Utc>> {
    Utc::now().checked_add_signed(TimeDelta::try_hours(i64::from(hours))?)
}

/// Boolean form value: `1 t T TRUE true True` or `0 f F FALSE false False`.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
