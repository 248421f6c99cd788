//! Owner authentication.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use fibr_core::config::AuthConfig;
use fibr_core::error::AppError;
use fibr_core::result::AppResult;

use crate::basic::{AuthError, extract_basic_credentials};
use crate::password::PasswordHasher;

/// Decides whether a request comes from the owner of the tree.
#[async_trait]
pub trait Authenticator: Send + Sync + std::fmt::Debug + 'static {
    /// Authenticate from the raw `Authorization` header value.
    ///
    /// Returns the login on success.
    async fn authenticate(&self, authorization: Option<&str>) -> Result<String, AuthError>;
}

/// Authenticator checking HTTP Basic credentials against configured users.
#[derive(Debug, Clone, Default)]
pub struct BasicUserAuthenticator {
    /// Login to bcrypt hash.
    users: HashMap<String, String>,
}

impl BasicUserAuthenticator {
    /// Build from `login:bcrypt-hash` entries.
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        let mut users = HashMap::new();
        for entry in &config.users {
            let (login, hash) = entry.split_once(':').ok_or_else(|| {
                AppError::configuration("Auth users must be formatted as login:hash")
            })?;
            if login.is_empty() || hash.is_empty() {
                return Err(AppError::configuration(
                    "Auth users must be formatted as login:hash",
                ));
            }
            users.insert(login.to_string(), hash.to_string());
        }
        Ok(Self { users })
    }

    /// Number of configured users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl Authenticator for BasicUserAuthenticator {
    async fn authenticate(&self, authorization: Option<&str>) -> Result<String, AuthError> {
        let credentials = extract_basic_credentials(authorization)?;
        let hash = self
            .users
            .get(&credentials.username)
            .cloned()
            .ok_or(AuthError::Forbidden)?;

        let password = credentials.password;
        let verified = tokio::task::spawn_blocking(move || {
            PasswordHasher::new().verify_password(&password, &hash)
        })
        .await;

        match verified {
            Ok(Ok(true)) => Ok(credentials.username),
            _ => {
                debug!(login = %credentials.username, "Owner authentication rejected");
                Err(AuthError::Forbidden)
            }
        }
    }
}
