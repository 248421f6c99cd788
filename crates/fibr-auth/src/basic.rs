//! HTTP Basic authentication header parsing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use fibr_core::error::AppError;

/// Extracted credentials from a Basic auth header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Username, may be empty.
    pub username: String,
    /// Password (plaintext from header).
    pub password: String,
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header present.
    #[error("Missing Authorization header")]
    MissingHeader,

    /// Header present but not decodable Basic credentials.
    #[error("Malformed Authorization header")]
    Malformed,

    /// Well-formed credentials that were rejected.
    #[error("Invalid credentials")]
    Forbidden,
}

impl AuthError {
    /// Whether the client should be prompted for (other) credentials.
    pub fn is_challenge(&self) -> bool {
        matches!(self, Self::MissingHeader | Self::Malformed)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        if e.is_challenge() {
            AppError::authentication(e.to_string())
        } else {
            AppError::not_authorized()
        }
    }
}

/// Extract Basic credentials from a raw `Authorization` header value.
pub fn extract_basic_credentials(header: Option<&str>) -> Result<BasicCredentials, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;

    let encoded = header
        .strip_prefix("Basic ")
        .ok_or(AuthError::Malformed)?
        .trim();
    let decoded = BASE64.decode(encoded).map_err(|_| AuthError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::Malformed)?;

    let (username, password) = decoded.split_once(':').ok_or(AuthError::Malformed)?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(raw: &str) -> String {
        format!("Basic {}", BASE64.encode(raw))
    }

    #[test]
    fn test_extracts_credentials() {
        let creds = extract_basic_credentials(Some(&header("admin:pa:ss"))).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "pa:ss");

        let creds = extract_basic_credentials(Some(&header(":only-password"))).unwrap();
        assert_eq!(creds.username, "");
        assert_eq!(creds.password, "only-password");
    }

    #[test]
    fn test_errors() {
        assert_eq!(extract_basic_credentials(None), Err(AuthError::MissingHeader));
        assert_eq!(
            extract_basic_credentials(Some("Bearer abc")),
            Err(AuthError::Malformed)
        );
        assert_eq!(
            extract_basic_credentials(Some("Basic !!!")),
            Err(AuthError::Malformed)
        );
        assert_eq!(
            extract_basic_credentials(Some(&header("no-colon"))),
            Err(AuthError::Malformed)
        );
    }

    #[test]
    fn test_app_error_mapping() {
        use fibr_core::error::ErrorKind;

        assert_eq!(AppError::from(AuthError::MissingHeader).kind, ErrorKind::Authentication);
        assert_eq!(AppError::from(AuthError::Malformed).kind, ErrorKind::Authentication);
        assert_eq!(AppError::from(AuthError::Forbidden).kind, ErrorKind::Authorization);
    }
}
