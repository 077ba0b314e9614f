use super::drive_models::Credential;
use async_trait::async_trait;

/// Read-only access to the user's Drive.
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Login was cancelled")]
    Cancelled,
    #[error("Identity provider denied the request: {0}")]
    Denied(String),
    #[error("OAuth state mismatch, ignoring the redirect")]
    StateMismatch,
    #[error("No access_token in the redirect")]
    MissingToken,
    #[error("Invalid authorization URL: {0}")]
    InvalidUrl(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the interactive login and hands back a bearer credential.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authorize(&self, scope: &str) -> Result<Credential, IdentityError>;
}
