use super::drive_models::{Credential, FileRecord, PageSize, UserProfile};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriveApiError {
    #[error("Unauthorized: access token is invalid or expired")]
    Unauthorized,
    #[error("Google API error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// The three authenticated calls the browser makes against Google.
#[async_trait]
pub trait DriveApi: Send + Sync {
    async fn fetch_profile(&self, credential: &Credential) -> Result<UserProfile, DriveApiError>;

    async fn list_files(
        &self,
        credential: &Credential,
        page_size: PageSize,
    ) -> Result<Vec<FileRecord>, DriveApiError>;

    /// `query` is the raw text the user typed; implementations build the
    /// filter with [`name_contains_filter`].
    async fn search_files(
        &self,
        credential: &Credential,
        query: &str,
    ) -> Result<Vec<FileRecord>, DriveApiError>;
}

/// Builds the Drive `q` expression for a substring match on the file name.
///
/// Quotes and backslashes in the user's text are escaped so the text stays
/// inside the string literal and can't add clauses to the filter.
pub fn name_contains_filter(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            other => escaped.push(other),
        }
    }
    format!("name contains '{}'", escaped)
}
