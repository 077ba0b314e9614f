use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::drive::{
    name_contains_filter, Credential, DriveApi, DriveApiError, FileRecord, PageSize, UserProfile,
};

pub const DEFAULT_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
pub const DEFAULT_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Projection requested for every file listing and search.
const FILE_FIELDS: &str = "files(id, name, mimeType, webViewLink)";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRecord>,
}

/// Google Drive v3 + OpenID userinfo over plain REST.
pub struct GoogleDriveClient {
    client: Client,
    files_url: String,
    userinfo_url: String,
}

impl GoogleDriveClient {
    pub fn new() -> Self {
        Self::with_endpoints(DEFAULT_FILES_URL, DEFAULT_USERINFO_URL)
    }

    pub fn with_endpoints(files_url: impl Into<String>, userinfo_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            files_url: files_url.into(),
            userinfo_url: userinfo_url.into(),
        }
    }

    /// Uses `DRIVE_API_BASE_URL` / `GOOGLE_USERINFO_URL` when set.
    pub fn from_env() -> Self {
        let files_url = std::env::var("DRIVE_API_BASE_URL")
            .map(|base| format!("{}/drive/v3/files", base.trim_end_matches('/')))
            .unwrap_or_else(|_| DEFAULT_FILES_URL.to_string());
        let userinfo_url = std::env::var("GOOGLE_USERINFO_URL")
            .unwrap_or_else(|_| DEFAULT_USERINFO_URL.to_string());
        Self::with_endpoints(files_url, userinfo_url)
    }

    async fn send_json<T: DeserializeOwned + Send>(
        &self,
        request: RequestBuilder,
        credential: &Credential,
    ) -> Result<T, DriveApiError> {
        let response = request
            .header("Authorization", credential.bearer_header())
            .send()
            .await
            .map_err(|e| DriveApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(DriveApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| DriveApiError::Decode(e.to_string()))
    }
}

impl Default for GoogleDriveClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DriveApi for GoogleDriveClient {
    async fn fetch_profile(&self, credential: &Credential) -> Result<UserProfile, DriveApiError> {
        tracing::debug!("Fetching user info");
        let request = self.client.get(&self.userinfo_url);
        self.send_json(request, credential).await
    }

    async fn list_files(
        &self,
        credential: &Credential,
        page_size: PageSize,
    ) -> Result<Vec<FileRecord>, DriveApiError> {
        let request = self.client.get(&self.files_url).query(&[
            ("pageSize", page_size.as_u32().to_string()),
            ("fields", FILE_FIELDS.to_string()),
        ]);
        let list: FileList = self.send_json(request, credential).await?;
        tracing::debug!("Drive returned {} file(s)", list.files.len());
        Ok(list.files)
    }

    async fn search_files(
        &self,
        credential: &Credential,
        query: &str,
    ) -> Result<Vec<FileRecord>, DriveApiError> {
        let request = self.client.get(&self.files_url).query(&[
            ("q", name_contains_filter(query)),
            ("fields", FILE_FIELDS.to_string()),
        ]);
        let list: FileList = self.send_json(request, credential).await?;
        tracing::debug!("Drive search matched {} file(s)", list.files.len());
        Ok(list.files)
    }
}
