use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::core::drive::{Credential, TokenStore, TokenStoreError};

pub const DEFAULT_TOKEN_PATH: &str = "data/access_token.json";

/// On-disk shape of the slot.
#[derive(Debug, Serialize, Deserialize)]
struct TokenSlot {
    access_token: String,
}

/// Persists the access token as a small JSON file so it survives restarts.
///
/// The token is stored in plaintext; on unix the file is made owner-only.
pub struct JsonTokenStore {
    path: PathBuf,
}

impl JsonTokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn from_env() -> Self {
        let path =
            std::env::var("DRIVE_TOKEN_PATH").unwrap_or_else(|_| DEFAULT_TOKEN_PATH.to_string());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the slot for writing. A new file is created owner-only; an
    /// existing one is narrowed to owner-only before anything is written.
    #[cfg(unix)]
    async fn open_for_write(&self) -> Result<File, TokenStoreError> {
        use std::os::unix::fs::PermissionsExt;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&self.path)
            .await?;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await?;
        Ok(file)
    }

    #[cfg(not(unix))]
    async fn open_for_write(&self) -> Result<File, TokenStoreError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await?;
        Ok(file)
    }
}

#[async_trait]
impl TokenStore for JsonTokenStore {
    async fn load(&self) -> Result<Option<Credential>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&self.path).await?;
        let slot: TokenSlot = serde_json::from_str(&text)?;
        if slot.access_token.is_empty() {
            return Ok(None);
        }
        Ok(Some(Credential::new(slot.access_token)))
    }

    async fn save(&self, credential: &Credential) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let slot = TokenSlot {
            access_token: credential.as_str().to_string(),
        };
        let text = serde_json::to_string_pretty(&slot)?;
        let mut file = self.open_for_write().await?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await?;
        tracing::debug!("Saved access token to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("Removed access token at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
