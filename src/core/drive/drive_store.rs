use super::drive_models::Credential;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Single-slot persistent storage for the access token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<Credential>, TokenStoreError>;
    async fn save(&self, credential: &Credential) -> Result<(), TokenStoreError>;
    /// Removing an empty slot is not an error.
    async fn clear(&self) -> Result<(), TokenStoreError>;
}

// Lets main pick the store at runtime.
#[async_trait]
impl TokenStore for Box<dyn TokenStore> {
    async fn load(&self) -> Result<Option<Credential>, TokenStoreError> {
        (**self).load().await
    }

    async fn save(&self, credential: &Credential) -> Result<(), TokenStoreError> {
        (**self).save(credential).await
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        (**self).clear().await
    }
}
