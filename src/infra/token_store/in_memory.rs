// Keeps the token for the lifetime of the process only.
// Used when persistence is switched off with DRIVE_PERSIST_TOKEN=false.

use crate::core::drive::{Credential, TokenStore, TokenStoreError};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryTokenStore {
    slot: RwLock<Option<Credential>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<Credential>, TokenStoreError> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, credential: &Credential) -> Result<(), TokenStoreError> {
        *self.slot.write().await = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.slot.write().await = None;
        Ok(())
    }
}
