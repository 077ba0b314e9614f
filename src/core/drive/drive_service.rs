use super::drive_api::{DriveApi, DriveApiError};
use super::drive_models::{
    Credential, FileRecord, Notice, PageSize, SearchResult, SessionView, UserProfile,
};
use super::drive_store::{TokenStore, TokenStoreError};
use super::identity::{IdentityError, IdentityProvider, DRIVE_READONLY_SCOPE};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Please log in first")]
    LoginRequired,
    #[error("Session expired. Please login again.")]
    SessionExpired,
    #[error("Login failed: {0}")]
    Provider(#[from] IdentityError),
    #[error("Drive request failed: {0}")]
    Api(#[from] DriveApiError),
    #[error("Token store error: {0}")]
    Store(#[from] TokenStoreError),
    /// The session changed while the request was in flight; its result was dropped.
    #[error("Session changed while the request was in flight")]
    Stale,
}

/// Receives notices the user must see. Called before any state is torn down.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[derive(Default)]
struct SessionState {
    credential: Option<Credential>,
    logged_in_at: Option<DateTime<Utc>>,
    profile: Option<UserProfile>,
    files: Vec<FileRecord>,
    page_size: PageSize,
    query: String,
    search: SearchResult,
    last_error: Option<String>,
    /// Bumped on every login and logout. Completions from an older
    /// generation are discarded.
    generation: u64,
}

impl SessionState {
    fn clear_session(&mut self) {
        self.credential = None;
        self.logged_in_at = None;
        self.profile = None;
        self.files.clear();
        self.query.clear();
        self.search = SearchResult::NotSearched;
        self.last_error = None;
    }

    fn start_session(&mut self, credential: Credential) -> u64 {
        self.clear_session();
        self.generation += 1;
        self.credential = Some(credential);
        self.logged_in_at = Some(Utc::now());
        self.generation
    }
}

/// Owns the signed-in session and proxies the Drive operations.
///
/// Network calls never run under the state lock. Each operation remembers the
/// generation it started under and only writes its result back if that
/// generation is still current, so a slow listing that finishes after a
/// logout can't repopulate cleared state.
pub struct DriveBrowser<P: IdentityProvider, A: DriveApi, S: TokenStore> {
    identity: P,
    api: A,
    store: S,
    notifier: Arc<dyn Notifier>,
    state: RwLock<SessionState>,
}

impl<P, A, S> DriveBrowser<P, A, S>
where
    P: IdentityProvider,
    A: DriveApi,
    S: TokenStore,
{
    pub fn new(identity: P, api: A, store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            identity,
            api,
            store,
            notifier,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Runs the interactive login, persists the token and loads the profile.
    pub async fn login(&self) -> Result<(), BrowserError> {
        let credential = match self.identity.authorize(DRIVE_READONLY_SCOPE).await {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!("Login did not complete: {}", e);
                return Err(e.into());
            }
        };

        // Slot and session switch together under the state lock.
        let generation = {
            let mut state = self.state.write().await;
            self.store.save(&credential).await?;
            state.start_session(credential.clone())
        };
        tracing::info!(generation, "Signed in, fetching user profile");

        self.fetch_profile_at(&credential, generation).await
    }

    /// Adopts a token left in the persistent slot by an earlier run.
    ///
    /// Returns `Ok(false)` when the slot is empty.
    pub async fn restore(&self) -> Result<bool, BrowserError> {
        let Some(credential) = self.store.load().await? else {
            tracing::debug!("No stored access token to restore");
            return Ok(false);
        };

        let generation = self.state.write().await.start_session(credential.clone());
        tracing::info!(generation, "Restored stored access token");
        self.fetch_profile_at(&credential, generation).await?;
        Ok(true)
    }

    /// Loads the profile for `credential` if it is still the active one.
    pub async fn fetch_profile(&self, credential: &Credential) -> Result<(), BrowserError> {
        let generation = {
            let state = self.state.read().await;
            if state.credential.as_ref() != Some(credential) {
                return Err(BrowserError::Stale);
            }
            state.generation
        };
        self.fetch_profile_at(credential, generation).await
    }

    async fn fetch_profile_at(
        &self,
        credential: &Credential,
        generation: u64,
    ) -> Result<(), BrowserError> {
        match self.api.fetch_profile(credential).await {
            Ok(profile) => {
                let mut state = self.state.write().await;
                if state.generation != generation {
                    tracing::debug!(generation, "Dropping stale profile response");
                    return Err(BrowserError::Stale);
                }
                tracing::info!("Fetched profile for {}", profile.name);
                state.profile = Some(profile);
                Ok(())
            }
            Err(e) => Err(self
                .handle_failure(generation, "Error fetching user info", e)
                .await),
        }
    }

    /// Re-fetches the profile of the active session, e.g. after a failed first attempt.
    pub async fn refresh_profile(&self) -> Result<(), BrowserError> {
        let (credential, _) = self.require_credential().await?;
        self.fetch_profile(&credential).await
    }

    /// Lists up to `page_size` files and replaces the current listing.
    ///
    /// Returns the number of files received.
    pub async fn list_files(&self, page_size: PageSize) -> Result<usize, BrowserError> {
        let (credential, generation) = self.require_credential().await?;
        tracing::debug!(page_size = page_size.as_u32(), "Listing Drive files");

        match self.api.list_files(&credential, page_size).await {
            Ok(files) => {
                let mut state = self.state.write().await;
                if state.generation != generation {
                    tracing::debug!(generation, "Dropping stale file listing");
                    return Err(BrowserError::Stale);
                }
                let count = files.len();
                state.files = files;
                state.last_error = None;
                Ok(count)
            }
            Err(e) => Err(self
                .handle_failure(generation, "Error fetching Google Drive files", e)
                .await),
        }
    }

    /// Lists files using the currently selected page size.
    pub async fn list_current_page(&self) -> Result<usize, BrowserError> {
        let page_size = self.state.read().await.page_size;
        self.list_files(page_size).await
    }

    /// Searches file names containing `query`.
    ///
    /// On failure the previous search result is left as it was.
    pub async fn search(&self, query: &str) -> Result<usize, BrowserError> {
        let (credential, generation) = self.require_credential().await?;
        self.set_query(query).await;
        tracing::debug!(query, "Searching Drive files");

        match self.api.search_files(&credential, query).await {
            Ok(files) => {
                let mut state = self.state.write().await;
                if state.generation != generation {
                    tracing::debug!(generation, "Dropping stale search result");
                    return Err(BrowserError::Stale);
                }
                let count = files.len();
                state.search = SearchResult::Searched(files);
                state.last_error = None;
                Ok(count)
            }
            Err(e) => Err(self
                .handle_failure(generation, "Error searching for file", e)
                .await),
        }
    }

    /// Clears the whole session and the persisted token. Safe to call twice.
    pub async fn logout(&self) -> Result<(), BrowserError> {
        let mut state = self.state.write().await;
        state.clear_session();
        state.generation += 1;
        self.store.clear().await?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Logs out only if `generation` is still the active session.
    async fn expire_session(&self, generation: u64) -> Result<(), BrowserError> {
        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(generation, "Session was replaced before it could expire");
            return Err(BrowserError::Stale);
        }
        state.clear_session();
        state.generation += 1;
        self.store.clear().await?;
        tracing::info!("Signed out, the access token expired");
        Ok(())
    }

    pub async fn set_page_size(&self, page_size: PageSize) {
        self.state.write().await.page_size = page_size;
    }

    pub async fn set_query(&self, query: &str) {
        self.state.write().await.query = query.to_string();
    }

    pub async fn snapshot(&self) -> SessionView {
        let state = self.state.read().await;
        SessionView {
            logged_in: state.credential.is_some(),
            logged_in_at: state.logged_in_at,
            profile: state.profile.clone(),
            files: state.files.clone(),
            page_size: state.page_size,
            query: state.query.clone(),
            search: state.search.clone(),
            last_error: state.last_error.clone(),
        }
    }

    /// Active credential from memory, falling back to the persistent slot.
    /// Without either, tells the user to log in and never touches the network.
    async fn require_credential(&self) -> Result<(Credential, u64), BrowserError> {
        let generation = {
            let state = self.state.read().await;
            if let Some(credential) = &state.credential {
                return Ok((credential.clone(), state.generation));
            }
            state.generation
        };

        if let Some(credential) = self.store.load().await? {
            let mut state = self.state.write().await;
            if state.generation == generation {
                state.credential = Some(credential.clone());
                return Ok((credential, generation));
            }
            tracing::debug!("Session changed while reading the token slot");
            return Err(BrowserError::Stale);
        }

        self.notifier.notify(Notice::LoginRequired);
        Err(BrowserError::LoginRequired)
    }

    /// 401s expire the session; anything else becomes a non-blocking error.
    async fn handle_failure(
        &self,
        generation: u64,
        context: &str,
        error: DriveApiError,
    ) -> BrowserError {
        tracing::error!("{}: {}", context, error);

        if self.state.read().await.generation != generation {
            return BrowserError::Stale;
        }

        if matches!(error, DriveApiError::Unauthorized) {
            self.notifier.notify(Notice::SessionExpired);
            if let Err(e) = self.expire_session(generation).await {
                return e;
            }
            return BrowserError::SessionExpired;
        }

        let message = format!("{}: {}", context, error);
        {
            let mut state = self.state.write().await;
            if state.generation != generation {
                return BrowserError::Stale;
            }
            state.last_error = Some(message.clone());
        }
        self.notifier.notify(Notice::RequestFailed(message));
        error.into()
    }
}
