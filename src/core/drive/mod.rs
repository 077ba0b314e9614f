pub mod drive_api;
pub mod drive_models;
pub mod drive_service;
pub mod drive_store;
pub mod identity;

pub use drive_api::{name_contains_filter, DriveApi, DriveApiError};
pub use drive_models::{
    Credential, FileRecord, Notice, PageSize, SearchResult, SessionView, UserProfile,
};
pub use drive_service::{BrowserError, DriveBrowser, Notifier};
pub use drive_store::{TokenStore, TokenStoreError};
pub use identity::{IdentityError, IdentityProvider, DRIVE_READONLY_SCOPE};
