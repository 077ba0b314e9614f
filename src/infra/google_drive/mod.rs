// Google infra layer.
// - `drive_api_client.rs` talks to the Drive and userinfo REST endpoints.
// - `implicit_grant.rs` runs the OAuth implicit-grant login.

pub mod drive_api_client;
pub mod implicit_grant;

pub use drive_api_client::GoogleDriveClient;
pub use implicit_grant::{ImplicitGrantConfig, ImplicitGrantProvider, RedirectPrompt};
