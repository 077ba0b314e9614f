// This is the entry point of the Drive browser.
//
// **Architecture Overview:**
// - `core/` = Business logic (session lifecycle, Drive operations, traits)
// - `infra/` = Implementations of core traits (Google REST APIs, token storage)
// - `console/` = Terminal adapter (commands, notices, rendering)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Restore a stored session if there is one
// 4. Hand control to the console loop

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "console/console_layer.rs"]
mod console;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use std::sync::Arc;

use anyhow::Context;

use crate::console::{ConsoleIo, ConsoleNotifier};
use crate::core::drive::{BrowserError, DriveBrowser, TokenStore};
use crate::infra::google_drive::{GoogleDriveClient, ImplicitGrantConfig, ImplicitGrantProvider};
use crate::infra::token_store::{InMemoryTokenStore, JsonTokenStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let auth_config = ImplicitGrantConfig::from_env().context(
        "Missing GOOGLE_CLIENT_ID environment variable! Create a .env file with your OAuth client ID.",
    )?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let io = Arc::new(ConsoleIo::new());
    let identity = ImplicitGrantProvider::new(auth_config, Arc::clone(&io));
    let api = GoogleDriveClient::from_env();

    let persist_token = std::env::var("DRIVE_PERSIST_TOKEN")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(true);
    let store: Box<dyn TokenStore> = if persist_token {
        let store = JsonTokenStore::from_env();
        tracing::info!("Persisting access token at {}", store.path().display());
        Box::new(store)
    } else {
        tracing::info!("Token persistence disabled, keeping it in memory");
        Box::new(InMemoryTokenStore::new())
    };

    let browser = Arc::new(DriveBrowser::new(
        identity,
        api,
        store,
        Arc::new(ConsoleNotifier),
    ));

    // Pick up where the last run left off.
    match browser.restore().await {
        Ok(true) => tracing::info!("Restored previous session"),
        Ok(false) => {}
        Err(BrowserError::SessionExpired) => {
            tracing::info!("Stored token has expired, starting signed out")
        }
        Err(e) => tracing::warn!("Failed to restore previous session: {}", e),
    }

    console::run(browser, io).await
}
