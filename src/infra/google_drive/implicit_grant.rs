// Implicit-grant login against Google's OAuth 2.0 endpoint.
//
// The user opens the authorization URL in a browser, consents, and lands on
// the redirect URI with the token in the URL fragment. A terminal can't catch
// that redirect, so the user pastes the URL back and we parse it here.

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Url;
use std::sync::Arc;

use crate::core::drive::{Credential, IdentityError, IdentityProvider};

pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct ImplicitGrantConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub auth_url: String,
}

impl ImplicitGrantConfig {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
        }
    }

    /// Reads `GOOGLE_CLIENT_ID` (required) and `GOOGLE_REDIRECT_URI`.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID").ok()?;
        let mut config = Self::new(client_id);
        if let Ok(redirect_uri) = std::env::var("GOOGLE_REDIRECT_URI") {
            config.redirect_uri = redirect_uri;
        }
        Some(config)
    }

    pub fn authorization_url(&self, scope: &str, state: &str) -> Result<Url, IdentityError> {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "token"),
                ("scope", scope),
                ("include_granted_scopes", "true"),
                ("state", state),
            ],
        )
        .map_err(|e| IdentityError::InvalidUrl(e.to_string()))
    }
}

/// Where the authorization URL is shown and the redirect is read back.
#[async_trait]
pub trait RedirectPrompt: Send + Sync {
    /// Returns `None` when the user gives up.
    async fn ask_for_redirect(&self, authorization_url: &Url)
        -> Result<Option<String>, IdentityError>;
}

#[async_trait]
impl<T: RedirectPrompt + ?Sized> RedirectPrompt for Arc<T> {
    async fn ask_for_redirect(
        &self,
        authorization_url: &Url,
    ) -> Result<Option<String>, IdentityError> {
        (**self).ask_for_redirect(authorization_url).await
    }
}

pub struct ImplicitGrantProvider<R: RedirectPrompt> {
    config: ImplicitGrantConfig,
    prompt: R,
}

impl<R: RedirectPrompt> ImplicitGrantProvider<R> {
    pub fn new(config: ImplicitGrantConfig, prompt: R) -> Self {
        Self { config, prompt }
    }
}

#[async_trait]
impl<R: RedirectPrompt> IdentityProvider for ImplicitGrantProvider<R> {
    async fn authorize(&self, scope: &str) -> Result<Credential, IdentityError> {
        let state = random_state();
        let url = self.config.authorization_url(scope, &state)?;
        tracing::debug!("Starting implicit-grant login");

        match self.prompt.ask_for_redirect(&url).await? {
            Some(redirect) => parse_redirect(&redirect, &state),
            None => Err(IdentityError::Cancelled),
        }
    }
}

fn random_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Pulls `access_token` out of a pasted redirect.
///
/// Accepts the full redirect URL, or just its fragment (with or without the
/// leading `#`). Errors returned by the provider and mismatched `state`
/// values are rejected.
pub fn parse_redirect(input: &str, expected_state: &str) -> Result<Credential, IdentityError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(IdentityError::Cancelled);
    }

    let params = match input.split_once('#') {
        Some((_, fragment)) => fragment,
        None => input.split_once('?').map(|(_, q)| q).unwrap_or(input),
    };

    // Borrow Url's form decoding for the key/value pairs.
    let parsed = Url::parse(&format!("http://localhost/?{}", params))
        .map_err(|e| IdentityError::InvalidUrl(e.to_string()))?;

    let mut token = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "access_token" => token = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(IdentityError::Denied(error));
    }
    if state.as_deref() != Some(expected_state) {
        return Err(IdentityError::StateMismatch);
    }

    match token {
        Some(token) if !token.is_empty() => Ok(Credential::new(token)),
        _ => Err(IdentityError::MissingToken),
    }
}
