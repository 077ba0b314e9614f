use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque bearer token handed out by the identity provider.
///
/// The raw value never shows up in `Debug` output so it can't leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

/// Profile of the signed-in user as returned by the userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// Metadata for one Drive file. Order is whatever the server returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub web_view_link: String,
}

/// How many files a single listing call asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn as_u32(self) -> u32 {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid page size '{0}'. Choose one of 10, 20, 50 or 100")]
pub struct InvalidPageSize(pub String);

impl TryFrom<u32> for PageSize {
    type Error = InvalidPageSize;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.as_u32() == value)
            .ok_or_else(|| InvalidPageSize(value.to_string()))
    }
}

impl FromStr for PageSize {
    type Err = InvalidPageSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| InvalidPageSize(s.trim().to_string()))?;
        PageSize::try_from(value)
    }
}

/// Outcome of the search field.
///
/// `Searched(vec![])` means "the search ran and nothing matched", which the
/// console renders differently from "no search yet".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchResult {
    #[default]
    NotSearched,
    Searched(Vec<FileRecord>),
}

impl SearchResult {
    pub fn files(&self) -> Option<&[FileRecord]> {
        match self {
            SearchResult::NotSearched => None,
            SearchResult::Searched(files) => Some(files),
        }
    }
}

/// Messages the user has to see. The console layer decides how to show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LoginRequired,
    SessionExpired,
    RequestFailed(String),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::LoginRequired => "Please log in first".to_string(),
            Notice::SessionExpired => "Session expired. Please login again.".to_string(),
            Notice::RequestFailed(reason) => format!("Request failed: {}", reason),
        }
    }
}

/// Read-only copy of the session handed to the rendering layer.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub logged_in: bool,
    pub logged_in_at: Option<DateTime<Utc>>,
    pub profile: Option<UserProfile>,
    pub files: Vec<FileRecord>,
    pub page_size: PageSize,
    pub query: String,
    pub search: SearchResult,
    pub last_error: Option<String>,
}
