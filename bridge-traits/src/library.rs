//! Library & Content Abstractions
//!
//! Host-side content APIs consumed as plain request/response calls:
//! playlists, the user's rootlist (folders and playlists), library
//! membership checks, and the active locale.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Playlist response envelope returned by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub contents: PlaylistContents,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaylistContents {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

/// Single playlist entry
///
/// Only the URI is relied upon; every other host field is preserved in
/// `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Options accepted by [`RootlistApi::get_contents`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RootlistOptions {
    /// Flatten nested folders into a single list
    pub flatten: bool,
}

/// Rootlist response envelope returned by the host
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RootlistResponse {
    #[serde(default)]
    pub items: Vec<RootlistItem>,
}

/// Rootlist entry (playlist or folder)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootlistItem {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[async_trait]
pub trait PlaylistApi: Send + Sync {
    /// Fetch a playlist with its contents
    async fn get_playlist(&self, uri: &str) -> Result<PlaylistResponse>;
}

#[async_trait]
pub trait RootlistApi: Send + Sync {
    /// Fetch the user's rootlist
    async fn get_contents(&self, options: RootlistOptions) -> Result<RootlistResponse>;
}

#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// Check library membership for each URI
    ///
    /// The returned vector has one entry per input URI, in input order.
    async fn contains(&self, uris: &[String]) -> Result<Vec<bool>>;
}

/// Source of the locale string forwarded verbatim to album queries
pub trait LocaleProvider: Send + Sync {
    fn locale(&self) -> String;
}

/// Locale provider returning a fixed value
#[derive(Debug, Clone)]
pub struct StaticLocaleProvider {
    locale: String,
}

impl StaticLocaleProvider {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}

impl Default for StaticLocaleProvider {
    fn default() -> Self {
        Self::new("en")
    }
}

impl LocaleProvider for StaticLocaleProvider {
    fn locale(&self) -> String {
        self.locale.clone()
    }
}
