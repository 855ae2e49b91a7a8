//! Playlist, rootlist, album and library helpers
//!
//! Thin adapters over host content APIs. Results are forwarded unchanged
//! except for unwrapping the response envelopes; host errors propagate as
//! [`StatsError::Bridge`].

use bridge_traits::{
    graphql::{QueryExecutor, QueryRegistry},
    library::{
        LibraryApi, LocaleProvider, PlaylistApi, PlaylistItem, RootlistApi, RootlistItem,
        RootlistOptions,
    },
};
use futures::future::try_join_all;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{Result, StatsError};
use crate::types::Album;

/// Catalog name of the album metadata query
pub const GET_ALBUM_QUERY: &str = "getAlbum";

const ALBUM_UNION_POINTER: &str = "/data/albumUnion";

pub struct LibraryClient {
    playlist_api: Arc<dyn PlaylistApi>,
    rootlist_api: Arc<dyn RootlistApi>,
    library_api: Arc<dyn LibraryApi>,
    executor: Arc<dyn QueryExecutor>,
    registry: Arc<dyn QueryRegistry>,
    locale: Arc<dyn LocaleProvider>,
}

impl LibraryClient {
    pub fn new(
        playlist_api: Arc<dyn PlaylistApi>,
        rootlist_api: Arc<dyn RootlistApi>,
        library_api: Arc<dyn LibraryApi>,
        executor: Arc<dyn QueryExecutor>,
        registry: Arc<dyn QueryRegistry>,
        locale: Arc<dyn LocaleProvider>,
    ) -> Self {
        Self {
            playlist_api,
            rootlist_api,
            library_api,
            executor,
            registry,
            locale,
        }
    }

    /// Items of a playlist.
    #[instrument(skip(self))]
    pub async fn fetch_playlist(&self, uri: &str) -> Result<Vec<PlaylistItem>> {
        let response = self.playlist_api.get_playlist(uri).await?;
        debug!(count = response.contents.items.len(), "Fetched playlist");
        Ok(response.contents.items)
    }

    /// The user's rootlist, with folders flattened.
    #[instrument(skip(self))]
    pub async fn fetch_rootlist(&self) -> Result<Vec<RootlistItem>> {
        let response = self
            .rootlist_api
            .get_contents(RootlistOptions { flatten: true })
            .await?;
        Ok(response.items)
    }

    /// Album metadata through the catalog `getAlbum` query.
    ///
    /// Returns `Ok(None)` when the host answers without an album.
    ///
    /// # Errors
    ///
    /// [`StatsError::RegistrationUnavailable`] if the catalog has no
    /// `getAlbum` definition; executor failures propagate.
    #[instrument(skip(self))]
    pub async fn fetch_album(&self, uri: &str) -> Result<Option<Album>> {
        let definition = self.registry.get(GET_ALBUM_QUERY).ok_or_else(|| {
            StatsError::RegistrationUnavailable {
                query: GET_ALBUM_QUERY.to_string(),
            }
        })?;

        let variables = json!({
            "uri": uri,
            "offset": 0,
            "limit": 1,
            "locale": self.locale.locale(),
        });

        let envelope = self.executor.execute(&definition, variables).await?;

        Ok(envelope
            .pointer(ALBUM_UNION_POINTER)
            .filter(|album| !album.is_null())
            .cloned()
            .map(Album))
    }

    /// Album metadata for several URIs, fetched concurrently.
    ///
    /// Results keep input order. The first failure fails the whole call.
    #[instrument(skip(self, uris), fields(count = uris.len()))]
    pub async fn fetch_albums(&self, uris: &[String]) -> Result<Vec<Option<Album>>> {
        try_join_all(uris.iter().map(|uri| self.fetch_album(uri))).await
    }

    /// Library membership for each URI, in input order.
    pub async fn is_in_library(&self, uris: &[String]) -> Result<Vec<bool>> {
        Ok(self.library_api.contains(uris).await?)
    }
}
