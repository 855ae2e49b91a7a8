//! Statistics service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, query
//! execution, content APIs) into the statistics core and exposes the
//! operations a statistics view calls. Desktop hosts typically enable the
//! `desktop-shims` feature, which supplies a reqwest HTTP client and a
//! persisted-query executor from `bridge-desktop`.
//!
//! ```ignore
//! use core_runtime::config::StatsConfig;
//! use core_service::StatsService;
//!
//! let config = StatsConfig::builder()
//!     .query_executor(executor)
//!     .playlist_api(playlists)
//!     .rootlist_api(rootlist)
//!     .library_api(library)
//!     .build()?;
//!
//! let service = StatsService::new(config);
//! let tracks = service.top_tracks("short_term").await?;
//! ```

pub mod error;

pub use error::{CoreError, Result};

pub use core_runtime::config::{DiscoveryConfig, StatsConfig, StatsConfigBuilder};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
pub use core_stats::{Album, DiscoveryFailure, StatsError, TimeRange, TopArtist, TopTrack};

use std::sync::Arc;

use bridge_traits::library::{PlaylistItem, RootlistItem};
use core_stats::{DiscoveryGate, LibraryClient, RegistrationState, TopContentClient};
use tracing::debug;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop::{PathfinderQueryExecutor, ReqwestHttpClient};

/// Primary façade exposed to host applications.
///
/// Cheap to clone; clones share the registration state, so discovery
/// happens at most once per service.
#[derive(Clone)]
pub struct StatsService {
    gate: Arc<DiscoveryGate>,
    top_content: Arc<TopContentClient>,
    library: Arc<LibraryClient>,
}

impl StatsService {
    /// Create a service from a validated configuration.
    pub fn new(config: StatsConfig) -> Self {
        Self::with_state(config, Arc::new(RegistrationState::new()))
    }

    /// Create a service around an existing registration state.
    pub fn with_state(config: StatsConfig, state: Arc<RegistrationState>) -> Self {
        let gate = Arc::new(DiscoveryGate::with_source(
            Arc::clone(&config.http_client),
            Arc::clone(&config.query_registry),
            state,
            config.discovery.script_url.clone(),
            &config.discovery.query_name,
        ));

        let top_content =
            TopContentClient::new(Arc::clone(&gate), Arc::clone(&config.query_executor));

        let library = LibraryClient::new(
            config.playlist_api,
            config.rootlist_api,
            config.library_api,
            config.query_executor,
            config.query_registry,
            config.locale_provider,
        );

        debug!(query = %gate.query_name(), "Statistics service created");

        Self {
            gate,
            top_content: Arc::new(top_content),
            library: Arc::new(library),
        }
    }

    /// Build the configuration and the service in one step.
    pub fn from_builder(builder: StatsConfigBuilder) -> Result<Self> {
        Ok(Self::new(builder.build()?))
    }

    /// Whether the statistics query has been registered.
    pub fn is_registered(&self) -> bool {
        self.gate.state().is_ready()
    }

    /// Discover the statistics query ahead of the first request.
    ///
    /// Optional: the top-content operations run discovery on demand.
    pub async fn prepare(&self) -> std::result::Result<(), DiscoveryFailure> {
        self.gate.ensure_registered().await
    }

    pub async fn top_tracks(&self, range: impl Into<TimeRange>) -> Result<Vec<TopTrack>> {
        Ok(self.top_content.fetch_top_tracks(range).await?)
    }

    pub async fn top_artists(&self, range: impl Into<TimeRange>) -> Result<Vec<TopArtist>> {
        Ok(self.top_content.fetch_top_artists(range).await?)
    }

    pub async fn playlist(&self, uri: &str) -> Result<Vec<PlaylistItem>> {
        Ok(self.library.fetch_playlist(uri).await?)
    }

    pub async fn rootlist(&self) -> Result<Vec<RootlistItem>> {
        Ok(self.library.fetch_rootlist().await?)
    }

    pub async fn album(&self, uri: &str) -> Result<Option<Album>> {
        Ok(self.library.fetch_album(uri).await?)
    }

    pub async fn albums(&self, uris: &[String]) -> Result<Vec<Option<Album>>> {
        Ok(self.library.fetch_albums(uris).await?)
    }

    pub async fn is_in_library(&self, uris: &[String]) -> Result<Vec<bool>> {
        Ok(self.library.is_in_library(uris).await?)
    }
}

/// Convenience constructor for desktop hosts.
///
/// Uses [`ReqwestHttpClient`] for both script retrieval and persisted-query
/// execution, authenticated with `access_token`.
#[cfg(feature = "desktop-shims")]
pub fn desktop_builder(access_token: impl Into<String>) -> Result<StatsConfigBuilder> {
    use bridge_traits::http::HttpClient;

    let http: Arc<dyn HttpClient> = Arc::new(
        ReqwestHttpClient::new().map_err(|e| CoreError::InitializationFailed(e.to_string()))?,
    );
    let executor = PathfinderQueryExecutor::new(Arc::clone(&http), access_token);

    Ok(StatsConfig::builder()
        .http_client(http)
        .query_executor(Arc::new(executor)))
}
