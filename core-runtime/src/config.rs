//! # Statistics Configuration
//!
//! Builder-based configuration for the statistics core.
//!
//! ## Overview
//!
//! [`StatsConfig`] holds every host capability the core consumes plus the
//! discovery settings. [`StatsConfigBuilder`] validates it fail-fast: a missing
//! capability is reported by name before anything runs.
//!
//! ## Required Capabilities
//!
//! - `QueryExecutor` - Executes persisted GraphQL queries
//! - `PlaylistApi` - Playlist contents
//! - `RootlistApi` - User rootlist
//! - `LibraryApi` - Library membership
//!
//! ## Optional Capabilities (with defaults)
//!
//! - `HttpClient` - Route script retrieval (desktop default: reqwest)
//! - `QueryRegistry` - Query catalog (default: empty in-memory registry)
//! - `LocaleProvider` - Locale for album queries (default: `"en"`)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::StatsConfig;
//! use std::sync::Arc;
//!
//! let config = StatsConfig::builder()
//!     .query_executor(Arc::new(MyExecutor))
//!     .playlist_api(Arc::new(MyPlaylists))
//!     .rootlist_api(Arc::new(MyRootlist))
//!     .library_api(Arc::new(MyLibrary))
//!     .locale_provider(Arc::new(StaticLocaleProvider::new("de")))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{
    HttpClient, InMemoryQueryRegistry, LibraryApi, LocaleProvider, PlaylistApi, QueryExecutor,
    QueryRegistry, RootlistApi, StaticLocaleProvider,
};
use std::sync::Arc;

/// Route script scanned for the statistics query hash
pub const DEFAULT_SCRIPT_URL: &str = "https://xpui.app.spotify.com/xpui-routes-profile.js";

/// Catalog name of the statistics query
pub const DEFAULT_QUERY_NAME: &str = "userTopContent";

/// Where and what to discover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Script embedding the registration literal
    pub script_url: String,
    /// Query name to look for and register under
    pub query_name: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            query_name: DEFAULT_QUERY_NAME.to_string(),
        }
    }
}

impl DiscoveryConfig {
    pub fn with_script_url(mut self, url: impl Into<String>) -> Self {
        self.script_url = url.into();
        self
    }

    pub fn with_query_name(mut self, name: impl Into<String>) -> Self {
        self.query_name = name.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.script_url.trim();
        if url.is_empty() {
            return Err(Error::Config("Script URL cannot be empty".to_string()));
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "Script URL must use http or https: {}",
                self.script_url
            )));
        }
        if self.query_name.trim().is_empty() {
            return Err(Error::Config("Query name cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Configuration for the statistics core
///
/// Use [`StatsConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct StatsConfig {
    pub http_client: Arc<dyn HttpClient>,
    pub query_executor: Arc<dyn QueryExecutor>,
    pub query_registry: Arc<dyn QueryRegistry>,
    pub playlist_api: Arc<dyn PlaylistApi>,
    pub rootlist_api: Arc<dyn RootlistApi>,
    pub library_api: Arc<dyn LibraryApi>,
    pub locale_provider: Arc<dyn LocaleProvider>,
    pub discovery: DiscoveryConfig,
}

impl std::fmt::Debug for StatsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("query_executor", &"QueryExecutor { ... }")
            .field("query_registry", &"QueryRegistry { ... }")
            .field("playlist_api", &"PlaylistApi { ... }")
            .field("rootlist_api", &"RootlistApi { ... }")
            .field("library_api", &"LibraryApi { ... }")
            .field("locale", &self.locale_provider.locale())
            .field("discovery", &self.discovery)
            .finish()
    }
}

impl StatsConfig {
    pub fn builder() -> StatsConfigBuilder {
        StatsConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        self.discovery.validate()
    }
}

fn capability_missing(capability: &str, purpose: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: format!(
            "{} implementation is required for {}. Inject one with .{}().",
            capability,
            purpose,
            setter_name(capability)
        ),
    }
}

fn setter_name(capability: &str) -> String {
    let mut name = String::with_capacity(capability.len() + 4);
    for (i, ch) in capability.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                name.push('_');
            }
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::new()
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for route script retrieval. \
                  Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                  Other hosts: inject one with .http_client()."
            .to_string(),
    })
}

/// Builder for [`StatsConfig`]
#[derive(Default)]
pub struct StatsConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    query_executor: Option<Arc<dyn QueryExecutor>>,
    query_registry: Option<Arc<dyn QueryRegistry>>,
    playlist_api: Option<Arc<dyn PlaylistApi>>,
    rootlist_api: Option<Arc<dyn RootlistApi>>,
    library_api: Option<Arc<dyn LibraryApi>>,
    locale_provider: Option<Arc<dyn LocaleProvider>>,
    discovery: Option<DiscoveryConfig>,
}

impl StatsConfigBuilder {
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn query_executor(mut self, executor: Arc<dyn QueryExecutor>) -> Self {
        self.query_executor = Some(executor);
        self
    }

    /// Share the host's query catalog. Discovered definitions are written into it.
    pub fn query_registry(mut self, registry: Arc<dyn QueryRegistry>) -> Self {
        self.query_registry = Some(registry);
        self
    }

    pub fn playlist_api(mut self, api: Arc<dyn PlaylistApi>) -> Self {
        self.playlist_api = Some(api);
        self
    }

    pub fn rootlist_api(mut self, api: Arc<dyn RootlistApi>) -> Self {
        self.rootlist_api = Some(api);
        self
    }

    pub fn library_api(mut self, api: Arc<dyn LibraryApi>) -> Self {
        self.library_api = Some(api);
        self
    }

    pub fn locale_provider(mut self, provider: Arc<dyn LocaleProvider>) -> Self {
        self.locale_provider = Some(provider);
        self
    }

    pub fn discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] naming the first missing required capability
    /// - [`Error::Config`] if the discovery settings are invalid
    pub fn build(self) -> Result<StatsConfig> {
        let query_executor = self
            .query_executor
            .ok_or_else(|| capability_missing("QueryExecutor", "persisted query execution"))?;
        let playlist_api = self
            .playlist_api
            .ok_or_else(|| capability_missing("PlaylistApi", "playlist retrieval"))?;
        let rootlist_api = self
            .rootlist_api
            .ok_or_else(|| capability_missing("RootlistApi", "rootlist retrieval"))?;
        let library_api = self
            .library_api
            .ok_or_else(|| capability_missing("LibraryApi", "library membership checks"))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let config = StatsConfig {
            http_client,
            query_executor,
            query_registry: self
                .query_registry
                .unwrap_or_else(|| Arc::new(InMemoryQueryRegistry::new())),
            playlist_api,
            rootlist_api,
            library_api,
            locale_provider: self
                .locale_provider
                .unwrap_or_else(|| Arc::new(StaticLocaleProvider::default())),
            discovery: self.discovery.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{
        HttpRequest, HttpResponse, PlaylistResponse, QueryDefinition, RootlistOptions,
        RootlistResponse,
    };
    use serde_json::Value;

    struct StubHttp;
    struct StubExecutor;
    struct StubPlaylists;
    struct StubRootlist;
    struct StubLibrary;

    #[async_trait]
    impl HttpClient for StubHttp {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            unimplemented!()
        }
    }

    #[async_trait]
    impl QueryExecutor for StubExecutor {
        async fn execute(
            &self,
            _definition: &QueryDefinition,
            _variables: Value,
        ) -> BridgeResult<Value> {
            unimplemented!()
        }
    }

    #[async_trait]
    impl PlaylistApi for StubPlaylists {
        async fn get_playlist(&self, _uri: &str) -> BridgeResult<PlaylistResponse> {
            unimplemented!()
        }
    }

    #[async_trait]
    impl RootlistApi for StubRootlist {
        async fn get_contents(&self, _options: RootlistOptions) -> BridgeResult<RootlistResponse> {
            unimplemented!()
        }
    }

    #[async_trait]
    impl LibraryApi for StubLibrary {
        async fn contains(&self, _uris: &[String]) -> BridgeResult<Vec<bool>> {
            unimplemented!()
        }
    }

    fn complete_builder() -> StatsConfigBuilder {
        StatsConfig::builder()
            .http_client(Arc::new(StubHttp))
            .query_executor(Arc::new(StubExecutor))
            .playlist_api(Arc::new(StubPlaylists))
            .rootlist_api(Arc::new(StubRootlist))
            .library_api(Arc::new(StubLibrary))
    }

    fn missing_capability(result: Result<StatsConfig>) -> String {
        match result {
            Err(err) => err
                .missing_capability()
                .unwrap_or_else(|| panic!("unexpected error: {}", err))
                .to_string(),
            Ok(_) => panic!("build should fail"),
        }
    }

    #[test]
    fn test_build_with_required_capabilities() {
        let config = complete_builder().build().unwrap();

        assert_eq!(config.discovery, DiscoveryConfig::default());
        assert_eq!(config.locale_provider.locale(), "en");
        assert!(!config.query_registry.has(DEFAULT_QUERY_NAME));
    }

    #[test]
    fn test_builder_requires_query_executor() {
        let result = StatsConfig::builder()
            .http_client(Arc::new(StubHttp))
            .playlist_api(Arc::new(StubPlaylists))
            .rootlist_api(Arc::new(StubRootlist))
            .library_api(Arc::new(StubLibrary))
            .build();

        assert_eq!(missing_capability(result), "QueryExecutor");
    }

    #[test]
    fn test_builder_requires_playlist_api() {
        let result = StatsConfig::builder()
            .query_executor(Arc::new(StubExecutor))
            .rootlist_api(Arc::new(StubRootlist))
            .library_api(Arc::new(StubLibrary))
            .build();

        assert_eq!(missing_capability(result), "PlaylistApi");
    }

    #[test]
    fn test_builder_requires_rootlist_api() {
        let result = StatsConfig::builder()
            .query_executor(Arc::new(StubExecutor))
            .playlist_api(Arc::new(StubPlaylists))
            .library_api(Arc::new(StubLibrary))
            .build();

        assert_eq!(missing_capability(result), "RootlistApi");
    }

    #[test]
    fn test_builder_requires_library_api() {
        let result = StatsConfig::builder()
            .query_executor(Arc::new(StubExecutor))
            .playlist_api(Arc::new(StubPlaylists))
            .rootlist_api(Arc::new(StubRootlist))
            .build();

        let err = result.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("LibraryApi"));
        assert!(message.contains(".library_api()"));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_http_client_without_shims() {
        let result = StatsConfig::builder()
            .query_executor(Arc::new(StubExecutor))
            .playlist_api(Arc::new(StubPlaylists))
            .rootlist_api(Arc::new(StubRootlist))
            .library_api(Arc::new(StubLibrary))
            .build();

        assert_eq!(missing_capability(result), "HttpClient");
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_builder_uses_desktop_http_client() {
        let result = StatsConfig::builder()
            .query_executor(Arc::new(StubExecutor))
            .playlist_api(Arc::new(StubPlaylists))
            .rootlist_api(Arc::new(StubRootlist))
            .library_api(Arc::new(StubLibrary))
            .build();

        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_keeps_injected_registry_and_locale() {
        let registry = Arc::new(InMemoryQueryRegistry::with_definitions([
            QueryDefinition::query("getAlbum", "a".repeat(64)),
        ]));

        let config = complete_builder()
            .query_registry(registry.clone())
            .locale_provider(Arc::new(StaticLocaleProvider::new("ja")))
            .build()
            .unwrap();

        assert!(config.query_registry.has("getAlbum"));
        assert_eq!(config.locale_provider.locale(), "ja");
    }

    #[test]
    fn test_discovery_validation() {
        assert!(DiscoveryConfig::default().validate().is_ok());
        assert!(DiscoveryConfig::default()
            .with_script_url("http://localhost:8080/routes.js")
            .validate()
            .is_ok());

        for bad_url in ["", "   ", "ftp://example.com/a.js", "xpui-routes-profile.js"] {
            let err = DiscoveryConfig::default()
                .with_script_url(bad_url)
                .validate()
                .unwrap_err();
            assert!(matches!(err, Error::Config(_)), "accepted {:?}", bad_url);
        }

        let err = DiscoveryConfig::default()
            .with_query_name("")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("Query name cannot be empty"));
    }

    #[test]
    fn test_build_rejects_invalid_discovery() {
        let result = complete_builder()
            .discovery(DiscoveryConfig::default().with_script_url("file:///tmp/x.js"))
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_setter_name() {
        assert_eq!(setter_name("QueryExecutor"), "query_executor");
        assert_eq!(setter_name("LibraryApi"), "library_api");
    }

    #[test]
    fn test_config_is_cloneable_and_debuggable() {
        let config = complete_builder().build().unwrap();
        let cloned = config.clone();

        assert_eq!(cloned.discovery, config.discovery);
        assert!(format!("{:?}", cloned).contains("userTopContent"));
    }
}
