//! Top-content query discovery and registration
//!
//! The host ships a catalog of persisted GraphQL queries, but the
//! `userTopContent` query used for listening statistics is not part of it.
//! Its hash only appears inside the lazily-loaded profile route script, as a
//! literal of the form:
//!
//! ```text
//! "userTopContent","query","<64 lowercase hex chars>"
//! ```
//!
//! [`DiscoveryGate`] fetches that script, extracts the hash and installs a
//! definition into the shared [`QueryRegistry`]. It runs at most one attempt
//! at a time: concurrent callers await the same in-flight attempt, and a
//! settled attempt is only replaced when a later call finds the query still
//! missing (i.e. the previous attempt failed).
//!
//! ## States
//!
//! ```text
//! not ready ──ensure_registered──▶ attempt in flight ──ok──▶ ready (permanent)
//!     ▲                                   │
//!     └───────────────err─────────────────┘
//! ```

use bridge_traits::{
    graphql::{QueryDefinition, QueryRegistry},
    http::{HttpClient, HttpRequest},
};
use core_runtime::config;
use futures::future::{BoxFuture, FutureExt, Shared};
use regex_lite::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, trace};

use crate::error::DiscoveryFailure;

/// Symbolic name of the statistics query
pub const TOP_CONTENT_QUERY: &str = config::DEFAULT_QUERY_NAME;

/// Route script embedding the statistics query hash
pub const PROFILE_ROUTE_SCRIPT_URL: &str = config::DEFAULT_SCRIPT_URL;

type DiscoveryOutcome = std::result::Result<(), DiscoveryFailure>;
type Attempt = Shared<BoxFuture<'static, DiscoveryOutcome>>;

/// Readiness flag for the top-content query
///
/// Starts not ready. Becomes ready after the first successful discovery (or
/// once the query is found already registered) and stays ready. One instance
/// is shared per service; tests create their own.
#[derive(Debug, Default)]
pub struct RegistrationState {
    ready: AtomicBool,
}

impl RegistrationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Return to the initial state.
    pub fn reset(&self) {
        self.ready.store(false, Ordering::Release);
    }
}

/// Extracts a query's registration hash from script text
#[derive(Debug, Clone)]
pub struct TokenScanner {
    query: String,
    pattern: Regex,
}

impl TokenScanner {
    pub fn for_query(query: &str) -> Self {
        let pattern = format!(
            r#""{}","query","([a-f0-9]{{64}})""#,
            regex_lite::escape(query)
        );

        Self {
            query: query.to_string(),
            // The query name is escaped, so the pattern is always valid.
            pattern: Regex::new(&pattern).expect("escaped query pattern"),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// First registration hash found in `script`, if any
    pub fn scan<'a>(&self, script: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(script)
            .and_then(|captures| captures.get(1))
            .map(|hash| hash.as_str())
    }
}

/// Ensures the top-content query is registered before it is used
pub struct DiscoveryGate {
    http_client: Arc<dyn HttpClient>,
    registry: Arc<dyn QueryRegistry>,
    state: Arc<RegistrationState>,
    script_url: String,
    scanner: TokenScanner,
    in_flight: Mutex<Option<Attempt>>,
}

impl DiscoveryGate {
    /// Create a gate for `userTopContent` using the profile route script.
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        registry: Arc<dyn QueryRegistry>,
        state: Arc<RegistrationState>,
    ) -> Self {
        Self::with_source(
            http_client,
            registry,
            state,
            PROFILE_ROUTE_SCRIPT_URL,
            TOP_CONTENT_QUERY,
        )
    }

    /// Create a gate for an arbitrary query name and script location.
    pub fn with_source(
        http_client: Arc<dyn HttpClient>,
        registry: Arc<dyn QueryRegistry>,
        state: Arc<RegistrationState>,
        script_url: impl Into<String>,
        query: &str,
    ) -> Self {
        Self {
            http_client,
            registry,
            state,
            script_url: script_url.into(),
            scanner: TokenScanner::for_query(query),
            in_flight: Mutex::new(None),
        }
    }

    pub fn query_name(&self) -> &str {
        self.scanner.query()
    }

    pub fn registry(&self) -> &Arc<dyn QueryRegistry> {
        &self.registry
    }

    pub fn state(&self) -> &Arc<RegistrationState> {
        &self.state
    }

    /// Make sure the query definition is registered.
    ///
    /// Returns immediately when the state is ready or the registry already
    /// holds the definition. Otherwise joins the in-flight attempt or starts
    /// a new one. Safe to call repeatedly and concurrently.
    ///
    /// # Errors
    ///
    /// Returns the [`DiscoveryFailure`] of the attempt this call awaited. The
    /// attempt logs it once at `error`; the state stays not ready, so the
    /// next call retries.
    #[instrument(skip(self), fields(query = %self.query_name()))]
    pub async fn ensure_registered(&self) -> DiscoveryOutcome {
        if self.is_registered() {
            trace!("Query already registered");
            return Ok(());
        }

        let attempt = {
            let mut slot = self.in_flight.lock().await;
            let pending = slot
                .as_ref()
                .filter(|attempt| attempt.peek().is_none())
                .cloned();

            match pending {
                Some(attempt) => {
                    debug!("Joining in-flight discovery");
                    attempt
                }
                None => {
                    // A concurrent attempt may have settled while we waited.
                    if self.is_registered() {
                        return Ok(());
                    }
                    let attempt = self.start_attempt();
                    *slot = Some(attempt.clone());
                    attempt
                }
            }
        };

        attempt.await
    }

    fn is_registered(&self) -> bool {
        if self.state.is_ready() {
            return true;
        }
        if self.registry.has(self.query_name()) {
            self.state.mark_ready();
            return true;
        }
        false
    }

    fn start_attempt(&self) -> Attempt {
        discover(
            Arc::clone(&self.http_client),
            Arc::clone(&self.registry),
            Arc::clone(&self.state),
            self.script_url.clone(),
            self.scanner.clone(),
        )
        .boxed()
        .shared()
    }
}

/// One discovery attempt. Runs inside the shared future, so a failure is
/// logged once no matter how many callers await it.
async fn discover(
    http_client: Arc<dyn HttpClient>,
    registry: Arc<dyn QueryRegistry>,
    state: Arc<RegistrationState>,
    script_url: String,
    scanner: TokenScanner,
) -> DiscoveryOutcome {
    let query = scanner.query().to_string();
    let outcome = fetch_and_register(http_client, registry, state, script_url, scanner).await;

    if let Err(failure) = &outcome {
        error!(query = %query, error = %failure, "Failed to register query");
    }
    outcome
}

async fn fetch_and_register(
    http_client: Arc<dyn HttpClient>,
    registry: Arc<dyn QueryRegistry>,
    state: Arc<RegistrationState>,
    script_url: String,
    scanner: TokenScanner,
) -> DiscoveryOutcome {
    debug!(url = %script_url, "Fetching route script");

    let response = http_client
        .execute(HttpRequest::get(script_url))
        .await
        .map_err(|e| DiscoveryFailure::Fetch(e.to_string()))?;

    if !response.is_success() {
        return Err(DiscoveryFailure::HttpStatus(response.status));
    }

    trace!(
        bytes = response.body.len(),
        content_type = response.header("content-type").unwrap_or("unknown"),
        "Route script received"
    );

    let script = response
        .text()
        .map_err(|e| DiscoveryFailure::InvalidText(e.to_string()))?;

    let hash = scanner
        .scan(&script)
        .ok_or_else(|| DiscoveryFailure::TokenNotFound {
            query: scanner.query().to_string(),
        })?;

    registry.set(scanner.query(), QueryDefinition::query(scanner.query(), hash));
    state.mark_ready();

    info!(query = %scanner.query(), hash = %hash, "Registered persisted query");
    Ok(())
}
