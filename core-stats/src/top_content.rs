//! Top tracks and top artists
//!
//! Both statistics come from the single `userTopContent` query. Its variables
//! carry one sub-request per kind; exactly one is switched on per call. The
//! switched-off side is still sent, with `limit: 0` and a placeholder time
//! range, because the host requires both inputs to be present.
//!
//! ## Response path
//!
//! ```text
//! data.me.profile.topTracks.items   (tracks)
//! data.me.profile.topArtists.items  (artists)
//! ```

use bridge_traits::graphql::{QueryDefinition, QueryExecutor};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{Result, StatsError};
use crate::registration::DiscoveryGate;
use crate::time_range::{HostTimeRange, TimeRange};
use crate::types::{TopArtist, TopTrack};

/// Items requested per call; no further pages are fetched
pub const TOP_CONTENT_LIMIT: u32 = 50;

/// Which statistic a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopContentKind {
    Tracks,
    Artists,
}

impl TopContentKind {
    /// Dotted path of the items array in the response envelope
    pub fn items_path(self) -> &'static str {
        match self {
            TopContentKind::Tracks => "data.me.profile.topTracks.items",
            TopContentKind::Artists => "data.me.profile.topArtists.items",
        }
    }
}

/// Ranking criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortBy {
    Affinity,
}

/// Per-kind sub-request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopContentInput {
    pub offset: u32,
    pub limit: u32,
    pub sort_by: SortBy,
    pub time_range: HostTimeRange,
}

impl TopContentInput {
    fn included(time_range: HostTimeRange) -> Self {
        Self {
            offset: 0,
            limit: TOP_CONTENT_LIMIT,
            sort_by: SortBy::Affinity,
            time_range,
        }
    }

    /// Placeholder for the switched-off side; the host ignores its range.
    fn excluded() -> Self {
        Self {
            offset: 0,
            limit: 0,
            sort_by: SortBy::Affinity,
            time_range: HostTimeRange::ShortTerm,
        }
    }
}

/// Variables of the `userTopContent` query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopContentVariables {
    pub include_top_artists: bool,
    pub top_artists_input: TopContentInput,
    pub include_top_tracks: bool,
    pub top_tracks_input: TopContentInput,
}

impl TopContentVariables {
    pub fn new(kind: TopContentKind, time_range: HostTimeRange) -> Self {
        match kind {
            TopContentKind::Tracks => Self {
                include_top_artists: false,
                top_artists_input: TopContentInput::excluded(),
                include_top_tracks: true,
                top_tracks_input: TopContentInput::included(time_range),
            },
            TopContentKind::Artists => Self {
                include_top_artists: true,
                top_artists_input: TopContentInput::included(time_range),
                include_top_tracks: false,
                top_tracks_input: TopContentInput::excluded(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopContentEnvelope {
    data: Option<TopContentData>,
}

#[derive(Debug, Deserialize)]
struct TopContentData {
    me: Option<Me>,
}

#[derive(Debug, Deserialize)]
struct Me {
    profile: Option<Profile>,
}

/// Both pages stay untyped; only the requested one is decoded.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    top_tracks: Option<serde_json::Value>,
    top_artists: Option<serde_json::Value>,
}

impl Profile {
    fn into_page(self, kind: TopContentKind) -> Option<serde_json::Value> {
        match kind {
            TopContentKind::Tracks => self.top_tracks,
            TopContentKind::Artists => self.top_artists,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ItemPage<T> {
    items: Option<Vec<T>>,
}

impl TopContentEnvelope {
    fn parse<T: DeserializeOwned>(
        envelope: serde_json::Value,
        kind: TopContentKind,
    ) -> Result<Vec<T>> {
        let invalid = || StatsError::InvalidResponseShape {
            path: kind.items_path().to_string(),
        };

        let envelope: TopContentEnvelope = serde_json::from_value(envelope).map_err(|e| {
            debug!(error = %e, "Top content envelope did not deserialize");
            invalid()
        })?;

        let page = envelope
            .data
            .and_then(|data| data.me)
            .and_then(|me| me.profile)
            .and_then(|profile| profile.into_page(kind))
            .ok_or_else(invalid)?;

        let page: ItemPage<T> = serde_json::from_value(page).map_err(|e| {
            debug!(?kind, error = %e, "Top content page did not deserialize");
            invalid()
        })?;

        page.items.ok_or_else(invalid)
    }
}

/// Retrieves top tracks and top artists through the discovery gate
pub struct TopContentClient {
    gate: Arc<DiscoveryGate>,
    executor: Arc<dyn QueryExecutor>,
}

impl TopContentClient {
    pub fn new(gate: Arc<DiscoveryGate>, executor: Arc<dyn QueryExecutor>) -> Self {
        Self { gate, executor }
    }

    /// Top tracks for a time range, in host order.
    ///
    /// # Errors
    ///
    /// - [`StatsError::RegistrationUnavailable`] if discovery never succeeded
    /// - [`StatsError::InvalidResponseShape`] if the items array is missing
    /// - [`StatsError::Bridge`] if the executor fails
    #[instrument(skip(self, range))]
    pub async fn fetch_top_tracks(&self, range: impl Into<TimeRange>) -> Result<Vec<TopTrack>> {
        self.query(TopContentKind::Tracks, range.into()).await
    }

    /// Top artists for a time range, in host order.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_top_tracks`](Self::fetch_top_tracks).
    #[instrument(skip(self, range))]
    pub async fn fetch_top_artists(
        &self,
        range: impl Into<TimeRange>,
    ) -> Result<Vec<TopArtist>> {
        self.query(TopContentKind::Artists, range.into()).await
    }

    async fn query<T: DeserializeOwned>(
        &self,
        kind: TopContentKind,
        range: TimeRange,
    ) -> Result<Vec<T>> {
        let definition = self.definition().await?;
        let variables = TopContentVariables::new(kind, range.to_host());

        debug!(
            ?kind,
            range = %range,
            host_range = variables_range(&variables, kind).as_str(),
            "Executing top content query"
        );

        let variables = serde_json::to_value(&variables).map_err(|e| {
            StatsError::Bridge(bridge_traits::BridgeError::OperationFailed(format!(
                "Failed to encode query variables: {}",
                e
            )))
        })?;

        let envelope = self.executor.execute(&definition, variables).await?;
        TopContentEnvelope::parse(envelope, kind)
    }

    /// Run discovery (best effort) and read the definition back.
    async fn definition(&self) -> Result<QueryDefinition> {
        let query = self.gate.query_name();

        // The gate logs the failure; only the registry decides the outcome.
        if let Err(failure) = self.gate.ensure_registered().await {
            debug!(query, error = %failure, "Discovery did not succeed");
        }

        self.gate
            .registry()
            .get(query)
            .ok_or_else(|| StatsError::RegistrationUnavailable {
                query: query.to_string(),
            })
    }
}

fn variables_range(variables: &TopContentVariables, kind: TopContentKind) -> HostTimeRange {
    match kind {
        TopContentKind::Tracks => variables.top_tracks_input.time_range,
        TopContentKind::Artists => variables.top_artists_input.time_range,
    }
}
