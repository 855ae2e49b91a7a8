//! # Listening Statistics Core
//!
//! Data-access adapter between a statistics view and the host music client.
//!
//! ## Overview
//!
//! - [`DiscoveryGate`] lazily discovers and registers the `userTopContent`
//!   persisted query by scanning the profile route script for its hash
//! - [`TopContentClient`] fetches top tracks and top artists for a
//!   [`TimeRange`]
//! - [`LibraryClient`] forwards playlist, rootlist, album and library calls
//!
//! ## Usage
//!
//! ```ignore
//! use core_stats::{DiscoveryGate, RegistrationState, TopContentClient};
//! use std::sync::Arc;
//!
//! let gate = Arc::new(DiscoveryGate::new(http, registry, Arc::new(RegistrationState::new())));
//! let client = TopContentClient::new(gate, executor);
//!
//! let tracks = client.fetch_top_tracks("short_term").await?;
//! ```

pub mod error;
pub mod library;
pub mod registration;
pub mod time_range;
pub mod top_content;
pub mod types;

pub use error::{DiscoveryFailure, Result, StatsError};
pub use library::{LibraryClient, GET_ALBUM_QUERY};
pub use registration::{
    DiscoveryGate, RegistrationState, TokenScanner, PROFILE_ROUTE_SCRIPT_URL, TOP_CONTENT_QUERY,
};
pub use time_range::{HostTimeRange, TimeRange};
pub use top_content::{
    SortBy, TopContentClient, TopContentInput, TopContentKind, TopContentVariables,
    TOP_CONTENT_LIMIT,
};
pub use types::{Album, TopArtist, TopTrack};
