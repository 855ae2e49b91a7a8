//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `QueryExecutor` posting persisted GraphQL queries to the pathfinder
//!   endpoint through any `HttpClient`
//!
//! Playlist, rootlist and library APIs have no desktop default: they belong
//! to the music client itself and must be injected by the host.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{PathfinderQueryExecutor, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let executor = PathfinderQueryExecutor::new(http_client.clone(), access_token);
//! ```

mod graphql;
mod http;

pub use graphql::{PathfinderQueryExecutor, PATHFINDER_ENDPOINT};
pub use http::ReqwestHttpClient;
