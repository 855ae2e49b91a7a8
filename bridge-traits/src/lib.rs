//! # Host Bridge Traits
//!
//! Capability traits the statistics core requires from its host music client.
//!
//! ## Overview
//!
//! The core never talks to the host directly. Every capability it consumes is
//! expressed as a trait here and injected at construction time, so the same
//! core runs against a real desktop client, a scripted host, or test fakes.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Single-attempt async HTTP (script retrieval, persisted queries)
//!
//! ### Query execution
//! - [`QueryExecutor`](graphql::QueryExecutor) - Generic GraphQL execution of persisted queries
//! - [`QueryRegistry`](graphql::QueryRegistry) - Shared catalog of query definitions by name
//!
//! ### Content
//! - [`PlaylistApi`](library::PlaylistApi) - Playlist contents
//! - [`RootlistApi`](library::RootlistApi) - User rootlist (playlists and folders)
//! - [`LibraryApi`](library::LibraryApi) - Library membership checks
//! - [`LocaleProvider`](library::LocaleProvider) - Active locale for metadata queries
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Callers in the
//! core propagate it unchanged, so implementations should put actionable
//! context (status codes, URIs) into the message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so handles can be shared as
//! `Arc<dyn Trait>` across async tasks.

pub mod error;
pub mod graphql;
pub mod http;
pub mod library;
pub mod logging;

pub use error::BridgeError;

// Re-export commonly used types
pub use graphql::{
    InMemoryQueryRegistry, QueryDefinition, QueryExecutor, QueryOperation, QueryRegistry,
};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use library::{
    LibraryApi, LocaleProvider, PlaylistApi, PlaylistContents, PlaylistItem, PlaylistResponse,
    RootlistApi, RootlistItem, RootlistOptions, RootlistResponse, StaticLocaleProvider,
};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
