//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the statistics crates:
//! - Logging and tracing bootstrap
//! - Configuration with fail-fast capability validation
//!
//! ## Overview
//!
//! Hosts call [`logging::init_logging`] once at startup, then assemble a
//! [`config::StatsConfig`] from their capability implementations and hand it
//! to the service layer.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{DiscoveryConfig, StatsConfig, StatsConfigBuilder};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
