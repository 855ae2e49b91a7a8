//! Workspace façade crate.
//!
//! Re-exports the statistics service so host applications can depend on
//! `stats-workspace` alone and pick platform shims through feature flags.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
