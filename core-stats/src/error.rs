use thiserror::Error;

/// Why a discovery attempt did not install the query definition.
///
/// Cloneable so every caller awaiting the same in-flight attempt receives
/// the outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryFailure {
    #[error("Failed to fetch route script: {0}")]
    Fetch(String),

    #[error("Route script request returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Route script is not valid text: {0}")]
    InvalidText(String),

    #[error("Could not find {query} hash in route script")]
    TokenNotFound { query: String },
}

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("{query} GraphQL definition not available")]
    RegistrationUnavailable { query: String },

    #[error("Invalid GraphQL response structure: missing {path}")]
    InvalidResponseShape { path: String },

    #[error(transparent)]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, StatsError>;
