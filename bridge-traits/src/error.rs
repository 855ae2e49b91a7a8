use thiserror::Error;

/// Failure reported by a host capability
///
/// Passed through the core unchanged, so messages should carry the context a
/// host developer needs (URI, status code, operation name).
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The host does not provide this capability
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
