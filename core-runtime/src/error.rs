use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid settings or a second logging initialization
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required host capability was not injected
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Name of the missing capability, if that is what went wrong
    pub fn missing_capability(&self) -> Option<&str> {
        match self {
            Error::CapabilityMissing { capability, .. } => Some(capability),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
