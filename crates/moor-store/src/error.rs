use moor_core::runner::RunnerError;
use thiserror::Error;

/// Errors produced by the configuration stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Target file, directory, or entry does not exist.
    #[error("{what} not found")]
    NotFound { what: String },
    /// The domain is already mapped in the hosts file.
    #[error("domain '{domain}' already exists with IP {ip}")]
    AlreadyExists { domain: String, ip: String },
    /// An external command ran but exited unsuccessfully.
    #[error("{program} failed: {detail}")]
    External { program: String, detail: String },
    /// An external command could not be launched at all.
    #[error(transparent)]
    Runner(#[from] RunnerError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
