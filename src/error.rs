use thiserror::Error;

use crate::store::StoreError;

/// Failure taxonomy for a deployment run.
///
/// `Config` and `Io` are always fatal. `Store` only reaches this level when
/// the failing file is critical; non-critical transfer failures stay inside
/// the run report.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Missing or rejected credentials, or a failed pre-flight probe.
    #[error("configuration error: {0}")]
    Config(String),

    /// Local filesystem problem: missing dist directory, unreadable file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A critical file's transfer failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
