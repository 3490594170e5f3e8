//! Error kinds the operator can see.
//!
//! Per-container inspection problems are deliberately absent: they are
//! reported as [`SkipReason`](crate::types::SkipReason)s and never abort
//! a synchronization.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DtError {
    /// The process is not running with an effective UID of 0.
    #[error("Please use sudo dt")]
    NotPrivileged,

    /// The Docker daemon could not be reached at all.
    #[error("Failed to connect to Docker: {0}")]
    RuntimeConnect(#[from] bollard::errors::Error),

    /// Enumerating containers failed, so no host list can be built.
    #[error("Failed to list containers: {0:#}")]
    RuntimeList(anyhow::Error),

    /// Reading or rewriting the hosts file failed.
    #[error("Error: Updating host file {}: {source}", path.display())]
    HostsFile {
        path: PathBuf,
        source: std::io::Error,
    },
}
