use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use cpuonline_sysfs::CoreId;
use thiserror::Error;

use crate::hotplug::CoreStatus;

/// Result type for hotplug operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Listing, reading, writing or parsing the device directory failed.
    Io,
    /// A requested core is not in the discovered set.
    Validation,
}

/// Errors for hotplug operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to list CPU devices under {}: {source}", .root.display())]
    Discovery {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read status of CPU{core}: {source}")]
    ReadStatus {
        core: CoreId,
        #[source]
        source: io::Error,
    },
    #[error("invalid status {content:?} for CPU{core}: {source}")]
    ParseStatus {
        core: CoreId,
        content: String,
        #[source]
        source: ParseIntError,
    },
    #[error("cannot change CPU{core} status to {target}: {source}")]
    WriteStatus {
        core: CoreId,
        target: CoreStatus,
        #[source]
        source: io::Error,
    },
    #[error("invalid CPU number: {0}")]
    InvalidCore(CoreId),
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidCore(_) => ErrorKind::Validation,
            CoreError::Discovery { .. }
            | CoreError::ReadStatus { .. }
            | CoreError::ParseStatus { .. }
            | CoreError::WriteStatus { .. }
            | CoreError::Output(_) => ErrorKind::Io,
        }
    }

    /// Core the failure is about, if any.
    pub fn core(&self) -> Option<CoreId> {
        match self {
            CoreError::ReadStatus { core, .. }
            | CoreError::ParseStatus { core, .. }
            | CoreError::WriteStatus { core, .. } => Some(*core),
            CoreError::InvalidCore(core) => Some(*core),
            CoreError::Discovery { .. } | CoreError::Output(_) => None,
        }
    }
}
