use thiserror::Error;

/// Failures surfaced by the overlay core.
///
/// Only [`OverlayError::AssetMissing`] is treated as unrecoverable; every
/// other variant leaves the last good in-memory state in place.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("storage failure while {action}: {source}")]
    Storage {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid image: {0}")]
    Decode(String),
    #[error("bundled default image is missing or corrupt: {0}")]
    AssetMissing(String),
    #[error("host rejected request: {0}")]
    HostRejected(String),
}

impl OverlayError {
    pub(crate) fn storage(action: &'static str, source: std::io::Error) -> Self {
        Self::Storage { action, source }
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, OverlayError>;
