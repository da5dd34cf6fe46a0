use thiserror::Error;
use ucp_common::config::MIN_UCP_VERSION;

use crate::sync::remote::RemoteError;

#[derive(Debug, Error)]
pub enum LedgerError {
    // the ledger validated and refused the block
    #[error("block refused: {0}")]
    Refused(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("peering entry already recorded")]
    AlreadyRecorded,
    #[error("peering entry references an unknown block")]
    UnknownReferenceBlock,
    #[error("invalid peering signature")]
    InvalidSignature,
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl PeerError {
    // errors the sync path swallows when recording peering entries
    pub fn is_tolerated(&self) -> bool {
        matches!(
            self,
            PeerError::AlreadyRecorded | PeerError::UnknownReferenceBlock
        )
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote UCP version is {0}, minimum supported is {min}", min = MIN_UCP_VERSION)]
    UnsupportedUcpVersion(u32),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Peer(#[from] PeerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_error_message() {
        let message = SyncError::UnsupportedUcpVersion(1).to_string();
        assert!(message.contains("UCP version is 1"), "got: {}", message);
        assert!(message.contains("minimum supported is 2"), "got: {}", message);
    }

    #[test]
    fn test_tolerated_peer_errors() {
        assert!(PeerError::AlreadyRecorded.is_tolerated());
        assert!(PeerError::UnknownReferenceBlock.is_tolerated());
        assert!(!PeerError::InvalidSignature.is_tolerated());
        assert!(!PeerError::Any(anyhow::anyhow!("disk full")).is_tolerated());
    }
}
