use async_trait::async_trait;
use ucp_common::peer::PeeringEntry;

use super::error::PeerError;

// Local peer table service
#[async_trait]
pub trait PeerService: Send + Sync {
    // record a peering entry in the local peer table
    async fn submit_peering(
        &self,
        entry: PeeringEntry,
        verify_signature: bool,
        erase_if_already_recorded: bool,
    ) -> Result<(), PeerError>;

    // verify the signature of a peering entry against its pubkey
    async fn check_peer_signature(&self, entry: &PeeringEntry) -> bool;
}
