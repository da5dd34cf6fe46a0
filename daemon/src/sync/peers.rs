use indexmap::IndexSet;
use ucp_common::{
    api::MerkleSelector,
    crypto::Hash,
    peer::PeeringEntry,
};

use crate::core::{
    error::SyncError,
    ledger::Ledger,
    peer::PeerService,
};

use super::{
    remote::{RemoteError, RemotePeer},
    watcher::Watcher,
};

/// Reconciles the local peer table with the remote's peer set.
///
/// Runs after the block phase: the merkle roots are compared first and only
/// the leaves the local side lacks are fetched, one by one.
pub struct PeerReconciler<'a, R: RemotePeer, P: PeerService, L: Ledger> {
    remote: &'a R,
    peers: &'a P,
    ledger: &'a L,
    // refresh stale entries when syncing to the chain tip
    erase_if_already_recorded: bool,
}

impl<'a, R: RemotePeer, P: PeerService, L: Ledger> PeerReconciler<'a, R, P, L> {
    pub fn new(remote: &'a R, peers: &'a P, ledger: &'a L, erase_if_already_recorded: bool) -> Self {
        PeerReconciler {
            remote,
            peers,
            ledger,
            erase_if_already_recorded,
        }
    }

    pub async fn reconcile<W: Watcher + ?Sized>(&self, watcher: &mut W) -> Result<(), SyncError> {
        self.record_remote_peering(watcher).await?;

        let summary = self
            .remote
            .peers_merkle(MerkleSelector::Summary)
            .await?
            .into_summary()
            .ok_or(RemoteError::UnexpectedResponse("peers merkle summary"))?;
        let local = self.ledger.merkle_for_peers().await?;
        if summary.root == *local.root() {
            debug!("peers merkle roots match, nothing to fetch");
            watcher.write_status("Peers already known");
            return Ok(());
        }

        let remote_leaves = self
            .remote
            .peers_merkle(MerkleSelector::Leaves)
            .await?
            .into_leaves()
            .ok_or(RemoteError::UnexpectedResponse("peers merkle leaves"))?;
        let known: IndexSet<Hash> = local.leaves().iter().cloned().collect();
        let missing: Vec<Hash> = remote_leaves
            .into_iter()
            .filter(|leaf| !known.contains(leaf))
            .collect();
        if log::log_enabled!(log::Level::Debug) {
            debug!("{} peer leaves to fetch from remote", missing.len());
        }

        let total = missing.len();
        for (index, leaf_hash) in missing.into_iter().enumerate() {
            watcher.write_status(&format!("Peers: fetching {}/{}", index + 1, total));
            let leaf = self
                .remote
                .peers_merkle(MerkleSelector::Leaf(leaf_hash))
                .await?
                .into_leaf()
                .ok_or(RemoteError::UnexpectedResponse("peer leaf"))?;
            self.submit(leaf.value, true).await?;
        }

        Ok(())
    }

    // Record the remote's own peering entry
    // Signature problems are surfaced but never abort the sync
    async fn record_remote_peering<W: Watcher + ?Sized>(
        &self,
        watcher: &mut W,
    ) -> Result<(), SyncError> {
        let entry = self.remote.peering().await?;
        if entry.get_signature().is_none() {
            warn!("remote peering entry {} carries no signature", entry);
            watcher.write_status("Remote peering entry has no signature");
        } else if !self.peers.check_peer_signature(&entry).await {
            warn!("invalid signature on remote peering entry {}", entry);
            watcher.write_status("Remote peering entry signature is invalid");
        }
        self.submit(entry, false).await
    }

    async fn submit(&self, entry: PeeringEntry, verify_signature: bool) -> Result<(), SyncError> {
        match self
            .peers
            .submit_peering(entry, verify_signature, self.erase_if_already_recorded)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_tolerated() => {
                if log::log_enabled!(log::Level::Debug) {
                    debug!("peering entry skipped: {}", e);
                }
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
