use async_trait::async_trait;
use ucp_common::{block::Block, peer::PeersMerkle};

use super::error::LedgerError;

/// Narrow interface consumed from the node's ledger / DAL.
///
/// The ledger is treated as an exclusive collaborator for the duration of a
/// sync: callers must not run two syncs against the same ledger concurrently.
#[async_trait]
pub trait Ledger: Send + Sync {
    // current top block of the local chain, None when no chain exists yet
    async fn get_current_block(&self) -> Result<Option<Block>, LedgerError>;

    async fn get_block(&self, number: u64) -> Result<Block, LedgerError>;

    // bulk insert a whole chunk in the main branch (fast sync)
    async fn save_blocks_in_main_branch(
        &self,
        blocks: Vec<Block>,
        target: u64,
    ) -> Result<(), LedgerError>;

    // bulk-mode finalization once the last chunk has been saved
    async fn obsolete_in_main_branch(&self, last_block: Block) -> Result<(), LedgerError>;

    // validate and append a single block (cautious sync)
    async fn submit_block(
        &self,
        block: Block,
        cautious: bool,
        fork_allowed: bool,
    ) -> Result<(), LedgerError>;

    // make the currency parameters of the root block effective
    async fn save_parameters_for_root_block(&self, root_block: Block) -> Result<(), LedgerError>;

    // merkle tree of the locally known peers
    async fn merkle_for_peers(&self) -> Result<PeersMerkle, LedgerError>;
}
