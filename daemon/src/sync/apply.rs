use std::sync::Arc;

use ucp_common::block::Block;

use crate::{
    config::SyncConfig,
    core::{error::SyncError, ledger::Ledger},
};

use super::chunk::DownloadedChunk;

// How downloaded blocks reach the ledger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyMode {
    // block by block validation through the ledger, used when a chain
    // already exists
    Cautious,
    // bulk insertion in the main branch, used for an initial sync
    Fast,
}

// Applies downloaded chunks to the ledger, strictly in ascending order
pub struct Applier<L: Ledger> {
    ledger: Arc<L>,
    mode: ApplyMode,
    currency: String,
    documents_version: u32,
    fork_allowed: bool,
    target: u64,
    applied: u64,
    last_block: Option<Block>,
}

impl<L: Ledger> Applier<L> {
    pub fn new(ledger: Arc<L>, mode: ApplyMode, config: &SyncConfig, target: u64) -> Self {
        Applier {
            ledger,
            mode,
            currency: config.currency.clone(),
            documents_version: config.documents_version,
            fork_allowed: config.fork_allowed,
            target,
            applied: 0,
            last_block: None,
        }
    }

    pub fn applied_count(&self) -> u64 {
        self.applied
    }

    // Apply one chunk. `on_applied` observes the highest applied block
    // number: once per block in cautious mode, once per chunk in fast mode.
    pub async fn apply_chunk<F: FnMut(u64)>(
        &mut self,
        chunk: DownloadedChunk,
        mut on_applied: F,
    ) -> Result<(), SyncError> {
        let DownloadedChunk { blocks, .. } = chunk;
        match self.mode {
            ApplyMode::Cautious => {
                for mut block in blocks {
                    for tx in block.get_transactions_mut() {
                        tx.stamp(self.documents_version, &self.currency);
                    }
                    let number = block.get_number();
                    self.ledger
                        .submit_block(block, true, self.fork_allowed)
                        .await?;
                    self.applied += 1;
                    on_applied(number);
                }
            }
            ApplyMode::Fast => {
                let Some(last) = blocks.last().cloned() else {
                    return Ok(());
                };
                let count = blocks.len() as u64;
                self.ledger
                    .save_blocks_in_main_branch(blocks, self.target)
                    .await?;
                self.applied += count;
                on_applied(last.get_number());
                // the chunk's blocks were moved to the ledger, only the last
                // one is retained for finalization
                self.last_block = Some(last);
            }
        }
        Ok(())
    }

    // Post-pass once every chunk was applied: bulk-mode finalization, then
    // the root block is re-read so currency parameters become effective
    pub async fn finalize(&mut self) -> Result<(), SyncError> {
        if self.applied == 0 {
            return Ok(());
        }

        if self.mode == ApplyMode::Fast {
            if let Some(last) = self.last_block.take() {
                self.ledger.obsolete_in_main_branch(last).await?;
            }
        }

        let root = self.ledger.get_block(0).await?;
        self.ledger.save_parameters_for_root_block(root).await?;
        Ok(())
    }
}
