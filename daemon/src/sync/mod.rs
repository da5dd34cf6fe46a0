mod apply;
mod chunk;
mod pipeline;
mod speed;

pub mod peers;
pub mod remote;
pub mod watcher;

pub use apply::ApplyMode;
pub use chunk::{plan_chunks, Chunk, DownloadedChunk};


use std::{sync::Arc, time::Duration};

use tokio::{select, sync::mpsc, time::interval};
use ucp_common::config::MIN_UCP_VERSION;

use crate::{
    config::SyncConfig,
    core::{error::SyncError, ledger::Ledger, peer::PeerService},
};

use self::{
    apply::Applier,
    peers::PeerReconciler,
    pipeline::{ChunkEvent, DownloadPipeline},
    remote::RemotePeer,
    speed::{humanize, SpeedEstimator},
    watcher::Watcher,
};

// Lifecycle events emitted over one sync: any number of progress events
// followed by exactly one terminal Done
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncEvent {
    // download percentage strictly increased
    Download(u64),
    // applied percentage strictly increased
    Applied(u64),
    // terminal event
    Done { success: bool, msg: Option<String> },
}

/// Drives a whole synchronization against one remote node.
///
/// The syncer owns every piece of mutable sync state (progress counters,
/// speed window, watcher) so that two successive calls to [`Syncer::sync`]
/// share nothing but the collaborators.
pub struct Syncer<L: Ledger, P: PeerService, R: RemotePeer + 'static, W: Watcher> {
    ledger: Arc<L>,
    peers: Arc<P>,
    remote: Arc<R>,
    watcher: W,
    config: SyncConfig,
    events: mpsc::UnboundedSender<SyncEvent>,
}

impl<L, P, R, W> Syncer<L, P, R, W>
where
    L: Ledger + 'static,
    P: PeerService,
    R: RemotePeer + 'static,
    W: Watcher,
{
    pub fn new(
        ledger: Arc<L>,
        peers: Arc<P>,
        remote: Arc<R>,
        watcher: W,
        config: SyncConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Syncer {
                ledger,
                peers,
                remote,
                watcher,
                config,
                events,
            },
            receiver,
        )
    }

    /// Synchronize the local chain up to `to` (or the remote's tip when
    /// `None`), then reconcile the peer table unless `skip_peers` is set.
    ///
    /// `cautious` forces the application mode; when unspecified, blocks are
    /// validated one by one iff a local chain already exists.
    pub async fn sync(
        &mut self,
        to: Option<u64>,
        cautious: Option<bool>,
        skip_peers: bool,
    ) -> Result<(), SyncError> {
        let result = self.run(to, cautious, skip_peers).await;
        match &result {
            Ok(()) => {
                info!("synchronization completed");
                self.emit(SyncEvent::Done {
                    success: true,
                    msg: None,
                });
            }
            Err(e) => {
                error!("synchronization failed: {}", e);
                self.watcher.write_status(&e.to_string());
                self.emit(SyncEvent::Done {
                    success: false,
                    msg: Some(e.to_string()),
                });
            }
        }
        self.watcher.end();
        result
    }

    fn emit(&self, event: SyncEvent) {
        // the receiver may be gone, events are best effort
        let _ = self.events.send(event);
    }

    async fn run(
        &mut self,
        to: Option<u64>,
        cautious: Option<bool>,
        skip_peers: bool,
    ) -> Result<(), SyncError> {
        self.watcher.write_status("Connecting to remote node...");
        let info = self.remote.current().await?;
        if info.version < MIN_UCP_VERSION {
            return Err(SyncError::UnsupportedUcpVersion(info.version));
        }

        let target = to.unwrap_or(info.number);
        let local_height = self
            .ledger
            .get_current_block()
            .await?
            .map(|block| block.get_number());
        let mode = match cautious {
            Some(true) => ApplyMode::Cautious,
            Some(false) => ApplyMode::Fast,
            // a node with an existing chain validates block by block
            None if local_height.is_some() => ApplyMode::Cautious,
            None => ApplyMode::Fast,
        };
        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "syncing to block {} (local height: {:?}, mode: {:?})",
                target, local_height, mode
            );
        }

        let chunks = plan_chunks(local_height, target, self.config.chunk_size);
        if !chunks.is_empty() {
            self.download_and_apply(local_height, target, mode, chunks)
                .await?;
        }

        if !skip_peers {
            self.watcher.write_status("Peers: sync in progress...");
            // an open-ended sync to the tip refreshes stale entries
            let reconciler = PeerReconciler::new(
                self.remote.as_ref(),
                self.peers.as_ref(),
                self.ledger.as_ref(),
                to.is_none(),
            );
            reconciler.reconcile(&mut self.watcher).await?;
        }

        Ok(())
    }

    async fn download_and_apply(
        &mut self,
        local_height: Option<u64>,
        target: u64,
        mode: ApplyMode,
        chunks: Vec<Chunk>,
    ) -> Result<(), SyncError> {
        self.watcher.write_status("Downloading blocks...");

        let mut pipeline = DownloadPipeline::start(self.remote.clone(), chunks);
        let mut applier = Applier::new(self.ledger.clone(), mode, &self.config, target);
        let mut estimator = SpeedEstimator::new(self.config.speed_window, self.config.chunk_size);
        let mut ticker = interval(Duration::from_millis(
            self.config.eval_remaining_interval_ms.max(1),
        ));
        // percentages already pushed on the event stream
        let mut download_pct = 0u64;
        let mut applied_pct = 0u64;
        // number of the first block to apply
        let start = local_height.map_or(0, |height| height + 1);

        loop {
            select! {
                _ = ticker.tick() => {
                    self.refresh_status(&estimator, start, applier.applied_count(), target);
                }
                event = pipeline.next() => {
                    let Some(event) = event else {
                        // every chunk was delivered and applied
                        break;
                    };

                    match event {
                        Ok(ChunkEvent::Started { first }) => {
                            let pct = percent(first, target);
                            self.watcher.set_download_percent(pct);
                            if pct > download_pct {
                                download_pct = pct;
                                self.emit(SyncEvent::Download(pct));
                            }
                        }
                        Ok(ChunkEvent::Downloaded(chunk)) => {
                            estimator.on_chunk_completed();
                            let pct = percent(chunk.last, target);
                            self.watcher.set_download_percent(pct);
                            if pct > download_pct {
                                download_pct = pct;
                                self.emit(SyncEvent::Download(pct));
                            }

                            let events = self.events.clone();
                            let watcher = &mut self.watcher;
                            let result = applier
                                .apply_chunk(chunk, |number| {
                                    let pct = percent(number, target);
                                    watcher.set_applied_percent(pct);
                                    if pct > applied_pct {
                                        applied_pct = pct;
                                        let _ = events.send(SyncEvent::Applied(pct));
                                    }
                                })
                                .await;
                            if let Err(e) = result {
                                pipeline.abort();
                                return Err(e);
                            }
                        }
                        Err(e) => {
                            // the download task stopped, nothing past this
                            // chunk will ever be applied
                            pipeline.abort();
                            return Err(e.into());
                        }
                    }
                }
            }
        }

        applier.finalize().await
    }

    fn refresh_status(
        &mut self,
        estimator: &SpeedEstimator,
        start: u64,
        applied: u64,
        target: u64,
    ) {
        let speed = estimator.blocks_per_second();
        let eta = estimator
            .eta(target.saturating_sub(start + applied))
            .map(humanize)
            .unwrap_or_else(|| "...".to_string());
        self.watcher.write_status(&format!(
            "Downloading blocks | {} blocks/s | ETA {}",
            speed, eta
        ));
    }
}

// floor(number / target * 100), capped at 100
fn percent(number: u64, target: u64) -> u64 {
    if target == 0 {
        return 100;
    }
    (number.saturating_mul(100) / target).min(100)
}
