use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use super::{
    chunk::{Chunk, DownloadedChunk},
    remote::{RemoteError, RemotePeer},
};

// Events delivered to the applier, in chunk order
#[derive(Debug)]
pub enum ChunkEvent {
    // the chunk's download just started
    Started { first: u64 },
    // the chunk completed, blocks sorted ascending by number
    Downloaded(DownloadedChunk),
}

/// Downloads chunks one after the other and delivers them in order.
///
/// Chunk `i` starts downloading only once chunk `i-1` completed, and the
/// channel is bounded so at most one finished chunk is buffered while the
/// previous one is being applied. Once a chunk fails no further chunk is
/// started; dropping the pipeline aborts any in-flight download.
pub struct DownloadPipeline {
    handle: JoinHandle<()>,
    receiver: mpsc::Receiver<Result<ChunkEvent, RemoteError>>,
}

impl DownloadPipeline {
    pub fn start<R: RemotePeer + 'static>(remote: Arc<R>, chunks: Vec<Chunk>) -> Self {
        let (sender, receiver) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            for chunk in chunks {
                if sender
                    .send(Ok(ChunkEvent::Started { first: chunk.first }))
                    .await
                    .is_err()
                {
                    // receiver dropped, the sync was cancelled
                    return;
                }

                if log::log_enabled!(log::Level::Debug) {
                    debug!("downloading chunk [{}, {}]", chunk.first, chunk.last);
                }
                match remote.blocks(chunk.size(), chunk.first).await {
                    Ok(mut blocks) => {
                        // remote order is unspecified
                        blocks.sort_by_key(|block| block.get_number());
                        let downloaded = DownloadedChunk {
                            first: chunk.first,
                            last: chunk.last,
                            blocks,
                        };
                        if sender.send(Ok(ChunkEvent::Downloaded(downloaded))).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        // pending chunks are implicitly cancelled
                        let _ = sender.send(Err(e)).await;
                        return;
                    }
                }
            }
        });

        DownloadPipeline { handle, receiver }
    }

    // Next event in strict chunk order, None once every chunk was delivered
    pub async fn next(&mut self) -> Option<Result<ChunkEvent, RemoteError>> {
        self.receiver.recv().await
    }

    // Cancel any in-flight download
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for DownloadPipeline {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
