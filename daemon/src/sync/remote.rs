use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use ucp_common::{
    api::{ChainInfo, MerkleSelector, PeerLeafResponse, PeersLeaves, PeersMerkleResponse},
    block::Block,
    peer::{NodesMerkle, PeeringEntry},
};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response for {0}")]
    UnexpectedResponse(&'static str),
    #[error("request failed: {0}")]
    RequestFailure(String),
}

/// Thin façade over a remote node's API.
///
/// Every call may fail with a network error; all of them go through the
/// configured long sync timeout.
#[async_trait]
pub trait RemotePeer: Send + Sync {
    // current chain head and UCP protocol version of the remote
    async fn current(&self) -> Result<ChainInfo, RemoteError>;

    // `count` blocks starting at `from` inclusive, in unspecified order
    async fn blocks(&self, count: u64, from: u64) -> Result<Vec<Block>, RemoteError>;

    // the remote's own peering entry
    async fn peering(&self) -> Result<PeeringEntry, RemoteError>;

    // peers merkle summary, leaves list or a single leaf
    async fn peers_merkle(
        &self,
        selector: MerkleSelector,
    ) -> Result<PeersMerkleResponse, RemoteError>;
}

// HTTP client for a remote node
// Construct it with `SyncConfig::sync_long_timeout()` so that slow chunk
// assembly on the remote side does not abort the sync
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpRemote {
            base_url: format!("http://{}:{}", host, port),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("GET {}{}", self.base_url, path);
        }
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        Ok(response.error_for_status()?.json().await?)
    }
}

#[async_trait]
impl RemotePeer for HttpRemote {
    async fn current(&self) -> Result<ChainInfo, RemoteError> {
        self.get_json("/blockchain/current").await
    }

    async fn blocks(&self, count: u64, from: u64) -> Result<Vec<Block>, RemoteError> {
        self.get_json(&format!("/blockchain/blocks/{}/{}", count, from))
            .await
    }

    async fn peering(&self) -> Result<PeeringEntry, RemoteError> {
        self.get_json("/network/peering").await
    }

    async fn peers_merkle(
        &self,
        selector: MerkleSelector,
    ) -> Result<PeersMerkleResponse, RemoteError> {
        match selector {
            MerkleSelector::Summary => {
                let summary: NodesMerkle = self.get_json("/network/peering/peers").await?;
                Ok(PeersMerkleResponse::Summary(summary))
            }
            MerkleSelector::Leaves => {
                let response: PeersLeaves =
                    self.get_json("/network/peering/peers?leaves=true").await?;
                Ok(PeersMerkleResponse::Leaves(response.leaves))
            }
            MerkleSelector::Leaf(hash) => {
                let response: PeerLeafResponse = self
                    .get_json(&format!("/network/peering/peers?leaf={}", hash))
                    .await?;
                Ok(PeersMerkleResponse::Leaf(response.leaf))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;

    #[test]
    fn test_remote_is_built_with_the_long_timeout() {
        let config = SyncConfig::new("testnet_coin");
        let remote = HttpRemote::new("192.0.2.1", 2125, config.sync_long_timeout()).unwrap();
        assert_eq!(remote.base_url, "http://192.0.2.1:2125");
    }
}
