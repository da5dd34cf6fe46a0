use std::time::Duration;

use serde::{Deserialize, Serialize};
use ucp_common::config::DEFAULT_DOCUMENTS_VERSION;

// Chain sync config
// how many blocks are downloaded per chunk by default
pub const DEFAULT_CHUNK_SIZE: u64 = 500;
// how many chunk completion timestamps the speed estimator keeps
pub const DEFAULT_SPEED_WINDOW: usize = 8;
// millis between two refreshes of the status line while syncing
pub const DEFAULT_EVAL_REMAINING_INTERVAL_MS: u64 = 1000;
// millis until a remote call made during sync times out
// remote nodes may need a while to assemble a large chunk
pub const SYNC_LONG_TIMEOUT_MS: u64 = 120_000;

// Runtime options of the synchronization core
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SyncConfig {
    // currency name stamped into transactions while applying blocks
    pub currency: String,
    // document version stamped into transactions
    #[serde(default = "default_documents_version")]
    pub documents_version: u32,
    // passed to the ledger on every cautious submission
    #[serde(default = "default_fork_allowed")]
    pub fork_allowed: bool,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
    #[serde(default = "default_sync_long_timeout_ms")]
    pub sync_long_timeout_ms: u64,
    #[serde(default = "default_eval_remaining_interval_ms")]
    pub eval_remaining_interval_ms: u64,
    #[serde(default = "default_speed_window")]
    pub speed_window: usize,
}

impl SyncConfig {
    // Defaults for every tuning knob, only the currency is required
    pub fn new<S: Into<String>>(currency: S) -> Self {
        SyncConfig {
            currency: currency.into(),
            documents_version: DEFAULT_DOCUMENTS_VERSION,
            fork_allowed: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
            sync_long_timeout_ms: SYNC_LONG_TIMEOUT_MS,
            eval_remaining_interval_ms: DEFAULT_EVAL_REMAINING_INTERVAL_MS,
            speed_window: DEFAULT_SPEED_WINDOW,
        }
    }

    pub fn sync_long_timeout(&self) -> Duration {
        Duration::from_millis(self.sync_long_timeout_ms)
    }
}

fn default_documents_version() -> u32 {
    DEFAULT_DOCUMENTS_VERSION
}

fn default_fork_allowed() -> bool {
    true
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

fn default_sync_long_timeout_ms() -> u64 {
    SYNC_LONG_TIMEOUT_MS
}

fn default_eval_remaining_interval_ms() -> u64 {
    DEFAULT_EVAL_REMAINING_INTERVAL_MS
}

fn default_speed_window() -> usize {
    DEFAULT_SPEED_WINDOW
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_config() {
        let config: SyncConfig = serde_json::from_str(r#"{"currency": "testnet_coin"}"#).unwrap();
        assert_eq!(config.currency, "testnet_coin");
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.speed_window, DEFAULT_SPEED_WINDOW);
        assert!(config.fork_allowed);
    }
}
