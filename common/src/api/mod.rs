use serde::{Deserialize, Serialize};

use crate::{
    crypto::Hash,
    peer::{NodesMerkle, PeeringEntry},
};

// Summary of the remote's chain head, served at /blockchain/current
// `version` is the peer's UCP protocol version, not the block version
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChainInfo {
    pub number: u64,
    pub version: u32,
}

// What to ask the peers merkle endpoint for
#[derive(Clone, Debug)]
pub enum MerkleSelector {
    // root summary only
    Summary,
    // the full leaves list
    Leaves,
    // a single leaf's value
    Leaf(Hash),
}

// Wire form of the leaves list: {"leaves": [..]}
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PeersLeaves {
    pub leaves: Vec<Hash>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PeerLeaf {
    pub hash: Hash,
    pub value: PeeringEntry,
}

// Wire form of a single leaf: {"leaf": {"hash": .., "value": {..}}}
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PeerLeafResponse {
    pub leaf: PeerLeaf,
}

// Response of the peers merkle endpoint, shaped by the selector
#[derive(Clone, Debug)]
pub enum PeersMerkleResponse {
    Summary(NodesMerkle),
    Leaves(Vec<Hash>),
    Leaf(PeerLeaf),
}

impl PeersMerkleResponse {
    pub fn into_summary(self) -> Option<NodesMerkle> {
        match self {
            PeersMerkleResponse::Summary(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn into_leaves(self) -> Option<Vec<Hash>> {
        match self {
            PeersMerkleResponse::Leaves(leaves) => Some(leaves),
            _ => None,
        }
    }

    pub fn into_leaf(self) -> Option<PeerLeaf> {
        match self {
            PeersMerkleResponse::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto;

    #[test]
    fn test_chain_info_wire_form() {
        let info: ChainInfo = serde_json::from_str(r#"{"number": 1200, "version": 2}"#).unwrap();
        assert_eq!(info.number, 1200);
        assert_eq!(info.version, 2);
    }

    #[test]
    fn test_leaf_response_wire_form() {
        let hash = crypto::hash(b"KEY_A");
        let json = format!(
            r#"{{"leaf": {{"hash": "{}", "value": {{
                "version": 2,
                "currency": "testnet_coin",
                "pubkey": "KEY_A",
                "endpoints": ["BASIC_MERKLED_API 192.0.2.7 2125"],
                "block": "42-FADE",
                "signature": "SIG"
            }}}}}}"#,
            hash.to_hex()
        );
        let response: PeerLeafResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(response.leaf.hash, hash);
        assert_eq!(response.leaf.value.get_pubkey(), "KEY_A");
    }
}
