use std::fmt::{Display, Error, Formatter};

use serde::{Deserialize, Serialize};

use crate::crypto::{self, Hash};

// A signed record identifying a peer: its public key, reachable endpoints
// and the chain block it was issued upon
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PeeringEntry {
    version: u32,
    currency: String,
    pubkey: String,
    endpoints: Vec<String>,
    block: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
}

impl PeeringEntry {
    pub fn new(
        version: u32,
        currency: String,
        pubkey: String,
        endpoints: Vec<String>,
        block: String,
        signature: Option<String>,
    ) -> Self {
        PeeringEntry {
            version,
            currency,
            pubkey,
            endpoints,
            block,
            signature,
        }
    }

    pub fn get_version(&self) -> u32 {
        self.version
    }

    pub fn get_currency(&self) -> &str {
        &self.currency
    }

    pub fn get_pubkey(&self) -> &str {
        &self.pubkey
    }

    pub fn get_endpoints(&self) -> &Vec<String> {
        &self.endpoints
    }

    pub fn get_block(&self) -> &str {
        &self.block
    }

    pub fn get_signature(&self) -> Option<&String> {
        self.signature.as_ref()
    }

    // Canonical byte form covered by the signature
    pub fn signable_form(&self) -> String {
        let mut raw = format!(
            "Version: {}\nCurrency: {}\nPublicKey: {}\nEndpoints:\n",
            self.version, self.currency, self.pubkey
        );
        for endpoint in &self.endpoints {
            raw.push_str(endpoint);
            raw.push('\n');
        }
        raw.push_str(&format!("Block: {}\n", self.block));
        raw
    }

    // Leaf under which this entry is stored in a peers merkle tree
    pub fn leaf(&self) -> Hash {
        crypto::hash(self.pubkey.as_bytes())
    }
}

impl Display for PeeringEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "PeeringEntry[pubkey: {}, endpoints: {}, block: {}]",
            self.pubkey,
            self.endpoints.len(),
            self.block
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PeeringEntry {
        PeeringEntry::new(
            2,
            "testnet_coin".to_string(),
            "KEY_A".to_string(),
            vec![
                "BASIC_MERKLED_API node.example.org 2125".to_string(),
                "BASIC_MERKLED_API 192.0.2.7 2125".to_string(),
            ],
            "42-FADE".to_string(),
            Some("SIG".to_string()),
        )
    }

    #[test]
    fn test_signable_form_layout() {
        assert_eq!(
            sample().signable_form(),
            "Version: 2\n\
             Currency: testnet_coin\n\
             PublicKey: KEY_A\n\
             Endpoints:\n\
             BASIC_MERKLED_API node.example.org 2125\n\
             BASIC_MERKLED_API 192.0.2.7 2125\n\
             Block: 42-FADE\n"
        );
    }

    #[test]
    fn test_leaf_depends_on_pubkey_only() {
        let entry = sample();
        let mut other = sample();
        other.block = "43-BEEF".to_string();
        assert_eq!(entry.leaf(), other.leaf());

        other.pubkey = "KEY_B".to_string();
        assert_ne!(entry.leaf(), other.leaf());
    }
}
