use serde::{Deserialize, Serialize};

use crate::crypto::{self, Hash};

// A transaction document
// `issuers` and `hash` are derived when the transaction is stamped for
// application, the wire form may omit both
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Transaction {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    currency: String,
    signatories: Vec<String>,
    #[serde(default)]
    issuers: Vec<String>,
    inputs: Vec<String>,
    outputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(default)]
    locktime: u64,
    signatures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hash: Option<Hash>,
}

impl Transaction {
    pub fn new(
        signatories: Vec<String>,
        inputs: Vec<String>,
        outputs: Vec<String>,
        comment: Option<String>,
        locktime: u64,
        signatures: Vec<String>,
    ) -> Self {
        Transaction {
            version: 0,
            currency: String::new(),
            signatories,
            issuers: Vec::new(),
            inputs,
            outputs,
            comment,
            locktime,
            signatures,
            hash: None,
        }
    }

    pub fn get_version(&self) -> u32 {
        self.version
    }

    pub fn get_currency(&self) -> &str {
        &self.currency
    }

    pub fn get_signatories(&self) -> &Vec<String> {
        &self.signatories
    }

    pub fn get_issuers(&self) -> &Vec<String> {
        &self.issuers
    }

    pub fn get_hash(&self) -> Option<&Hash> {
        self.hash.as_ref()
    }

    // Canonical serialized form the document hash is computed over:
    // a TX header line followed by each group, one element per line
    pub fn compact(&self) -> String {
        let mut raw = format!(
            "TX:{}:{}:{}:{}:{}:{}\n",
            self.version,
            self.signatories.len(),
            self.inputs.len(),
            self.outputs.len(),
            if self.comment.is_some() { 1 } else { 0 },
            self.locktime
        );
        for signatory in &self.signatories {
            raw.push_str(signatory);
            raw.push('\n');
        }
        for input in &self.inputs {
            raw.push_str(input);
            raw.push('\n');
        }
        for output in &self.outputs {
            raw.push_str(output);
            raw.push('\n');
        }
        if let Some(comment) = &self.comment {
            raw.push_str(comment);
            raw.push('\n');
        }
        for signature in &self.signatures {
            raw.push_str(signature);
            raw.push('\n');
        }
        raw
    }

    // Fix the local document version and currency, mirror signatories into
    // issuers and compute the document hash over the compact form
    pub fn stamp(&mut self, version: u32, currency: &str) {
        self.version = version;
        self.currency = currency.to_string();
        self.issuers = self.signatories.clone();
        self.hash = Some(crypto::hash(self.compact().as_bytes()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::new(
            vec!["KEY_A".to_string(), "KEY_B".to_string()],
            vec!["T:AB12:4".to_string()],
            vec!["KEY_C:4".to_string()],
            Some("repayment".to_string()),
            0,
            vec!["SIG_A".to_string(), "SIG_B".to_string()],
        )
    }

    #[test]
    fn test_compact_layout() {
        let mut tx = sample();
        tx.stamp(1, "testnet_coin");
        assert_eq!(
            tx.compact(),
            "TX:1:2:1:1:1:0\n\
             KEY_A\nKEY_B\n\
             T:AB12:4\n\
             KEY_C:4\n\
             repayment\n\
             SIG_A\nSIG_B\n"
        );
    }

    #[test]
    fn test_compact_without_comment() {
        let mut tx = sample();
        tx.comment = None;
        tx.stamp(1, "testnet_coin");
        assert!(tx.compact().starts_with("TX:1:2:1:1:0:0\n"));
        assert!(!tx.compact().contains("repayment"));
    }

    #[test]
    fn test_stamp_is_idempotent() {
        let mut tx = sample();
        tx.stamp(1, "testnet_coin");
        let first = tx.get_hash().cloned().unwrap();
        tx.stamp(1, "testnet_coin");
        let second = tx.get_hash().cloned().unwrap();
        assert_eq!(first, second, "Stamping twice should not change the hash");
        // the hex form is uppercase
        assert_eq!(first.to_hex(), first.to_hex().to_uppercase());
    }

    #[test]
    fn test_stamp_fixes_fields() {
        let mut tx = sample();
        tx.stamp(3, "main_coin");
        assert_eq!(tx.get_version(), 3);
        assert_eq!(tx.get_currency(), "main_coin");
        assert_eq!(tx.get_issuers(), tx.get_signatories());
        assert!(tx.get_hash().is_some());
    }
}
