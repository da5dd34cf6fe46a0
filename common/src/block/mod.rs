use std::fmt::{Display, Error, Formatter};

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

// A block as exchanged with remote nodes
// Blocks are numbered from 0 and applied to the local chain strictly in
// ascending order
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Block {
    number: u64,
    version: u32,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(number: u64, version: u32, transactions: Vec<Transaction>) -> Self {
        Block {
            number,
            version,
            transactions,
        }
    }

    pub fn get_number(&self) -> u64 {
        self.number
    }

    pub fn get_version(&self) -> u32 {
        self.version
    }

    pub fn get_txs_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn get_transactions(&self) -> &Vec<Transaction> {
        &self.transactions
    }

    pub fn get_transactions_mut(&mut self) -> &mut Vec<Transaction> {
        &mut self.transactions
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "Block[number: {}, version: {}, txs: {}]",
            self.number,
            self.version,
            self.transactions.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_wire_form() {
        let json = r#"{"number": 42, "version": 1}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.get_number(), 42);
        assert_eq!(block.get_version(), 1);
        // transactions may be omitted on the wire
        assert_eq!(block.get_txs_count(), 0);
    }
}
