use std::collections::HashSet;

use log::debug;
use reqwest::Url;

use super::{Block, hash};
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// In-memory ledger state: the chain, the pending pool and the known peers.
///
/// Not synchronized; see `Node` for the shared, lock-guarded wrapper.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    peers: HashSet<String>,
}

impl Ledger {
    /// Initialize a new ledger with a genesis block.
    pub fn new() -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            peers: HashSet::new(),
        };
        ledger.chain.push(Block::genesis());
        ledger
    }

    /// Queue a transaction and return the index of the block that will hold it.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: i64,
    ) -> Result<u64> {
        let tx = Transaction::new(sender, recipient, amount);
        debug!(
            "pending tx {} -> {} ({}), pool size {}",
            tx.sender,
            tx.recipient,
            tx.amount,
            self.pending.len() + 1
        );
        self.pending.push(tx);
        Ok(self.last_block()?.index + 1)
    }

    /// Seal the pending pool into a new block and append it.
    ///
    /// Without `previous_hash` the link is computed from the current last block.
    pub fn new_block(&mut self, proof: i64, previous_hash: Option<String>) -> Result<Block> {
        let previous_hash = match previous_hash {
            Some(h) => h,
            None => hash(self.last_block()?),
        };

        let block = Block::new(
            self.chain.len() as u64 + 1,
            std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        );
        self.chain.push(block.clone());
        Ok(block)
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Record a peer from an absolute URL such as `http://10.0.0.2:5000`.
    /// Anything without a host is ignored. Returns whether the set grew.
    pub fn register_node(&mut self, address: &str) -> bool {
        match peer_host(address) {
            Some(host) => self.peers.insert(host),
            None => {
                debug!("ignoring peer address {address:?}");
                false
            }
        }
    }

    /// Swap in `candidate` if it is non-empty and strictly longer than ours.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.is_empty() || candidate.len() <= self.chain.len() {
            return false;
        }
        self.chain = candidate;
        true
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn peers(&self) -> &HashSet<String> {
        &self.peers
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// `host[:port]` of an absolute URL, or `None` when there is no host.
fn peer_host(address: &str) -> Option<String> {
    let url = Url::parse(address.trim()).ok()?;
    let host = url.host_str().filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
