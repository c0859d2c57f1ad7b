//! The shared node: one ledger behind one lock, plus mining and consensus
//! orchestration on top of it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};

use crate::blockchain::{
    Block, ConsensusResolver, Ledger, MINING_REWARD, PeerClient, REWARD_SENDER, find_proof,
    find_proof_bounded,
};
use crate::error::{LedgerError, Result};

pub struct Node {
    ledger: Mutex<Ledger>,
    /// Held for a whole mining run so only one proof search is in flight.
    mining: Mutex<()>,
    node_id: String,
    pow_max_attempts: Option<u64>,
    peer_client: Arc<dyn PeerClient>,
}

impl Node {
    pub fn new(node_id: impl Into<String>, peer_client: Arc<dyn PeerClient>) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
            mining: Mutex::new(()),
            node_id: node_id.into(),
            pow_max_attempts: None,
            peer_client,
        }
    }

    /// Cap the proof search; `None` leaves it unbounded.
    pub fn with_pow_limit(mut self, max_attempts: Option<u64>) -> Self {
        self.pow_max_attempts = max_attempts;
        self
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().expect("mutex poisoned")
    }

    pub fn submit_transaction(&self, sender: &str, recipient: &str, amount: i64) -> Result<u64> {
        self.ledger().new_transaction(sender, recipient, amount)
    }

    /// Snapshot of the chain.
    pub fn chain(&self) -> Vec<Block> {
        self.ledger().chain().to_vec()
    }

    pub fn pending_len(&self) -> usize {
        self.ledger().pending().len()
    }

    /// Register every address and return the resulting peer set.
    pub fn register_nodes<S: AsRef<str>>(&self, addresses: &[S]) -> HashSet<String> {
        let mut ledger = self.ledger();
        for address in addresses {
            ledger.register_node(address.as_ref());
        }
        ledger.peers().clone()
    }

    /// Find a proof for the current head, credit the reward and seal the
    /// pending pool into a new block.
    ///
    /// The ledger lock is released during the search. If the head changed in
    /// the meantime (consensus replaced the chain) the search starts over.
    pub fn mine(&self) -> Result<Block> {
        let _mining = self.mining.lock().expect("mutex poisoned");

        loop {
            let (last_proof, last_hash) = {
                let ledger = self.ledger();
                let last = ledger.last_block()?;
                (last.proof, last.hash())
            };

            debug!("MINER - searching proof against last proof {last_proof}");
            let proof = match self.pow_max_attempts {
                None => find_proof(last_proof),
                Some(attempts) => find_proof_bounded(last_proof, attempts)
                    .ok_or(LedgerError::ProofSearchExhausted { attempts })?,
            };

            let mut ledger = self.ledger();
            let head = ledger.last_block()?;
            if head.proof != last_proof || head.hash() != last_hash {
                warn!("MINER - chain head moved during proof search, retrying");
                continue;
            }

            ledger.new_transaction(REWARD_SENDER, self.node_id.as_str(), MINING_REWARD)?;
            let block = ledger.new_block(proof, None)?;
            info!(
                "MINER - sealed block #{} (proof={}, txs={})",
                block.index,
                block.proof,
                block.transactions.len()
            );
            return Ok(block);
        }
    }

    /// Ask every peer for its chain and adopt the longest valid one that beats
    /// ours. Returns whether the local chain was replaced.
    ///
    /// Peers are queried without holding the ledger lock; the replacement is
    /// re-checked against the chain length at the moment it is applied.
    pub fn resolve_conflicts(&self) -> bool {
        let (local_len, peers) = {
            let ledger = self.ledger();
            (ledger.len(), ledger.peers().clone())
        };

        let resolver = ConsensusResolver::new(self.peer_client.as_ref());
        let Some(candidate) = resolver.longest_valid_chain(local_len, &peers) else {
            debug!("CONSENSUS - local chain of length {local_len} is authoritative");
            return false;
        };

        let mut ledger = self.ledger();
        let replaced = ledger.replace_chain(candidate);
        if replaced {
            info!("CONSENSUS - chain replaced, new length {}", ledger.len());
        } else {
            warn!("CONSENSUS - local chain grew past the candidate, keeping it");
        }
        replaced
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Node;
    use crate::blockchain::consensus::tests::{FakePeers, extend};
    use crate::blockchain::{Ledger, MINING_REWARD, is_valid_chain};
    use crate::error::LedgerError;
    use crate::transaction::Transaction;

    fn node_with(peers: FakePeers) -> Node {
        Node::new("node-a", Arc::new(peers))
    }

    #[test]
    fn mining_moves_pending_and_reward_into_block() {
        let node = node_with(FakePeers::default());
        assert_eq!(node.submit_transaction("alice", "bob", 5).unwrap(), 2);
        assert_eq!(node.pending_len(), 1);

        let block = node.mine().unwrap();

        assert_eq!(block.index, 2);
        assert_eq!(block.proof, 35293);
        assert_eq!(
            block.transactions,
            vec![
                Transaction::new("alice", "bob", 5),
                Transaction::new("0", "node-a", MINING_REWARD),
            ]
        );
        assert_eq!(node.pending_len(), 0);
        assert_eq!(node.chain().len(), 2);
    }

    #[test]
    fn repeated_mining_keeps_chain_valid() {
        let node = node_with(FakePeers::default());
        node.mine().unwrap();
        node.submit_transaction("bob", "carol", 1).unwrap();
        node.mine().unwrap();

        let chain = node.chain();
        assert_eq!(chain.len(), 3);
        assert!(is_valid_chain(&chain));
    }

    #[test]
    fn bounded_search_fails_explicitly() {
        let node = node_with(FakePeers::default()).with_pow_limit(Some(10));
        node.submit_transaction("alice", "bob", 5).unwrap();

        let err = node.mine().unwrap_err();
        assert!(matches!(err, LedgerError::ProofSearchExhausted { attempts: 10 }));
        assert_eq!(node.chain().len(), 1);
        assert_eq!(node.pending_len(), 1);
    }

    #[test]
    fn register_ignores_malformed_addresses() {
        let node = node_with(FakePeers::default());
        let peers = node.register_nodes(&["", "http://localhost:5001", "::garbage::"]);
        assert_eq!(peers.len(), 1);
        assert!(peers.contains("localhost:5001"));
    }

    #[test]
    fn resolve_adopts_longer_peer_extension() {
        let node = node_with(FakePeers::default());
        node.mine().unwrap();

        // Peer B holds A's chain plus one more block.
        let mut remote = Ledger::new();
        assert!(remote.replace_chain(node.chain()));
        extend(&mut remote, 1);
        let remote_chain = remote.chain().to_vec();

        let node = Node {
            peer_client: Arc::new(FakePeers::default().with("b:5000", remote_chain.clone())),
            ..node
        };
        node.register_nodes(&["http://b:5000"]);

        assert!(node.resolve_conflicts());
        assert_eq!(node.chain(), remote_chain);
    }

    #[test]
    fn resolve_keeps_chain_without_better_peer() {
        let node = node_with(FakePeers::default());
        node.mine().unwrap();
        node.register_nodes(&["http://unreachable:1"]);
        let before = node.chain();

        assert!(!node.resolve_conflicts());
        assert_eq!(node.chain(), before);
    }

    #[test]
    fn resolve_never_shortens() {
        let mut short = Ledger::new();
        extend(&mut short, 1);
        let node = node_with(FakePeers::default().with("s:1", short.chain().to_vec()));
        node.mine().unwrap();
        node.mine().unwrap();
        node.register_nodes(&["http://s:1"]);

        assert!(!node.resolve_conflicts());
        assert_eq!(node.chain().len(), 3);
    }
}
