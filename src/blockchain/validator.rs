use log::trace;

use super::{Block, hash, is_valid_proof};

/// Check linkage and proof-of-work of a candidate chain.
///
/// The first block is taken as given; every later block must point at the
/// hash of its predecessor and carry a proof valid against the predecessor's
/// proof. An empty candidate is rejected.
pub fn is_valid_chain(candidate: &[Block]) -> bool {
    if candidate.is_empty() {
        return false;
    }

    for pair in candidate.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        trace!(
            "validating block #{} against #{} (proof {} -> {})",
            current.index, prev.index, prev.proof, current.proof
        );

        if current.previous_hash != hash(prev) {
            trace!("block #{} has a broken previous_hash link", current.index);
            return false;
        }

        if !is_valid_proof(prev.proof, current.proof) {
            trace!("block #{} carries an invalid proof", current.index);
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::is_valid_chain;
    use crate::blockchain::{Block, Ledger, find_proof};

    fn mined_chain(blocks: usize) -> Vec<Block> {
        let mut ledger = Ledger::new();
        for i in 0..blocks {
            ledger
                .new_transaction("alice", "bob", i as i64)
                .unwrap();
            let last_proof = ledger.last_block().unwrap().proof;
            ledger.new_block(find_proof(last_proof), None).unwrap();
        }
        ledger.chain().to_vec()
    }

    #[test]
    fn empty_chain_is_invalid() {
        assert!(!is_valid_chain(&[]));
    }

    #[test]
    fn single_block_is_trivially_valid() {
        assert!(is_valid_chain(&[Block::genesis()]));
    }

    #[test]
    fn chain_built_by_new_block_is_valid() {
        assert!(is_valid_chain(&mined_chain(3)));
    }

    #[test]
    fn tampered_previous_hash_is_rejected() {
        let mut chain = mined_chain(2);
        chain[2].previous_hash = "deadbeef".into();
        assert!(!is_valid_chain(&chain));
    }

    #[test]
    fn tampered_earlier_block_breaks_the_link() {
        let mut chain = mined_chain(2);
        chain[1].transactions[0].amount = 1_000;
        assert!(!is_valid_chain(&chain));
    }

    #[test]
    fn bad_proof_is_rejected() {
        let mut chain = mined_chain(1);
        chain[1].proof += 1;
        assert!(!is_valid_chain(&chain));
    }
}
