use super::block::sha256_hex;
use super::POW_PREFIX;

/// Difficulty predicate: SHA-256 of the decimal concatenation
/// `"{last_proof}{proof}"` must start with four hex zeros.
pub fn is_valid_proof(last_proof: i64, proof: i64) -> bool {
    let guess = format!("{last_proof}{proof}");
    sha256_hex(guess.as_bytes()).starts_with(POW_PREFIX)
}

/// Linear search from 0 upward for the first proof accepted against
/// `last_proof`. Unbounded; blocks the calling thread until found.
pub fn find_proof(last_proof: i64) -> i64 {
    let mut proof = 0;
    while !is_valid_proof(last_proof, proof) {
        proof += 1;
    }
    proof
}

/// Same search as [`find_proof`], giving up after `max_attempts` candidates.
pub fn find_proof_bounded(last_proof: i64, max_attempts: u64) -> Option<i64> {
    (0..max_attempts)
        .filter_map(|n| i64::try_from(n).ok())
        .find(|&proof| is_valid_proof(last_proof, proof))
}

#[cfg(test)]
mod tests {
    use super::{find_proof, find_proof_bounded, is_valid_proof};

    #[test]
    fn known_proof_after_genesis() {
        assert!(is_valid_proof(100, 35293));
        assert_eq!(find_proof(100), 35293);
    }

    #[test]
    fn found_proof_satisfies_predicate() {
        for last in [0, 7, 35293] {
            let proof = find_proof(last);
            assert!(is_valid_proof(last, proof));
        }
    }

    #[test]
    fn predicate_is_deterministic() {
        for (p, q) in [(100, 35293), (100, 1), (-3, 42)] {
            assert_eq!(is_valid_proof(p, q), is_valid_proof(p, q));
        }
        assert!(!is_valid_proof(100, 35292));
    }

    #[test]
    fn bounded_search_gives_up() {
        assert_eq!(find_proof_bounded(100, 10), None);
        assert_eq!(find_proof_bounded(100, 35294), Some(35293));
    }
}
