//! Error types for the ledger node.

use thiserror::Error;

/// Failures surfaced by ledger and node operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The chain has no blocks. Cannot happen after `Ledger::new`.
    #[error("chain is empty")]
    EmptyChain,

    #[error("no valid proof found after {attempts} attempts")]
    ProofSearchExhausted { attempts: u64 },

    #[error("blocking task failed: {0}")]
    Blocking(String),
}

/// Reasons a peer did not yield a usable chain. Never escapes the resolver.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("peer {peer} unreachable: {reason}")]
    Unreachable { peer: String, reason: String },

    #[error("peer {peer} answered with status {status}")]
    Status { peer: String, status: u16 },

    #[error("peer {peer} sent a malformed chain: {reason}")]
    Malformed { peer: String, reason: String },

    #[error("peer {peer} reported length {reported} but sent {actual} blocks")]
    LengthMismatch {
        peer: String,
        reported: usize,
        actual: usize,
    },
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
