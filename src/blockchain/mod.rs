pub mod block;
pub mod consensus;
pub mod ledger;
pub mod pow;
pub mod validator;

pub use block::{Block, hash};
pub use consensus::{ConsensusResolver, HttpPeerClient, PeerChain, PeerClient};
pub use ledger::Ledger;
pub use pow::{find_proof, find_proof_bounded, is_valid_proof};
pub use validator::is_valid_chain;

/// Proof recorded in the genesis block.
pub const GENESIS_PROOF: i64 = 100;

/// Sentinel previous hash of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Required hex prefix of a valid proof hash (four zeros).
pub const POW_PREFIX: &str = "0000";

/// Sender used for mining rewards.
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the miner per block.
pub const MINING_REWARD: i64 = 1;
