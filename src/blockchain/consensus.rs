//! Longest-valid-chain reconciliation against known peers.

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::Block;
use super::validator::is_valid_chain;
use crate::error::PeerError;

/// Body of `GET /chain`, served by this node and read from peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Source of peer chains. The resolver only ever asks for a whole chain.
pub trait PeerClient: Send + Sync {
    fn fetch_chain(&self, peer: &str) -> Result<PeerChain, PeerError>;
}

/// Blocking HTTP client querying `http://{peer}/chain`.
///
/// The underlying `reqwest` blocking client owns a runtime of its own, so it
/// is built per request and must only be used off the async executor.
pub struct HttpPeerClient {
    timeout: Duration,
}

impl HttpPeerClient {
    /// A timed-out request counts as a failed one.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl PeerClient for HttpPeerClient {
    fn fetch_chain(&self, peer: &str) -> Result<PeerChain, PeerError> {
        let url = format!("http://{peer}/chain");
        let to_unreachable = |e: reqwest::Error| PeerError::Unreachable {
            peer: peer.to_string(),
            reason: e.to_string(),
        };

        let http_client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .build()
            .map_err(to_unreachable)?;

        let response = http_client.get(&url).send().map_err(to_unreachable)?;

        if !response.status().is_success() {
            return Err(PeerError::Status {
                peer: peer.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body: PeerChain = response.json().map_err(|e| PeerError::Malformed {
            peer: peer.to_string(),
            reason: e.to_string(),
        })?;

        if body.length != body.chain.len() {
            return Err(PeerError::LengthMismatch {
                peer: peer.to_string(),
                reported: body.length,
                actual: body.chain.len(),
            });
        }

        Ok(body)
    }
}

/// Scans peers for the longest chain that passes validation.
pub struct ConsensusResolver<'a> {
    client: &'a dyn PeerClient,
}

impl<'a> ConsensusResolver<'a> {
    pub fn new(client: &'a dyn PeerClient) -> Self {
        Self { client }
    }

    /// Best candidate strictly longer than `local_len`, if any.
    ///
    /// Unusable peers are skipped. Among equally long candidates the first
    /// one seen wins; peer iteration order is unspecified.
    pub fn longest_valid_chain(
        &self,
        local_len: usize,
        peers: &HashSet<String>,
    ) -> Option<Vec<Block>> {
        let mut max_length = local_len;
        let mut best: Option<Vec<Block>> = None;

        for peer in peers {
            let candidate = match self.client.fetch_chain(peer) {
                Ok(c) => c,
                Err(e) => {
                    warn!("CONSENSUS - skipping peer: {e}");
                    continue;
                }
            };

            if candidate.length <= max_length {
                debug!(
                    "CONSENSUS - peer {peer} length {} does not beat {max_length}",
                    candidate.length
                );
                continue;
            }

            if !is_valid_chain(&candidate.chain) {
                warn!("CONSENSUS - peer {peer} sent an invalid chain, ignoring");
                continue;
            }

            info!(
                "CONSENSUS - peer {peer} offers a valid chain of length {}",
                candidate.length
            );
            max_length = candidate.length;
            best = Some(candidate.chain);
        }

        best
    }
}
