use std::io;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the chain holding the transactions that were pending
/// when it was mined.
///
/// Field order and names are the canonical JSON encoding shared with peers,
/// which is also the hash preimage. Do not reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // nanoseconds since the Unix epoch (UTC)
    pub transactions: Vec<Transaction>,
    pub proof: i64,
    #[serde(rename = "previousHash")]
    pub previous_hash: String,
}

impl Block {
    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: i64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: now_nanos(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// The first block of every chain: fixed proof and sentinel previous hash.
    pub fn genesis() -> Self {
        Self::new(1, Vec::new(), GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string())
    }

    pub fn hash(&self) -> String {
        hash(self)
    }
}

/// SHA-256 over the canonical JSON encoding of `block`, as lowercase hex.
pub fn hash(block: &Block) -> String {
    sha256_hex(&canonical_json(block))
}

/// Compact JSON with `<`, `>`, `&`, U+2028 and U+2029 escaped as `\uXXXX`,
/// byte-identical to Go's `json.Marshal` output for the same block.
pub(crate) fn canonical_json(block: &Block) -> Vec<u8> {
    let mut preimage = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut preimage, HtmlSafeFormatter);
    block
        .serialize(&mut ser)
        .expect("block serializes to JSON");
    preimage
}

/// Compact formatter that additionally escapes HTML-sensitive characters.
struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let bytes = fragment.as_bytes();
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escaped: &[u8] = match c {
                '<' => b"\\u003c",
                '>' => b"\\u003e",
                '&' => b"\\u0026",
                '\u{2028}' => b"\\u2028",
                '\u{2029}' => b"\\u2029",
                _ => continue,
            };
            writer.write_all(&bytes[start..i])?;
            writer.write_all(escaped)?;
            start = i + c.len_utf8();
        }
        writer.write_all(&bytes[start..])
    }
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn now_nanos() -> i64 {
    // Out of range only after the year 2262.
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}
