pub mod constants;
pub mod error;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Hex-encoded SHA-256 digest.
pub type Hash = String;

/// A single block in the demo ledger.
///
/// A block is sealed by [`Block::mine`]: afterwards `hash` is the canonical
/// digest of the other five fields and carries the required leading-zero
/// prefix. Blocks are plain data; tampering with a sealed block is the job
/// of [`chain::Chain::verify`] to detect, not of this type to prevent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    /// Sequential position in the chain (genesis = 0).
    pub index: u64,

    /// Unix timestamp (seconds) captured once at construction.
    pub timestamp: u64,

    /// Opaque caller-supplied payload; never parsed or validated here.
    pub data: String,

    /// Hex digest of the preceding block, or `"0"` for the genesis block.
    pub previous_hash: Hash,

    /// Proof-of-work counter, advanced only by mining.
    pub nonce: u64,

    /// Cached canonical digest of the fields above.
    pub hash: Hash,
}

impl Block {
    /// Create a block with the current wall-clock timestamp, a zero nonce
    /// and a freshly computed hash. The block is not sealed until mined.
    pub fn new(index: u64, data: &str, previous_hash: &str) -> Self {
        let mut block = Self {
            index,
            timestamp: unix_timestamp(),
            data: data.to_string(),
            previous_hash: previous_hash.to_string(),
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Recompute the canonical digest from the block's current field values.
    ///
    /// Pure; re-invoke at any time to check the stored `hash` for drift.
    pub fn compute_hash(&self) -> Hash {
        block_hash(
            self.index,
            self.timestamp,
            &self.data,
            &self.previous_hash,
            self.nonce,
        )
    }

    /// Seal the block: search for a nonce whose digest carries `difficulty`
    /// leading zero hex characters, store the winning nonce and hash, and
    /// return the hash. Re-mining an already sealed block is a no-op.
    pub fn mine(&mut self, difficulty: u32) -> &str {
        let (nonce, hash) = pow::search_nonce(self, difficulty);
        self.nonce = nonce;
        self.hash = hash;
        &self.hash
    }
}

/// Serialization order of the hashed fields. Keys are declared in
/// lexicographic order; the order is part of the hash format and must not
/// change.
#[derive(Serialize)]
struct HashPayload<'a> {
    data: &'a str,
    index: u64,
    nonce: u64,
    previous_hash: &'a str,
    timestamp: u64,
}

/// Canonical digest of a block's hashed fields: the fields are serialized
/// as compact JSON with keys in lexicographic order, and the bytes are fed
/// through SHA-256. Identical field values always produce identical bytes,
/// regardless of how the block was put together.
pub fn block_hash(
    index: u64,
    timestamp: u64,
    data: &str,
    previous_hash: &str,
    nonce: u64,
) -> Hash {
    let payload = HashPayload {
        data,
        index,
        nonce,
        previous_hash,
        timestamp,
    };
    let bytes = serde_json::to_vec(&payload).expect("serialize hash payload");
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs()
}

pub mod pow {
    use super::{block_hash, Block, Hash};

    /// Pure proof-of-work search over the nonce space.
    ///
    /// Recomputes the digest at the block's current nonce and, while it
    /// misses the target, increments (wrapping) and recomputes. Returns the
    /// winning nonce together with its hash; the block itself is untouched.
    /// Because the current nonce is checked before any increment, searching
    /// a block that is already sealed returns immediately.
    ///
    /// The search is a blocking, unbounded linear scan with no parallelism
    /// and no cancellation; termination is not guaranteed for arbitrarily
    /// large `difficulty`. Callers that need a responsive thread of control
    /// should run it on a task of their own.
    pub fn search_nonce(block: &Block, difficulty: u32) -> (u64, Hash) {
        let mut nonce = block.nonce;
        loop {
            let hash = block_hash(
                block.index,
                block.timestamp,
                &block.data,
                &block.previous_hash,
                nonce,
            );
            if meets_target(&hash, difficulty) {
                return (nonce, hash);
            }
            nonce = nonce.wrapping_add(1);
        }
    }

    /// True when the first `difficulty` hex characters of `hash` are `'0'`.
    pub fn meets_target(hash: &str, difficulty: u32) -> bool {
        hash.chars().take(difficulty as usize).all(|c| c == '0')
    }
}

pub mod chain {
    use super::Block;
    use crate::constants::{GENESIS_DATA, GENESIS_PREVIOUS_HASH, POW_DIFFICULTY};
    use crate::error::ChainError;
    use tracing::{debug, info};

    /// The append-only chain of [`Block`]s.
    ///
    /// Invariants maintained by this type:
    /// - Always contains at least the genesis block.
    /// - Blocks are only ever appended, never mutated or removed.
    /// - Every appended block is mined at the chain's difficulty before it
    ///   is stored.
    #[derive(Clone, Debug)]
    pub struct Chain {
        blocks: Vec<Block>,
        difficulty: u32,
    }

    impl Default for Chain {
        fn default() -> Self {
            Self::new(POW_DIFFICULTY)
        }
    }

    impl Chain {
        /// Create a chain holding a freshly mined genesis block.
        ///
        /// `difficulty` is the number of leading zero hex characters
        /// required of every sealed hash, fixed for the chain's lifetime.
        pub fn new(difficulty: u32) -> Self {
            let mut genesis = Block::new(0, GENESIS_DATA, GENESIS_PREVIOUS_HASH);
            genesis.mine(difficulty);
            debug!(
                "created genesis block with nonce {} and hash {}",
                genesis.nonce, genesis.hash
            );
            Self {
                blocks: vec![genesis],
                difficulty,
            }
        }

        /// Mine a block containing `data` and append it to the chain.
        ///
        /// The payload is stored verbatim, but an empty or whitespace-only
        /// payload is rejected and the chain is left unchanged. Returns a
        /// read-only handle to the newly appended block.
        pub fn add_block(&mut self, data: &str) -> Result<&Block, ChainError> {
            if data.trim().is_empty() {
                return Err(ChainError::EmptyData);
            }
            let index = self.blocks.len() as u64;
            let previous_hash = self.tip().hash.clone();
            let mut block = Block::new(index, data, &previous_hash);
            block.mine(self.difficulty);
            info!(
                "mined block {} with nonce {} and hash {}",
                block.index, block.nonce, block.hash
            );
            self.blocks.push(block);
            Ok(self.blocks.last().expect("block was just appended"))
        }

        /// Walk the chain and check every block against its predecessor.
        ///
        /// For each block from index 1 upward, two checks run in order: the
        /// stored hash must equal the digest recomputed from the block's
        /// current fields, and `previous_hash` must equal the predecessor's
        /// stored hash. The walk stops at the first failure and never
        /// repairs anything.
        ///
        /// The genesis block has no predecessor and its own hash and
        /// proof-of-work prefix are not re-checked here; a tampered genesis
        /// payload goes undetected as long as block 1 still links to the
        /// stored genesis hash.
        pub fn verify(&self) -> Result<(), ChainError> {
            for i in 1..self.blocks.len() {
                let current = &self.blocks[i];
                let previous = &self.blocks[i - 1];

                if current.hash != current.compute_hash() {
                    return Err(ChainError::HashMismatch(current.index));
                }
                if current.previous_hash != previous.hash {
                    return Err(ChainError::BrokenLink(current.index));
                }
            }
            Ok(())
        }

        /// Read-only ordered view of every block, oldest first.
        pub fn blocks(&self) -> &[Block] {
            &self.blocks
        }

        /// The most recent block.
        pub fn tip(&self) -> &Block {
            self.blocks.last().expect("chain holds at least genesis")
        }

        /// Number of blocks in the chain (including genesis).
        pub fn len(&self) -> usize {
            self.blocks.len()
        }

        pub fn is_empty(&self) -> bool {
            self.blocks.is_empty()
        }

        /// Leading zero hex characters required of every sealed hash.
        pub fn difficulty(&self) -> u32 {
            self.difficulty
        }
    }

}
