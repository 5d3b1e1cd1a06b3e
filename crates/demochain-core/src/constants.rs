/// Leading zero hex characters required of a sealed block hash.
pub const POW_DIFFICULTY: u32 = 2;

/// Payload label of the genesis block.
pub const GENESIS_DATA: &str = "Genesis Block";

/// Predecessor sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
