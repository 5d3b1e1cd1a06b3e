use demochain_core::chain::Chain;
use demochain_core::constants::{
    GENESIS_DATA, GENESIS_PREVIOUS_HASH, HASH_HEX_SIZE, POW_DIFFICULTY,
};
use demochain_core::error::ChainError;
use demochain_core::pow;

#[test]
fn test_chain_growth_and_verification() -> anyhow::Result<()> {
    let mut chain = Chain::new(2);
    // Append a few blocks through the public API
    chain.add_block("alpha")?;
    chain.add_block("beta")?;
    chain.add_block("gamma")?;
    assert_eq!(chain.len(), 4);
    chain.verify()?;
    // Every stored block is sealed at the chain's difficulty and the links
    // and indexes line up oldest to newest
    let blocks = chain.blocks();
    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(block.index, i as u64);
        assert!(pow::meets_target(&block.hash, chain.difficulty()));
        if i > 0 {
            assert_eq!(block.previous_hash, blocks[i - 1].hash);
        }
    }
    assert_eq!(chain.tip().data, "gamma");
    Ok(())
}

#[test]
fn test_rejects_blank_payloads_without_growth() {
    let mut chain = Chain::new(2);
    for payload in ["", "   ", "\t\n"] {
        let err = chain.add_block(payload).unwrap_err();
        assert_eq!(err, ChainError::EmptyData);
        assert_eq!(err.to_string(), "no data supplied for new block");
    }
    // None of the rejected payloads made it into the chain
    assert_eq!(chain.len(), 1);
    assert!(chain.verify().is_ok());
}

#[test]
fn test_genesis_shape() {
    let chain = Chain::default();
    let genesis = &chain.blocks()[0];
    assert_eq!(genesis.index, 0);
    assert_eq!(genesis.data, GENESIS_DATA);
    assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
    assert_eq!(genesis.hash.len(), HASH_HEX_SIZE);
    assert!(pow::meets_target(&genesis.hash, POW_DIFFICULTY));
}

#[test]
fn test_payload_stored_verbatim() -> anyhow::Result<()> {
    let mut chain = Chain::new(1);
    // Surrounding whitespace only disqualifies blank payloads; anything
    // with visible content is kept exactly as submitted
    let block = chain.add_block("  spaced out  ")?;
    assert_eq!(block.data, "  spaced out  ");
    chain.verify()?;
    Ok(())
}

#[test]
fn test_error_messages_name_the_offending_block() {
    assert_eq!(
        ChainError::HashMismatch(3).to_string(),
        "hash mismatch at block 3: stored hash does not match recomputed fields"
    );
    assert_eq!(
        ChainError::BrokenLink(7).to_string(),
        "broken link at block 7: previous_hash does not match predecessor"
    );
}
