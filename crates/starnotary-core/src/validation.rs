//! Block and chain validation: digest recomputation and link checks.

use crate::block::{Block, BlockIssue};

/// Validate a single block's internal consistency.
///
/// This performs:
/// - Sealed check (a hash must be stored)
/// - Body decode (a body that no longer decodes has been tampered with)
/// - Digest recomputation over every field except the stored hash
pub fn validate_block(block: &Block) -> Result<(), BlockIssue> {
    // 1. Must be sealed
    let stored = block.hash.ok_or(BlockIssue::Unsealed)?;

    // 2. Body must decode
    block
        .decode_payload()
        .map_err(|e| BlockIssue::Undecodable(e.to_string()))?;

    // 3. Digest must reproduce
    let computed = block
        .compute_hash()
        .map_err(|e| BlockIssue::Encoding(e.to_string()))?;
    if computed != stored {
        return Err(BlockIssue::HashMismatch { stored, computed });
    }

    Ok(())
}

/// A problem found while walking the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainIssue {
    /// Index of the block the problem is reported against.
    pub index: u64,
    /// What went wrong.
    pub kind: ChainIssueKind,
}

/// The kind of problem found at an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainIssueKind {
    /// The block itself failed validation.
    Block(BlockIssue),
    /// The block's stored height does not match its position.
    HeightMismatch { found: u64 },
    /// Position 0 does not hold the genesis sentinel.
    MissingGenesis,
    /// The successor's back-reference does not match this block's hash.
    ///
    /// Reported against the predecessor, not the successor.
    BrokenLink { next: u64 },
}

/// Walk the chain and collect every problem, in index order.
pub fn chain_issues(blocks: &[Block]) -> Vec<ChainIssue> {
    let mut issues = Vec::new();

    for (i, block) in blocks.iter().enumerate() {
        let index = i as u64;
        let mut report = |kind| issues.push(ChainIssue { index, kind });

        if let Err(issue) = validate_block(block) {
            report(ChainIssueKind::Block(issue));
        }

        if block.height != index {
            report(ChainIssueKind::HeightMismatch {
                found: block.height,
            });
        }

        if i == 0 && !block.is_genesis() {
            report(ChainIssueKind::MissingGenesis);
        }

        if let Some(next) = blocks.get(i + 1) {
            if block.hash.is_none() || next.previous_hash != block.hash {
                report(ChainIssueKind::BrokenLink { next: index + 1 });
            }
        }
    }

    issues
}

/// Walk the chain and return the indices at which problems were found.
///
/// An empty list means the chain is fully valid. Each index appears once.
pub fn validate_chain(blocks: &[Block]) -> Vec<u64> {
    let mut indices: Vec<u64> = chain_issues(blocks).into_iter().map(|i| i.index).collect();
    indices.dedup();
    indices
}
