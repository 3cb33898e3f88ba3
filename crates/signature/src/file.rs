//! Block signature of a whole old version.

use crate::block::SignatureBlock;
use crate::layout::SignatureLayout;

/// Every block checksum of an old version, in file order.
///
/// Built by [`crate::generate_file_signature`] and consumed when the matcher's
/// checksum table is populated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSignature {
    layout: SignatureLayout,
    blocks: Vec<SignatureBlock>,
    total_bytes: u64,
}

impl FileSignature {
    pub(crate) const fn new(
        layout: SignatureLayout,
        blocks: Vec<SignatureBlock>,
        total_bytes: u64,
    ) -> Self {
        Self {
            layout,
            blocks,
            total_bytes,
        }
    }

    /// Assembles a signature from blocks computed elsewhere, for example
    /// records loaded from a cache.
    #[must_use]
    pub const fn from_raw_parts(
        layout: SignatureLayout,
        blocks: Vec<SignatureBlock>,
        total_bytes: u64,
    ) -> Self {
        Self::new(layout, blocks, total_bytes)
    }

    /// Layout the blocks were cut with.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> SignatureLayout {
        self.layout
    }

    /// Blocks in the order they appear in the old version.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[SignatureBlock] {
        &self.blocks
    }

    /// Consumes the signature, keeping only its blocks.
    #[must_use]
    pub fn into_blocks(self) -> Vec<SignatureBlock> {
        self.blocks
    }

    /// Length of the old version in bytes.
    #[inline]
    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Yields `(weak, strong, offset)` for every block.
    pub fn records(&self) -> impl ExactSizeIterator<Item = (u32, &[u8], u64)> + '_ {
        self.blocks
            .iter()
            .map(|block| (block.weak(), block.strong(), block.offset()))
    }

    /// Length of the trailing short block, or zero when the old version is an
    /// exact multiple of the block length.
    #[must_use]
    pub fn short_tail(&self) -> u32 {
        self.blocks
            .last()
            .filter(|block| block.len() < self.layout.block_length().get())
            .map_or(0, SignatureBlock::len)
    }

    /// Checks that the blocks tile `0..total_bytes` without gaps or overlaps.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        let mut expected = 0u64;
        for block in &self.blocks {
            if block.offset() != expected {
                return false;
            }
            expected += u64::from(block.len());
        }
        expected == self.total_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::{NonZeroU8, NonZeroU32};

    fn layout(block: u32) -> SignatureLayout {
        SignatureLayout::new(NonZeroU32::new(block).unwrap(), NonZeroU8::new(2).unwrap())
    }

    fn block(index: u64, offset: u64, len: u32, weak: u32) -> SignatureBlock {
        SignatureBlock::from_raw_parts(index, offset, len, weak, vec![index as u8; 2])
    }

    #[test]
    fn records_follow_block_order() {
        let sig = FileSignature::from_raw_parts(
            layout(4),
            vec![block(0, 0, 4, 10), block(1, 4, 4, 20), block(2, 8, 1, 30)],
            9,
        );
        let records: Vec<_> = sig.records().collect();
        assert_eq!(
            records,
            vec![
                (10, [0u8, 0].as_slice(), 0),
                (20, [1u8, 1].as_slice(), 4),
                (30, [2u8, 2].as_slice(), 8),
            ]
        );
        assert_eq!(sig.short_tail(), 1);
        assert!(sig.is_contiguous());
    }

    #[test]
    fn exact_multiple_has_no_short_tail() {
        let sig = FileSignature::from_raw_parts(
            layout(4),
            vec![block(0, 0, 4, 1), block(1, 4, 4, 2)],
            8,
        );
        assert_eq!(sig.short_tail(), 0);
        assert_eq!(sig.into_blocks().len(), 2);
    }

    #[test]
    fn gaps_and_length_mismatches_are_not_contiguous() {
        let gap = FileSignature::from_raw_parts(
            layout(4),
            vec![block(0, 0, 4, 1), block(1, 5, 4, 2)],
            9,
        );
        assert!(!gap.is_contiguous());

        let short = FileSignature::from_raw_parts(layout(4), vec![block(0, 0, 4, 1)], 6);
        assert!(!short.is_contiguous());
    }

    #[test]
    fn empty_signature() {
        let sig = FileSignature::from_raw_parts(layout(700), Vec::new(), 0);
        assert!(sig.records().next().is_none());
        assert_eq!(sig.short_tail(), 0);
        assert!(sig.is_contiguous());
    }
}
