//! crates/signature/src/block.rs
//!
//! Individual signature block representation.

/// Describes a single block of the old version.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureBlock {
    index: u64,
    offset: u64,
    len: u32,
    weak: u32,
    strong: Vec<u8>,
}

impl SignatureBlock {
    /// Creates a new block descriptor.
    pub(crate) const fn new(index: u64, offset: u64, len: u32, weak: u32, strong: Vec<u8>) -> Self {
        Self {
            index,
            offset,
            len,
            weak,
            strong,
        }
    }

    /// Creates a block descriptor from raw components, e.g. a signature
    /// received from a peer.
    #[must_use]
    pub const fn from_raw_parts(
        index: u64,
        offset: u64,
        len: u32,
        weak: u32,
        strong: Vec<u8>,
    ) -> Self {
        Self::new(index, offset, len, weak, strong)
    }

    /// Returns the zero-based index of the block within the signature.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    /// Returns the byte offset of the block within the old version.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the weak checksum value of the block.
    #[inline]
    #[must_use]
    pub const fn weak(&self) -> u32 {
        self.weak
    }

    /// Returns the truncated strong checksum bytes for the block.
    #[inline]
    #[must_use]
    pub fn strong(&self) -> &[u8] {
        &self.strong
    }

    /// Returns the number of bytes covered by the block.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.len
    }

    /// Reports whether the block corresponds to an empty range.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Splits the block into its weak value, strong bytes and offset.
    #[must_use]
    pub fn into_parts(self) -> (u32, Vec<u8>, u64) {
        (self.weak, self.strong, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_parts() {
        let strong = vec![1, 2, 3, 4];
        let block = SignatureBlock::from_raw_parts(42, 4_200, 100, 0xdead_beef, strong.clone());
        assert_eq!(block.index(), 42);
        assert_eq!(block.offset(), 4_200);
        assert_eq!(block.len(), 100);
        assert_eq!(block.weak(), 0xdead_beef);
        assert_eq!(block.strong(), &strong);
    }

    #[test]
    fn is_empty_for_zero_length() {
        let block = SignatureBlock::from_raw_parts(0, 0, 0, 0, vec![]);
        assert!(block.is_empty());
    }

    #[test]
    fn into_parts_returns_table_record() {
        let block = SignatureBlock::from_raw_parts(3, 48, 16, 7, vec![9, 9]);
        assert_eq!(block.into_parts(), (7, vec![9, 9], 48));
    }
}
