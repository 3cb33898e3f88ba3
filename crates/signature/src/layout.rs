//! crates/signature/src/layout.rs
//!
//! Block sizing for file signatures.

use core::num::{NonZeroU8, NonZeroU32};

/// Block length used when the old version is small.
pub const DEFAULT_BLOCK_LENGTH: u32 = 700;
/// Largest block length chosen by [`SignatureLayout::for_file_length`].
pub const MAX_BLOCK_LENGTH: u32 = 1 << 17;

const DEFAULT_BLOCK: NonZeroU32 = NonZeroU32::new(DEFAULT_BLOCK_LENGTH).unwrap();

/// Describes the block length and strong checksum width of a signature.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureLayout {
    block_length: NonZeroU32,
    strong_sum_length: NonZeroU8,
}

impl SignatureLayout {
    /// Creates a layout from explicit parameters.
    #[must_use]
    pub const fn new(block_length: NonZeroU32, strong_sum_length: NonZeroU8) -> Self {
        Self {
            block_length,
            strong_sum_length,
        }
    }

    /// Picks a block length of roughly the square root of `file_length`.
    ///
    /// Files up to `700 * 700` bytes use [`DEFAULT_BLOCK_LENGTH`]. Larger files
    /// get the largest multiple of 8 whose square does not exceed the length,
    /// capped at [`MAX_BLOCK_LENGTH`].
    #[doc(alias = "sum_sizes_sqroot")]
    #[must_use]
    pub fn for_file_length(file_length: u64, strong_sum_length: NonZeroU8) -> Self {
        let block_length = NonZeroU32::new(derive_block_length(file_length)).unwrap_or(DEFAULT_BLOCK);
        Self::new(block_length, strong_sum_length)
    }

    /// Returns the block length in bytes.
    #[inline]
    #[must_use]
    pub const fn block_length(self) -> NonZeroU32 {
        self.block_length
    }

    /// Returns the strong checksum length in bytes.
    #[inline]
    #[must_use]
    pub const fn strong_sum_length(self) -> NonZeroU8 {
        self.strong_sum_length
    }

    /// Returns the number of blocks a file of `file_length` bytes splits into.
    #[must_use]
    pub const fn block_count(self, file_length: u64) -> u64 {
        file_length.div_ceil(self.block_length.get() as u64)
    }

    /// Returns the length of the short trailing block, or 0 if every block is full.
    #[must_use]
    pub const fn remainder(self, file_length: u64) -> u32 {
        (file_length % self.block_length.get() as u64) as u32
    }
}

fn derive_block_length(file_length: u64) -> u32 {
    if file_length <= u64::from(DEFAULT_BLOCK_LENGTH) * u64::from(DEFAULT_BLOCK_LENGTH) {
        return DEFAULT_BLOCK_LENGTH;
    }

    let mut c: u64 = 1;
    let mut l = file_length;
    while l >> 2 != 0 {
        c <<= 1;
        l >>= 2;
    }

    if c >= u64::from(MAX_BLOCK_LENGTH) {
        return MAX_BLOCK_LENGTH;
    }

    let mut block_length = 0u64;
    let mut current = c;
    while current >= 8 {
        block_length |= current;
        let candidate = u128::from(block_length);
        if u128::from(file_length) < candidate * candidate {
            block_length &= !current;
        }
        current >>= 1;
    }

    block_length.clamp(u64::from(DEFAULT_BLOCK_LENGTH), u64::from(MAX_BLOCK_LENGTH)) as u32
}
