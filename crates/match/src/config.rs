//! Matcher session configuration.

use std::num::{NonZeroU8, NonZeroU32, NonZeroUsize};

use signature::SignatureLayout;

use crate::error::ConfigError;

/// Working buffer capacity used when the builder is not given one.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;
/// Strong checksum length used when the builder is not given one.
pub const DEFAULT_STRONG_SUM_LENGTH: u8 = 16;

/// Immutable parameters of a matching session.
///
/// Built through [`MatchConfig::builder`], which validates every field.
///
/// ```
/// use matching::MatchConfig;
///
/// let config = MatchConfig::builder(16).chunk_size(64).build().unwrap();
/// assert_eq!(config.block_length().get(), 16);
/// assert_eq!(config.chunk_size().get(), 64);
/// assert_eq!(config.strong_sum_length().get(), 16);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchConfig {
    block_length: NonZeroU32,
    chunk_size: NonZeroUsize,
    strong_sum_length: NonZeroU8,
    checksum_seed: Option<Vec<u8>>,
}

impl MatchConfig {
    /// Starts a builder for sessions with the given block length.
    #[must_use]
    pub fn builder(block_length: u32) -> MatchConfigBuilder {
        MatchConfigBuilder::new(block_length)
    }

    /// Starts a builder whose block and strong lengths follow `layout`.
    #[must_use]
    pub fn builder_for_layout(layout: SignatureLayout) -> MatchConfigBuilder {
        MatchConfigBuilder::new(layout.block_length().get())
            .strong_sum_length(layout.strong_sum_length().get())
    }

    /// Bytes per reference block.
    #[inline]
    #[must_use]
    pub const fn block_length(&self) -> NonZeroU32 {
        self.block_length
    }

    /// Capacity of the working buffer, never smaller than the block length.
    #[inline]
    #[must_use]
    pub const fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    /// Number of leading strong digest bytes compared during a probe.
    #[inline]
    #[must_use]
    pub const fn strong_sum_length(&self) -> NonZeroU8 {
        self.strong_sum_length
    }

    /// Salt appended to every strong digest input.
    #[inline]
    #[must_use]
    pub fn checksum_seed(&self) -> Option<&[u8]> {
        self.checksum_seed.as_deref()
    }
}

/// Builder for [`MatchConfig`].
#[derive(Clone, Debug)]
pub struct MatchConfigBuilder {
    block_length: u32,
    chunk_size: Option<usize>,
    strong_sum_length: u8,
    checksum_seed: Option<Vec<u8>>,
}

impl MatchConfigBuilder {
    fn new(block_length: u32) -> Self {
        Self {
            block_length,
            chunk_size: None,
            strong_sum_length: DEFAULT_STRONG_SUM_LENGTH,
            checksum_seed: None,
        }
    }

    /// Sets the working buffer capacity.
    ///
    /// Left unset, the capacity is [`DEFAULT_CHUNK_SIZE`] or the block length,
    /// whichever is larger.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Sets how many strong digest bytes are stored and compared.
    pub fn strong_sum_length(mut self, len: u8) -> Self {
        self.strong_sum_length = len;
        self
    }

    /// Sets the checksum seed. An empty seed is treated as no seed.
    pub fn checksum_seed(mut self, seed: impl Into<Vec<u8>>) -> Self {
        let seed = seed.into();
        self.checksum_seed = (!seed.is_empty()).then_some(seed);
        self
    }

    /// Validates the parameters and produces the configuration.
    pub fn build(self) -> Result<MatchConfig, ConfigError> {
        let block_length = NonZeroU32::new(self.block_length).ok_or(ConfigError::ZeroBlockLength)?;
        let block = block_length.get() as usize;

        let chunk_size = match self.chunk_size {
            Some(chunk) if chunk < block => {
                return Err(ConfigError::ChunkSmallerThanBlock {
                    chunk_size: chunk,
                    block_length: block_length.get(),
                });
            }
            Some(chunk) => chunk,
            None => DEFAULT_CHUNK_SIZE.max(block),
        };
        let chunk_size = NonZeroUsize::new(chunk_size).ok_or(ConfigError::ZeroBlockLength)?;

        let strong_sum_length =
            NonZeroU8::new(self.strong_sum_length).ok_or(ConfigError::ZeroStrongLength)?;

        Ok(MatchConfig {
            block_length,
            chunk_size,
            strong_sum_length,
            checksum_seed: self.checksum_seed,
        })
    }
}
