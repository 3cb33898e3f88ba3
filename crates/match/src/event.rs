//! Delta events emitted by the block matcher.

use std::borrow::Cow;

/// Literal span of the new stream that matched no reference block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataBlock<'a> {
    /// Position of the first byte in the new stream.
    pub offset: u64,
    /// The literal bytes.
    pub data: Cow<'a, [u8]>,
}

/// Copy instruction: `length` bytes at `new_offset` in the new stream equal
/// the bytes at `old_offset` in the old version.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Offsets {
    /// Position in the old version.
    pub old_offset: u64,
    /// Position in the new stream.
    pub new_offset: u64,
    /// Number of bytes covered.
    pub length: u32,
}

/// Event delivered to listeners.
///
/// Literal data borrows the matcher's working buffer for the duration of the
/// delivery. Listeners that keep events call [`into_owned`](Self::into_owned).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeltaEvent<'a> {
    /// Unmatched bytes sent verbatim.
    DataBlock(DataBlock<'a>),
    /// Bytes reproduced from the old version.
    Offsets(Offsets),
}

impl DeltaEvent<'_> {
    /// Detaches the event from the buffer it borrows from.
    #[must_use]
    pub fn into_owned(self) -> DeltaEvent<'static> {
        match self {
            Self::DataBlock(DataBlock { offset, data }) => DeltaEvent::DataBlock(DataBlock {
                offset,
                data: Cow::Owned(data.into_owned()),
            }),
            Self::Offsets(offsets) => DeltaEvent::Offsets(offsets),
        }
    }

    /// Position of the event in the new stream.
    #[must_use]
    pub const fn new_offset(&self) -> u64 {
        match self {
            Self::DataBlock(block) => block.offset,
            Self::Offsets(offsets) => offsets.new_offset,
        }
    }

    /// Number of new-stream bytes the event covers.
    #[must_use]
    pub fn len(&self) -> u64 {
        match self {
            Self::DataBlock(block) => block.data.len() as u64,
            Self::Offsets(offsets) => u64::from(offsets.length),
        }
    }

    /// Reports whether the event covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reports whether the event carries literal data.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::DataBlock(_))
    }

    /// End of the covered span in the new stream.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.new_offset() + self.len()
    }
}

impl From<Offsets> for DeltaEvent<'_> {
    fn from(offsets: Offsets) -> Self {
        Self::Offsets(offsets)
    }
}

impl<'a> From<DataBlock<'a>> for DeltaEvent<'a> {
    fn from(block: DataBlock<'a>) -> Self {
        Self::DataBlock(block)
    }
}
