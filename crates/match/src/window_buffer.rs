//! Fixed-capacity working buffer for the block matcher.
//!
//! The buffer fills from the front. Once it is full without a match, the
//! matcher flushes the leading bytes as literal data and calls
//! [`WindowBuffer::compact`] to move the trailing bytes that may still start
//! a match to the front. The current window is always the last
//! `block_length` bytes before the cursor, so every slice handed out is
//! contiguous.
//!
//! # Example
//!
//! ```
//! use matching::WindowBuffer;
//!
//! let mut buf = WindowBuffer::with_capacity(6);
//! for byte in *b"abcdef" {
//!     buf.push(byte);
//! }
//! assert!(buf.is_full());
//! assert_eq!(buf.window(4), b"cdef");
//!
//! buf.compact(3);
//! assert_eq!(buf.as_slice(), b"def");
//! ```

/// Contiguous byte buffer with a write cursor.
#[derive(Clone, Debug)]
pub struct WindowBuffer {
    /// Backing storage, always exactly `capacity` bytes.
    buffer: Box<[u8]>,
    /// Number of valid bytes, also the next write position.
    len: usize,
}

impl WindowBuffer {
    /// Creates an empty buffer holding up to `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "window buffer capacity must be non-zero");
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Returns the maximum number of bytes the buffer holds.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the number of buffered bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bytes are buffered.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the buffer is at capacity.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }

    /// Appends a byte at the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is full.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        assert!(!self.is_full(), "push into a full window buffer");
        self.buffer[self.len] = byte;
        self.len += 1;
    }

    /// Returns every buffered byte.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Returns the last `size` buffered bytes.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `size` bytes are buffered.
    #[inline]
    #[must_use]
    pub fn window(&self, size: usize) -> &[u8] {
        &self.buffer[self.len - size..self.len]
    }

    /// Returns the first `count` buffered bytes.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `count` bytes are buffered.
    #[inline]
    #[must_use]
    pub fn prefix(&self, count: usize) -> &[u8] {
        &self.as_slice()[..count]
    }

    /// Keeps only the last `keep` buffered bytes, moved to the front.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `keep` bytes are buffered.
    pub fn compact(&mut self, keep: usize) {
        assert!(keep <= self.len, "cannot keep more bytes than are buffered");
        self.buffer.copy_within(self.len - keep..self.len, 0);
        self.len = keep;
    }

    /// Discards every buffered byte.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }
}
