use super::checksum::RollingChecksum;
use super::error::RollingError;

/// Weak checksum capability consumed by the block matcher.
///
/// Implementations keep the state of a single window. [`check`](Self::check)
/// discards that state and recomputes it over a fresh window, while
/// [`roll`](Self::roll) slides the window forward by one byte in O(1). The
/// caller owns the window bytes and passes the evicted byte explicitly.
pub trait WeakChecksum {
    /// Resets the state and computes the checksum over `window`.
    fn check(&mut self, window: &[u8]);

    /// Slides the window by evicting `outgoing` and admitting `incoming`.
    fn roll(&mut self, outgoing: u8, incoming: u8);

    /// Returns the 32-bit value of the current window.
    fn value(&self) -> u32;
}

impl WeakChecksum for RollingChecksum {
    #[inline]
    fn check(&mut self, window: &[u8]) {
        self.update_from_block(window);
    }

    #[inline]
    fn roll(&mut self, outgoing: u8, incoming: u8) {
        // `EmptyWindow` is the only failure; an empty window starts a new one.
        if let Err(RollingError::EmptyWindow) = Self::roll(self, outgoing, incoming) {
            self.update(&[incoming]);
        }
    }

    #[inline]
    fn value(&self) -> u32 {
        Self::value(self)
    }
}
