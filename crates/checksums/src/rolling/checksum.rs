use super::error::RollingError;

/// Weak rolling checksum over a byte window (rsync's `rsum`).
///
/// Two 16-bit accumulators are kept: `s1` is the sum of the window bytes and
/// `s2` the sum of its prefix sums. Both wrap, so the packed value is
/// `s2 << 16 | s1` with no modulus beyond 2^16.
#[doc(alias = "rsum")]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RollingChecksum {
    s1: u16,
    s2: u16,
    len: usize,
}

impl RollingChecksum {
    /// Creates a checksum over an empty window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            s1: 0,
            s2: 0,
            len: 0,
        }
    }

    /// Forgets the current window.
    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of bytes in the current window.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` before any byte has been added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Extends the window with `bytes`.
    #[inline]
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.s1 = self.s1.wrapping_add(u16::from(byte));
            self.s2 = self.s2.wrapping_add(self.s1);
        }
        self.len = self.len.saturating_add(bytes.len());
    }

    /// Replaces the window with `block`.
    pub fn update_from_block(&mut self, block: &[u8]) {
        self.reset();
        self.update(block);
    }

    /// Slides the window one byte: `outgoing` leaves, `incoming` enters.
    ///
    /// Only the low 16 bits of the window length matter to `s2`, so windows of
    /// any length roll in constant time.
    ///
    /// # Errors
    ///
    /// Returns [`RollingError::EmptyWindow`] when there is no window to slide.
    #[inline]
    pub fn roll(&mut self, outgoing: u8, incoming: u8) -> Result<(), RollingError> {
        if self.len == 0 {
            return Err(RollingError::EmptyWindow);
        }

        let outgoing = u16::from(outgoing);
        let weight = self.len as u16;
        self.s1 = self.s1.wrapping_sub(outgoing).wrapping_add(u16::from(incoming));
        self.s2 = self
            .s2
            .wrapping_sub(weight.wrapping_mul(outgoing))
            .wrapping_add(self.s1);
        Ok(())
    }

    /// Packed 32-bit value, `s2` in the high half and `s1` in the low half.
    #[must_use]
    pub const fn value(&self) -> u32 {
        ((self.s2 as u32) << 16) | self.s1 as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    /// Straightforward wide-integer evaluation of the checksum.
    fn reference_value(data: &[u8]) -> u32 {
        let (mut s1, mut s2) = (0u64, 0u64);
        for &byte in data {
            s1 += u64::from(byte);
            s2 += s1;
        }
        (((s2 & 0xffff) as u32) << 16) | (s1 & 0xffff) as u32
    }

    fn fresh(data: &[u8]) -> RollingChecksum {
        let mut checksum = RollingChecksum::new();
        checksum.update(data);
        checksum
    }

    #[test]
    fn known_input_matches_reference() {
        let data = b"streaming block matcher";
        let checksum = fresh(data);
        assert_eq!(checksum.value(), reference_value(data));
        assert_eq!(checksum.len(), data.len());
    }

    #[test]
    fn empty_update_leaves_state_untouched() {
        let checksum = fresh(b"");
        assert!(checksum.is_empty());
        assert_eq!(checksum.value(), 0);
    }

    #[test]
    fn update_from_block_discards_previous_window() {
        let mut checksum = fresh(b"stale state");
        checksum.update_from_block(b"01234567");
        assert_eq!(checksum, fresh(b"01234567"));
    }

    #[test]
    fn roll_matches_recomputation() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let window = 12;

        let mut rolling = fresh(&data[..window]);
        for start in 1..=data.len() - window {
            rolling
                .roll(data[start - 1], data[start + window - 1])
                .expect("window is not empty");
            assert_eq!(rolling, fresh(&data[start..start + window]));
        }
    }

    #[test]
    fn roll_errors_for_empty_window() {
        let mut checksum = RollingChecksum::new();
        assert_eq!(checksum.roll(0, 0), Err(RollingError::EmptyWindow));
        assert!(checksum.is_empty());
    }

    #[test]
    fn windows_longer_than_sixteen_bits_roll_correctly() {
        let data: Vec<u8> = (0..70_100u32).map(|i| (i % 251) as u8).collect();
        let window = 70_000;

        let mut rolling = fresh(&data[..window]);
        for start in 1..=data.len() - window {
            rolling
                .roll(data[start - 1], data[start + window - 1])
                .expect("window is not empty");
        }
        let tail = &data[data.len() - window..];
        assert_eq!(rolling.value(), reference_value(tail));
    }

    #[test]
    fn adler_style_collision_is_real() {
        // [1, 0, 1] and [0, 2, 0] share both s1 and s2.
        assert_eq!(fresh(&[1, 0, 1]).value(), fresh(&[0, 2, 0]).value());
    }

    proptest! {
        #[test]
        fn rolled_windows_match_reference(
            data in prop::collection::vec(any::<u8>(), 1..=256),
            window in 1usize..=64,
        ) {
            let window = window.min(data.len());
            let mut rolling = fresh(&data[..window]);
            prop_assert_eq!(rolling.value(), reference_value(&data[..window]));

            for start in 1..=data.len() - window {
                rolling
                    .roll(data[start - 1], data[start + window - 1])
                    .expect("window is not empty");
                prop_assert_eq!(rolling.value(), reference_value(&data[start..start + window]));
            }
        }
    }
}
