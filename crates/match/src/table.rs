//! Checksum pair table: weak value index with strong confirmation.
//!
//! Lookups first consult an [`FxHashMap`] keyed by the 32-bit weak checksum.
//! Only when that key is present is the strong digest of the candidate window
//! computed and compared against the small bucket of strong prefixes stored
//! under it. Most window positions are therefore rejected without hashing.

use std::num::{NonZeroU8, NonZeroU32};

use rustc_hash::FxHashMap;

use checksums::strong::{StrongDigest, truncated_digest};
use signature::FileSignature;

use crate::config::MatchConfig;
use crate::error::ConfigError;

/// Compound key of a reference block: weak checksum plus truncated strong sum.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ChecksumPair {
    weak: u32,
    strong: Vec<u8>,
}

impl ChecksumPair {
    /// Creates a pair from its components.
    #[must_use]
    pub const fn new(weak: u32, strong: Vec<u8>) -> Self {
        Self { weak, strong }
    }

    /// Weak rolling checksum value.
    #[inline]
    #[must_use]
    pub const fn weak(&self) -> u32 {
        self.weak
    }

    /// Truncated strong digest bytes.
    #[inline]
    #[must_use]
    pub fn strong(&self) -> &[u8] {
        &self.strong
    }
}

#[derive(Clone, Debug)]
struct Entry {
    strong: Box<[u8]>,
    offset: u64,
}

/// Read-only index from checksum pairs to old-version offsets.
///
/// Built once per old version and shared between matcher sessions through
/// an [`Arc`](std::sync::Arc). When two blocks share a full checksum pair the
/// later insertion wins; the displaced offset is reported by
/// [`insert`](Self::insert) and counted in [`displaced`](Self::displaced).
#[derive(Clone, Debug)]
pub struct ChecksumTable {
    block_length: NonZeroU32,
    strong_sum_length: NonZeroU8,
    buckets: FxHashMap<u32, Vec<Entry>>,
    len: usize,
    displaced: u64,
}

impl ChecksumTable {
    /// Creates an empty table for blocks of `block_length` bytes whose strong
    /// sums are `strong_sum_length` bytes long.
    #[must_use]
    pub fn new(block_length: NonZeroU32, strong_sum_length: NonZeroU8) -> Self {
        Self {
            block_length,
            strong_sum_length,
            buckets: FxHashMap::default(),
            len: 0,
            displaced: 0,
        }
    }

    /// Creates an empty table matching the lengths of `config`.
    #[must_use]
    pub fn for_config(config: &MatchConfig) -> Self {
        Self::new(config.block_length(), config.strong_sum_length())
    }

    /// Builds a table from `(pair, offset)` records in insertion order.
    pub fn from_records<I>(
        block_length: NonZeroU32,
        strong_sum_length: NonZeroU8,
        records: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (ChecksumPair, u64)>,
    {
        let mut table = Self::new(block_length, strong_sum_length);
        for (pair, offset) in records {
            table.insert(pair, offset)?;
        }
        logging::trace_table!(
            entries = table.len,
            weak_keys = table.buckets.len(),
            displaced = table.displaced,
            "checksum table built"
        );
        Ok(table)
    }

    /// Builds a table from every block of `signature`.
    pub fn from_signature(signature: &FileSignature) -> Result<Self, ConfigError> {
        let layout = signature.layout();
        Self::from_records(
            layout.block_length(),
            layout.strong_sum_length(),
            signature
                .records()
                .map(|(weak, strong, offset)| (ChecksumPair::new(weak, strong.to_vec()), offset)),
        )
    }

    /// Inserts a record, returning the offset it replaced if the pair was
    /// already present.
    pub fn insert(&mut self, pair: ChecksumPair, offset: u64) -> Result<Option<u64>, ConfigError> {
        if pair.strong.len() != usize::from(self.strong_sum_length.get()) {
            return Err(ConfigError::RecordStrongLength {
                expected: self.strong_sum_length.get(),
                found: pair.strong.len(),
            });
        }

        let bucket = self.buckets.entry(pair.weak).or_default();
        if let Some(entry) = bucket.iter_mut().find(|entry| *entry.strong == *pair.strong) {
            let previous = std::mem::replace(&mut entry.offset, offset);
            self.displaced += 1;
            tracing::warn!(
                target: logging::TABLE_TARGET,
                weak = pair.weak,
                previous,
                offset,
                "duplicate checksum pair; later block wins"
            );
            return Ok(Some(previous));
        }

        bucket.push(Entry {
            strong: pair.strong.into_boxed_slice(),
            offset,
        });
        self.len += 1;
        Ok(None)
    }

    /// Looks up `window` whose weak checksum is `weak`.
    ///
    /// The strong digest `S` over `window` followed by `seed` is only computed
    /// when `weak` is a known key. A weak hit without strong confirmation is a
    /// miss.
    #[inline]
    pub fn probe<S: StrongDigest>(&self, weak: u32, window: &[u8], seed: Option<&[u8]>) -> Option<u64> {
        let bucket = self.buckets.get(&weak)?;
        let strong = truncated_digest::<S>(window, seed, usize::from(self.strong_sum_length.get()));
        bucket
            .iter()
            .find(|entry| *entry.strong == *strong)
            .map(|entry| entry.offset)
    }

    /// Returns the offset stored for `pair`.
    #[must_use]
    pub fn get(&self, pair: &ChecksumPair) -> Option<u64> {
        self.buckets
            .get(&pair.weak)?
            .iter()
            .find(|entry| *entry.strong == *pair.strong)
            .map(|entry| entry.offset)
    }

    /// Reports whether any record carries the weak value `weak`.
    #[inline]
    #[must_use]
    pub fn contains_weak(&self, weak: u32) -> bool {
        self.buckets.contains_key(&weak)
    }

    /// Number of distinct checksum pairs.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Reports whether the table holds no records.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of insertions that replaced an existing pair.
    #[inline]
    #[must_use]
    pub const fn displaced(&self) -> u64 {
        self.displaced
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
        self.displaced = 0;
    }

    /// Block length the records were computed with.
    #[inline]
    #[must_use]
    pub const fn block_length(&self) -> NonZeroU32 {
        self.block_length
    }

    /// Length of the stored strong sums.
    #[inline]
    #[must_use]
    pub const fn strong_sum_length(&self) -> NonZeroU8 {
        self.strong_sum_length
    }

    /// Fails unless the table was built with the lengths of `config`.
    pub(crate) fn check_compatible(&self, config: &MatchConfig) -> Result<(), ConfigError> {
        if self.block_length != config.block_length() {
            return Err(ConfigError::BlockLengthMismatch {
                table: self.block_length.get(),
                config: config.block_length().get(),
            });
        }
        if self.strong_sum_length != config.strong_sum_length() {
            return Err(ConfigError::StrongLengthMismatch {
                table: self.strong_sum_length.get(),
                config: config.strong_sum_length().get(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checksums::RollingChecksum;
    use checksums::strong::Md4;
    use signature::{SignatureLayout, generate_file_signature};

    fn lengths(block: u32, strong: u8) -> (NonZeroU32, NonZeroU8) {
        (NonZeroU32::new(block).unwrap(), NonZeroU8::new(strong).unwrap())
    }

    fn weak_of(data: &[u8]) -> u32 {
        let mut checksum = RollingChecksum::new();
        checksum.update(data);
        checksum.value()
    }

    fn pair_of(data: &[u8], seed: Option<&[u8]>, strong_len: usize) -> ChecksumPair {
        ChecksumPair::new(weak_of(data), truncated_digest::<Md4>(data, seed, strong_len))
    }

    #[test]
    fn probe_hits_inserted_block() {
        let (block, strong) = lengths(4, 8);
        let mut table = ChecksumTable::new(block, strong);
        assert_eq!(table.insert(pair_of(b"abcd", None, 8), 12), Ok(None));

        assert_eq!(table.probe::<Md4>(weak_of(b"abcd"), b"abcd", None), Some(12));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unknown_weak_value_is_rejected_without_strong_check() {
        let (block, strong) = lengths(4, 8);
        let mut table = ChecksumTable::new(block, strong);
        table.insert(pair_of(b"abcd", None, 8), 0).unwrap();

        let other = weak_of(b"wxyz");
        assert!(!table.contains_weak(other));
        assert_eq!(table.probe::<Md4>(other, b"wxyz", None), None);
    }

    #[test]
    fn weak_hit_without_strong_confirmation_is_a_miss() {
        let (block, strong) = lengths(4, 8);
        let mut table = ChecksumTable::new(block, strong);
        let weak = weak_of(b"abcd");
        table
            .insert(ChecksumPair::new(weak, vec![0; 8]), 4)
            .unwrap();

        assert!(table.contains_weak(weak));
        assert_eq!(table.probe::<Md4>(weak, b"abcd", None), None);
    }

    #[test]
    fn same_weak_value_keeps_both_strong_entries() {
        let (block, strong) = lengths(3, 16);
        let mut table = ChecksumTable::new(block, strong);
        // Both windows sum to s1 = 2, s2 = 4.
        assert_eq!(weak_of(&[1, 0, 1]), weak_of(&[0, 2, 0]));
        table.insert(pair_of(&[1, 0, 1], None, 16), 0).unwrap();
        table.insert(pair_of(&[0, 2, 0], None, 16), 3).unwrap();

        let weak = weak_of(&[1, 0, 1]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.probe::<Md4>(weak, &[1, 0, 1], None), Some(0));
        assert_eq!(table.probe::<Md4>(weak, &[0, 2, 0], None), Some(3));
    }

    #[test]
    fn duplicate_pair_last_write_wins() {
        let (block, strong) = lengths(4, 8);
        let mut table = ChecksumTable::new(block, strong);
        table.insert(pair_of(b"AAAA", None, 8), 0).unwrap();
        let displaced = table.insert(pair_of(b"AAAA", None, 8), 4).unwrap();

        assert_eq!(displaced, Some(0));
        assert_eq!(table.len(), 1);
        assert_eq!(table.displaced(), 1);
        assert_eq!(table.get(&pair_of(b"AAAA", None, 8)), Some(4));
    }

    #[test]
    fn seed_must_match_on_both_sides() {
        let (block, strong) = lengths(4, 16);
        let mut table = ChecksumTable::new(block, strong);
        table.insert(pair_of(b"abcd", Some(b"s".as_slice()), 16), 8).unwrap();

        let weak = weak_of(b"abcd");
        assert_eq!(table.probe::<Md4>(weak, b"abcd", Some(b"s".as_slice())), Some(8));
        assert_eq!(table.probe::<Md4>(weak, b"abcd", None), None);
    }

    #[test]
    fn wrong_strong_length_is_rejected() {
        let (block, strong) = lengths(4, 8);
        let mut table = ChecksumTable::new(block, strong);
        let err = table.insert(ChecksumPair::new(1, vec![0; 4]), 0).unwrap_err();
        assert_eq!(err, ConfigError::RecordStrongLength { expected: 8, found: 4 });
        assert!(table.is_empty());
    }

    #[test]
    fn oversized_strong_prefix_reports_its_real_length() {
        let (block, strong) = lengths(4, 8);
        let records = [(ChecksumPair::new(1, vec![0; 300]), 0)];
        let err = ChecksumTable::from_records(block, strong, records).unwrap_err();
        assert_eq!(err, ConfigError::RecordStrongLength { expected: 8, found: 300 });
        assert!(err.to_string().contains("300"));
    }

    #[test]
    fn from_signature_indexes_every_block() {
        let layout = SignatureLayout::new(NonZeroU32::new(4).unwrap(), NonZeroU8::new(8).unwrap());
        let signature =
            generate_file_signature::<Md4, _>(&b"abcdefghij"[..], layout, None).unwrap();
        let table = ChecksumTable::from_signature(&signature).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.probe::<Md4>(weak_of(b"efgh"), b"efgh", None), Some(4));
        assert_eq!(table.probe::<Md4>(weak_of(b"ij"), b"ij", None), Some(8));
    }

    #[test]
    fn clear_empties_the_table() {
        let (block, strong) = lengths(4, 8);
        let mut table = ChecksumTable::new(block, strong);
        table.insert(pair_of(b"abcd", None, 8), 0).unwrap();
        table.clear();
        assert!(table.is_empty());
        assert!(!table.contains_weak(weak_of(b"abcd")));
    }

    #[test]
    fn compatibility_check_compares_lengths() {
        let config = MatchConfig::builder(4).strong_sum_length(8).build().unwrap();
        let (block, strong) = lengths(4, 8);
        assert!(ChecksumTable::new(block, strong).check_compatible(&config).is_ok());

        let (block, strong) = lengths(8, 8);
        assert_eq!(
            ChecksumTable::new(block, strong).check_compatible(&config),
            Err(ConfigError::BlockLengthMismatch { table: 8, config: 4 })
        );

        let (block, strong) = lengths(4, 2);
        assert_eq!(
            ChecksumTable::new(block, strong).check_compatible(&config),
            Err(ConfigError::StrongLengthMismatch { table: 2, config: 8 })
        );
    }

    #[test]
    fn table_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChecksumTable>();
    }
}
