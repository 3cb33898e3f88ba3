//! XXHash digests backed by `xxhash-rust`.
//!
//! These are not cryptographic. They are suitable as the strong checksum when
//! both ends trust each other and speed matters more than collision
//! resistance against an adversary. The hash seed is fixed at zero; a session
//! salts blocks through the checksum seed instead.

use super::StrongDigest;

/// Streaming XXH64 hasher.
///
/// ```
/// use checksums::strong::Xxh64;
///
/// let mut hasher = Xxh64::new();
/// hasher.update(b"chunk 1");
/// hasher.update(b"chunk 2");
/// assert_eq!(hasher.finalize(), Xxh64::digest(b"chunk 1chunk 2"));
/// ```
#[derive(Clone)]
pub struct Xxh64 {
    inner: xxhash_rust::xxh64::Xxh64,
}

impl Default for Xxh64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Xxh64 {
    /// Creates a hasher with an empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: xxhash_rust::xxh64::Xxh64::new(0),
        }
    }

    /// Feeds additional bytes into the digest state.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Returns the 64-bit hash as little-endian bytes.
    #[must_use]
    pub fn finalize(self) -> [u8; 8] {
        self.inner.digest().to_le_bytes()
    }

    /// One-shot digest of `data`.
    #[must_use]
    pub fn digest(data: &[u8]) -> [u8; 8] {
        xxhash_rust::xxh64::xxh64(data, 0).to_le_bytes()
    }
}

impl StrongDigest for Xxh64 {
    type Digest = [u8; 8];
    const DIGEST_LEN: usize = 8;
    const NAME: &'static str = "xxh64";

    fn new() -> Self {
        Self::new()
    }

    fn update(&mut self, data: &[u8]) {
        self.update(data);
    }

    fn finalize(self) -> Self::Digest {
        self.finalize()
    }
}

/// Streaming XXH3 (64-bit) hasher.
#[derive(Clone)]
pub struct Xxh3 {
    inner: xxhash_rust::xxh3::Xxh3,
}

impl Default for Xxh3 {
    fn default() -> Self {
        Self::new()
    }
}

impl Xxh3 {
    /// Creates a hasher with an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: xxhash_rust::xxh3::Xxh3::new(),
        }
    }

    /// Feeds additional bytes into the digest state.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Returns the 64-bit hash as little-endian bytes.
    #[must_use]
    pub fn finalize(self) -> [u8; 8] {
        self.inner.digest().to_le_bytes()
    }

    /// One-shot digest of `data`.
    #[must_use]
    pub fn digest(data: &[u8]) -> [u8; 8] {
        xxhash_rust::xxh3::xxh3_64(data).to_le_bytes()
    }
}

impl StrongDigest for Xxh3 {
    type Digest = [u8; 8];
    const DIGEST_LEN: usize = 8;
    const NAME: &'static str = "xxh3";

    fn new() -> Self {
        Self::new()
    }

    fn update(&mut self, data: &[u8]) {
        self.update(data);
    }

    fn finalize(self) -> Self::Digest {
        self.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strong::seeded_digest;

    #[test]
    fn xxh64_streaming_matches_one_shot() {
        let mut hasher = Xxh64::new();
        hasher.update(b"split ");
        hasher.update(b"input");
        assert_eq!(hasher.finalize(), Xxh64::digest(b"split input"));
    }

    #[test]
    fn xxh3_streaming_matches_one_shot() {
        let mut hasher = Xxh3::new();
        hasher.update(b"split ");
        hasher.update(b"input");
        assert_eq!(hasher.finalize(), Xxh3::digest(b"split input"));
    }

    #[test]
    fn xxh3_long_input_streams_consistently() {
        let data: Vec<u8> = (0..1_000u32).map(|i| (i % 97) as u8).collect();
        let mut hasher = Xxh3::new();
        for chunk in data.chunks(37) {
            hasher.update(chunk);
        }
        assert_eq!(hasher.finalize(), Xxh3::digest(&data));
    }

    #[test]
    fn checksum_seed_changes_output() {
        let plain = seeded_digest::<Xxh64>(b"data", None);
        let salted = seeded_digest::<Xxh64>(b"data", Some(b"salt".as_slice()));
        assert_ne!(plain, salted);
        assert_eq!(salted, Xxh64::digest(b"datasalt"));
    }
}
