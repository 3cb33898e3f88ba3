//! Strong checksums used to confirm weak-checksum hits.
//!
//! Every algorithm implements [`StrongDigest`], a small streaming interface
//! that generic code (signature generation, the checksum table) is written
//! against. The concrete algorithm is chosen by the caller as a type parameter
//! instead of being looked up by name at runtime.
//!
//! A session may additionally carry a *checksum seed*: salt bytes fed into
//! the digest after the block data and before finalisation. Use
//! [`seeded_digest`] or [`truncated_digest`] so signature generation and
//! matching hash in exactly the same order.

mod md4;
mod md5;
mod sha;
mod xxhash;

pub use md4::Md4;
pub use md5::Md5;
pub use sha::{Sha1, Sha256};
pub use xxhash::{Xxh3, Xxh64};

/// Streaming strong digest.
///
/// The session checksum seed is not part of the hasher: it is fed through
/// [`update`](Self::update) after the block, see [`seeded_digest`].
pub trait StrongDigest: Sized {
    /// Finalised digest output.
    type Digest: AsRef<[u8]> + Clone + Send + Sync;
    /// Width of [`Self::Digest`] in bytes.
    const DIGEST_LEN: usize;
    /// Short algorithm name used in diagnostics.
    const NAME: &'static str;

    /// Creates a hasher with an empty state.
    fn new() -> Self;

    /// Feeds additional bytes into the digest state.
    fn update(&mut self, data: &[u8]);

    /// Finalises the digest.
    fn finalize(self) -> Self::Digest;

    /// Computes the digest of `data` in one shot.
    fn digest(data: &[u8]) -> Self::Digest {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Digests `data` followed by the optional checksum `seed`.
pub fn seeded_digest<S: StrongDigest>(data: &[u8], seed: Option<&[u8]>) -> S::Digest {
    let mut hasher = S::new();
    hasher.update(data);
    if let Some(seed) = seed {
        hasher.update(seed);
    }
    hasher.finalize()
}

/// Digests `data` and the optional `seed`, keeping only the first `len` bytes.
///
/// Requests longer than [`StrongDigest::DIGEST_LEN`] return the full digest.
pub fn truncated_digest<S: StrongDigest>(data: &[u8], seed: Option<&[u8]>, len: usize) -> Vec<u8> {
    let digest = seeded_digest::<S>(data, seed);
    let bytes = digest.as_ref();
    bytes[..len.min(bytes.len())].to_vec()
}

#[cfg(test)]
pub(crate) fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut out, "{byte:02x}").expect("write! to String cannot fail");
    }
    out
}
