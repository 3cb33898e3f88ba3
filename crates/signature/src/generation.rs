//! crates/signature/src/generation.rs
//!
//! File signature generation from input data.

use std::io::{self, Read};

use thiserror::Error;
use tracing::instrument;

use checksums::strong::{StrongDigest, truncated_digest};
use checksums::{RollingChecksum, WeakChecksum};

use crate::block::SignatureBlock;
use crate::file::FileSignature;
use crate::layout::SignatureLayout;

/// Errors returned when generating file signatures.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// Underlying I/O failure raised while reading file contents.
    #[error("failed to read input while generating signature: {0}")]
    Io(
        #[from]
        #[source]
        io::Error,
    ),
    /// Requested strong checksum length exceeds what the algorithm can provide.
    #[error("requested strong checksum length {requested} exceeds {algorithm} digest width {available}")]
    DigestLengthMismatch {
        /// Strong checksum algorithm in use.
        algorithm: &'static str,
        /// Number of bytes requested by the layout.
        requested: usize,
        /// Digest width of the algorithm.
        available: usize,
    },
}

/// Generates a file signature using the rsync rolling checksum as weak sum.
///
/// The reader is consumed until end of input. Every block is `layout`'s block
/// length except for a shorter trailing block when the input length is not a
/// multiple of it. Strong sums are seeded with `seed` when present.
///
/// # Errors
///
/// - Returns [`SignatureError::DigestLengthMismatch`] when the layout requests a strong checksum
///   length that exceeds the algorithm's digest width.
/// - Propagates any I/O error surfaced by the reader.
pub fn generate_file_signature<S, R>(
    reader: R,
    layout: SignatureLayout,
    seed: Option<&[u8]>,
) -> Result<FileSignature, SignatureError>
where
    S: StrongDigest,
    R: Read,
{
    generate_file_signature_with::<RollingChecksum, S, R>(reader, layout, seed)
}

/// Generates a file signature with an explicit weak checksum implementation.
///
/// # Errors
///
/// Same as [`generate_file_signature`].
#[instrument(skip(reader, seed), fields(algorithm = S::NAME, block_length = layout.block_length().get()), name = "generate_signature")]
pub fn generate_file_signature_with<W, S, R>(
    mut reader: R,
    layout: SignatureLayout,
    seed: Option<&[u8]>,
) -> Result<FileSignature, SignatureError>
where
    W: WeakChecksum + Default,
    S: StrongDigest,
    R: Read,
{
    let strong_len = usize::from(layout.strong_sum_length().get());
    if strong_len > S::DIGEST_LEN {
        return Err(SignatureError::DigestLengthMismatch {
            algorithm: S::NAME,
            requested: strong_len,
            available: S::DIGEST_LEN,
        });
    }

    let block_len = layout.block_length().get() as usize;
    let mut buffer = vec![0u8; block_len];
    let mut weak = W::default();
    let mut blocks = Vec::new();
    let mut total_bytes: u64 = 0;

    loop {
        let filled = fill_block(&mut reader, &mut buffer)?;
        if filled == 0 {
            break;
        }

        let chunk = &buffer[..filled];
        weak.check(chunk);
        let strong = truncated_digest::<S>(chunk, seed, strong_len);
        let index = blocks.len() as u64;
        blocks.push(SignatureBlock::new(
            index,
            total_bytes,
            filled as u32,
            weak.value(),
            strong,
        ));
        total_bytes += filled as u64;

        if filled < block_len {
            break;
        }
    }

    logging::trace_signature!(
        blocks = blocks.len(),
        total_bytes,
        "signature generated"
    );

    Ok(FileSignature::new(layout, blocks, total_bytes))
}

/// Reads until `buffer` is full or the reader reports end of input.
fn fill_block<R: Read>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
