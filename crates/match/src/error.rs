//! Error types for configuration, delta generation and delta application.

use std::io;

use thiserror::Error;

use crate::listener::ListenerError;

/// Misconfiguration detected while building a [`MatchConfig`](crate::MatchConfig)
/// or binding it to a table.
///
/// These are raised before any byte is matched, never while streaming.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    /// Block length of zero.
    #[error("block length must be non-zero")]
    ZeroBlockLength,
    /// Working buffer cannot hold a full block.
    #[error("chunk size {chunk_size} is smaller than block length {block_length}")]
    ChunkSmallerThanBlock {
        /// Requested working buffer capacity.
        chunk_size: usize,
        /// Configured block length.
        block_length: u32,
    },
    /// Strong checksum length of zero.
    #[error("strong checksum length must be non-zero")]
    ZeroStrongLength,
    /// Strong checksum length exceeds the digest width of the chosen algorithm.
    #[error("strong checksum length {requested} exceeds {algorithm} digest width {available}")]
    StrongLengthTooLong {
        /// Strong digest algorithm in use.
        algorithm: &'static str,
        /// Bytes requested by the configuration.
        requested: u8,
        /// Digest width of the algorithm.
        available: usize,
    },
    /// The table was built for a different block length.
    #[error("table block length {table} does not match configured block length {config}")]
    BlockLengthMismatch {
        /// Block length the table was built with.
        table: u32,
        /// Block length of the configuration.
        config: u32,
    },
    /// The table stores strong sums of a different length.
    #[error("table strong checksum length {table} does not match configured length {config}")]
    StrongLengthMismatch {
        /// Strong length the table was built with.
        table: u8,
        /// Strong length of the configuration.
        config: u8,
    },
    /// A record's strong prefix does not have the table's strong length.
    #[error("record strong checksum is {found} bytes, table expects {expected}")]
    RecordStrongLength {
        /// Strong length the table stores.
        expected: u8,
        /// Length of the rejected record's strong prefix.
        found: usize,
    },
}

/// Errors returned by [`generate_delta`](crate::generate_delta).
#[derive(Debug, Error)]
pub enum DeltaError {
    /// The configuration cannot be used with the table or digest.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Reading the new version failed.
    #[error("failed to read input while generating delta: {0}")]
    Io(#[from] io::Error),
    /// One or more listeners rejected an event.
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Errors returned by [`apply_delta`](crate::apply_delta).
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The basis ended before a copy instruction could be satisfied.
    #[error("basis too short: copy of {length} bytes at offset {old_offset} got {available}")]
    ShortBasis {
        /// Old-version offset of the copy.
        old_offset: u64,
        /// Requested copy length.
        length: u32,
        /// Bytes actually available.
        available: u64,
    },
    /// Events do not describe a contiguous new stream.
    #[error("event at offset {found} does not continue the stream at offset {expected}")]
    OutOfOrder {
        /// Next offset the new stream required.
        expected: u64,
        /// Offset the event claimed.
        found: u64,
    },
    /// Reading the basis or writing the output failed.
    #[error("i/o error while applying delta: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages_name_the_values() {
        let err = ConfigError::ChunkSmallerThanBlock {
            chunk_size: 8,
            block_length: 16,
        };
        assert_eq!(
            err.to_string(),
            "chunk size 8 is smaller than block length 16"
        );

        let err = ConfigError::StrongLengthTooLong {
            algorithm: "xxh64",
            requested: 16,
            available: 8,
        };
        assert!(err.to_string().contains("xxh64"));
    }

    #[test]
    fn io_errors_convert() {
        let err: DeltaError = io::Error::other("boom").into();
        assert!(matches!(err, DeltaError::Io(_)));
        let err: ApplyError = io::Error::other("boom").into();
        assert!(matches!(err, ApplyError::Io(_)));
    }
}
