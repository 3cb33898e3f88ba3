#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Streaming block matching against a reference signature.
//!
//! This crate turns a new version of some data into a stream of delta events
//! relative to an old version, given only the old version's block
//! signature:
//! - [`ChecksumTable`] indexes the old version's `(weak, strong) -> offset`
//!   records and confirms weak hits with a truncated strong digest
//! - [`BlockMatcher`] consumes the new version byte by byte or in slices and
//!   emits [`DeltaEvent`]s to registered [`DeltaListener`]s
//! - [`DeltaScript`], [`generate_delta`] and [`apply_delta`] collect the
//!   events and replay them against the old version
//!
//! # Design
//!
//! The weak rolling checksum and the strong digest come from the `checksums`
//! crate and are chosen as type parameters. Signatures come from the
//! `signature` crate. A table is built once and shared between sessions
//! through an [`Arc`](std::sync::Arc); each [`BlockMatcher`] owns its own
//! working buffer and checksum state.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use std::sync::Arc;
//!
//! use checksums::RollingChecksum;
//! use checksums::strong::Md4;
//! use matching::{ChecksumTable, MatchConfig, apply_delta, generate_delta};
//! use signature::{SignatureLayout, generate_file_signature};
//!
//! let old = b"hello old world, hello".to_vec();
//! let new = b"hello new world, hello".to_vec();
//!
//! let config = MatchConfig::builder(6).build().unwrap();
//! let layout = SignatureLayout::new(config.block_length(), config.strong_sum_length());
//! let signature = generate_file_signature::<Md4, _>(&old[..], layout, None).unwrap();
//! let table = Arc::new(ChecksumTable::from_signature(&signature).unwrap());
//!
//! let script = generate_delta::<RollingChecksum, Md4, _>(&new[..], config, table).unwrap();
//! let mut rebuilt = Vec::new();
//! apply_delta(Cursor::new(&old), &script, &mut rebuilt).unwrap();
//! assert_eq!(rebuilt, new);
//! ```

mod config;
mod error;
mod event;
mod listener;
mod matcher;
mod script;
mod table;
mod window_buffer;

pub use config::{DEFAULT_CHUNK_SIZE, DEFAULT_STRONG_SUM_LENGTH, MatchConfig, MatchConfigBuilder};
pub use error::{ApplyError, ConfigError, DeltaError};
pub use event::{DataBlock, DeltaEvent, Offsets};
pub use listener::{BoxError, DeltaListener, ListenerError, ListenerFailure, ListenerId};
pub use matcher::BlockMatcher;
pub use script::{DeltaScript, apply_delta, generate_delta};
pub use table::{ChecksumPair, ChecksumTable};
pub use window_buffer::WindowBuffer;
