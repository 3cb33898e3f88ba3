#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Streaming rsync-style delta matching.
//!
//! `streamdelta` re-exports the workspace crates that make up the engine:
//!
//! | Crate | Provides |
//! |-------|----------|
//! | [`checksums`] | rolling weak checksum and strong digests |
//! | [`signature`] | block signatures of the old version |
//! | [`matching`] | checksum table, block matcher, listeners, delta scripts |
//! | [`logging`] | tracing targets and subscriber setup |
//!
//! The [`cli`] module backs the `streamdelta` binary.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use streamdelta::{BlockMatcher, BoxError, ChecksumTable, DeltaEvent, MatchConfig, Offsets};
//! use streamdelta::checksums::strong::Md4;
//! use streamdelta::signature::{SignatureLayout, generate_file_signature};
//!
//! let config = MatchConfig::builder(16).chunk_size(64).build().unwrap();
//! let layout = SignatureLayout::new(config.block_length(), config.strong_sum_length());
//! let signature = generate_file_signature::<Md4, _>(&[b'A'; 64][..], layout, None).unwrap();
//! let table = Arc::new(ChecksumTable::from_signature(&signature).unwrap());
//!
//! let mut matcher: BlockMatcher = BlockMatcher::new(config, table).unwrap();
//! let copies = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&copies);
//! matcher.add_listener(move |event: &DeltaEvent<'_>| -> Result<(), BoxError> {
//!     if let DeltaEvent::Offsets(copy) = event {
//!         sink.lock().unwrap().push(*copy);
//!     }
//!     Ok(())
//! });
//!
//! matcher.update(&[b'A'; 16]).unwrap();
//! matcher.finish().unwrap();
//! assert_eq!(
//!     *copies.lock().unwrap(),
//!     vec![Offsets { old_offset: 48, new_offset: 0, length: 16 }]
//! );
//! ```

pub mod cli;

pub use checksums;
pub use logging;
pub use matching;
pub use signature;

pub use matching::{
    ApplyError, BlockMatcher, BoxError, ChecksumPair, ChecksumTable, ConfigError, DataBlock,
    DeltaError, DeltaEvent, DeltaListener, DeltaScript, ListenerError, ListenerFailure, ListenerId,
    MatchConfig, Offsets, apply_delta, generate_delta,
};
