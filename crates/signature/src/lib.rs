#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Block signatures of a reference ("old") version.
//!
//! A signature splits the old version into fixed-size blocks and records, for
//! each block, its byte offset, its weak rolling checksum and a truncated,
//! optionally seeded strong digest. The block matcher indexes these records
//! and probes them while it slides over the new version.
//!
//! - [`SignatureLayout`] fixes the block length and strong checksum length.
//! - [`generate_file_signature`] reads the old version and produces a
//!   [`FileSignature`] made of [`SignatureBlock`] records.
//!
//! # Example
//!
//! ```
//! use std::num::{NonZeroU8, NonZeroU32};
//! use checksums::strong::Md4;
//! use signature::{SignatureLayout, generate_file_signature};
//!
//! let layout = SignatureLayout::new(NonZeroU32::new(4).unwrap(), NonZeroU8::new(8).unwrap());
//! let signature = generate_file_signature::<Md4, _>(&b"abcdefghij"[..], layout, None).unwrap();
//!
//! assert_eq!(signature.blocks().len(), 3);
//! assert_eq!(signature.blocks()[2].offset(), 8);
//! assert_eq!(signature.blocks()[2].len(), 2);
//! ```

mod block;
mod file;
mod generation;
mod layout;

pub use block::SignatureBlock;
pub use file::FileSignature;
pub use generation::{SignatureError, generate_file_signature, generate_file_signature_with};
pub use layout::{DEFAULT_BLOCK_LENGTH, MAX_BLOCK_LENGTH, SignatureLayout};
