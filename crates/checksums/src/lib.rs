#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Checksums used by the streaming block matcher.
//!
//! The crate provides the two checksum capabilities a block matcher needs:
//!
//! - a cheap **weak** checksum that can be rolled one byte at a time
//!   ([`RollingChecksum`], exposed to generic code through [`WeakChecksum`]),
//! - a **strong** digest ([`strong::StrongDigest`]) that confirms a weak hit
//!   and rules out false positives.
//!
//! Both sides of a session (signature generation over the old data and
//! matching over the new stream) must use the same pair of implementations and
//! the same checksum seed, otherwise no block will ever match.
//!
//! # Example
//!
//! ```
//! use checksums::{RollingChecksum, WeakChecksum};
//! use checksums::strong::{Md4, truncated_digest};
//!
//! let data = b"the old version of a block";
//!
//! let mut weak = RollingChecksum::new();
//! weak.check(&data[..8]);
//! weak.roll(data[0], data[8]).unwrap();
//!
//! let mut fresh = RollingChecksum::new();
//! fresh.check(&data[1..9]);
//! assert_eq!(weak.value(), fresh.value());
//!
//! let strong = truncated_digest::<Md4>(&data[1..9], Some(b"seed".as_slice()), 4);
//! assert_eq!(strong.len(), 4);
//! ```

mod rolling;
pub mod strong;

pub use rolling::{RollingChecksum, RollingError, WeakChecksum};
