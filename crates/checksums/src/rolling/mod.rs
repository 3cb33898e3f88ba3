//! Weak rolling checksum.
//!
//! The matcher slides a block-sized window across the new stream one byte at
//! a time, so the weak checksum has to advance in constant time. This is the
//! rsync flavour of Adler-32: two wrapping 16-bit sums, no prime modulus.
//!
//! ```rust
//! use checksums::RollingChecksum;
//!
//! let mut rolling = RollingChecksum::new();
//! rolling.update(b"hello");
//! rolling.roll(b'h', b'!').unwrap();
//!
//! let mut fresh = RollingChecksum::new();
//! fresh.update(b"ello!");
//! assert_eq!(rolling.value(), fresh.value());
//! ```

mod checksum;
mod error;
mod weak;

pub use checksum::RollingChecksum;
pub use error::RollingError;
pub use weak::WeakChecksum;
