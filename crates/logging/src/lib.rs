#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` routes the diagnostics of the streaming delta engine through
//! [`tracing`]. Each subsystem emits on its own target so verbosity can be
//! tuned per subsystem:
//!
//! | Flag | Target | Emitted by |
//! |------|--------|------------|
//! | `match` | [`MATCH_TARGET`] | block matcher window decisions |
//! | `table` | [`TABLE_TARGET`] | checksum table build and collisions |
//! | `listener` | [`LISTENER_TARGET`] | listener delivery failures |
//! | `signature` | [`SIGNATURE_TARGET`] | signature generation |
//!
//! Library crates only emit events. Binaries and tests decide whether and how
//! to display them by calling [`init_tracing`] with a [`VerbosityConfig`].
//!
//! # Examples
//!
//! ```
//! use logging::{DebugFlag, VerbosityConfig};
//!
//! let mut config = VerbosityConfig::from_verbose_level(1);
//! config.apply_debug_flag("table2").unwrap();
//! assert_eq!(config.debug.get(DebugFlag::Table), 2);
//! assert!(config.filter_directives().contains("streamdelta::table=debug"));
//! ```

mod config;
mod levels;
mod subscriber;
mod tracing_macros;

pub use config::{FlagParseError, VerbosityConfig};
pub use levels::{DebugFlag, DebugLevels};
pub use subscriber::{InitError, init_tracing};

/// Target used by the block matcher.
pub const MATCH_TARGET: &str = "streamdelta::match";
/// Target used by the checksum pair table.
pub const TABLE_TARGET: &str = "streamdelta::table";
/// Target used by the listener protocol.
pub const LISTENER_TARGET: &str = "streamdelta::listener";
/// Target used by signature generation.
pub const SIGNATURE_TARGET: &str = "streamdelta::signature";

#[doc(hidden)]
pub use tracing as __tracing;
