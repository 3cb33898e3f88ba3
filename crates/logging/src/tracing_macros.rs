//! crates/logging/src/tracing_macros.rs
//! Convenience macros for engine-specific tracing.
//!
//! These macros wrap the standard tracing macros with the subsystem targets
//! exported from the crate root. Callers do not need a direct `tracing`
//! dependency to use them.

/// Emit a block matcher trace.
///
/// # Example
/// ```ignore
/// trace_match!(new_offset, old_offset, "copy");
/// ```
#[macro_export]
macro_rules! trace_match {
    ($($arg:tt)*) => {
        $crate::__tracing::trace!(target: $crate::MATCH_TARGET, $($arg)*)
    };
}

/// Emit a checksum table trace.
///
/// # Example
/// ```ignore
/// trace_table!(entries = table.len(), "built checksum table");
/// ```
#[macro_export]
macro_rules! trace_table {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: $crate::TABLE_TARGET, $($arg)*)
    };
}

/// Emit a listener protocol trace.
///
/// # Example
/// ```ignore
/// trace_listener!(failures = 2, "listener delivery failed");
/// ```
#[macro_export]
macro_rules! trace_listener {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: $crate::LISTENER_TARGET, $($arg)*)
    };
}

/// Emit a signature generation trace.
///
/// # Example
/// ```ignore
/// trace_signature!(blocks = 12, "generated signature");
/// ```
#[macro_export]
macro_rules! trace_signature {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: $crate::SIGNATURE_TARGET, $($arg)*)
    };
}
