//! crates/logging/src/levels.rs
//! Debug flags and per-flag verbosity levels.

use tracing::level_filters::LevelFilter;

/// Diagnostic categories, one per engine subsystem.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugFlag {
    /// Block matcher window decisions and emitted events.
    Match,
    /// Checksum table construction and full-pair collisions.
    Table,
    /// Listener registration and delivery failures.
    Listener,
    /// Signature generation.
    Signature,
}

impl DebugFlag {
    /// All flags in display order.
    pub const ALL: [Self; 4] = [Self::Match, Self::Table, Self::Listener, Self::Signature];

    /// Returns the tracing target the flag controls.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Match => crate::MATCH_TARGET,
            Self::Table => crate::TABLE_TARGET,
            Self::Listener => crate::LISTENER_TARGET,
            Self::Signature => crate::SIGNATURE_TARGET,
        }
    }

    /// Returns the flag name accepted by
    /// [`VerbosityConfig::apply_debug_flag`](crate::VerbosityConfig::apply_debug_flag).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Table => "table",
            Self::Listener => "listener",
            Self::Signature => "signature",
        }
    }

    /// Looks a flag up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.name() == name)
    }
}

/// Debug verbosity levels for each flag.
///
/// Level 0 keeps warnings only, 1 adds info, 2 adds debug and 3 or more
/// enables trace output.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLevels {
    /// Block matcher level.
    pub matcher: u8,
    /// Checksum table level.
    pub table: u8,
    /// Listener protocol level.
    pub listener: u8,
    /// Signature generation level.
    pub signature: u8,
}

impl DebugLevels {
    /// Returns the level configured for `flag`.
    #[must_use]
    pub const fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Match => self.matcher,
            DebugFlag::Table => self.table,
            DebugFlag::Listener => self.listener,
            DebugFlag::Signature => self.signature,
        }
    }

    /// Sets the level for `flag`.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Match => self.matcher = level,
            DebugFlag::Table => self.table = level,
            DebugFlag::Listener => self.listener = level,
            DebugFlag::Signature => self.signature = level,
        }
    }

    /// Sets every flag to `level`.
    pub fn set_all(&mut self, level: u8) {
        for flag in DebugFlag::ALL {
            self.set(flag, level);
        }
    }

    /// Maps the level of `flag` onto a tracing level filter.
    #[must_use]
    pub const fn level_filter(&self, flag: DebugFlag) -> LevelFilter {
        match self.get(flag) {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
