use core::fmt;

/// Errors raised while sliding the rolling checksum window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RollingError {
    /// There is no window to slide; call `update` first.
    EmptyWindow,
}

impl fmt::Display for RollingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWindow => f.write_str("cannot roll an empty checksum window"),
        }
    }
}

impl std::error::Error for RollingError {}
