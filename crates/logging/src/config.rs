//! crates/logging/src/config.rs
//! Verbosity configuration and `--debug=FLAG[N]` style token parsing.

use thiserror::Error;

use super::levels::{DebugFlag, DebugLevels};

/// Errors raised while parsing a debug flag token.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlagParseError {
    /// The token was empty.
    #[error("empty flag token")]
    Empty,
    /// The flag name is not one of the engine subsystems.
    #[error("unknown debug flag: {0}")]
    UnknownFlag(String),
    /// The trailing level could not be parsed.
    #[error("invalid level in flag token: {0}")]
    InvalidLevel(String),
}

/// Combined verbosity configuration for the engine subsystems.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Per-subsystem debug levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Creates a configuration from a verbose level (0-3), applied to every flag.
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();
        config.debug.set_all(level.min(3));
        config
    }

    /// Applies a single flag token such as `"match"` (level 1) or `"table2"`.
    ///
    /// The name `"all"` applies the level to every flag.
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), FlagParseError> {
        let (name, level) = parse_flag_token(token)?;

        if name == "all" {
            self.debug.set_all(level);
            return Ok(());
        }

        let flag =
            DebugFlag::from_name(name).ok_or_else(|| FlagParseError::UnknownFlag(name.to_owned()))?;
        self.debug.set(flag, level);
        Ok(())
    }

    /// Applies a comma separated list of flag tokens.
    pub fn apply_debug_flags(&mut self, tokens: &str) -> Result<(), FlagParseError> {
        tokens
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_debug_flag(token))
    }

    /// Renders the configuration as an `EnvFilter` directive string.
    ///
    /// Events outside the engine targets are limited to warnings.
    #[must_use]
    pub fn filter_directives(&self) -> String {
        let mut directives = String::from("warn");
        for flag in DebugFlag::ALL {
            directives.push(',');
            directives.push_str(flag.target());
            directives.push('=');
            directives.push_str(directive_level(self.debug.get(flag)));
        }
        directives
    }
}

const fn directive_level(level: u8) -> &'static str {
    match level {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Parse a flag token like "table2" into ("table", 2) or "match" into ("match", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), FlagParseError> {
    if token.is_empty() {
        return Err(FlagParseError::Empty);
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        None => Ok((token, 1)),
        Some(0) => Err(FlagParseError::UnknownFlag(token.to_owned())),
        Some(pos) => {
            let (name, digits) = token.split_at(pos);
            let level = digits
                .parse::<u8>()
                .map_err(|_| FlagParseError::InvalidLevel(token.to_owned()))?;
            Ok((name, level))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_token_without_level_defaults_to_one() {
        assert_eq!(parse_flag_token("match"), Ok(("match", 1)));
    }

    #[test]
    fn parse_token_with_level() {
        assert_eq!(parse_flag_token("table3"), Ok(("table", 3)));
        assert_eq!(parse_flag_token("listener0"), Ok(("listener", 0)));
    }

    #[test]
    fn parse_token_rejects_garbage_level() {
        assert!(matches!(
            parse_flag_token("match2x"),
            Err(FlagParseError::InvalidLevel(_))
        ));
    }

    #[test]
    fn parse_empty_token_fails() {
        assert_eq!(parse_flag_token(""), Err(FlagParseError::Empty));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let mut config = VerbosityConfig::default();
        assert_eq!(
            config.apply_debug_flag("flist"),
            Err(FlagParseError::UnknownFlag("flist".to_owned()))
        );
    }

    #[test]
    fn all_flag_sets_every_level() {
        let mut config = VerbosityConfig::default();
        config.apply_debug_flag("all2").unwrap();
        for flag in DebugFlag::ALL {
            assert_eq!(config.debug.get(flag), 2);
        }
    }

    #[test]
    fn verbose_level_is_clamped() {
        let config = VerbosityConfig::from_verbose_level(9);
        assert_eq!(config.debug.get(DebugFlag::Match), 3);
    }

    #[test]
    fn directives_cover_every_target() {
        let config = VerbosityConfig::from_verbose_level(0);
        let directives = config.filter_directives();
        assert!(directives.starts_with("warn,"));
        for flag in DebugFlag::ALL {
            assert!(directives.contains(&format!("{}=warn", flag.target())));
        }
    }
}
