//! An ordered, thread-safe store for INI-style configuration files.
//!
//! ```text
//! option1 = value1
//! option2
//! [section.name]
//! optA = valA
//! optB: valB
//! ```
//!
//! Options before the first header belong to the [global section](GLOBAL_SECTION). Section names
//! may repeat; every header starts a new [`Section`]. Options keep their insertion order and
//! names are unique within a section.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

mod config;
mod error;
mod parser;
mod section;
pub mod token;
mod writer;

use std::fmt;
use std::str::FromStr;

pub use config::Configuration;
pub use error::{Error, Result};
pub use parser::{Parser, from_reader, parse_str, read};
pub use section::Section;
pub use writer::{write, write_to};

/// Name of the section holding the options that appear before any `[section]` header.
///
/// It is never written with a header line.
pub const GLOBAL_SECTION: &str = "global";

/// Appended to the path of an existing file before it is overwritten.
pub const BACKUP_EXT: &str = ".bak";

/// Separator written between an option name and its value.
///
/// Both `=` and `:` are understood when reading, regardless of this setting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `name = value`
    #[default]
    Equal,
    /// `name : value`
    Colon,
}

impl Delimiter {
    /// The delimiter as written, padded with a space on each side.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => " = ",
            Self::Colon => " : ",
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equal => "equal",
            Self::Colon => "colon",
        })
    }
}

impl FromStr for Delimiter {
    type Err = ParseDelimiterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "=" | "equal" => Ok(Self::Equal),
            ":" | "colon" => Ok(Self::Colon),
            other => Err(ParseDelimiterError(other.to_owned())),
        }
    }
}

/// Returned when a string names neither `equal` (`=`) nor `colon` (`:`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown delimiter {0:?}, expected `equal` (=) or `colon` (:)")]
pub struct ParseDelimiterError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_defaults_to_equal() {
        assert_eq!(Delimiter::default(), Delimiter::Equal);
        assert_eq!(Delimiter::default().as_str(), " = ");
        assert_eq!(Delimiter::Colon.as_str(), " : ");
    }

    #[test]
    fn delimiter_from_name_or_symbol() {
        assert_eq!("colon".parse::<Delimiter>(), Ok(Delimiter::Colon));
        assert_eq!(":".parse::<Delimiter>(), Ok(Delimiter::Colon));
        assert_eq!(" = ".parse::<Delimiter>(), Ok(Delimiter::Equal));
        assert_eq!(
            "semicolon".parse::<Delimiter>(),
            Err(ParseDelimiterError("semicolon".to_owned()))
        );
    }

    #[test]
    fn delimiter_display_parses_back() {
        for delimiter in [Delimiter::Equal, Delimiter::Colon] {
            assert_eq!(delimiter.to_string().parse::<Delimiter>(), Ok(delimiter));
        }
    }
}
