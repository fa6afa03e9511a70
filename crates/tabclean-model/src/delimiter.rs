//! Field separators understood by the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the supported field separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    Tab,
    Semicolon,
    Pipe,
}

impl Delimiter {
    /// Candidates in preference order, used to break detection ties.
    pub const ALL: [Delimiter; 4] = [
        Delimiter::Comma,
        Delimiter::Tab,
        Delimiter::Semicolon,
        Delimiter::Pipe,
    ];

    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
            Self::Semicolon => ';',
            Self::Pipe => '|',
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Tab => b'\t',
            Self::Semicolon => b';',
            Self::Pipe => b'|',
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_char() == ch)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Comma => "comma",
            Self::Tab => "tab",
            Self::Semicolon => "semicolon",
            Self::Pipe => "pipe",
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised separator text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported delimiter '{0}' (expected one of: , \\t ; |)")]
pub struct ParseDelimiterError(pub String);

impl FromStr for Delimiter {
    type Err = ParseDelimiterError;

    /// Accepts the literal character, the escaped form `\t`, or a name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "," | "comma" => Ok(Self::Comma),
            "\t" | "\\t" | "tab" => Ok(Self::Tab),
            ";" | "semicolon" => Ok(Self::Semicolon),
            "|" | "pipe" => Ok(Self::Pipe),
            other => Err(ParseDelimiterError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_escaped_tab() {
        assert_eq!("\\t".parse::<Delimiter>(), Ok(Delimiter::Tab));
        assert_eq!("\t".parse::<Delimiter>(), Ok(Delimiter::Tab));
    }

    #[test]
    fn rejects_unknown() {
        assert!(":".parse::<Delimiter>().is_err());
    }

    #[test]
    fn char_round_trip() {
        for delimiter in Delimiter::ALL {
            assert_eq!(Delimiter::from_char(delimiter.as_char()), Some(delimiter));
            assert_eq!(delimiter.as_byte() as char, delimiter.as_char());
        }
    }
}
