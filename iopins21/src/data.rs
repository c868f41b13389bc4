//!
//! # Pin-Placement Data Model
//!

// Std-Lib
use std::ops::{Index, IndexMut};

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
pub use crate::keywords::{Annotation, Dir, DirToken, Keyword};
pub use crate::read::{ParserState, PinParseErrorType};

///
/// # PinDecimal
///
/// Internal type alias for all decimal-valued data, i.e. pin spacings.
/// Uses [rust_decimal](https://crates.io/crates/rust_decimal) internally.
///
pub type PinDecimal = rust_decimal::Decimal;

/// # Bus Sort Mode
///
/// Ordering of multi-bit bus pins, applied by downstream placement.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Group by bus name first
    #[default]
    BusMajor,
    /// Group by bit index first
    BitMajor,
}
impl SortMode {
    /// The standalone annotation which selects this mode
    pub fn annotation(&self) -> Annotation {
        match self {
            Self::BusMajor => Annotation::BusMajor,
            Self::BitMajor => Annotation::BitMajor,
        }
    }
}

/// # Pin Entry
///
/// Either a pin name (literal or regular expression),
/// or a count of reserved, unnamed "virtual" pin slots.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum PinEntry {
    Virtual(u64),
    Name(String),
}
impl From<&str> for PinEntry {
    fn from(s: &str) -> Self {
        Self::Name(s.into())
    }
}
impl From<u64> for PinEntry {
    fn from(n: u64) -> Self {
        Self::Virtual(n)
    }
}

/// # Side
///
/// Pin-placement settings and contents for one side of the package.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct Side {
    /// Minimum spacing between consecutive pins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_distance: Option<PinDecimal>,
    /// Whether the pin order is reversed
    #[serde(default)]
    pub reverse_result: bool,
    /// Bus ordering
    #[serde(default)]
    pub sort_mode: SortMode,
    /// Pin entries, in declaration order
    #[serde(default)]
    pub pins: Vec<PinEntry>,
}
impl Side {
    /// Create a new, empty [Side] from the defaults `sort_mode` and `min_distance`.
    pub fn new(sort_mode: SortMode, min_distance: Option<PinDecimal>) -> Self {
        Self {
            sort_mode,
            min_distance,
            reverse_result: false,
            pins: Vec::new(),
        }
    }
    /// Total number of pin slots: one per name-entry, plus each virtual count.
    /// Note name-entries may be patterns, matching any number of pins downstream.
    pub fn num_entries(&self) -> usize {
        self.pins.iter().fold(0, |acc, p| match p {
            PinEntry::Name(_) => acc + 1,
            PinEntry::Virtual(n) => acc + *n as usize,
        })
    }
}

/// # Pin Configuration
///
/// The parsed result of a directive: exactly one [Side] per [Dir].
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct PinConfig {
    #[serde(rename = "N")]
    pub north: Side,
    #[serde(rename = "E")]
    pub east: Side,
    #[serde(rename = "W")]
    pub west: Side,
    #[serde(rename = "S")]
    pub south: Side,
}
impl PinConfig {
    /// Iterate over ([Dir], [Side]) pairs, in canonical N, E, W, S order
    pub fn iter(&self) -> impl Iterator<Item = (Dir, &Side)> {
        Dir::ALL.iter().map(move |d| (*d, &self[*d]))
    }
}
impl Index<Dir> for PinConfig {
    type Output = Side;
    fn index(&self, dir: Dir) -> &Side {
        match dir {
            Dir::N => &self.north,
            Dir::E => &self.east,
            Dir::W => &self.west,
            Dir::S => &self.south,
        }
    }
}
impl IndexMut<Dir> for PinConfig {
    fn index_mut(&mut self, dir: Dir) -> &mut Side {
        match dir {
            Dir::N => &mut self.north,
            Dir::E => &mut self.east,
            Dir::W => &mut self.west,
            Dir::S => &mut self.south,
        }
    }
}

/// # Deprecation Warning
///
/// Non-fatal diagnostic produced while parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deprecation {
    /// Deprecated source text
    pub token: String,
    /// Line number
    pub line: usize,
    /// Suggested replacement
    pub replacement: &'static str,
}
impl std::fmt::Display for Deprecation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "line {}: `{}` is deprecated, use `{}` instead",
            self.line, self.token, self.replacement
        )
    }
}

/// # Parse Output
///
/// A [PinConfig] along with any non-fatal diagnostics produced along the way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parsed {
    pub config: PinConfig,
    pub warnings: Vec<Deprecation>,
}

///
/// # Pin-Directive Error Enumeration
///
#[derive(Debug)]
pub enum PinError {
    /// Parser Errors
    Parse {
        tp: PinParseErrorType,
        msg: Option<String>,
        state: ParserState,
    },
    /// Wrapped errors, generally from other crates
    Boxed(Box<dyn std::error::Error + Send + Sync>),
}
impl PinError {
    /// Get the [PinParseErrorType] of parser errors. `None` for all others.
    pub fn parse_error_type(&self) -> Option<&PinParseErrorType> {
        match self {
            Self::Parse { tp, .. } => Some(tp),
            Self::Boxed(_) => None,
        }
    }
}
impl From<serde_json::Error> for PinError {
    fn from(e: serde_json::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<serde_yaml::Error> for PinError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<std::io::Error> for PinError {
    fn from(e: std::io::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl std::fmt::Display for PinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse { tp, msg, state } => {
                write!(f, "Directive Syntax Error ({:?}) on line {}", tp, state.line_num)?;
                if let Some(msg) = msg {
                    write!(f, ": {}", msg)?;
                }
                write!(f, " at `{}`", state.excerpt)
            }
            Self::Boxed(e) => write!(f, "{}", e),
        }
    }
}
impl std::error::Error for PinError {}

/// Library-Wide Result Type
pub type PinResult<T> = Result<T, PinError>;
