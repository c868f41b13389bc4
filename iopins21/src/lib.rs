//!
//! # Iopins21 I/O Pin-Placement Directive Parser & Writer
//!
//! Reads the compact pin-placement directive language, which assigns a chip's I/O pins
//! to the four sides (north, east, west, south) of its package, into a [PinConfig].
//!
//! ```text
//! @min_distance=0.5
//! #N @bit_major io_in\[.*\] $2 clk
//! #SR io_out.*
//! ```
//!
//! * `#N`, `#E`, `#W`, `#S` select a side. `#NR` etc. select it with its pin order reversed.
//! * `@bus_major`, `@bit_major` and `@min_distance=<d>` apply to the selected side,
//!   or, before any side is selected, become the defaults for sides created later.
//! * `$<n>` reserves `n` unnamed virtual pin slots.
//! * Everything else is a pin name or regular expression, appended to the selected side.
//!
//! Tokens are scanned by longest match and need no separating whitespace:
//! `#N@bit_major a` is a direction, an annotation, and a pin.
//!

// Modules
pub mod data;
pub use data::*;

pub mod keywords;

pub mod read;
pub use read::{parse_file, parse_str, PinLexer, PinParser};

pub mod ser;
pub use ser::SerializationFormat;

pub mod write;
