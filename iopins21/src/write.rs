//!
//! # Directive Writer Module
//!
//! Renders a [PinConfig] back into directive text.
//! Output is one line per side, in canonical N, E, W, S order,
//! with each side's settings written explicitly, so that re-parsing
//! produces an equal [PinConfig] regardless of any global defaults.
//!

// Standard Lib Imports
use std::io::Write;
use std::path::Path;

// Local imports
use super::data::*;

/// Write a [PinConfig] to file `fname`
pub fn save(cfg: &PinConfig, fname: impl AsRef<Path>) -> PinResult<()> {
    let f = std::fs::File::create(fname)?;
    PinWriter::new(f).write_config(cfg)
}
/// Write a [PinConfig] to directive-format [String]
pub fn to_string(cfg: &PinConfig) -> PinResult<String> {
    let mut buf = Vec::new();
    PinWriter::new(&mut buf).write_config(cfg)?;
    String::from_utf8(buf).map_err(|e| PinError::Boxed(Box::new(e)))
}

/// # Directive Writer
pub struct PinWriter<W: Write> {
    dest: W,
}
impl<W: Write> PinWriter<W> {
    pub fn new(dest: W) -> Self {
        Self { dest }
    }
    /// Write all four sides
    pub fn write_config(&mut self, cfg: &PinConfig) -> PinResult<()> {
        for (dir, side) in cfg.iter() {
            self.write_side(dir, side)?;
        }
        self.dest.flush()?;
        Ok(())
    }
    /// Write a single [Side] as one line
    fn write_side(&mut self, dir: Dir, side: &Side) -> PinResult<()> {
        write!(self.dest, "#{}", dir.token(side.reverse_result))?;
        write!(self.dest, " @{}", side.sort_mode.annotation())?;
        if let Some(dist) = side.min_distance {
            write!(self.dest, " @{}={}", Annotation::MinDistance, dist)?;
        }
        for pin in side.pins.iter() {
            match pin {
                PinEntry::Name(name) => write!(self.dest, " {}", name)?,
                PinEntry::Virtual(n) => write!(self.dest, " ${}", n)?,
            }
        }
        writeln!(self.dest)?;
        Ok(())
    }
}
