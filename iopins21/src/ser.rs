//!
//! # Pin-Configuration Serialization
//!
//! JSON and YAML renderings of [PinConfig], for hand-off to placement scripts
//! which do not speak the directive language, plus its JSON schema.
//!

// Standard Lib Imports
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

// Crates.io Imports
use schemars::schema::RootSchema;

// Local Imports
use crate::data::{PinConfig, PinResult};

/// # Serialization Formats
///
/// TOML is notably absent: its arrays cannot mix the string and integer
/// entries of [crate::PinEntry] lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationFormat {
    Json,
    Yaml,
}
impl SerializationFormat {
    /// Infer the format from the extension of `fname`: `.json`, or `.yaml`/`.yml`
    pub fn from_path(fname: impl AsRef<Path>) -> Option<Self> {
        let ext = fname.as_ref().extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
    /// Render `cfg` to a string
    pub fn to_string(&self, cfg: &PinConfig) -> PinResult<String> {
        let s = match *self {
            Self::Json => serde_json::to_string_pretty(cfg)?,
            Self::Yaml => serde_yaml::to_string(cfg)?,
        };
        Ok(s)
    }
    /// Load a [PinConfig] from string `s`.
    /// Sides missing from `s` are an error; fields missing from a side take their defaults.
    pub fn from_str(&self, s: &str) -> PinResult<PinConfig> {
        let cfg = match *self {
            Self::Json => serde_json::from_str(s)?,
            Self::Yaml => serde_yaml::from_str(s)?,
        };
        Ok(cfg)
    }
    /// Save `cfg` to file `fname`
    pub fn save(&self, cfg: &PinConfig, fname: impl AsRef<Path>) -> PinResult<()> {
        let mut file = BufWriter::new(std::fs::File::create(fname)?);
        match *self {
            Self::Json => serde_json::to_writer_pretty(&mut file, cfg)?,
            Self::Yaml => serde_yaml::to_writer(&mut file, cfg)?,
        }
        file.flush()?;
        Ok(())
    }
    /// Load a [PinConfig] from file `fname`
    pub fn open(&self, fname: impl AsRef<Path>) -> PinResult<PinConfig> {
        let file = BufReader::new(std::fs::File::open(fname)?);
        let cfg = match *self {
            Self::Json => serde_json::from_reader(file)?,
            Self::Yaml => serde_yaml::from_reader(file)?,
        };
        Ok(cfg)
    }
}

impl PinConfig {
    /// Save to file `fname`, in the format implied by its extension
    pub fn save(&self, fname: impl AsRef<Path>) -> PinResult<()> {
        let fmt = format_of(fname.as_ref())?;
        fmt.save(self, fname)
    }
    /// Load from file `fname`, in the format implied by its extension
    pub fn open(fname: impl AsRef<Path>) -> PinResult<Self> {
        let fmt = format_of(fname.as_ref())?;
        fmt.open(fname)
    }
    /// JSON schema of the serialized form
    pub fn schema() -> RootSchema {
        schemars::schema_for!(PinConfig)
    }
}

fn format_of(fname: &Path) -> PinResult<SerializationFormat> {
    match SerializationFormat::from_path(fname) {
        Some(fmt) => Ok(fmt),
        None => {
            let msg = format!("cannot infer serialization format of {:?}", fname);
            Err(crate::PinError::Boxed(msg.into()))
        }
    }
}
