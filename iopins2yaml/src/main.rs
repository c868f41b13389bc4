//! # iopins2yaml
//!
//! Pin-Placement Directive to YAML Converter
//!

use clap::Parser;
use log::info;
use std::error::Error;
use std::io::Write;

use iopins21::{PinConfig, SerializationFormat};

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// Pin-Placement Directive to YAML Converter
#[derive(Parser)]
struct ProgramOptions {
    /// Directive Input File
    #[clap(short = 'i', long, default_value = "")]
    input: String,
    /// Inline Directive Text, used in place of an input file
    #[clap(short = 'd', long)]
    directive: Option<String>,
    /// Output File. Writes to stdout if empty.
    #[clap(short = 'o', long, default_value = "")]
    output: String,
    /// Write JSON instead of YAML
    #[clap(long)]
    json: bool,
    /// Write normalized directive text instead of YAML
    #[clap(long, conflicts_with = "json")]
    canonical: bool,
    /// Write the JSON schema of the YAML/JSON output, and ignore all input
    #[clap(long)]
    schema: bool,
    /// Verbose Output Mode
    #[clap(short, long)]
    verbose: bool,
}

/// The main entry point.
/// All logic is offloaded to `_main` for sake of testing.
fn main() -> Result<(), Box<dyn Error>> {
    let options = ProgramOptions::parse();
    let level = match options.verbose {
        true => "info",
        false => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    _main(&options)
}

/// All the real logic, with `ProgramOptions` argument for sake of testing
fn _main(options: &ProgramOptions) -> Result<(), Box<dyn Error>> {
    if options.schema {
        let schema = serde_json::to_string_pretty(&PinConfig::schema())?;
        return emit(&schema, options);
    }
    // Collect the directive source, from the command line or from file
    let src = match &options.directive {
        Some(d) => d.clone(),
        None if options.input.is_empty() => {
            return Err("one of --input or --directive is required".into())
        }
        None => std::fs::read_to_string(&options.input)?,
    };

    // Parse it. Deprecation warnings are reported through the logger.
    let cfg = iopins21::parse_str(&src)?;
    let text = render(&cfg, options)?;
    emit(&text, options)
}

/// Write `text` to the output file, or to stdout if none is specified
fn emit(text: &str, options: &ProgramOptions) -> Result<(), Box<dyn Error>> {
    if options.output.is_empty() {
        std::io::stdout().write_all(text.as_bytes())?;
    } else {
        std::fs::write(&options.output, text)?;
        info!("wrote {:?}", &options.output);
    }
    Ok(())
}

/// Render `cfg` in the format requested by `options`
fn render(cfg: &PinConfig, options: &ProgramOptions) -> Result<String, Box<dyn Error>> {
    if options.canonical {
        return Ok(iopins21::write::to_string(cfg)?);
    }
    let fmt = match options.json {
        true => SerializationFormat::Json,
        false => SerializationFormat::Yaml,
    };
    Ok(fmt.to_string(cfg)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iopins21::SerializationFormat::Yaml;

    #[test]
    fn roundtrip_to_golden_file() -> Result<(), Box<dyn Error>> {
        let golden_input_path = resource("pins.cfg");
        let golden_output_path = resource("pins.golden.yaml");
        let output_path = std::env::temp_dir().join("iopins2yaml_pins.yaml");

        let options = ProgramOptions {
            input: golden_input_path,
            directive: None,
            output: output_path.to_string_lossy().into(),
            json: false,
            canonical: false,
            schema: false,
            verbose: true,
        };

        // Run the main function, producing file `output_path`
        _main(&options)?;
        // Read back what it wrote to disk
        let readback: PinConfig = Yaml.open(&output_path)?;

        // NOTE: Uncomment to overwrite the golden data
        // Yaml.save(&readback, &golden_output_path)?;

        // And compare the generated data to the golden version.
        let golden: PinConfig = Yaml.open(&golden_output_path)?;
        assert_eq!(readback, golden);
        Ok(())
    }

    #[test]
    fn it_writes_canonical_directives() -> Result<(), Box<dyn Error>> {
        let output_path = std::env::temp_dir().join("iopins2yaml_inline.cfg");
        let options = ProgramOptions {
            input: String::new(),
            directive: Some("#BUS_SORT #ER b a".into()),
            output: output_path.to_string_lossy().into(),
            json: false,
            canonical: true,
            schema: false,
            verbose: false,
        };
        _main(&options)?;
        let readback = std::fs::read_to_string(&output_path)?;
        assert_eq!(
            readback,
            "#N @bit_major\n#ER @bit_major b a\n#W @bit_major\n#S @bit_major\n"
        );
        Ok(())
    }

    #[test]
    fn it_fails_without_input() {
        let options = ProgramOptions {
            input: String::new(),
            directive: None,
            output: String::new(),
            json: true,
            canonical: false,
            schema: false,
            verbose: false,
        };
        assert!(_main(&options).is_err());
    }

    #[test]
    fn it_forwards_syntax_errors() {
        let options = ProgramOptions {
            input: String::new(),
            directive: Some("orphan #N".into()),
            output: String::new(),
            json: true,
            canonical: false,
            schema: false,
            verbose: false,
        };
        let err = _main(&options).unwrap_err();
        assert!(format!("{}", err).contains("before any direction"));
    }

    #[test]
    fn it_writes_schema() -> Result<(), Box<dyn Error>> {
        let output_path = std::env::temp_dir().join("iopins2yaml_schema.json");
        let options = ProgramOptions {
            input: String::new(),
            directive: None,
            output: output_path.to_string_lossy().into(),
            json: false,
            canonical: false,
            schema: true,
            verbose: false,
        };
        _main(&options)?;
        let schema: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output_path)?)?;
        assert_eq!(schema["title"], "PinConfig");
        Ok(())
    }

    /// Grab the full path of resource-file `fname`
    fn resource(rname: &str) -> String {
        format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), rname)
    }
}
