//! `dtxt` CLI: check, format and convert DTXT documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Validate a document (stdin or file)
//! dtxt check -i config.dtxt
//!
//! # Rewrite in canonical compact form
//! dtxt fmt -i config.dtxt -o config.canonical.dtxt
//!
//! # Pretty-print with a 4-space indent, keeping BN(...) markers
//! dtxt fmt --indent 4 --preserve-bigint -i config.dtxt
//!
//! # Convert to tagged JSON
//! dtxt to-json -i config.dtxt
//!
//! # Compare canonical DTXT size against JSON
//! dtxt stats -i config.dtxt
//!
//! # Run a conformance fixture file
//! dtxt conformance -i tests.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dtxt_core::conformance::{load_cases, run_cases, to_json};
use dtxt_core::options::DEFAULT_MAX_DEPTH;
use dtxt_core::{DecodeOptions, EncodeOptions, Value};
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(
    name = "dtxt",
    version,
    about = "DTXT (typed JSON-superset text format) CLI",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum object/array nesting depth accepted when decoding
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a DTXT document
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Rewrite a DTXT document in canonical form
    Fmt {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Multi-line output with a two-space indent
        #[arg(long)]
        pretty: bool,
        /// Indent unit for multi-line output: a space count, `tab`, or literal spaces/tabs
        #[arg(long)]
        indent: Option<String>,
        /// Write big integers as BN(...) so they decode back as big integers
        #[arg(long)]
        preserve_bigint: bool,
    },
    /// Convert a DTXT document to pretty-printed JSON
    ToJson {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compare canonical DTXT size with the equivalent JSON
    Stats {
        /// Input DTXT file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Run a JSON conformance fixture against the decoder
    Conformance {
        /// Fixture file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let decode_options = DecodeOptions::default().with_max_depth(cli.max_depth);

    match cli.command {
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            let doc = decode(&text, &decode_options)?;
            let members = doc.as_object().map_or(0, |map| map.len());
            println!("OK: {members} top-level keys");
        }
        Commands::Fmt {
            input,
            output,
            pretty,
            indent,
            preserve_bigint,
        } => {
            let text = read_input(input.as_deref())?;
            let doc = decode(&text, &decode_options)?;
            let options = match (indent.as_deref(), pretty) {
                (Some(raw), _) => EncodeOptions::pretty(parse_indent(raw)?),
                (None, true) => EncodeOptions::pretty("  "),
                (None, false) => EncodeOptions::compact(),
            }
            .with_bigint_constructor(preserve_bigint);
            let mut formatted =
                dtxt_core::encode_with(&doc, &options).context("Failed to encode DTXT")?;
            formatted.push('\n');
            write_output(output.as_deref(), &formatted)?;
        }
        Commands::ToJson { input, output } => {
            let text = read_input(input.as_deref())?;
            let doc = decode(&text, &decode_options)?;
            let mut json = serde_json::to_string_pretty(&to_json(&doc))?;
            json.push('\n');
            write_output(output.as_deref(), &json)?;
        }
        Commands::Stats { input } => {
            let text = read_input(input.as_deref())?;
            let doc = decode(&text, &decode_options)?;
            let dtxt = dtxt_core::encode(&doc).context("Failed to encode DTXT")?;
            let json = serde_json::to_string(&to_json(&doc))?;
            let dtxt_bytes = dtxt.len();
            let json_bytes = json.len();
            let ratio = if json_bytes > 0 {
                (1.0 - (dtxt_bytes as f64 / json_bytes as f64)) * 100.0
            } else {
                0.0
            };
            println!("JSON size:  {} bytes", json_bytes);
            println!("DTXT size:  {} bytes", dtxt_bytes);
            println!("Reduction:  {:.1}%", ratio);
        }
        Commands::Conformance { input } => {
            let fixture = read_input(input.as_deref())?;
            let cases = load_cases(&fixture).context("Failed to parse conformance fixture")?;
            println!("Running {} conformance tests...", cases.len());
            let report = run_cases(&cases);
            for result in &report.results {
                println!("{result}");
            }
            println!("\n{report}");
            if !report.all_passed() {
                process::exit(1);
            }
        }
    }

    Ok(())
}

fn decode(text: &str, options: &DecodeOptions) -> Result<Value> {
    dtxt_core::decode_with(text, options).context("Failed to decode DTXT")
}

/// Resolve the `--indent` argument to an indent unit.
///
/// - `4` produces four spaces
/// - `tab` (or a literal `\t`) produces a tab
/// - a literal run of spaces/tabs is used as-is
fn parse_indent(raw: &str) -> Result<String> {
    if let Ok(width) = raw.parse::<usize>() {
        if width == 0 {
            anyhow::bail!("Indent width must be at least 1");
        }
        return Ok(" ".repeat(width));
    }
    match raw {
        "tab" | "\\t" => Ok("\t".to_string()),
        unit if !unit.is_empty() && unit.chars().all(|c| c == ' ' || c == '\t') => {
            Ok(unit.to_string())
        }
        other => anyhow::bail!(
            "Invalid indent: '{}'. Use a space count, 'tab', or spaces/tabs",
            other
        ),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
