//! extract-edits - Extract edit annotations from a reviewed PDF dump.
//!
//! Consumes the JSON page/annotation dump produced by the PDF extraction
//! step (page text geometry plus raw annotations) and emits the canonical
//! edit list as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use corrigenda_core::annot::{Document, SelectionParams, extract_edits};

/// Extract typed edit records from an annotated document dump.
#[derive(Parser, Debug)]
#[command(name = "extract-edits")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON document dump (pages, text lines, raw annotations)
    input: PathBuf,

    /// Write the edit list here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Horizontal slack in points applied at selection span boundaries
    #[arg(long, default_value_t = 1.5)]
    buffer: f64,

    /// Use debug logging level
    #[arg(short, long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let doc: Document = serde_json::from_str(&raw)
        .with_context(|| format!("parsing document dump {}", args.input.display()))?;

    let params = SelectionParams {
        buffer: args.buffer,
    };
    let edits = extract_edits(&doc, &params)?;

    let json = serde_json::to_string_pretty(&edits)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
