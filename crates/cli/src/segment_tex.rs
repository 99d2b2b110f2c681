//! segment-tex - Instrument a TeX source and map its words to page positions.
//!
//! Parses the source, marks every word and inline-math span inside safe
//! regions, typesets the original and the instrumented copies, verifies the
//! renders match within tolerance, and decodes the box log into per-page
//! rectangles.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser};
use corrigenda_core::tex::{SegmentParams, segment_source};

/// Segment a TeX source into page-positioned word and math units.
#[derive(Parser, Debug)]
#[command(name = "segment-tex")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the .tex source
    input: PathBuf,

    /// Directory for typeset artifacts, logs and results
    #[arg(short, long, default_value = "tmp_segmentsource")]
    output_dir: PathBuf,

    /// Rendering resolution for the page differ
    #[arg(long, default_value_t = 175)]
    dpi: u32,

    /// Per-page pixel difference accepted as rendering noise
    #[arg(long, default_value_t = 50_000)]
    pixel_tolerance: u32,

    /// Number of pdflatex passes per document
    #[arg(long, default_value_t = 2)]
    passes: u32,

    /// Per-tool wall-clock limit in seconds
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,

    /// Use debug logging level
    #[arg(short, long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let stem = args
        .input
        .file_stem()
        .context("input path has no file stem")?
        .to_string_lossy()
        .into_owned();

    let params = SegmentParams {
        dpi: args.dpi,
        pixel_tolerance: args.pixel_tolerance,
        typeset_passes: args.passes,
        tool_timeout: Duration::from_secs(args.timeout_secs),
        ..SegmentParams::default()
    };

    let outcome = segment_source(&source, &stem, &args.output_dir, &params)?;

    let rects_path = args.output_dir.join(format!("{stem}_word_boxes.json"));
    fs::write(&rects_path, serde_json::to_string_pretty(&outcome.rects)?)
        .with_context(|| format!("writing {}", rects_path.display()))?;

    tracing::info!(
        marked = outcome.unit_count,
        kept = outcome.report.kept(),
        dropped = outcome.report.dropped.len(),
        rects = %rects_path.display(),
        "segmentation complete"
    );
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
