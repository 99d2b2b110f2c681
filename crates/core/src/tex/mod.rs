//! Pipeline B: TeX source -> instrumented source -> verified rendering ->
//! per-page unit rectangles.
//!
//! Stages: lossless parse (with byte-for-byte round-trip gate), allow-list
//! construction from `\newtheorem` declarations, node marking, typesetting
//! of both the original and the instrumented source, rendered-page diffing
//! as the visual-inertness oracle, and box-log decoding.

pub mod boxlog;
pub mod marker;
pub mod metadata;
pub mod node;
pub mod params;
pub mod parser;
pub mod typeset;

pub use boxlog::{DecodeReport, DropReason, PageRects, decode_log};
pub use marker::{DEFAULT_MARK_ENVIRONMENTS, MarkOutcome, mark_document};
pub use node::{NodeKind, TexNode, verbatim_join, walk};
pub use params::SegmentParams;
pub use parser::parse;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{EditError, Result};

/// Everything a segmentation run produces.
#[derive(Debug)]
pub struct SegmentOutcome {
    /// The full instrumented source as typeset.
    pub marked_source: String,
    /// Number of instrumentation units inserted.
    pub unit_count: usize,
    /// Decoded per-page rectangles.
    pub rects: PageRects,
    /// Drop accounting from the decoder.
    pub report: DecodeReport,
    /// Path of the auxiliary log within the output directory.
    pub log_path: PathBuf,
}

/// Splits the top-level node list into the preamble (everything before the
/// document environment) and the document node itself.
///
/// Exactly one top-level `document` environment is required. Nodes after
/// `\end{document}` are discarded, as the engine would ignore them anyway.
pub fn split_preamble<'a>(nodes: &'a [TexNode], src: &str) -> Result<(String, &'a TexNode)> {
    let matches: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.env_name() == Some("document"))
        .map(|(i, _)| i)
        .collect();
    if matches.len() != 1 {
        return Err(EditError::DocumentCount(matches.len()));
    }
    let idx = matches[0];
    let document = &nodes[idx];

    let preamble = verbatim_join(&nodes[..idx], src);
    let trailing = nodes.len() - idx - 1;
    if trailing > 0 {
        debug!(trailing, "discarding nodes after \\end{{document}}");
    }
    Ok((preamble, document))
}

/// Builds the instrumented source: preamble, log-file prologue, `\markbox`
/// definition, marked document.
pub fn assemble_instrumented(preamble: &str, marked_document: &str, log_name: &str) -> String {
    let prologue = format!(
        "\n\\newwrite\\markfile\n\\immediate\\openout\\markfile={log_name}\n"
    );
    let markbox_def = r"
\newcommand{\markbox}[2]{%
  \setbox0=\hbox{#2}%
  \immediate\write\markfile{#1:whd:\the\value{page}:\number\wd0:\number\ht0:\number\dp0}%
  \pdfsavepos
  \write\markfile{#1:start:\the\value{page}:\number\pdflastxpos:\number\pdflastypos}%
  #2%
  \pdfsavepos
  \write\markfile{#1:end:\the\value{page}:\number\pdflastxpos:\number\pdflastypos}%
}

";
    format!("{preamble}{prologue}{markbox_def}{marked_document}")
}

/// Runs the whole segmentation pipeline for one source file.
///
/// `stem` names the outputs inside `out_dir`: `<stem>.tex`/`.pdf` for the
/// original, `<stem>_marked.tex`/`.pdf` for the instrumented run, and
/// `boxpositions_<stem>.txt` for the auxiliary log.
pub fn segment_source(
    source: &str,
    stem: &str,
    out_dir: &Path,
    params: &SegmentParams,
) -> Result<SegmentOutcome> {
    std::fs::create_dir_all(out_dir)?;

    let nodes = parser::parse(source)?;
    info!("parse round-trip verified");

    let theorem_envs = metadata::enunciations(&nodes, source)?;
    let fields = metadata::collect_metadata(&nodes, source);
    debug!(
        theorem_envs = theorem_envs.len(),
        title = fields.get("title").map_or(0, Vec::len),
        "collected source metadata"
    );

    let (preamble, document) = split_preamble(&nodes, source)?;

    let mut allowed: BTreeSet<String> = DEFAULT_MARK_ENVIRONMENTS
        .iter()
        .map(|s| s.to_string())
        .collect();
    allowed.extend(theorem_envs);

    let outcome = mark_document(source, document, &allowed)?;
    info!(units = outcome.unit_count, "inserted instrumentation marks");
    for note in &outcome.diagnostics {
        debug!(note = %note, "marker diagnostic");
    }

    let log_name = format!("boxpositions_{stem}.txt");
    let marked_source = assemble_instrumented(&preamble, &outcome.marked, &log_name);

    let orig_name = format!("{stem}.tex");
    let marked_name = format!("{stem}_marked.tex");
    typeset::run_pdflatex(source, &orig_name, out_dir, params)?;
    typeset::run_pdflatex(&marked_source, &marked_name, out_dir, params)?;
    typeset::run_diff_pdf(
        &format!("{stem}.pdf"),
        &format!("{stem}_marked.pdf"),
        out_dir,
        params,
    )?;

    let log_path = out_dir.join(&log_name);
    let log = std::fs::read_to_string(&log_path)?;
    let (rects, report) = decode_log(&log, outcome.unit_count, params)?;

    Ok(SegmentOutcome {
        marked_source,
        unit_count: outcome.unit_count,
        rects,
        report,
        log_path,
    })
}
