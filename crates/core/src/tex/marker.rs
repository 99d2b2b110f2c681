//! TeX node marker: wraps markable units in position-reporting directives.
//!
//! Inside allow-listed structural regions, every whitespace-bounded word and
//! every inline-math span is wrapped in a numbered `\markbox` call. When the
//! instrumented document is typeset, each call writes the unit's box metrics
//! and device-space start/end coordinates to the auxiliary log decoded by
//! [`crate::tex::boxlog`].

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{EditError, Result};
use crate::tex::node::{NodeKind, TexNode, verbatim_join};

/// Structural regions that are always safe to mark inside.
pub const DEFAULT_MARK_ENVIRONMENTS: [&str; 8] = [
    "document",
    "proof",
    "enumerate",
    "itemize",
    "thebibliography",
    "biblist",
    "bibdiv",
    "bibsec",
];

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").expect("static regex"));

/// Result of one marking pass.
#[derive(Debug)]
pub struct MarkOutcome {
    /// The instrumented document region, `\begin{document}...\end{document}`
    /// included.
    pub marked: String,
    /// Number of `\markbox` units inserted; the box log must account for
    /// every one of them.
    pub unit_count: usize,
    /// Non-fatal notes, one per environment left opaque.
    pub diagnostics: Vec<String>,
}

/// Marks every markable unit under `document`, which must be the document
/// environment node of a round-trip-verified parse.
pub fn mark_document(
    src: &str,
    document: &TexNode,
    allowed: &BTreeSet<String>,
) -> Result<MarkOutcome> {
    let mut marker = Marker {
        src,
        allowed,
        counter: 0,
        out: String::with_capacity(src.len() * 2),
        diagnostics: Vec::new(),
    };
    marker.mark_node(document)?;
    Ok(MarkOutcome {
        marked: marker.out,
        unit_count: marker.counter,
        diagnostics: marker.diagnostics,
    })
}

/// Explicit traversal state: the unit counter and output buffer travel with
/// the walk instead of hiding in captured closures.
struct Marker<'s> {
    src: &'s str,
    allowed: &'s BTreeSet<String>,
    counter: usize,
    out: String,
    diagnostics: Vec<String>,
}

impl Marker<'_> {
    fn next_unit(&mut self, math: bool) -> String {
        let id = self.counter;
        self.counter += 1;
        if math {
            format!("m{id}")
        } else {
            id.to_string()
        }
    }

    fn mark_node(&mut self, node: &TexNode) -> Result<()> {
        match &node.kind {
            NodeKind::Environment { name, children } => {
                let verbatim = node.verbatim(self.src);
                // Trust no environment the parser hands us: its pieces must
                // reassemble to the exact input before we take it apart.
                let reassembled = format!(
                    "\\begin{{{name}}}{}\\end{{{name}}}",
                    verbatim_join(children, self.src)
                );
                if verbatim != reassembled {
                    return Err(EditError::LossyParse {
                        context: format!("environment {name} does not reassemble verbatim"),
                    });
                }
                if self.allowed.contains(name.as_str()) {
                    self.out.push_str(&format!("\\begin{{{name}}}"));
                    for child in children {
                        self.mark_node(child)?;
                    }
                    self.out.push_str(&format!("\\end{{{name}}}"));
                } else {
                    self.diagnostics
                        .push(format!("environment {name} left opaque"));
                    self.out.push_str(verbatim);
                }
                Ok(())
            }
            NodeKind::Text => {
                self.mark_words(node.verbatim(self.src));
                Ok(())
            }
            NodeKind::MathInline => {
                let id = self.next_unit(true);
                let verbatim = node.verbatim(self.src);
                self.out.push_str(&format!("\\markbox{{{id}}}{{{verbatim}}}"));
                Ok(())
            }
            // Display math, macro invocations, bare groups and comments are
            // not subdivided further.
            NodeKind::MathDisplay | NodeKind::Macro { .. } | NodeKind::Group | NodeKind::Comment => {
                self.out.push_str(node.verbatim(self.src));
                Ok(())
            }
        }
    }

    /// Wraps every maximal alphabetic token bounded by whitespace on both
    /// sides. Tokens touching the ends of the run, punctuation or braces
    /// are left alone; their layout context is not theirs alone to report.
    fn mark_words(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let mut last = 0usize;
        let mut marked = 0usize;
        for m in WORD.find_iter(text) {
            let before_ws = m
                .start()
                .checked_sub(1)
                .is_some_and(|i| bytes[i].is_ascii_whitespace());
            let after_ws = bytes
                .get(m.end())
                .is_some_and(|b| b.is_ascii_whitespace());
            if !(before_ws && after_ws) {
                continue;
            }
            let id = self.next_unit(false);
            self.out.push_str(&text[last..m.start()]);
            self.out
                .push_str(&format!("\\markbox{{{id}}}{{{}}}", m.as_str()));
            last = m.end();
            marked += 1;
        }
        self.out.push_str(&text[last..]);
        if marked > 0 {
            debug!(marked, "marked words in text run");
        }
    }
}
