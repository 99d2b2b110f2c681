//! Document metadata and theorem-like environment discovery.
//!
//! Scholarly sources declare front-matter through dedicated macros and
//! theorem-like environments through `\newtheorem`. Both are collected from
//! the parse tree: the metadata feeds reporting, the theorem names extend
//! the marker's allow-list.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::warn;

use crate::error::{EditError, Result};
use crate::tex::node::{NodeKind, TexNode, walk};

/// Front-matter macros worth collecting.
pub const METADATA_FIELDS: [&str; 10] = [
    "title",
    "author",
    "address",
    "email",
    "thanks",
    "subjclass",
    "keywords",
    "datereceived",
    "daterevised",
    "abstract",
];

/// Fields that must appear exactly once in a well-formed source.
pub const UNIQUE_FIELDS: [&str; 5] = ["title", "subjclass", "datereceived", "keywords", "abstract"];

/// Collected front matter: field name -> verbatim occurrences.
pub type Metadata = IndexMap<&'static str, Vec<String>>;

/// Collects every metadata macro (and the `abstract` environment), warning
/// when a unique field does not appear exactly once.
pub fn collect_metadata(nodes: &[TexNode], src: &str) -> Metadata {
    let mut metadata: Metadata = METADATA_FIELDS.iter().map(|f| (*f, Vec::new())).collect();
    walk(nodes, &mut |node| {
        let name = match &node.kind {
            NodeKind::Macro { name } => name.as_str(),
            NodeKind::Environment { name, .. } => name.as_str(),
            _ => return,
        };
        if let Some(field) = METADATA_FIELDS.iter().copied().find(|f| *f == name) {
            if let Some(bucket) = metadata.get_mut(field) {
                bucket.push(node.verbatim(src).to_string());
            }
        }
    });
    for field in UNIQUE_FIELDS {
        let count = metadata.get(field).map_or(0, Vec::len);
        if count != 1 {
            warn!(field, count, "unique metadata field count is not 1");
        }
    }
    metadata
}

/// Names of theorem-like environments declared with `\newtheorem`.
///
/// `\newtheorem{theorem}[...]{Theorem}` declares `theorem`; the first braced
/// argument is the environment name. A `\newtheorem` with no braced
/// argument is a malformed source.
pub fn enunciations(nodes: &[TexNode], src: &str) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    let mut failure: Option<EditError> = None;
    walk(nodes, &mut |node| {
        if failure.is_some() {
            return;
        }
        if let NodeKind::Macro { name } = &node.kind {
            if name == "newtheorem" {
                match first_braced_arg(node.verbatim(src)) {
                    Some(arg) => {
                        names.insert(arg.trim_end_matches('*').to_string());
                    }
                    None => {
                        failure = Some(EditError::MissingMacroArgument {
                            name: "newtheorem".into(),
                        });
                    }
                }
            }
        }
    });
    match failure {
        Some(err) => Err(err),
        None => Ok(names),
    }
}

/// Interior of the first balanced `{...}` in `verbatim`.
fn first_braced_arg(verbatim: &str) -> Option<&str> {
    let open = verbatim.find('{')?;
    let bytes = verbatim.as_bytes();
    let mut depth = 0usize;
    let mut pos = open;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'{' => {
                depth += 1;
                pos += 1;
            }
            b'}' => {
                depth -= 1;
                pos += 1;
                if depth == 0 {
                    return Some(&verbatim[open + 1..pos - 1]);
                }
            }
            _ => pos += 1,
        }
    }
    None
}
