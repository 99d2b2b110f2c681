//! Parse tree nodes over a TeX source string.
//!
//! Nodes never copy text: each one records the byte span it was parsed
//! from, so the verbatim form of any node is an exact slice of the source.
//! The whole tree is only trusted after the round-trip gate in
//! [`crate::tex::parser::parse`] has confirmed that concatenating the
//! top-level verbatims reproduces the source byte-for-byte.

use std::ops::Range;

/// What a node is; the span lives on [`TexNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `\begin{name}...\end{name}`, children cover the interior.
    Environment { name: String, children: Vec<TexNode> },
    /// A control sequence together with its immediate `[..]`/`{..}`
    /// arguments.
    Macro { name: String },
    /// `$...$` or `\(...\)`.
    MathInline,
    /// `$$...$$` or `\[...\]`.
    MathDisplay,
    /// A bare `{...}` group.
    Group,
    /// `%` to end of line, newline included.
    Comment,
    /// A run of ordinary characters.
    Text,
}

/// One node of the lossless parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TexNode {
    pub kind: NodeKind,
    pub span: Range<usize>,
}

impl TexNode {
    /// The exact source slice this node was parsed from.
    pub fn verbatim<'s>(&self, src: &'s str) -> &'s str {
        &src[self.span.clone()]
    }

    pub fn env_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Environment { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Concatenated verbatim form of a node list.
pub fn verbatim_join(nodes: &[TexNode], src: &str) -> String {
    nodes.iter().map(|n| n.verbatim(src)).collect()
}

/// Depth-first visit of every node, parents before children.
pub fn walk<'a>(nodes: &'a [TexNode], f: &mut impl FnMut(&'a TexNode)) {
    for node in nodes {
        f(node);
        if let NodeKind::Environment { children, .. } = &node.kind {
            walk(children, f);
        }
    }
}
