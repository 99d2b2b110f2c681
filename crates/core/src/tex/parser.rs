//! Lossless TeX source walker.
//!
//! The parser recognizes just enough structure for marking: environments,
//! control sequences with their immediate arguments, math spans, bare
//! groups, comments and text runs. Everything it does not understand stays
//! inside a node's verbatim span, so no input byte is ever dropped or
//! reordered. [`parse`] refuses to return a tree that fails the
//! byte-for-byte round-trip check: a lossy parse would make every mark
//! position a lie.

use crate::error::{EditError, Result};
use crate::tex::node::{NodeKind, TexNode, verbatim_join};

/// Parses a whole source string into top-level nodes.
///
/// Fatal when an environment or math span is unterminated, or when the
/// reassembled verbatim of the result differs from the input.
pub fn parse(source: &str) -> Result<Vec<TexNode>> {
    let mut walker = Walker {
        src: source,
        pos: 0,
    };
    let nodes = walker.parse_nodes(None)?;
    if verbatim_join(&nodes, source) != source {
        return Err(EditError::LossyParse {
            context: "top-level reassembly differs from the input".into(),
        });
    }
    Ok(nodes)
}

struct Walker<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Walker<'s> {
    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn byte(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    /// Parses nodes until EOF or, inside an environment, until the matching
    /// `\end{...}` (left unconsumed for the caller).
    fn parse_nodes(&mut self, enclosing: Option<&str>) -> Result<Vec<TexNode>> {
        let mut nodes = Vec::new();
        while let Some(byte) = self.byte() {
            if let Some(name) = enclosing {
                if let Some(end_name) = self.peek_end_name() {
                    if end_name == name {
                        break;
                    }
                    return Err(EditError::UnbalancedEnvironment {
                        name: name.to_string(),
                        pos: self.pos,
                    });
                }
            }
            let node = match byte {
                b'%' => self.parse_comment(),
                b'\\' => self.parse_control()?,
                b'$' => self.parse_dollar_math()?,
                b'{' => self.parse_group()?,
                _ => self.parse_text(),
            };
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// The environment name if the walker sits exactly on `\end{...}`.
    fn peek_end_name(&self) -> Option<&'s str> {
        let rest = self.rest().strip_prefix("\\end{")?;
        let close = rest.find('}')?;
        Some(&rest[..close])
    }

    fn parse_comment(&mut self) -> TexNode {
        let start = self.pos;
        match self.rest().find('\n') {
            Some(nl) => self.pos += nl + 1,
            None => self.pos = self.src.len(),
        }
        TexNode {
            kind: NodeKind::Comment,
            span: start..self.pos,
        }
    }

    fn parse_text(&mut self) -> TexNode {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\\' | b'%' | b'$' | b'{' => break,
                _ => self.pos += 1,
            }
        }
        TexNode {
            kind: NodeKind::Text,
            span: start..self.pos,
        }
    }

    fn parse_control(&mut self) -> Result<TexNode> {
        if self.rest().starts_with("\\begin{") {
            return self.parse_environment();
        }
        if self.rest().starts_with("\\[") {
            return self.parse_delimited("\\[", "\\]", NodeKind::MathDisplay, "display math");
        }
        if self.rest().starts_with("\\(") {
            return self.parse_delimited("\\(", "\\)", NodeKind::MathInline, "inline math");
        }
        self.parse_macro()
    }

    fn parse_environment(&mut self) -> Result<TexNode> {
        let start = self.pos;
        self.pos += "\\begin{".len();
        let name = match self.rest().find('}') {
            Some(close) => {
                let name = self.rest()[..close].to_string();
                self.pos += close + 1;
                name
            }
            None => {
                return Err(EditError::Unterminated {
                    what: "environment name",
                    pos: start,
                });
            }
        };

        let children = self.parse_nodes(Some(&name))?;

        let closer = format!("\\end{{{name}}}");
        if !self.rest().starts_with(&closer) {
            return Err(EditError::UnbalancedEnvironment { name, pos: start });
        }
        self.pos += closer.len();
        Ok(TexNode {
            kind: NodeKind::Environment { name, children },
            span: start..self.pos,
        })
    }

    fn parse_delimited(
        &mut self,
        open: &str,
        close: &str,
        kind: NodeKind,
        what: &'static str,
    ) -> Result<TexNode> {
        let start = self.pos;
        self.pos += open.len();
        match self.rest().find(close) {
            Some(end) => {
                self.pos += end + close.len();
                Ok(TexNode {
                    kind,
                    span: start..self.pos,
                })
            }
            None => Err(EditError::Unterminated { what, pos: start }),
        }
    }

    fn parse_dollar_math(&mut self) -> Result<TexNode> {
        if self.rest().starts_with("$$") {
            return self.parse_delimited("$$", "$$", NodeKind::MathDisplay, "display math");
        }
        self.parse_delimited("$", "$", NodeKind::MathInline, "inline math")
    }

    fn parse_group(&mut self) -> Result<TexNode> {
        let start = self.pos;
        self.scan_balanced_group()?;
        Ok(TexNode {
            kind: NodeKind::Group,
            span: start..self.pos,
        })
    }

    /// A control sequence plus its immediate `[..]`/`{..}` arguments,
    /// captured as one verbatim span.
    fn parse_macro(&mut self) -> Result<TexNode> {
        let start = self.pos;
        self.pos += 1; // backslash
        let name = {
            let rest = self.rest();
            let alpha = rest
                .bytes()
                .take_while(|b| b.is_ascii_alphabetic())
                .count();
            if alpha > 0 {
                let mut len = alpha;
                if rest[len..].starts_with('*') {
                    len += 1;
                }
                self.pos += len;
                rest[..len].to_string()
            } else {
                // Single-character control symbol, e.g. `\%` or `\\`.
                match rest.chars().next() {
                    Some(c) => {
                        self.pos += c.len_utf8();
                        c.to_string()
                    }
                    None => String::new(),
                }
            }
        };

        loop {
            match self.byte() {
                Some(b'{') => self.scan_balanced_group()?,
                Some(b'[') => {
                    if !self.try_scan_bracket_arg() {
                        break;
                    }
                }
                _ => break,
            }
        }

        Ok(TexNode {
            kind: NodeKind::Macro { name },
            span: start..self.pos,
        })
    }

    /// Consumes a balanced `{...}` group, honoring backslash escapes.
    fn scan_balanced_group(&mut self) -> Result<()> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        let mut depth = 0usize;
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        self.pos = self.pos.min(bytes.len());
                        return Ok(());
                    }
                }
                _ => self.pos += 1,
            }
        }
        self.pos = start;
        Err(EditError::Unterminated {
            what: "group",
            pos: start,
        })
    }

    /// Consumes a `[...]` optional argument if it closes before EOF;
    /// otherwise leaves the position untouched (a lone `[` is just text).
    fn try_scan_bracket_arg(&mut self) -> bool {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        let mut brace_depth = 0usize;
        self.pos += 1;
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'{' => {
                    brace_depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    brace_depth = brace_depth.saturating_sub(1);
                    self.pos += 1;
                }
                b']' if brace_depth == 0 => {
                    self.pos += 1;
                    return true;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = start;
        false
    }
}
