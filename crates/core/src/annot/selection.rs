//! Selection resolver: textual context around an edit's page region.
//!
//! Annotation rectangles are imprecise at sub-character resolution, so a
//! small buffer is applied at span boundaries to keep adjacent characters
//! out of the wrong bucket.

use crate::annot::classify::ClassifiedRoot;
use crate::annot::geometry::Page;
use crate::annot::model::AnnotationType;
use crate::utils::{Rect, mid_x};

/// Calibration values for selection resolution.
///
/// The buffer is tuned against one reviewing toolchain; it is a calibration
/// value, not a protocol constant, hence configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionParams {
    /// Horizontal slack, in layout points, subtracted/added at the edges of
    /// the selected span.
    pub buffer: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self { buffer: 1.5 }
    }
}

/// Renders the selection string for a classified root, or `None` for types
/// with no meaningful page region.
///
/// Caret edits mark an insertion point:
/// `{left}<Caret></Caret>{right}` split at the caret's horizontal midpoint.
/// Span edits (Replace, StrikeOut, Highlight, Underline, Squiggly) mark a
/// region: `{left}<Type>{middle}</Type>{right}`.
///
/// Pure function of (rectangle, line box, buffer, text query); annotation
/// state is never touched.
pub fn resolve(classified: &ClassifiedRoot, page: &Page, params: &SelectionParams) -> Option<String> {
    let line = classified.line_bbox?;
    let rect = classified.rect;
    let buf = params.buffer;

    match &classified.kind {
        AnnotationType::Caret => {
            let mid = mid_x(rect);
            let left = page.text_in_rect(clamped(line, line.0, mid - buf));
            let right = page.text_in_rect(clamped(line, mid + buf, line.2));
            Some(join_parts(&[&left, "<Caret></Caret>", &right]))
        }
        AnnotationType::Replace
        | AnnotationType::StrikeOut
        | AnnotationType::Highlight
        | AnnotationType::Underline
        | AnnotationType::Squiggly => {
            let tag = classified.kind.as_str();
            let left = page.text_in_rect(clamped(line, line.0, rect.0 - buf));
            let middle = page.text_in_rect(clamped(line, rect.0 + buf / 2.0, rect.2 - buf / 2.0));
            let right = page.text_in_rect(clamped(line, rect.2 + buf, line.2));
            let tagged = format!("<{tag}>{middle}</{tag}>");
            Some(join_parts(&[&left, &tagged, &right]))
        }
        _ => None,
    }
}

/// A sub-rectangle of `line` spanning [x0, x1], clamped to the line and
/// collapsed to zero width when the span is inverted.
fn clamped(line: Rect, x0: f64, x1: f64) -> Rect {
    let x0 = x0.max(line.0);
    let x1 = x1.min(line.2).max(x0);
    (x0, line.1, x1, line.3)
}

fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
