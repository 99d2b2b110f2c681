//! Edit classifier: replace-pair detection and per-root edit typing.
//!
//! A reviewer authors a replacement as two linked annotations: a StrikeOut
//! over the old text and a Caret at the insertion point, one of them carrying
//! the actual comment and the other a geometry-only marker with empty
//! content. The classifier collapses such a pair into a single `Replace`
//! edit anchored on the strikeout's rectangle.

use tracing::debug;

use crate::annot::model::{AnnotationType, StableAnnotation};
use crate::annot::responses::ResponsesByType;
use crate::error::{EditError, Result};
use crate::utils::{Rect, intersects};

/// The effective type and geometry of one root annotation after
/// classification. `StableAnnotation`s themselves stay untouched; the
/// one-time `Replace` promotion happens here, by value.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRoot {
    pub kind: AnnotationType,
    pub rect: Rect,
    pub line_bbox: Option<Rect>,
}

/// Classifies one root (irt = 0) annotation against its grouped responses.
///
/// Decision procedure for "is this a replace pair":
///
/// 1. only StrikeOut or Caret roots with at least one response are eligible;
/// 2. a response of the root's own type is a malformed thread (fatal);
/// 3. more than two distinct response types is a malformed thread (fatal);
/// 4. the counterpart type must respond exactly once;
/// 5. the counterpart must intersect the root's rectangle and the root must
///    carry the comment. A counterpart with its own comment is an
///    independent annotation, not the geometry half of a pair, so the root
///    keeps its type. A pair where both halves are empty, or where only the
///    *response* carries the comment, has no defined author intent and is
///    rejected as unsupported input rather than guessed at.
///
/// On promotion the strikeout half's rectangle (and its line box) become the
/// edit's geometry, since the struck-out span is the authoritative edited
/// region, regardless of which half was the root.
pub fn classify_root(
    root: &StableAnnotation,
    responses: &ResponsesByType<'_>,
) -> Result<ClassifiedRoot> {
    let unchanged = ClassifiedRoot {
        kind: root.kind.clone(),
        rect: root.rect,
        line_bbox: root.line_bbox,
    };

    let Some(other_kind) = root.kind.replace_counterpart() else {
        return Ok(unchanged);
    };
    if responses.is_empty() {
        return Ok(unchanged);
    }

    if let Some(same) = responses.get(&root.kind) {
        return Err(EditError::MalformedTopology {
            xref: root.xref,
            msg: format!(
                "{} response(s) of the root's own type {}",
                same.len(),
                root.kind
            ),
        });
    }
    if responses.len() > 2 {
        let kinds: Vec<&str> = responses.keys().map(|k| k.as_str()).collect();
        return Err(EditError::MalformedTopology {
            xref: root.xref,
            msg: format!("responses of more than two types: {}", kinds.join(", ")),
        });
    }

    let Some(others) = responses.get(&other_kind) else {
        return Ok(unchanged);
    };
    if others.len() != 1 {
        return Ok(unchanged);
    }
    let other = others[0];

    if !intersects(root.rect, other.rect) {
        debug!(
            root = root.xref,
            other = other.xref,
            "strikeout/caret thread without geometric overlap, not a replace pair"
        );
        return Ok(unchanged);
    }

    match (!root.info.content.is_empty(), !other.info.content.is_empty()) {
        (true, false) => {}
        (true, true) => {
            debug!(
                root = root.xref,
                other = other.xref,
                "counterpart carries its own comment, not a replace pair"
            );
            return Ok(unchanged);
        }
        (false, false) => {
            return Err(EditError::UnsupportedReplacePair {
                root: root.xref,
                other: other.xref,
                msg: "both halves have empty comments".into(),
            });
        }
        (false, true) => {
            return Err(EditError::UnsupportedReplacePair {
                root: root.xref,
                other: other.xref,
                msg: "the responding half carries the comment".into(),
            });
        }
    }

    // The strikeout half owns the edited region.
    let (rect, line_bbox) = if root.kind == AnnotationType::Caret {
        (other.rect, other.line_bbox)
    } else {
        (root.rect, root.line_bbox)
    };
    Ok(ClassifiedRoot {
        kind: AnnotationType::Replace,
        rect,
        line_bbox,
    })
}
