//! Annotation stabilizer.
//!
//! Copies every raw annotation into an engine-independent value and corrects
//! caret geometry: the bounding boxes written by reviewing tools routinely
//! overshoot below the line the caret was inserted on, so the bottom edge is
//! raised to the baseline of the highest intersecting text line.

use tracing::debug;

use crate::annot::geometry::Document;
use crate::annot::model::{AnnotationType, StableAnnotation};
use crate::error::{EditError, Result};
use crate::utils::intersects;

/// Builds one [`StableAnnotation`] per raw annotation, preserving count and
/// per-page order.
///
/// Every non-`Text` annotation must sit on at least one text line; the line
/// with the smallest `y1` (the highest one, in top-down page coordinates) is
/// recorded for the selection resolver. An annotation that intersects no
/// line at all is a malformed input and fails the whole run.
///
/// Stabilization is idempotent over the raw input: only Caret rectangles
/// change, and only vertically.
pub fn stabilize(doc: &Document) -> Result<Vec<StableAnnotation>> {
    let mut stable = Vec::new();
    for page in &doc.pages {
        for annot in &page.annotations {
            let mut rect = annot.rect;
            let line_bbox = if annot.kind == AnnotationType::Text {
                // Margin notes legitimately touch no line.
                None
            } else {
                let line = page
                    .lines
                    .iter()
                    .map(|l| l.bbox)
                    .filter(|bb| intersects(annot.rect, *bb))
                    .min_by(|a, b| a.3.total_cmp(&b.3))
                    .ok_or(EditError::NoIntersectingLine {
                        xref: annot.xref,
                        pageno: page.number,
                    })?;
                if annot.kind == AnnotationType::Caret {
                    debug!(
                        xref = annot.xref,
                        from = rect.3,
                        to = line.3,
                        "raising caret bottom edge to line baseline"
                    );
                    rect.3 = line.3;
                }
                Some(line)
            };

            stable.push(StableAnnotation {
                pageno: page.number,
                kind: annot.kind.clone(),
                info: annot.info.clone(),
                xref: annot.xref,
                irt_xref: annot.irt_xref,
                rect,
                line_bbox,
            });
        }
    }
    Ok(stable)
}
