//! Pipeline A: annotated PDF markup -> canonical [`Edit`] sequence.
//!
//! Stages: stabilize raw annotations, build the response graph, classify
//! each root (collapsing replace pairs), resolve text selections.

pub mod classify;
pub mod geometry;
pub mod model;
pub mod responses;
pub mod selection;
pub mod stable;

pub use classify::{ClassifiedRoot, classify_root};
pub use geometry::{Document, Page, TextLine, Word};
pub use model::{AnnotationInfo, AnnotationType, Edit, EditMessage, RawAnnotation, StableAnnotation};
pub use responses::{ResponseGraph, ResponsesByType};
pub use selection::SelectionParams;
pub use stable::stabilize;

use tracing::info;

use crate::error::Result;

/// Runs the whole annotation pipeline over one document dump.
///
/// Exactly one edit is produced per root annotation; responses (text
/// comments and the geometry-only half of a replace pair) never root an
/// edit of their own.
pub fn extract_edits(doc: &Document, params: &SelectionParams) -> Result<Vec<Edit>> {
    let annots = stabilize(doc)?;
    let graph = ResponseGraph::build(&annots);

    let mut edits = Vec::new();
    for annot in &annots {
        if !annot.is_root() {
            continue;
        }
        let responses = graph.responses_by_type(annot);
        let classified = classify_root(annot, &responses)?;

        let text_responses: Vec<String> = responses
            .get(&AnnotationType::Text)
            .map(|bucket| bucket.iter().map(|r| r.info.content.clone()).collect())
            .unwrap_or_default();

        let selection = doc
            .page(annot.pageno)
            .and_then(|page| selection::resolve(&classified, page, params));

        edits.push(Edit {
            pageno: annot.pageno,
            kind: classified.kind,
            message: EditMessage {
                comment: annot.info.content.clone(),
                responses: text_responses,
            },
            selection,
        });
    }
    info!(
        edits = edits.len(),
        annotations = annots.len(),
        "extracted edits"
    );
    Ok(edits)
}
