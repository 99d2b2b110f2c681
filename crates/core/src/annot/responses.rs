//! Response graph: who replied to whom.
//!
//! Reviewing tools thread conversations through the annotation `IRT`
//! (in-reply-to) reference. The graph is derived once from the stabilized
//! annotations and never mutates them.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::annot::model::{AnnotationType, StableAnnotation};

/// Responses grouped by annotation type, each group sorted by creation
/// timestamp ascending. Insertion order of the groups is preserved so the
/// grouping itself is deterministic.
pub type ResponsesByType<'a> = IndexMap<AnnotationType, Vec<&'a StableAnnotation>>;

/// Forward response map: target xref -> annotations replying to it.
#[derive(Debug)]
pub struct ResponseGraph<'a> {
    by_target: HashMap<u32, Vec<&'a StableAnnotation>>,
}

impl<'a> ResponseGraph<'a> {
    /// Indexes every annotation with a nonzero `irt_xref` under its target.
    pub fn build(annots: &'a [StableAnnotation]) -> Self {
        let mut by_target: HashMap<u32, Vec<&'a StableAnnotation>> = HashMap::new();
        for annot in annots {
            if annot.irt_xref == 0 {
                continue;
            }
            by_target.entry(annot.irt_xref).or_default().push(annot);
        }
        ResponseGraph { by_target }
    }

    /// The responses to `annot`, bucketed by type and sorted chronologically
    /// within each bucket. Roots with no responses get an empty map.
    pub fn responses_by_type(&self, annot: &StableAnnotation) -> ResponsesByType<'a> {
        let mut grouped: ResponsesByType<'a> = IndexMap::new();
        for resp in self.by_target.get(&annot.xref).into_iter().flatten() {
            grouped.entry(resp.kind.clone()).or_default().push(resp);
        }
        for bucket in grouped.values_mut() {
            bucket.sort_by(|a, b| a.info.creation_date.cmp(&b.info.creation_date));
        }
        grouped
    }
}
