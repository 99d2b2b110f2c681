//! Tests for the response graph and the replace-pair classifier.

use corrigenda_core::EditError;
use corrigenda_core::annot::{
    AnnotationInfo, AnnotationType, ResponseGraph, StableAnnotation, classify_root,
};

fn annot(
    xref: u32,
    kind: AnnotationType,
    irt_xref: u32,
    content: &str,
    date: &str,
    rect: (f64, f64, f64, f64),
) -> StableAnnotation {
    StableAnnotation {
        pageno: 0,
        kind,
        info: AnnotationInfo {
            content: content.to_string(),
            creation_date: date.to_string(),
            subject: String::new(),
        },
        xref,
        irt_xref,
        rect,
        line_bbox: Some((0.0, 10.0, 200.0, 20.0)),
    }
}

const ROOT_RECT: (f64, f64, f64, f64) = (10.0, 11.0, 50.0, 19.0);
const OVERLAPPING: (f64, f64, f64, f64) = (45.0, 11.0, 55.0, 19.0);
const DISJOINT: (f64, f64, f64, f64) = (120.0, 11.0, 140.0, 19.0);

#[test]
fn test_strikeout_with_empty_caret_becomes_replace() {
    let annots = vec![
        annot(1, AnnotationType::StrikeOut, 0, "fix typo", "D:1", ROOT_RECT),
        annot(2, AnnotationType::Caret, 1, "", "D:2", OVERLAPPING),
    ];
    let graph = ResponseGraph::build(&annots);
    let classified = classify_root(&annots[0], &graph.responses_by_type(&annots[0])).unwrap();
    assert_eq!(classified.kind, AnnotationType::Replace);
    // The strikeout half keeps its own geometry.
    assert_eq!(classified.rect, ROOT_RECT);
}

#[test]
fn test_caret_root_takes_strikeout_geometry() {
    let caret_line = Some((0.0, 30.0, 200.0, 40.0));
    let mut root = annot(1, AnnotationType::Caret, 0, "reword", "D:1", OVERLAPPING);
    root.line_bbox = caret_line;
    let strikeout = annot(2, AnnotationType::StrikeOut, 1, "", "D:2", ROOT_RECT);
    let annots = vec![root, strikeout];

    let graph = ResponseGraph::build(&annots);
    let classified = classify_root(&annots[0], &graph.responses_by_type(&annots[0])).unwrap();
    assert_eq!(classified.kind, AnnotationType::Replace);
    // The struck-out span is the authoritative edited region.
    assert_eq!(classified.rect, ROOT_RECT);
    assert_eq!(classified.line_bbox, Some((0.0, 10.0, 200.0, 20.0)));
}

#[test]
fn test_disjoint_pair_is_not_a_replace() {
    let annots = vec![
        annot(1, AnnotationType::StrikeOut, 0, "drop this", "D:1", ROOT_RECT),
        annot(2, AnnotationType::Caret, 1, "", "D:2", DISJOINT),
    ];
    let graph = ResponseGraph::build(&annots);
    let classified = classify_root(&annots[0], &graph.responses_by_type(&annots[0])).unwrap();
    assert_eq!(classified.kind, AnnotationType::StrikeOut);
}

#[test]
fn test_counterpart_with_own_comment_is_not_a_replace() {
    // The caret is an independent annotation, not the geometry half of a
    // pair; the strikeout keeps its type and geometry.
    let annots = vec![
        annot(1, AnnotationType::StrikeOut, 0, "drop this", "D:1", ROOT_RECT),
        annot(2, AnnotationType::Caret, 1, "its own note", "D:2", OVERLAPPING),
    ];
    let graph = ResponseGraph::build(&annots);
    let classified = classify_root(&annots[0], &graph.responses_by_type(&annots[0])).unwrap();
    assert_eq!(classified.kind, AnnotationType::StrikeOut);
    assert_eq!(classified.rect, ROOT_RECT);
}

#[test]
fn test_both_halves_empty_is_unsupported() {
    let annots = vec![
        annot(1, AnnotationType::StrikeOut, 0, "", "D:1", ROOT_RECT),
        annot(2, AnnotationType::Caret, 1, "", "D:2", OVERLAPPING),
    ];
    let graph = ResponseGraph::build(&annots);
    let err = classify_root(&annots[0], &graph.responses_by_type(&annots[0])).unwrap_err();
    assert!(matches!(
        err,
        EditError::UnsupportedReplacePair { root: 1, other: 2, .. }
    ));
}

#[test]
fn test_comment_on_responding_half_is_unsupported() {
    let annots = vec![
        annot(1, AnnotationType::StrikeOut, 0, "", "D:1", ROOT_RECT),
        annot(2, AnnotationType::Caret, 1, "use this instead", "D:2", OVERLAPPING),
    ];
    let graph = ResponseGraph::build(&annots);
    let err = classify_root(&annots[0], &graph.responses_by_type(&annots[0])).unwrap_err();
    assert!(matches!(err, EditError::UnsupportedReplacePair { .. }));
}

#[test]
fn test_same_type_response_is_malformed() {
    let annots = vec![
        annot(1, AnnotationType::StrikeOut, 0, "x", "D:1", ROOT_RECT),
        annot(2, AnnotationType::StrikeOut, 1, "", "D:2", OVERLAPPING),
    ];
    let graph = ResponseGraph::build(&annots);
    let err = classify_root(&annots[0], &graph.responses_by_type(&annots[0])).unwrap_err();
    assert!(matches!(err, EditError::MalformedTopology { xref: 1, .. }));
}

#[test]
fn test_more_than_two_response_types_is_malformed() {
    let annots = vec![
        annot(1, AnnotationType::StrikeOut, 0, "x", "D:1", ROOT_RECT),
        annot(2, AnnotationType::Caret, 1, "", "D:2", OVERLAPPING),
        annot(3, AnnotationType::Text, 1, "a", "D:3", OVERLAPPING),
        annot(4, AnnotationType::Highlight, 1, "", "D:4", OVERLAPPING),
    ];
    let graph = ResponseGraph::build(&annots);
    let err = classify_root(&annots[0], &graph.responses_by_type(&annots[0])).unwrap_err();
    assert!(matches!(err, EditError::MalformedTopology { xref: 1, .. }));
}

#[test]
fn test_text_responses_sorted_by_creation_date() {
    let annots = vec![
        annot(1, AnnotationType::StrikeOut, 0, "root", "D:20240101090000", ROOT_RECT),
        // Deliberately listed out of chronological order.
        annot(3, AnnotationType::Text, 1, "B", "D:20240101110000", OVERLAPPING),
        annot(2, AnnotationType::Text, 1, "A", "D:20240101100000", OVERLAPPING),
    ];
    let graph = ResponseGraph::build(&annots);
    let responses = graph.responses_by_type(&annots[0]);
    let texts: Vec<&str> = responses[&AnnotationType::Text]
        .iter()
        .map(|r| r.info.content.as_str())
        .collect();
    assert_eq!(texts, vec!["A", "B"]);
}

#[test]
fn test_root_without_responses_keeps_its_type() {
    let annots = vec![annot(1, AnnotationType::Caret, 0, "insert here", "D:1", ROOT_RECT)];
    let graph = ResponseGraph::build(&annots);
    let classified = classify_root(&annots[0], &graph.responses_by_type(&annots[0])).unwrap();
    assert_eq!(classified.kind, AnnotationType::Caret);
}

#[test]
fn test_non_pair_types_never_promote() {
    let annots = vec![
        annot(1, AnnotationType::Highlight, 0, "nice", "D:1", ROOT_RECT),
        annot(2, AnnotationType::Text, 1, "agreed", "D:2", OVERLAPPING),
    ];
    let graph = ResponseGraph::build(&annots);
    let classified = classify_root(&annots[0], &graph.responses_by_type(&annots[0])).unwrap();
    assert_eq!(classified.kind, AnnotationType::Highlight);
}
