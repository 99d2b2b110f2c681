//! Tests for the annotation stabilizer.

use corrigenda_core::EditError;
use corrigenda_core::annot::{
    AnnotationInfo, AnnotationType, Document, Page, RawAnnotation, TextLine, stabilize,
};

fn info(content: &str, date: &str) -> AnnotationInfo {
    AnnotationInfo {
        content: content.to_string(),
        creation_date: date.to_string(),
        subject: String::new(),
    }
}

fn line(bbox: (f64, f64, f64, f64)) -> TextLine {
    TextLine {
        bbox,
        words: Vec::new(),
    }
}

fn page(number: u32, lines: Vec<TextLine>, annotations: Vec<RawAnnotation>) -> Page {
    Page {
        number,
        width: 612.0,
        height: 792.0,
        lines,
        annotations,
    }
}

fn annot(xref: u32, kind: AnnotationType, rect: (f64, f64, f64, f64)) -> RawAnnotation {
    RawAnnotation {
        xref,
        kind,
        info: info("", "D:20240101000000"),
        irt_xref: 0,
        rect,
    }
}

#[test]
fn test_caret_raised_to_highest_intersecting_baseline() {
    // Two stacked lines; the caret overshoots from the upper into the lower.
    let doc = Document {
        pages: vec![page(
            0,
            vec![line((0.0, 10.0, 100.0, 20.0)), line((0.0, 30.0, 100.0, 40.0))],
            vec![annot(7, AnnotationType::Caret, (10.0, 15.0, 14.0, 35.0))],
        )],
    };
    let stable = stabilize(&doc).unwrap();
    assert_eq!(stable.len(), 1);
    // Bottom edge pulled up to the baseline of the higher line (y1 = 20).
    assert_eq!(stable[0].rect, (10.0, 15.0, 14.0, 20.0));
    assert_eq!(stable[0].line_bbox, Some((0.0, 10.0, 100.0, 20.0)));
}

#[test]
fn test_caret_invariant_rect_bottom_equals_line_baseline() {
    let doc = Document {
        pages: vec![page(
            0,
            vec![line((0.0, 50.0, 300.0, 60.0))],
            vec![
                annot(1, AnnotationType::Caret, (40.0, 52.0, 44.0, 68.0)),
                annot(2, AnnotationType::Caret, (80.0, 52.0, 84.0, 59.0)),
            ],
        )],
    };
    for stable in stabilize(&doc).unwrap() {
        assert_eq!(stable.rect.3, stable.line_bbox.unwrap().3);
    }
}

#[test]
fn test_stabilize_is_idempotent() {
    let doc = Document {
        pages: vec![page(
            0,
            vec![line((0.0, 10.0, 100.0, 20.0))],
            vec![
                annot(1, AnnotationType::Caret, (10.0, 12.0, 14.0, 28.0)),
                annot(2, AnnotationType::StrikeOut, (20.0, 11.0, 60.0, 19.0)),
            ],
        )],
    };
    let first = stabilize(&doc).unwrap();
    let second = stabilize(&doc).unwrap();
    assert_eq!(first, second);

    // Feeding corrected rectangles back in changes nothing further.
    let refed = Document {
        pages: vec![page(
            0,
            vec![line((0.0, 10.0, 100.0, 20.0))],
            first
                .iter()
                .map(|s| RawAnnotation {
                    xref: s.xref,
                    kind: s.kind.clone(),
                    info: s.info.clone(),
                    irt_xref: s.irt_xref,
                    rect: s.rect,
                })
                .collect(),
        )],
    };
    let third = stabilize(&refed).unwrap();
    assert_eq!(first, third);
}

#[test]
fn test_count_and_order_preserved() {
    let doc = Document {
        pages: vec![page(
            3,
            vec![line((0.0, 10.0, 100.0, 20.0))],
            vec![
                annot(5, AnnotationType::StrikeOut, (1.0, 11.0, 20.0, 19.0)),
                annot(3, AnnotationType::Highlight, (30.0, 11.0, 50.0, 19.0)),
                annot(9, AnnotationType::Underline, (60.0, 11.0, 80.0, 19.0)),
            ],
        )],
    };
    let stable = stabilize(&doc).unwrap();
    assert_eq!(
        stable.iter().map(|s| s.xref).collect::<Vec<_>>(),
        vec![5, 3, 9]
    );
    assert!(stable.iter().all(|s| s.pageno == 3));
    // Non-caret rectangles are untouched.
    assert_eq!(stable[0].rect, (1.0, 11.0, 20.0, 19.0));
}

#[test]
fn test_annotation_off_any_line_is_fatal() {
    let doc = Document {
        pages: vec![page(
            2,
            vec![line((0.0, 10.0, 100.0, 20.0))],
            vec![annot(11, AnnotationType::StrikeOut, (0.0, 500.0, 40.0, 510.0))],
        )],
    };
    let err = stabilize(&doc).unwrap_err();
    assert!(matches!(
        err,
        EditError::NoIntersectingLine { xref: 11, pageno: 2 }
    ));
}

#[test]
fn test_text_note_in_margin_is_fine() {
    let doc = Document {
        pages: vec![page(
            0,
            vec![line((0.0, 10.0, 100.0, 20.0))],
            vec![annot(4, AnnotationType::Text, (500.0, 700.0, 520.0, 720.0))],
        )],
    };
    let stable = stabilize(&doc).unwrap();
    assert_eq!(stable[0].line_bbox, None);
    assert_eq!(stable[0].rect, (500.0, 700.0, 520.0, 720.0));
}
