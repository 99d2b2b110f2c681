//! Tests for the selection resolver and the end-to-end edit extraction.

use corrigenda_core::annot::{
    AnnotationInfo, AnnotationType, Document, Page, RawAnnotation, SelectionParams, TextLine,
    Word, extract_edits,
};

fn word(text: &str, x0: f64, x1: f64) -> Word {
    Word {
        bbox: (x0, 10.0, x1, 20.0),
        text: text.to_string(),
    }
}

/// One line reading "Next we prove that (1) is a consequence of".
fn sample_line() -> TextLine {
    TextLine {
        bbox: (0.0, 10.0, 430.0, 20.0),
        words: vec![
            word("Next", 0.0, 40.0),
            word("we", 45.0, 65.0),
            word("prove", 70.0, 115.0),
            word("that", 120.0, 155.0),
            word("(1)", 160.0, 185.0),
            word("is", 190.0, 205.0),
            word("a", 210.0, 220.0),
            word("consequence", 225.0, 330.0),
            word("of", 335.0, 355.0),
        ],
    }
}

fn doc_with(annotations: Vec<RawAnnotation>) -> Document {
    Document {
        pages: vec![Page {
            number: 1,
            width: 612.0,
            height: 792.0,
            lines: vec![sample_line()],
            annotations,
        }],
    }
}

fn raw(
    xref: u32,
    kind: AnnotationType,
    irt_xref: u32,
    content: &str,
    date: &str,
    rect: (f64, f64, f64, f64),
) -> RawAnnotation {
    RawAnnotation {
        xref,
        kind,
        info: AnnotationInfo {
            content: content.to_string(),
            creation_date: date.to_string(),
            subject: String::new(),
        },
        irt_xref,
        rect,
    }
}

#[test]
fn test_strikeout_selection_with_context() {
    // Strikeout over "(1)".
    let doc = doc_with(vec![raw(
        1,
        AnnotationType::StrikeOut,
        0,
        "link the equation",
        "D:1",
        (158.0, 11.0, 187.0, 19.0),
    )]);
    let edits = extract_edits(&doc, &SelectionParams::default()).unwrap();
    assert_eq!(edits.len(), 1);
    assert_eq!(
        edits[0].selection.as_deref(),
        Some("Next we prove that <StrikeOut>(1)</StrikeOut> is a consequence of")
    );
}

#[test]
fn test_replace_pair_selection_and_count_invariant() {
    // Two annotations collapse into exactly one Replace edit.
    let doc = doc_with(vec![
        raw(
            1,
            AnnotationType::StrikeOut,
            0,
            "fix typo",
            "D:1",
            (158.0, 11.0, 187.0, 19.0),
        ),
        raw(2, AnnotationType::Caret, 1, "", "D:2", (180.0, 11.0, 190.0, 19.0)),
    ]);
    let edits = extract_edits(&doc, &SelectionParams::default()).unwrap();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].kind, AnnotationType::Replace);
    assert_eq!(edits[0].message.comment, "fix typo");
    assert_eq!(
        edits[0].selection.as_deref(),
        Some("Next we prove that <Replace>(1)</Replace> is a consequence of")
    );
}

#[test]
fn test_caret_selection_marks_insertion_point() {
    // Caret between "that" and "(1)": midpoint at 157.5.
    let doc = doc_with(vec![raw(
        1,
        AnnotationType::Caret,
        0,
        "insert a reference",
        "D:1",
        (155.0, 11.0, 160.0, 19.0),
    )]);
    let edits = extract_edits(&doc, &SelectionParams::default()).unwrap();
    assert_eq!(
        edits[0].selection.as_deref(),
        Some("Next we prove that <Caret></Caret> (1) is a consequence of")
    );
}

#[test]
fn test_buffer_keeps_adjacent_word_out_of_the_span() {
    // The strikeout rectangle overhangs past "(1)" toward "is"; the buffer
    // at the span boundary must keep "is" in the right-hand context.
    let doc = doc_with(vec![raw(
        1,
        AnnotationType::StrikeOut,
        0,
        "",
        "D:1",
        (158.0, 11.0, 192.0, 19.0),
    )]);
    let params = SelectionParams { buffer: 4.0 };
    let edits = extract_edits(&doc, &params).unwrap();
    let selection = edits[0].selection.as_deref().unwrap();
    assert!(selection.contains("<StrikeOut>(1)</StrikeOut>"), "{selection}");
    assert!(selection.ends_with("is a consequence of"), "{selection}");
}

#[test]
fn test_highlight_uses_its_own_tag() {
    let doc = doc_with(vec![raw(
        1,
        AnnotationType::Highlight,
        0,
        "",
        "D:1",
        (68.0, 11.0, 117.0, 19.0),
    )]);
    let edits = extract_edits(&doc, &SelectionParams::default()).unwrap();
    assert_eq!(
        edits[0].selection.as_deref(),
        Some("Next we <Highlight>prove</Highlight> that (1) is a consequence of")
    );
}

#[test]
fn test_unknown_subtype_roots_an_edit_without_selection() {
    // A subtype outside the known set deserializes as-is and flows through
    // the pipeline: one edit, its comment kept, no selection text.
    let json = r#"{
        "pages": [{
            "number": 1,
            "width": 612.0,
            "height": 792.0,
            "lines": [{"bbox": [0.0, 10.0, 430.0, 20.0], "words": []}],
            "annotations": [{
                "xref": 9,
                "type": "Polygon",
                "info": {"content": "circled region", "creationDate": "D:1"},
                "rect": [100.0, 11.0, 150.0, 19.0]
            }]
        }]
    }"#;
    let doc: Document = serde_json::from_str(json).unwrap();
    let edits = extract_edits(&doc, &SelectionParams::default()).unwrap();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].kind, AnnotationType::Other("Polygon".to_string()));
    assert_eq!(edits[0].message.comment, "circled region");
    assert_eq!(edits[0].selection, None);
}

#[test]
fn test_text_note_has_no_selection() {
    let doc = doc_with(vec![raw(
        1,
        AnnotationType::Text,
        0,
        "general remark",
        "D:1",
        (400.0, 700.0, 420.0, 720.0),
    )]);
    let edits = extract_edits(&doc, &SelectionParams::default()).unwrap();
    assert_eq!(edits[0].selection, None);
    assert_eq!(edits[0].message.comment, "general remark");
}

#[test]
fn test_message_collects_ordered_text_responses() {
    let doc = doc_with(vec![
        raw(
            1,
            AnnotationType::StrikeOut,
            0,
            "root comment",
            "D:20240101090000",
            (158.0, 11.0, 187.0, 19.0),
        ),
        raw(
            3,
            AnnotationType::Text,
            1,
            "B",
            "D:20240101110000",
            (158.0, 11.0, 187.0, 19.0),
        ),
        raw(
            2,
            AnnotationType::Text,
            1,
            "A",
            "D:20240101100000",
            (158.0, 11.0, 187.0, 19.0),
        ),
    ]);
    let edits = extract_edits(&doc, &SelectionParams::default()).unwrap();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].message.responses, vec!["A", "B"]);
}
