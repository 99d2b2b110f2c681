//! Annotation and edit value types.
//!
//! Raw annotation handles from PDF libraries are fragile: they stay bound to
//! the live page object and mutate underneath you. Everything needed here is
//! copied into independent values up front ([`StableAnnotation`]) and never
//! touched again, except for the one-time promotion of a strikeout/caret
//! pair to a `Replace` edit.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::Rect;

/// Annotation types understood by the pipeline.
///
/// Names follow the PDF annotation subtype names as reported by the source
/// library. Subtypes outside the known set (Polygon, Sound, Widget, ...)
/// are carried through as [`AnnotationType::Other`]: they still root edits,
/// just without pair promotion or a selection. `Replace` never occurs in
/// input: it is synthesized when a StrikeOut/Caret pair is collapsed into a
/// single edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationType {
    Text,
    FreeText,
    Line,
    Square,
    Circle,
    Highlight,
    Underline,
    Squiggly,
    StrikeOut,
    Stamp,
    Caret,
    Ink,
    Popup,
    FileAttachment,
    Replace,
    /// Any other subtype, verbatim as reported.
    Other(String),
}

impl AnnotationType {
    /// The subtype name, as embedded in selection delimiters.
    pub fn as_str(&self) -> &str {
        match self {
            AnnotationType::Text => "Text",
            AnnotationType::FreeText => "FreeText",
            AnnotationType::Line => "Line",
            AnnotationType::Square => "Square",
            AnnotationType::Circle => "Circle",
            AnnotationType::Highlight => "Highlight",
            AnnotationType::Underline => "Underline",
            AnnotationType::Squiggly => "Squiggly",
            AnnotationType::StrikeOut => "StrikeOut",
            AnnotationType::Stamp => "Stamp",
            AnnotationType::Caret => "Caret",
            AnnotationType::Ink => "Ink",
            AnnotationType::Popup => "Popup",
            AnnotationType::FileAttachment => "FileAttachment",
            AnnotationType::Replace => "Replace",
            AnnotationType::Other(code) => code,
        }
    }

    fn from_name(name: String) -> Self {
        match name.as_str() {
            "Text" => AnnotationType::Text,
            "FreeText" => AnnotationType::FreeText,
            "Line" => AnnotationType::Line,
            "Square" => AnnotationType::Square,
            "Circle" => AnnotationType::Circle,
            "Highlight" => AnnotationType::Highlight,
            "Underline" => AnnotationType::Underline,
            "Squiggly" => AnnotationType::Squiggly,
            "StrikeOut" => AnnotationType::StrikeOut,
            "Stamp" => AnnotationType::Stamp,
            "Caret" => AnnotationType::Caret,
            "Ink" => AnnotationType::Ink,
            "Popup" => AnnotationType::Popup,
            "FileAttachment" => AnnotationType::FileAttachment,
            "Replace" => AnnotationType::Replace,
            _ => AnnotationType::Other(name),
        }
    }

    /// The other half of a potential replace pair.
    pub fn replace_counterpart(&self) -> Option<AnnotationType> {
        match self {
            AnnotationType::StrikeOut => Some(AnnotationType::Caret),
            AnnotationType::Caret => Some(AnnotationType::StrikeOut),
            _ => None,
        }
    }
}

impl Serialize for AnnotationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnnotationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(AnnotationType::from_name(String::deserialize(deserializer)?))
    }
}

impl std::fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The info dictionary carried by every annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationInfo {
    /// Comment text typed into the annotation popup. Empty for the
    /// geometry-only half of a replace pair.
    #[serde(default)]
    pub content: String,

    /// Creation timestamp in the PDF `D:YYYYMMDDHHmmSS` form. Lexicographic
    /// order equals chronological order, which is all the response sorting
    /// needs.
    #[serde(rename = "creationDate", default)]
    pub creation_date: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subject: String,
}

/// One annotation exactly as the PDF library reported it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAnnotation {
    /// Cross-reference id of the annotation object.
    pub xref: u32,

    #[serde(rename = "type")]
    pub kind: AnnotationType,

    pub info: AnnotationInfo,

    /// Cross-reference id of the annotation this one responds to.
    /// 0 means the annotation is a root, not a response.
    #[serde(default)]
    pub irt_xref: u32,

    pub rect: Rect,
}

/// A page-indexed, geometry-corrected snapshot of one [`RawAnnotation`].
#[derive(Debug, Clone, PartialEq)]
pub struct StableAnnotation {
    pub pageno: u32,
    pub kind: AnnotationType,
    pub info: AnnotationInfo,
    pub xref: u32,
    pub irt_xref: u32,

    /// Corrected rectangle. Identical to the raw rectangle except for
    /// Caret annotations, whose bottom edge is raised to the baseline of
    /// the highest intersecting text line.
    pub rect: Rect,

    /// Bounding box of the text line the annotation sits on. `None` only
    /// for `Text` notes, which live in the margins.
    pub line_bbox: Option<Rect>,
}

impl StableAnnotation {
    pub fn is_root(&self) -> bool {
        self.irt_xref == 0
    }
}

/// Comment thread attached to an edit: the root annotation's own comment
/// plus its text responses in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditMessage {
    pub comment: String,
    pub responses: Vec<String>,
}

/// One semantically typed edit, the unit consumed by downstream tooling.
///
/// Example as serialized:
///
/// ```json
/// {
///   "pageno": 1,
///   "type": "Replace",
///   "message": { "comment": "Equation (1)", "responses": ["COMP: pls link"] },
///   "selection": "Next we prove that <Replace>(1)</Replace> is a consequence of"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edit {
    pub pageno: u32,

    #[serde(rename = "type")]
    pub kind: AnnotationType,

    pub message: EditMessage,

    /// Selected and surrounding text, with the edited span delimited by a
    /// tag named after the edit type. `None` for types that carry no
    /// meaningful page region (plain notes, stamps, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
}
