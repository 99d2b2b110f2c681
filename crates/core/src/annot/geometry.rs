//! Page text geometry: the document dump consumed by pipeline A.
//!
//! The PDF library (an external collaborator) extracts per-page text in
//! reading order and serializes it together with the raw annotations. This
//! module owns that interchange shape and answers the one spatial query the
//! pipeline needs: "what text lies within this rectangle?".

use serde::Deserialize;

use crate::annot::model::RawAnnotation;
use crate::utils::{Rect, intersects};

/// One word with its bounding box, in reading order within its line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Word {
    pub bbox: Rect,
    pub text: String,
}

/// One text line in reading order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextLine {
    pub bbox: Rect,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// One page: dimensions, text geometry and raw annotations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page {
    pub number: u32,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub lines: Vec<TextLine>,
    #[serde(default)]
    pub annotations: Vec<RawAnnotation>,
}

/// A whole document dump.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Page {
    /// Text within `rect`, in reading order, words joined by single spaces.
    ///
    /// A word belongs to the query when its line intersects the rectangle
    /// vertically and the word's horizontal center falls inside the
    /// rectangle's x-range. Center containment, not overlap: annotation
    /// rectangles are imprecise at sub-character resolution and overlap
    /// tests would pull in neighbouring characters.
    pub fn text_in_rect(&self, rect: Rect) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for line in &self.lines {
            if !intersects(line.bbox, rect) {
                continue;
            }
            for word in &line.words {
                let cx = (word.bbox.0 + word.bbox.2) / 2.0;
                if cx >= rect.0 && cx <= rect.2 {
                    parts.push(&word.text);
                }
            }
        }
        parts.join(" ")
    }
}

impl Document {
    /// Page lookup by page number.
    pub fn page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == number)
    }
}
