//! corrigenda - edit extraction from reviewed PDFs and page-aligned TeX
//! source segmentation.
//!
//! Two independent pipelines:
//!
//! - [`annot`]: turns raw PDF markup (comments, strikeouts, carets and their
//!   threaded responses) into a canonical sequence of typed [`annot::Edit`]
//!   records with attributed text selections.
//! - [`tex`]: instruments a TeX source with position-reporting marks around
//!   every word and inline-math span, verifies the marks are visually inert
//!   by diffing the rendered pages, and decodes the resulting box log back
//!   into per-page rectangles.

pub mod annot;
pub mod error;
pub mod tex;
pub mod utils;

pub use error::{EditError, Result};
