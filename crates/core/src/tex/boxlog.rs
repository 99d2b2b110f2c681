//! Box-position decoder for the auxiliary log written by `\markbox`.
//!
//! Each instrumented unit writes exactly three records while the document
//! typesets:
//!
//! ```text
//! <id>:whd:<page>:<width>:<height>:<depth>
//! <id>:start:<page>:<x>:<y>
//! <id>:end:<page>:<x>:<y>
//! ```
//!
//! All numeric fields are in scaled points (sp); positions are device-space
//! coordinates from `\pdflastxpos`/`\pdflastypos`, measured from the
//! bottom-left page corner. Decoding converts sp to PDF points (bp) via
//! sp -> pt (/ 65536) -> bp (x 72/72.27): the engine's native unit and the
//! output format's native unit differ by that fixed ratio.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::error::{EditError, Result};
use crate::tex::params::SegmentParams;
use crate::utils::{EPSILON, Rect, approx_eq};

/// Scaled points per TeX point.
pub const SP_PER_PT: f64 = 65_536.0;

/// TeX points per PDF (big) point.
pub const PT_PER_BP: f64 = 72.27 / 72.0;

/// Converts scaled points to PDF points.
#[inline]
pub fn sp_to_bp(sp: f64) -> f64 {
    sp / SP_PER_PT / PT_PER_BP
}

/// page number -> unit id -> rectangle in PDF points, bottom-left origin,
/// (x0, baseline - depth, x1, baseline + height).
pub type PageRects = BTreeMap<u32, BTreeMap<String, Rect>>;

/// Why a complete, well-formed unit was still unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Start and end pages differ: the unit wrapped across a page break.
    PageWrap,
    /// Start and end baselines differ: the unit wrapped across a line.
    LineWrap,
    /// Reconstructed width deviates from the metric width beyond tolerance.
    WidthMismatch,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DropReason::PageWrap => "wrapped across a page break",
            DropReason::LineWrap => "wrapped across a line",
            DropReason::WidthMismatch => "width mismatch beyond tolerance",
        };
        f.write_str(s)
    }
}

/// Accounting for one decode run: every dropped unit is named, nothing is
/// silently swallowed.
#[derive(Debug, Default)]
pub struct DecodeReport {
    pub total_units: usize,
    pub dropped: Vec<(String, DropReason)>,
}

impl DecodeReport {
    pub fn kept(&self) -> usize {
        self.total_units - self.dropped.len()
    }
}

static RECORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<id>m?\d+):(?P<kind>whd|start|end):(?P<page>\d+):(?P<a>-?\d+(?:\.\d+)?):(?P<b>-?\d+(?:\.\d+)?)(?::(?P<c>-?\d+(?:\.\d+)?))?$")
        .expect("static regex")
});

#[derive(Debug, Default)]
struct PendingUnit {
    whd: Option<(f64, f64, f64)>,
    start: Option<(u32, f64, f64)>,
    end: Option<(u32, f64, f64)>,
}

/// Decodes the auxiliary log into per-page rectangles.
///
/// Grammar violations, duplicate or missing records per unit, and a total
/// unit count different from `expected_units` are fatal. Degenerate
/// geometry (page/line wraps, width mismatch) only drops the unit, with the
/// id and reason reported.
pub fn decode_log(
    log: &str,
    expected_units: usize,
    params: &SegmentParams,
) -> Result<(PageRects, DecodeReport)> {
    let mut units: IndexMap<String, PendingUnit> = IndexMap::new();

    for (idx, line) in log.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let lineno = idx + 1;
        let caps = RECORD.captures(line).ok_or_else(|| EditError::LogSyntax {
            lineno,
            line: line.to_string(),
        })?;
        let id = &caps["id"];
        let kind = &caps["kind"];
        let page: u32 = caps["page"].parse().map_err(|_| EditError::LogSyntax {
            lineno,
            line: line.to_string(),
        })?;
        let a: f64 = caps["a"].parse().expect("matched by regex");
        let b: f64 = caps["b"].parse().expect("matched by regex");
        let c: Option<f64> = caps.name("c").map(|m| m.as_str().parse().expect("matched by regex"));

        let unit = units.entry(id.to_string()).or_default();
        let duplicate = match (kind, c) {
            ("whd", Some(c)) => unit.whd.replace((a, b, c)).is_some(),
            ("start", None) => unit.start.replace((page, a, b)).is_some(),
            ("end", None) => unit.end.replace((page, a, b)).is_some(),
            // Field count inconsistent with the record kind.
            _ => {
                return Err(EditError::LogSyntax {
                    lineno,
                    line: line.to_string(),
                });
            }
        };
        if duplicate {
            return Err(EditError::LogRecord {
                id: id.to_string(),
                msg: format!("duplicate {kind} record"),
            });
        }
    }

    if units.len() != expected_units {
        return Err(EditError::LogCount {
            got: units.len(),
            expected: expected_units,
        });
    }

    let mut rects: PageRects = BTreeMap::new();
    let mut report = DecodeReport {
        total_units: units.len(),
        dropped: Vec::new(),
    };

    for (id, unit) in units {
        let (width, height, depth) = unit.whd.ok_or_else(|| EditError::LogRecord {
            id: id.clone(),
            msg: "missing whd record".into(),
        })?;
        let (start_page, x0, y0) = unit.start.ok_or_else(|| EditError::LogRecord {
            id: id.clone(),
            msg: "missing start record".into(),
        })?;
        let (end_page, x1, y1) = unit.end.ok_or_else(|| EditError::LogRecord {
            id: id.clone(),
            msg: "missing end record".into(),
        })?;

        let reason = if start_page != end_page {
            Some(DropReason::PageWrap)
        } else if !approx_eq(y0, y1, EPSILON) {
            Some(DropReason::LineWrap)
        } else if (x0 + width - x1).abs() > params.width_tolerance_sp {
            Some(DropReason::WidthMismatch)
        } else {
            None
        };
        if let Some(reason) = reason {
            warn!(unit = %id, %reason, "dropping unusable unit");
            report.dropped.push((id, reason));
            continue;
        }

        let rect: Rect = (
            sp_to_bp(x0),
            sp_to_bp(y0 - depth),
            sp_to_bp(x1),
            sp_to_bp(y0 + height),
        );
        rects.entry(start_page).or_default().insert(id, rect);
    }

    info!(
        kept = report.kept(),
        dropped = report.dropped.len(),
        total = report.total_units,
        "decoded box log"
    );
    Ok((rects, report))
}
