//! Segmentation parameters.
//!
//! The tolerances here are calibration values tuned against one
//! pdflatex/diff-pdf toolchain, not protocol constants, so they stay
//! configurable.

use std::time::Duration;

/// Parameters for the segmentation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentParams {
    /// Rendering resolution handed to the page differ.
    pub dpi: u32,

    /// Per-page pixel difference accepted as rendering noise. At 175 dpi a
    /// page that breaks one line early differs by at least ~275k pixels
    /// while instrumentation noise stays well under 50k, so the default
    /// separates the two cleanly.
    pub pixel_tolerance: u32,

    /// Number of typesetting passes per document. Two lets cross-references
    /// converge; this is deterministic repetition, not retry-on-failure.
    pub typeset_passes: u32,

    /// Wall-clock limit for each external tool invocation. Expiry kills the
    /// child and fails the run.
    pub tool_timeout: Duration,

    /// Accepted deviation, in scaled points, between a unit's metric width
    /// and the distance between its recorded start and end positions.
    /// Deviation at exactly the tolerance is kept; beyond it the unit is
    /// dropped as a rendering artifact.
    pub width_tolerance_sp: f64,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            dpi: 175,
            pixel_tolerance: 50_000,
            typeset_passes: 2,
            tool_timeout: Duration::from_secs(300),
            // One layout point.
            width_tolerance_sp: 65_536.0,
        }
    }
}
