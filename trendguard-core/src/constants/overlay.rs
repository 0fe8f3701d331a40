//! Threshold Overlay Geometry

/// Fraction of the value span added below and above the plotted range.
///
/// Keeps threshold lines and the newest point off the frame edges.
pub const OVERLAY_RANGE_MARGIN: f64 = 0.1;
