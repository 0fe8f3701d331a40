//! Threshold overlay rendering data
//!
//! Produces what a renderer needs to draw the applied thresholds on top of
//! a trend, without depending on any graphics toolkit:
//!
//! ```text
//!   y ▲                                     - - -  Bad max   (red, dashed)
//!     │  - - - - - - - - - - - - - - - - - -
//!     │  · · · · · · · · · · · · · · · · · ·  ···  Medium max (orange, dotted)
//!     │        ●     ●  ●     ●    ●
//!     │  · · · · · · · · · · · · · · · · · ·  ···  Medium min
//!     │  - - - - - - - - - - - - - - - - - -  - -  Bad min
//!     └──────────────────────────────────────────▶ x
//! ```
//!
//! Medium lines come first and Bad lines second, so Bad is drawn on top.
//! The y range covers the series and every threshold value, widened by a
//! margin on both sides.

use alloc::{string::String, vec::Vec};

use crate::{
    constants::OVERLAY_RANGE_MARGIN,
    quality::Quality,
    recorder::{ThresholdTrendPoint, ThresholdTrendRecorder},
    series::Series,
};

/// Line colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlayColor {
    /// Bad thresholds and Bad series
    Red,
    /// Medium thresholds
    Orange,
}

/// Line style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineStyle {
    /// Bad thresholds
    Dashed,
    /// Medium thresholds
    Dotted,
}

/// One polyline through recorded threshold values
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayLine {
    /// Line colour
    pub color: OverlayColor,
    /// Line style
    pub style: LineStyle,
    /// `(x, y)` vertices, in recording order
    pub points: Vec<(f64, f64)>,
}

/// Everything needed to decorate one series
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdOverlay {
    /// Series the overlay belongs to
    pub series_id: String,
    /// Colour for the series itself, set when its quality is Bad
    pub series_color: Option<OverlayColor>,
    /// Threshold lines, Medium first then Bad
    pub lines: Vec<OverlayLine>,
    /// Suggested `(min, max)` of the y axis
    pub y_range: (f64, f64),
}

impl ThresholdOverlay {
    /// Build the overlay of `series`, `None` for an empty series
    pub fn build(
        series_id: &str,
        series: &Series,
        quality: Quality,
        recorder: &ThresholdTrendRecorder,
    ) -> Option<Self> {
        let (mut low, mut high) = series.y_extent()?;
        let mut lines = Vec::new();

        let levels = [
            (recorder.medium(series_id), OverlayColor::Orange, LineStyle::Dotted),
            (recorder.bad(series_id), OverlayColor::Red, LineStyle::Dashed),
        ];

        for (trend, color, style) in levels {
            if trend.is_empty() {
                continue;
            }
            for point in trend {
                low = low.min(point.range.min);
                high = high.max(point.range.max);
            }
            lines.push(line(trend, color, style, |p| p.range.min));
            lines.push(line(trend, color, style, |p| p.range.max));
        }

        let margin = OVERLAY_RANGE_MARGIN * (high - low);

        Some(Self {
            series_id: String::from(series_id),
            series_color: (quality == Quality::Bad).then_some(OverlayColor::Red),
            lines,
            y_range: (low - margin, high + margin),
        })
    }
}

fn line<F>(trend: &[ThresholdTrendPoint], color: OverlayColor, style: LineStyle, bound: F) -> OverlayLine
where
    F: Fn(&ThresholdTrendPoint) -> f64,
{
    OverlayLine {
        color,
        style,
        points: trend.iter().map(|p| (p.x, bound(p))).collect(),
    }
}
