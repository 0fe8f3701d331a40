//! Monitor Objects and Series Extraction
//!
//! ## Overview
//!
//! The host hands the evaluator a batch of named monitor objects. Each holds
//! a display object, which is either a bare trend graph or a canvas holding
//! named primitives:
//!
//! ```text
//! Single              Sliced (sliceTrend)          PairedWithErrors
//! ┌───────────┐       ┌──────────────────────┐     ┌──────────────────────┐
//! │  Graph    │       │ Canvas               │     │ Canvas               │
//! └───────────┘       │  ├ Pad ─ "Graph"     │     │  ├ "Graph"  (plain)  │
//!                     │  ├ Pad ─ "Graph"     │     │  ├ "Axis"            │
//!                     │  └ Pad ─ "Graph"     │     │  └ "Graph"  (errors) │
//!                     └──────────────────────┘     └──────────────────────┘
//!   1 series            1 series per pad             1 series (preferred)
//! ```
//!
//! ## Preferred Representation
//!
//! The upstream renderer may attach two graphs named `Graph` to one canvas:
//! a plain one and, later, one with error bars. The one added last is
//! preferred; if it turns out not to be a graph, the first graph with that
//! name is used instead.
//!
//! ## Classification
//!
//! A display object is classified into a [`PlotLayout`] once; afterwards
//! extraction only follows the recorded layout. [`PlotLayout::extract`]
//! returns `None` when the object no longer fits its layout, which tells
//! the caller to classify again.

use alloc::{
    collections::BTreeMap,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use crate::{constants::keys::GRAPH_PRIMITIVE_NAME, series::Series};

/// Named element attached to a canvas
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Primitive {
    /// A trend graph
    Graph {
        /// Primitive name
        name: String,
        /// Trend data
        series: Series,
    },
    /// A sub-panel with its own primitives
    Pad {
        /// Primitive name
        name: String,
        /// Primitives drawn in the pad
        primitives: Vec<Primitive>,
    },
    /// Anything else drawn on the canvas (axes, legends, labels)
    Other {
        /// Primitive name
        name: String,
    },
}

impl Primitive {
    /// Graph primitive
    pub fn graph(name: &str, series: Series) -> Self {
        Self::Graph { name: name.to_string(), series }
    }

    /// Pad primitive
    pub fn pad(name: &str, primitives: Vec<Primitive>) -> Self {
        Self::Pad { name: name.to_string(), primitives }
    }

    /// Decoration primitive
    pub fn other(name: &str) -> Self {
        Self::Other { name: name.to_string() }
    }

    /// Primitive name
    pub fn name(&self) -> &str {
        match self {
            Self::Graph { name, .. } | Self::Pad { name, .. } | Self::Other { name } => name,
        }
    }

    /// Trend data if this is a graph
    pub fn as_series(&self) -> Option<&Series> {
        match self {
            Self::Graph { series, .. } => Some(series),
            _ => None,
        }
    }
}

/// Container of named primitives
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Canvas {
    primitives: Vec<Primitive>,
}

impl Canvas {
    /// Empty canvas
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a primitive, builder style
    pub fn with(mut self, primitive: Primitive) -> Self {
        self.primitives.push(primitive);
        self
    }

    /// Attach a primitive
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Primitives in the order they were attached
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Index of the preferred graph named `name`
    ///
    /// Last primitive with that name if it is a graph, otherwise the first
    /// graph with that name.
    pub fn preferred_graph_index(&self, name: &str) -> Option<usize> {
        let named = || self.primitives.iter().enumerate().filter(|(_, p)| p.name() == name);

        match named().last() {
            Some((index, Primitive::Graph { .. })) => Some(index),
            _ => named().find(|(_, p)| p.as_series().is_some()).map(|(i, _)| i),
        }
    }

    /// Pads in attachment order
    pub fn pads(&self) -> impl Iterator<Item = &[Primitive]> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Pad { primitives, .. } => Some(primitives.as_slice()),
            _ => None,
        })
    }
}

/// What a monitor object displays
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayObject {
    /// A bare trend graph
    Graph(Series),
    /// A canvas of primitives
    Canvas(Canvas),
}

/// Named display object delivered by the host each cycle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorObject {
    name: String,
    object: DisplayObject,
}

impl MonitorObject {
    /// Monitor object wrapping any display object
    pub fn new(name: &str, object: DisplayObject) -> Self {
        Self { name: name.to_string(), object }
    }

    /// Monitor object wrapping a bare graph
    pub fn graph(name: &str, series: Series) -> Self {
        Self::new(name, DisplayObject::Graph(series))
    }

    /// Monitor object wrapping a canvas
    pub fn canvas(name: &str, canvas: Canvas) -> Self {
        Self::new(name, DisplayObject::Canvas(canvas))
    }

    /// Full object name, possibly a path like `MCH/Trends/Efficiency`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its path: the text after the last `/`
    ///
    /// This is the key thresholds are configured under.
    pub fn base_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Identifier of the `index`-th series extracted from this object
    pub fn series_id(&self, index: usize) -> String {
        alloc::format!("{}_{}", self.name, index)
    }

    /// Displayed object
    pub fn object(&self) -> &DisplayObject {
        &self.object
    }
}

/// Monitor objects of one cycle, keyed by plot name
pub type PlotBatch = BTreeMap<String, MonitorObject>;

/// How series are laid out in a display object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlotLayout {
    /// Bare graph
    Single,
    /// Canvas with one trend per pad
    Sliced {
        /// Number of pads at classification time
        pads: usize,
    },
    /// Canvas with a preferred `Graph` primitive
    PairedWithErrors {
        /// Index of the preferred primitive
        index: usize,
    },
}

impl PlotLayout {
    /// Classify a display object, `None` if it carries no trend at all
    pub fn classify(object: &DisplayObject, slice_trend: bool) -> Option<Self> {
        match object {
            DisplayObject::Graph(_) => Some(Self::Single),
            DisplayObject::Canvas(canvas) if slice_trend => {
                Some(Self::Sliced { pads: canvas.pads().count() })
            }
            DisplayObject::Canvas(canvas) => canvas
                .preferred_graph_index(GRAPH_PRIMITIVE_NAME)
                .map(|index| Self::PairedWithErrors { index }),
        }
    }

    /// Series of `object` following this layout, with their graph index
    ///
    /// Returns `None` if the object does not fit the layout any more. On a
    /// sliced canvas the graph index is the pad index, so a pad without a
    /// graph leaves a gap instead of shifting the pads after it.
    pub fn extract<'a>(&self, object: &'a DisplayObject) -> Option<Vec<(usize, &'a Series)>> {
        match (self, object) {
            (Self::Single, DisplayObject::Graph(series)) => Some(vec![(0, series)]),
            (Self::Sliced { pads }, DisplayObject::Canvas(canvas)) => {
                if canvas.pads().count() != *pads {
                    return None;
                }
                Some(
                    canvas
                        .pads()
                        .enumerate()
                        .filter_map(|(index, pad)| {
                            preferred_in(pad, GRAPH_PRIMITIVE_NAME).map(|series| (index, series))
                        })
                        .collect(),
                )
            }
            (Self::PairedWithErrors { index }, DisplayObject::Canvas(canvas)) => canvas
                .primitives()
                .get(*index)
                .filter(|p| p.name() == GRAPH_PRIMITIVE_NAME)
                .and_then(Primitive::as_series)
                .map(|series| vec![(0, series)]),
            _ => None,
        }
    }
}

/// Preferred graph named `name` among `primitives`
fn preferred_in<'a>(primitives: &'a [Primitive], name: &str) -> Option<&'a Series> {
    let mut named = primitives.iter().filter(|p| p.name() == name);
    match named.clone().last().and_then(Primitive::as_series) {
        Some(series) => Some(series),
        None => named.find_map(Primitive::as_series),
    }
}

/// Classify and extract in one go
pub fn extract_series(object: &DisplayObject, slice_trend: bool) -> Vec<(usize, &Series)> {
    PlotLayout::classify(object, slice_trend)
        .and_then(|layout| layout.extract(object))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Series {
        Series::from_values(values)
    }

    #[test]
    fn bare_graph_is_single() {
        let object = DisplayObject::Graph(series(&[1.0]));
        assert_eq!(PlotLayout::classify(&object, false), Some(PlotLayout::Single));
        assert_eq!(PlotLayout::classify(&object, true), Some(PlotLayout::Single));
        assert_eq!(extract_series(&object, false), vec![(0, &series(&[1.0]))]);
    }

    #[test]
    fn paired_prefers_last_graph() {
        let canvas = Canvas::new()
            .with(Primitive::graph("Graph", series(&[1.0])))
            .with(Primitive::other("Axis"))
            .with(Primitive::graph("Graph", series(&[2.0])));
        let object = DisplayObject::Canvas(canvas);

        assert_eq!(
            PlotLayout::classify(&object, false),
            Some(PlotLayout::PairedWithErrors { index: 2 })
        );
        assert_eq!(extract_series(&object, false), vec![(0, &series(&[2.0]))]);
    }

    #[test]
    fn paired_falls_back_to_first_graph() {
        let canvas = Canvas::new()
            .with(Primitive::graph("Graph", series(&[1.0])))
            .with(Primitive::other("Graph"));
        let object = DisplayObject::Canvas(canvas);

        assert_eq!(
            PlotLayout::classify(&object, false),
            Some(PlotLayout::PairedWithErrors { index: 0 })
        );
    }

    #[test]
    fn canvas_without_graph_has_no_layout() {
        let object = DisplayObject::Canvas(Canvas::new().with(Primitive::other("Legend")));
        assert_eq!(PlotLayout::classify(&object, false), None);
        assert!(extract_series(&object, false).is_empty());
    }

    #[test]
    fn sliced_keeps_pad_index_across_empty_pads() {
        let canvas = Canvas::new()
            .with(Primitive::pad("pad_0", vec![Primitive::graph("Graph", series(&[1.0]))]))
            .with(Primitive::pad("pad_1", vec![Primitive::other("Empty")]))
            .with(Primitive::pad("pad_2", vec![Primitive::graph("Graph", series(&[3.0]))]));
        let object = DisplayObject::Canvas(canvas);

        let layout = PlotLayout::classify(&object, true).unwrap();
        assert_eq!(layout, PlotLayout::Sliced { pads: 3 });
        assert_eq!(
            layout.extract(&object),
            Some(vec![(0, &series(&[1.0])), (2, &series(&[3.0]))])
        );
    }

    #[test]
    fn stale_layout_is_detected() {
        let object = DisplayObject::Graph(series(&[1.0]));
        assert_eq!(PlotLayout::Sliced { pads: 2 }.extract(&object), None);
        assert_eq!(PlotLayout::PairedWithErrors { index: 0 }.extract(&object), None);

        let canvas = DisplayObject::Canvas(
            Canvas::new().with(Primitive::pad("pad_0", vec![])),
        );
        assert_eq!(PlotLayout::Sliced { pads: 2 }.extract(&canvas), None);
        assert_eq!(PlotLayout::Single.extract(&canvas), None);
    }

    #[test]
    fn names_and_ids() {
        let object = MonitorObject::graph("MCH/Trends/Efficiency", series(&[1.0]));
        assert_eq!(object.base_name(), "Efficiency");
        assert_eq!(object.series_id(2), "MCH/Trends/Efficiency_2");

        let flat = MonitorObject::graph("Rate", series(&[1.0]));
        assert_eq!(flat.base_name(), "Rate");
    }
}
