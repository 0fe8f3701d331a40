//! Configuration Key Names

/// How configured bounds relate to the trend (`Fixed`, `Mean`, `StdDeviation`).
pub const THRESHOLDS_MODE: &str = "thresholdsMode";

/// Size of the averaging window for relative modes (integer or `all`).
pub const N_POINTS_FOR_AVERAGE: &str = "nPointsForAverage";

/// Whether canvases hold one trend per pad.
pub const SLICE_TREND: &str = "sliceTrend";

/// Prefix of the unified threshold key (`thresholds:<plot>`).
pub const THRESHOLDS_PREFIX: &str = "thresholds:";

/// Prefix of the legacy Bad threshold key (`thresholdsBad:<plot>`).
pub const THRESHOLDS_BAD_PREFIX: &str = "thresholdsBad:";

/// Prefix of the legacy Medium threshold key (`thresholdsMedium:<plot>`).
pub const THRESHOLDS_MEDIUM_PREFIX: &str = "thresholdsMedium:";

/// Literal accepted by `nPointsForAverage` to average over every point.
pub const ALL_POINTS: &str = "all";

/// Primitive name under which trend graphs are attached to canvases.
pub const GRAPH_PRIMITIVE_NAME: &str = "Graph";
