//! Route records, arrival signals and the reconciled report.

use std::collections::HashMap;

use serde::Serialize;

/// Placeholder used wherever a label is missing from the source data.
pub const NOT_AVAILABLE: &str = "N/A";

/// One route serving a stop, as listed on the static stop page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// Key of the route's time cell on the stop page.
    pub dynamic_key: String,
    pub route_name: String,
    pub stop_label: String,
    pub direction: String,
}

/// Static route records for one stop, keyed by dynamic key.
pub type RouteMap = HashMap<String, RouteRecord>;

/// One entry of the live arrival feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalSignal {
    /// The entry's `id` field, rendered as a string.
    pub entry_id: String,
    pub dynamic_key: String,
    /// Seconds until arrival, or a status code.
    pub raw_time_value: String,
}

/// A reconciled arrival, ready for display.
///
/// Field order is part of the serialized output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusArrival {
    pub route: String,
    pub direction: String,
    pub display_time: String,
    pub raw_time_value: String,
    pub dynamic_key: String,
}

/// Arrivals at one stop, sorted by route name, plus the feed's update time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArrivalReport {
    pub arrivals: Vec<BusArrival>,
    pub update_time: String,
}

impl ArrivalReport {
    /// Number of arrivals in the report.
    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }
}
