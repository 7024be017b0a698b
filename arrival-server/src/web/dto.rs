//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{ArrivalReport, BusArrival};

/// Query for an arrival lookup.
#[derive(Debug, Deserialize)]
pub struct ArrivalsRequest {
    /// Stop name, as listed in the stop registry
    pub stop: Option<String>,
}

/// Arrivals at a stop.
#[derive(Debug, Serialize)]
pub struct ArrivalsResponse {
    /// Stop name as requested
    pub stop: String,

    /// Feed update time (empty if the stop is unknown)
    pub update_time: String,

    /// Arrivals sorted by route name
    pub arrivals: Vec<BusArrival>,
}

impl ArrivalsResponse {
    pub fn new(stop: impl Into<String>, report: ArrivalReport) -> Self {
        Self {
            stop: stop.into(),
            update_time: report.update_time,
            arrivals: report.arrivals,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
