//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::BusArrival;

/// Arrival board for one stop.
#[derive(Template)]
#[template(path = "arrivals.html")]
pub struct ArrivalsTemplate {
    pub stop: String,
    pub update_time: String,
    pub arrivals: Vec<BusArrival>,
}
