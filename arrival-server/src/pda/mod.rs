//! Taipei bus PDA service client.
//!
//! The service exposes two documents per stop location:
//! - `stoplocation.jsp?slid=...`: an HTML page listing the routes that
//!   serve the stop (route name, stop name, direction, time cell)
//! - `StopLocationDyna?stoplocationid=...`: a JSON feed of live arrival
//!   estimates for the same stop
//!
//! The two are fetched independently and joined by the reconciler.

mod client;
mod error;
mod feed;
mod markup;
mod mock;

use std::future::Future;

use crate::domain::{RouteMap, StopId};

pub use client::{PdaClient, PdaConfig};
pub use error::{Document, PdaError};
pub use feed::{DynaFeed, FeedSnapshot, N1Record, StopEntry, parse_feed};
pub use markup::parse_route_rows;
pub use mock::MockPdaClient;

/// Source of the two per-stop documents.
///
/// Implemented by the live HTTP client and by the fixture-backed mock.
pub trait ArrivalSource {
    /// Static route records for a stop, keyed by dynamic key.
    fn fetch_routes(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<RouteMap, PdaError>> + Send;

    /// Live feed for a stop: decoded update time and arrival signals.
    fn fetch_signals(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<FeedSnapshot, PdaError>> + Send;
}
