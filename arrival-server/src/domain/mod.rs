//! Domain types for bus arrival lookups.
//!
//! Route records and arrival signals are transient: they live for one
//! lookup and are consumed by reconciliation. The report is what callers
//! keep.

mod arrival;
mod stop;

pub use arrival::{
    ArrivalReport, ArrivalSignal, BusArrival, NOT_AVAILABLE, RouteMap, RouteRecord,
};
pub use stop::{InvalidStopId, StopId};
