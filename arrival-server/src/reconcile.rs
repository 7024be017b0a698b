//! Joins live arrival signals to static route records.

use tracing::debug;

use crate::domain::{ArrivalReport, ArrivalSignal, BusArrival, NOT_AVAILABLE, RouteMap};
use crate::format::TimeFormatter;

/// Build an arrival report from one stop's route records and feed signals.
///
/// Every signal yields exactly one arrival. Signals are looked up in
/// `routes` by their entry id; a miss falls back to an "unknown route"
/// name carrying the signal's dynamic key, with direction `N/A`.
///
/// Arrivals are sorted by route name. The sort is stable, so arrivals on
/// the same route keep their feed order.
pub fn reconcile(
    routes: &RouteMap,
    update_time: String,
    signals: Vec<ArrivalSignal>,
    formatter: &TimeFormatter,
) -> ArrivalReport {
    let mut unmatched = 0usize;

    let mut arrivals: Vec<BusArrival> = signals
        .into_iter()
        .map(|signal| {
            // Keyed by dynamic key, probed by entry id.
            let (route, direction) = match routes.get(&signal.entry_id) {
                Some(record) => (record.route_name.clone(), record.direction.clone()),
                None => {
                    unmatched += 1;
                    (
                        formatter.labels().unknown_route(&signal.dynamic_key),
                        NOT_AVAILABLE.to_string(),
                    )
                }
            };

            BusArrival {
                route,
                direction,
                display_time: formatter.format(&signal.raw_time_value),
                raw_time_value: signal.raw_time_value,
                dynamic_key: signal.dynamic_key,
            }
        })
        .collect();

    arrivals.sort_by(|a, b| a.route.cmp(&b.route));

    debug!(
        arrivals = arrivals.len(),
        unmatched, "Reconciled arrival signals"
    );

    ArrivalReport {
        arrivals,
        update_time,
    }
}
