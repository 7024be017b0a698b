//! Stop lookup: resolve, fetch both documents, reconcile.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{ArrivalReport, StopId};
use crate::format::TimeFormatter;
use crate::pda::{ArrivalSource, PdaError};
use crate::reconcile::reconcile;
use crate::registry::StopRegistry;

/// Errors from an arrival lookup.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Fetching or parsing one of the stop's documents failed
    #[error("stop {stop}: {source}")]
    Source {
        stop: StopId,
        #[source]
        source: PdaError,
    },
}

impl ServiceError {
    /// The underlying PDA error.
    pub fn pda_error(&self) -> &PdaError {
        match self {
            ServiceError::Source { source, .. } => source,
        }
    }
}

/// Answers "when do buses arrive at this stop?".
///
/// The registry and formatter are fixed at construction and shared
/// read-only across lookups.
pub struct ArrivalService<S> {
    registry: Arc<StopRegistry>,
    formatter: Arc<TimeFormatter>,
    source: S,
}

impl<S: ArrivalSource + Sync> ArrivalService<S> {
    pub fn new(registry: StopRegistry, formatter: TimeFormatter, source: S) -> Self {
        Self {
            registry: Arc::new(registry),
            formatter: Arc::new(formatter),
            source,
        }
    }

    /// Look up arrivals for a stop by name.
    ///
    /// An unknown stop name yields an empty report. The stop page and the
    /// feed are fetched concurrently; if either fails, the other is
    /// dropped and the error is returned.
    pub async fn lookup(&self, stop_name: &str) -> Result<ArrivalReport, ServiceError> {
        let Some(stop) = self.registry.resolve(stop_name) else {
            info!(stop = stop_name, "Stop not in registry");
            return Ok(ArrivalReport::default());
        };

        let (routes, feed) = tokio::try_join!(
            self.source.fetch_routes(stop),
            self.source.fetch_signals(stop)
        )
        .map_err(|source| ServiceError::Source {
            stop: stop.clone(),
            source,
        })?;

        debug!(
            stop = stop_name,
            stop_id = %stop,
            routes = routes.len(),
            signals = feed.signals.len(),
            "Fetched stop documents"
        );

        Ok(reconcile(
            &routes,
            feed.update_time,
            feed.signals,
            &self.formatter,
        ))
    }
}
