//! Application state for the web layer.

use std::sync::Arc;

use crate::service::ArrivalService;

/// Shared application state.
pub struct AppState<S> {
    /// Stop lookup service
    pub arrivals: Arc<ArrivalService<S>>,
}

impl<S> AppState<S> {
    /// Create a new app state.
    pub fn new(arrivals: ArrivalService<S>) -> Self {
        Self {
            arrivals: Arc::new(arrivals),
        }
    }
}

// Manual impl: cloning the state never clones `S`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            arrivals: Arc::clone(&self.arrivals),
        }
    }
}
