//! Mock PDA client for running without network access.
//!
//! Serves recorded stop pages and feeds through the same parsers as the
//! live client.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{RouteMap, StopId};

use super::ArrivalSource;
use super::error::PdaError;
use super::feed::{FeedSnapshot, parse_feed};
use super::markup::parse_route_rows;

/// Recorded documents for one stop.
#[derive(Debug, Clone, Default)]
struct StopDocuments {
    route_listing: Option<String>,
    arrival_feed: Option<String>,
}

/// Mock PDA client that serves documents loaded from disk or memory.
#[derive(Debug, Clone)]
pub struct MockPdaClient {
    stops: Arc<HashMap<StopId, StopDocuments>>,
}

impl MockPdaClient {
    /// Create a mock client by loading fixtures from a directory.
    ///
    /// Expects `{stop_id}.html` (stop page) and `{stop_id}.json` (feed)
    /// files, e.g. `1234.html` and `1234.json`. Either may be missing.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, PdaError> {
        let data_dir = data_dir.as_ref();
        let mut stops: HashMap<StopId, StopDocuments> = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| PdaError::Api {
            status: 0,
            message: format!("Failed to read mock data directory: {e}"),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| PdaError::Api {
                status: 0,
                message: format!("Failed to read directory entry: {e}"),
            })?;

            let path = entry.path();
            let extension = path.extension().and_then(|s| s.to_str());
            if !path.is_file() || !matches!(extension, Some("html" | "json")) {
                continue;
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            let stop = StopId::parse(stem).map_err(|_| PdaError::Api {
                status: 0,
                message: format!("Invalid stop id in filename: {}", path.display()),
            })?;

            let contents = std::fs::read_to_string(&path).map_err(|e| PdaError::Api {
                status: 0,
                message: format!("Failed to read {}: {e}", path.display()),
            })?;

            let documents = stops.entry(stop).or_default();
            if extension == Some("html") {
                documents.route_listing = Some(contents);
            } else {
                documents.arrival_feed = Some(contents);
            }
        }

        if stops.is_empty() {
            return Err(PdaError::Api {
                status: 0,
                message: format!("No mock stop files found in {}", data_dir.display()),
            });
        }

        Ok(Self {
            stops: Arc::new(stops),
        })
    }

    /// Create a mock client from in-memory `(stop, stop page, feed)` documents.
    pub fn from_documents<I, H, J>(documents: I) -> Self
    where
        I: IntoIterator<Item = (StopId, H, J)>,
        H: Into<String>,
        J: Into<String>,
    {
        let stops = documents
            .into_iter()
            .map(|(stop, html, json)| {
                let documents = StopDocuments {
                    route_listing: Some(html.into()),
                    arrival_feed: Some(json.into()),
                };
                (stop, documents)
            })
            .collect();

        Self {
            stops: Arc::new(stops),
        }
    }

    /// Stops with at least one recorded document.
    pub fn available_stops(&self) -> Vec<StopId> {
        self.stops.keys().cloned().collect()
    }

    fn not_found(stop: &StopId, what: &str) -> PdaError {
        PdaError::Api {
            status: 404,
            message: format!("No mock {what} for stop {stop}"),
        }
    }
}

impl ArrivalSource for MockPdaClient {
    async fn fetch_routes(&self, stop: &StopId) -> Result<RouteMap, PdaError> {
        let html = self
            .stops
            .get(stop)
            .and_then(|d| d.route_listing.as_deref())
            .ok_or_else(|| Self::not_found(stop, "stop page"))?;

        Ok(parse_route_rows(html))
    }

    async fn fetch_signals(&self, stop: &StopId) -> Result<FeedSnapshot, PdaError> {
        let json = self
            .stops
            .get(stop)
            .and_then(|d| d.arrival_feed.as_deref())
            .ok_or_else(|| Self::not_found(stop, "arrival feed"))?;

        parse_feed(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body><table>
        <tr class="ttego1"><td><a>307</a></td><td><a>公館</a></td><td>去程</td><td id="tte482"></td></tr>
    </table></body></html>"#;

    const FEED: &str = r#"{"UpdateTime": "12&#x3a;00", "Stop": [{"id": 482, "n1": "0,482,0,0,0,0,0,185"}]}"#;

    fn stop(s: &str) -> StopId {
        StopId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1234.html"), PAGE).unwrap();
        std::fs::write(dir.path().join("1234.json"), FEED).unwrap();
        std::fs::write(dir.path().join("README.txt"), "ignored").unwrap();

        let client = MockPdaClient::new(dir.path()).unwrap();
        assert_eq!(client.available_stops(), vec![stop("1234")]);

        let routes = client.fetch_routes(&stop("1234")).await.unwrap();
        assert_eq!(routes["482"].route_name, "307");

        let feed = client.fetch_signals(&stop("1234")).await.unwrap();
        assert_eq!(feed.update_time, "12:00");
        assert_eq!(feed.signals.len(), 1);
    }

    #[tokio::test]
    async fn load_recorded_stop() {
        let client = MockPdaClient::new("data/mock_stops").unwrap();
        assert!(client.available_stops().contains(&stop("1234")));

        let routes = client.fetch_routes(&stop("1234")).await.unwrap();
        assert_eq!(routes.len(), 3);
        assert_eq!(routes["15311"].route_name, "紅30");
        assert_eq!(routes["15311"].direction, "往內湖");

        let feed = client.fetch_signals(&stop("1234")).await.unwrap();
        assert_eq!(feed.update_time, "2025-10-18 08:15:42");
        assert_eq!(feed.signals.len(), 4);
    }

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1234.html"), PAGE).unwrap();

        let client = MockPdaClient::new(dir.path()).unwrap();
        let err = client.fetch_signals(&stop("1234")).await.unwrap_err();

        assert!(matches!(err, PdaError::Api { status: 404, .. }));
    }

    #[test]
    fn empty_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MockPdaClient::new(dir.path()).is_err());
    }

    #[tokio::test]
    async fn unknown_stop_returns_error() {
        let client = MockPdaClient::from_documents([(stop("1234"), PAGE, FEED)]);

        let result = client.fetch_routes(&stop("9999")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn malformed_feed_is_parse_error() {
        let client = MockPdaClient::from_documents([(stop("1234"), PAGE, "not json")]);

        let err = client.fetch_signals(&stop("1234")).await.unwrap_err();
        assert!(err.is_parse_error());
    }
}
