//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::pda::ArrivalSource;
use crate::service::ServiceError;

use super::dto::*;
use super::state::AppState;
use super::templates::ArrivalsTemplate;

/// Create the application router.
pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: ArrivalSource + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/arrivals", get(api_arrivals::<S>))
        .route("/arrivals", get(arrivals_page::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The requested stop name, rejecting a missing or blank one.
fn stop_name(req: &ArrivalsRequest) -> Result<&str, AppError> {
    req.stop
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest {
            message: "missing stop name".to_string(),
        })
}

/// Arrivals at a stop as JSON.
async fn api_arrivals<S>(
    State(state): State<AppState<S>>,
    Query(req): Query<ArrivalsRequest>,
) -> Result<Json<ArrivalsResponse>, AppError>
where
    S: ArrivalSource + Send + Sync + 'static,
{
    let stop = stop_name(&req)?;
    let report = state.arrivals.lookup(stop).await?;

    Ok(Json(ArrivalsResponse::new(stop, report)))
}

/// Arrivals at a stop as an HTML page.
async fn arrivals_page<S>(
    State(state): State<AppState<S>>,
    Query(req): Query<ArrivalsRequest>,
) -> Result<Html<String>, AppError>
where
    S: ArrivalSource + Send + Sync + 'static,
{
    let stop = stop_name(&req)?;
    let report = state.arrivals.lookup(stop).await?;

    let template = ArrivalsTemplate {
        stop: stop.to_string(),
        update_time: report.update_time,
        arrivals: report.arrivals,
    };
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })?;

    Ok(Html(html))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    /// The PDA service failed or returned something unparseable.
    BadGateway { message: String },
    Internal { message: String },
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::BadGateway {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(status = status.as_u16(), error = %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopId;
    use crate::format::{TimeFormatter, TimeLabels};
    use crate::pda::MockPdaClient;
    use crate::registry::StopRegistry;
    use crate::service::ArrivalService;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const PAGE: &str = r#"<html><body><table>
        <tr class="ttego1"><td><a>307</a></td><td><a>公館</a></td><td>去程</td><td id="tte482"></td></tr>
        <tr class="ttego2"><td><a>&lt;b&gt;</a></td><td><a>公館</a></td><td>返程</td><td id="tte483"></td></tr>
    </table></body></html>"#;

    const FEED: &str = r#"{
        "UpdateTime": "12&#x3a;30",
        "Stop": [
            {"id": 482, "n1": "0,482,0,0,0,0,0,185"},
            {"id": 483, "n1": "0,483,0,0,0,0,0,-1"}
        ]
    }"#;

    fn app() -> Router {
        let registry: StopRegistry = [("Gongguan", "1234"), ("站", "1234"), ("Nowhere", "9999")]
            .into_iter()
            .collect();
        let source =
            MockPdaClient::from_documents([(StopId::parse("1234").unwrap(), PAGE, FEED)]);
        let service = ArrivalService::new(registry, TimeFormatter::new(TimeLabels::english()), source);
        create_router(AppState::new(service))
    }

    async fn request(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_check() {
        let (status, body) = request("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn api_arrivals_json() {
        let (status, body) = request("/api/arrivals?stop=Gongguan").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["stop"], "Gongguan");
        assert_eq!(json["update_time"], "12:30");
        assert_eq!(json["arrivals"].as_array().unwrap().len(), 2);
        assert_eq!(json["arrivals"][0]["route"], "307");
        assert_eq!(json["arrivals"][0]["display_time"], "3 minutes");
        assert_eq!(json["arrivals"][1]["route"], "<b>");
        assert_eq!(json["arrivals"][1]["display_time"], "not yet departed");
    }

    #[tokio::test]
    async fn api_arrivals_percent_encoded_name() {
        let (status, body) = request("/api/arrivals?stop=%E7%AB%99").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["stop"], "站");
        assert_eq!(json["arrivals"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_stop_is_empty_not_error() {
        let (status, body) = request("/api/arrivals?stop=Unknown").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["update_time"], "");
        assert!(json["arrivals"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_stop_is_bad_request() {
        let (status, _) = request("/api/arrivals").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = request("/api/arrivals?stop=%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("missing stop name"));
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let (status, body) = request("/api/arrivals?stop=Nowhere").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("9999"));
    }

    #[tokio::test]
    async fn arrivals_page_html() {
        let (status, body) = request("/arrivals?stop=Gongguan").await;
        assert_eq!(status, StatusCode::OK);

        assert!(body.contains("<td>307</td>"));
        assert!(body.contains("3 minutes"));
        assert!(body.contains("12:30"));
        // Route names are escaped
        assert!(body.contains("&lt;b&gt;"));
        assert!(!body.contains("<td><b></td>"));
    }
}
