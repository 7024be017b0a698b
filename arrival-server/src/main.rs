use std::net::SocketAddr;

use arrival_server::format::{TimeFormatter, TimeLabels};
use arrival_server::pda::{ArrivalSource, MockPdaClient, PdaClient, PdaConfig};
use arrival_server::registry::StopRegistry;
use arrival_server::service::ArrivalService;
use arrival_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "arrival_server=info,tower_http=info";

const DEFAULT_REGISTRY_PATH: &str = "stop_to_slid.json";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    // Stop registry
    let registry_path =
        std::env::var("STOP_REGISTRY").unwrap_or_else(|_| DEFAULT_REGISTRY_PATH.to_string());
    let registry = StopRegistry::load(&registry_path).expect("Failed to load stop registry");
    info!(stops = registry.len(), path = %registry_path, "Loaded stop registry");

    // Display labels
    let labels = match std::env::var("ARRIVAL_LABELS").as_deref() {
        Ok("en") => TimeLabels::english(),
        _ => TimeLabels::zh_tw(),
    };
    let formatter = TimeFormatter::new(labels);

    // A positional stop name means a one-shot lookup
    let stop_name = std::env::args().nth(1);

    if let Ok(mock_dir) = std::env::var("PDA_MOCK_DIR") {
        let source = MockPdaClient::new(&mock_dir).expect("Failed to load mock PDA data");
        info!(dir = %mock_dir, stops = source.available_stops().len(), "Using mock PDA data");
        run(ArrivalService::new(registry, formatter, source), stop_name).await;
    } else {
        let mut config = PdaConfig::default();
        if let Ok(url) = std::env::var("PDA_BASE_URL") {
            config = config.with_base_url(url);
        }
        if let Some(secs) = std::env::var("PDA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config = config.with_timeout(secs);
        }

        let source = PdaClient::new(config).expect("Failed to create PDA client");
        run(ArrivalService::new(registry, formatter, source), stop_name).await;
    }
}

async fn run<S>(service: ArrivalService<S>, stop_name: Option<String>)
where
    S: ArrivalSource + Send + Sync + 'static,
{
    match stop_name {
        Some(name) => print_arrivals(&service, &name).await,
        None => serve(service).await,
    }
}

/// Print one stop's arrivals to stdout.
async fn print_arrivals<S>(service: &ArrivalService<S>, stop_name: &str)
where
    S: ArrivalSource + Sync,
{
    let report = match service.lookup(stop_name).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Failed to fetch arrivals: {e}");
            std::process::exit(1);
        }
    };

    println!("最後更新時間: {}\n", report.update_time);

    for arrival in &report.arrivals {
        println!("路線: {}", arrival.route);
        println!("去返程: {}", arrival.direction);
        println!("預估到站: {}", arrival.display_time);
        println!("原始值: {}", arrival.raw_time_value);
        println!("{}", "-".repeat(40));
    }
}

async fn serve<S>(service: ArrivalService<S>)
where
    S: ArrivalSource + Send + Sync + 'static,
{
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .expect("Invalid BIND_ADDR");

    let app = create_router(AppState::new(service));

    info!(%addr, "Bus arrival server listening");
    info!("  GET /health");
    info!("  GET /api/arrivals?stop=NAME");
    info!("  GET /arrivals?stop=NAME");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
