use crate::cli::ServeArgs;
use crate::infra::{seed_repository, AppState, InMemoryShipRepository};
use crate::routes::with_ship_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ship_registry::config::AppConfig;
use ship_registry::error::AppError;
use ship_registry::ships::{FleetImporter, ShipRegistryService};
use ship_registry::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.fleet_csv.take() {
        config.registry.fleet_csv = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryShipRepository::default());
    if let Some(path) = config.registry.fleet_csv.as_ref() {
        let fleet = FleetImporter::from_path(path)?;
        let seeded = seed_repository(repository.as_ref(), fleet)?;
        info!(seeded, path = %path.display(), "registry seeded from fleet export");
    }
    let ship_service = Arc::new(ShipRegistryService::new(repository));

    let app = with_ship_routes(ship_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "ship registry ready");

    axum::serve(listener, app).await?;
    Ok(())
}
