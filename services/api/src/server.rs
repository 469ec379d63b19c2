use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_recon_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use parcel_recon::config::AppConfig;
use parcel_recon::error::AppError;
use parcel_recon::telemetry;
use parcel_recon::workflows::ReconciliationService;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = ReconciliationService::from_config(&config)?;
    info!(
        registry = service.registry().len(),
        known_parents = service.known_parents().len(),
        "reconciliation service configured"
    );

    let app = with_recon_routes(Arc::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "parcel reconciliation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
