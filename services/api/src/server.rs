use std::sync::atomic::Ordering;
use std::sync::Arc;

use agrifair::config::AppConfig;
use agrifair::error::AppError;
use agrifair::telemetry;
use agrifair::workflows::grants::applications::{ApplicationApi, GrantApplicationService, ScoringConfig};
use agrifair::workflows::grants::risk::{HttpRiskScorer, RiskScorer};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryApplicationRepository, InMemoryFarmerDirectory, InMemoryGrantCatalog,
};
use crate::routes::with_service_routes;

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

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let catalog = Arc::new(InMemoryGrantCatalog::default());
    let farmers = Arc::new(InMemoryFarmerDirectory::default());
    let risk: Arc<dyn RiskScorer> = Arc::new(HttpRiskScorer::new(
        config.anomaly.base_url.clone(),
        config.anomaly.timeout,
    ));
    let service = Arc::new(GrantApplicationService::new(
        repository,
        catalog,
        risk,
        ScoringConfig::default(),
    ));

    let app = with_service_routes(ApplicationApi { service, farmers })
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "grant application service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
