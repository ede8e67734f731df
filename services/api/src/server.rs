use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryBusinessDirectory, InMemoryDraftRepository, InMemorySubmissionSink,
};
use crate::routes::portal_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bizreg::config::AppConfig;
use bizreg::dashboard::SummaryService;
use bizreg::directory::DirectoryService;
use bizreg::error::AppError;
use bizreg::registration::RegistrationService;
use bizreg::telemetry;
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

    let registration = Arc::new(RegistrationService::new(
        Arc::new(InMemoryDraftRepository::default()),
        Arc::new(InMemorySubmissionSink::default()),
    ));
    let directory = DirectoryService::new(Arc::new(InMemoryBusinessDirectory::seeded()));
    let dashboard = Arc::new(SummaryService::from_config(
        directory.clone(),
        &config.external,
    ));

    let app = portal_router(registration, Arc::new(directory), dashboard)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "business permit portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
