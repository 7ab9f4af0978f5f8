use crate::cli::ServeArgs;
use crate::infra::{load_mapper, AppState, InMemoryTaskSink};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use permit_intake::config::AppConfig;
use permit_intake::error::AppError;
use permit_intake::telemetry;
use permit_intake::workflows::intake::{AsanaSink, DocumentRenderer, IntakeService, TaskSink};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let mapper = load_mapper(&config.intake)?;
    let addr = config.server.socket_addr()?;
    info!(
        catalog = %config
            .intake
            .catalog_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "standard".to_string()),
        label = %config.intake.application_label,
        "schema catalog resolved"
    );

    if args.dry_run {
        warn!("dry run: tasks are kept in memory and never reach Asana");
        let service = IntakeService::new(
            mapper,
            DocumentRenderer::default(),
            Arc::new(InMemoryTaskSink::default()),
        )
        .with_label(config.intake.application_label.clone());
        return serve(service, addr, &config).await;
    }

    let sink = AsanaSink::new(config.sink.credentials()?)?;
    let service = IntakeService::new(mapper, DocumentRenderer::default(), Arc::new(sink))
        .with_label(config.intake.application_label.clone());
    serve(service, addr, &config).await
}

async fn serve<S>(
    service: IntakeService<S>,
    addr: SocketAddr,
    config: &AppConfig,
) -> Result<(), AppError>
where
    S: TaskSink + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_intake_routes(Arc::new(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "permit intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
