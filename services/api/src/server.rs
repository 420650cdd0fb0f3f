use crate::cli::ServeArgs;
use crate::infra::{in_memory_service, seed_demo_student, AppState};
use crate::routes::with_activity_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use leaps::config::AppConfig;
use leaps::error::AppError;
use leaps::records::UserId;
use leaps::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    if args.no_seed {
        config.store.seed_demo_data = false;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (activity_service, _) = in_memory_service();
    if config.store.seed_demo_data {
        let user = UserId(config.store.demo_user.clone());
        seed_demo_student(&activity_service, &user)?;
        info!(user = %user, "demo student seeded");
    }

    let app = with_activity_routes(activity_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "attainment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
