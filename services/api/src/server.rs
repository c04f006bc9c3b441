use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRateLimiter, CLIENT_IDLE_TTL};
use crate::routes::router;
use axum_prometheus::PrometheusMetricLayer;
use health_risk::config::AppConfig;
use health_risk::error::AppError;
use health_risk::telemetry;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        limiter: limiter.clone(),
    };

    tokio::spawn(prune_idle_clients(limiter));

    let app = router(app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "health risk assessor ready"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

async fn prune_idle_clients(limiter: Arc<InMemoryRateLimiter>) {
    let mut ticker = tokio::time::interval(CLIENT_IDLE_TTL);
    loop {
        ticker.tick().await;
        let removed = limiter.prune(Instant::now(), CLIENT_IDLE_TTL);
        if removed > 0 {
            debug!(
                removed,
                tracked = limiter.tracked_clients(),
                "pruned idle rate limit clients"
            );
        }
    }
}
