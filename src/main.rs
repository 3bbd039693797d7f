use axum::routing::get;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use userbase::{BoxError, telemetry};

const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let otlp_endpoint = std::env::var(OTLP_ENDPOINT_ENV).ok();

    // initialize logging, with OTLP export when an endpoint is set.
    let otlp_logs = otlp_endpoint
        .as_deref()
        .map(telemetry::setup_logging)
        .transpose()?;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(otlp_logs)
        .init();

    // initialize tracing.
    if otlp_endpoint.is_some() {
        let provider = telemetry::setup_tracer()?;
        opentelemetry::global::set_tracer_provider(provider);
    }

    // initialize metrics.
    let metrics = telemetry::setup_metrics_recorder()?;

    let state = userbase::initialize_state().await?;
    let port = state.config.port;

    let app = userbase::app(state)
        .route("/metrics", get(move || std::future::ready(metrics.render())));

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(%port, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for `SIGINT` or `SIGTERM`.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "cannot listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(err) => {
                tracing::error!(%err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
