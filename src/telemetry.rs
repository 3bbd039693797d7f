//! Telemetry: OTLP export for spans and logs, Prometheus for metrics.
//!
//! Per-request spans come from `tower_http::trace::TraceLayer`; once a
//! tracer provider is installed they are exported through OTLP.
use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{Unit, gauge};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::{SdkLogger, SdkLoggerProvider};
use opentelemetry_sdk::trace::SdkTracerProvider;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};

use std::time::{Duration, Instant};

use crate::BoxError;

const REQUESTS_TOTAL: &str = "http_requests_total";
const REQUEST_DURATION: &str = "http_requests_duration_seconds";
const PROCESS_REFRESH: Duration = Duration::from_secs(10);

fn resource() -> Resource {
    Resource::builder()
        .with_service_name(env!("CARGO_PKG_NAME"))
        .with_attribute(opentelemetry::KeyValue::new(
            "service.version",
            env!("CARGO_PKG_VERSION"),
        ))
        .build()
}

/// Build the OTLP span exporter pipeline.
pub fn setup_tracer() -> Result<SdkTracerProvider, BoxError> {
    let exporter = SpanExporter::builder().with_tonic().build()?;

    Ok(SdkTracerProvider::builder()
        .with_resource(resource())
        .with_batch_exporter(exporter)
        .build())
}

/// Build the `tracing` layer forwarding log events to `endpoint`.
pub fn setup_logging(
    endpoint: &str,
) -> Result<OpenTelemetryTracingBridge<SdkLoggerProvider, SdkLogger>, BoxError> {
    let exporter = LogExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let provider = SdkLoggerProvider::builder()
        .with_resource(resource())
        .with_batch_exporter(exporter)
        .build();

    Ok(OpenTelemetryTracingBridge::new(&provider))
}

/// Install the Prometheus recorder and start sampling process usage.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    const LATENCY_BUCKETS: &[f64] = &[
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    metrics::describe_counter!(REQUESTS_TOTAL, Unit::Count, "Handled HTTP requests.");
    metrics::describe_histogram!(
        REQUEST_DURATION,
        Unit::Seconds,
        "Time spent handling HTTP requests."
    );

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_owned()), LATENCY_BUCKETS)?
        .install_recorder()?;

    tokio::spawn(sample_process());

    Ok(handle)
}

/// Publish CPU and memory gauges for this process until shutdown.
async fn sample_process() {
    metrics::describe_gauge!("process_cpu_usage", Unit::Percent, "Process CPU usage.");
    metrics::describe_gauge!(
        "process_memory_used_bytes",
        Unit::Bytes,
        "Resident memory of the process."
    );

    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new_with_specifics(RefreshKind::nothing());
    let mut interval = tokio::time::interval(PROCESS_REFRESH);

    loop {
        interval.tick().await;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );

        if let Some(process) = system.process(pid) {
            gauge!("process_memory_used_bytes").set(process.memory() as f64);
            gauge!("process_cpu_usage").set(f64::from(process.cpu_usage()));
        }
    }
}

/// Count requests and record their latency, labelled by route and status.
pub async fn track(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_owned(), |path| path.as_str().to_owned());
    let method = req.method().to_string();

    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();

    let labels = [
        ("method", method),
        ("path", route),
        ("status", response.status().as_u16().to_string()),
    ];
    metrics::counter!(REQUESTS_TOTAL, &labels).increment(1);
    metrics::histogram!(REQUEST_DURATION, &labels).record(elapsed);

    response
}
