use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource, logs::SdkLoggerProvider, metrics::SdkMeterProvider, trace::SdkTracerProvider,
};
use std::time::Duration;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

const EXPORT_TIMEOUT: Duration = Duration::from_secs(10);

struct OtlpProviders {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    logger_provider: SdkLoggerProvider,
}

/// Flushes the OTLP pipelines on shutdown. Holds nothing when no collector
/// endpoint is configured.
pub struct TelemetryGuard {
    otlp: Option<OtlpProviders>,
}

impl TelemetryGuard {
    pub fn exporting(&self) -> bool {
        self.otlp.is_some()
    }

    pub fn shutdown(&self) {
        let Some(otlp) = &self.otlp else {
            return;
        };
        if let Err(e) = otlp.tracer_provider.shutdown() {
            eprintln!("Error shutting down tracer provider: {e}");
        }
        if let Err(e) = otlp.meter_provider.shutdown() {
            eprintln!("Error shutting down meter provider: {e}");
        }
        if let Err(e) = otlp.logger_provider.shutdown() {
            eprintln!("Error shutting down logger provider: {e}");
        }
    }
}

fn build_resource(config: &Config) -> Resource {
    Resource::builder()
        .with_service_name(config.otel_service_name.clone())
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
        .with_attribute(KeyValue::new(
            "deployment.environment",
            config.environment.clone(),
        ))
        .build()
}

fn build_otlp(config: &Config, endpoint: &str) -> anyhow::Result<OtlpProviders> {
    let resource = build_resource(config);

    let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_timeout(EXPORT_TIMEOUT)
        .build()?;

    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();

    let metric_exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_timeout(EXPORT_TIMEOUT)
        .build()?;

    let meter_provider = SdkMeterProvider::builder()
        .with_periodic_exporter(metric_exporter)
        .with_resource(resource.clone())
        .build();

    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_timeout(EXPORT_TIMEOUT)
        .build()?;

    let logger_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    global::set_tracer_provider(tracer_provider.clone());
    global::set_meter_provider(meter_provider.clone());

    Ok(OtlpProviders {
        tracer_provider,
        meter_provider,
        logger_provider,
    })
}

/// Installs the global subscriber. Console output is always on; traces,
/// metrics and logs are also shipped over OTLP when an endpoint is set.
pub fn init_telemetry(config: &Config) -> anyhow::Result<TelemetryGuard> {
    let otlp = config
        .otel_exporter_endpoint
        .as_deref()
        .map(|endpoint| build_otlp(config, endpoint))
        .transpose()?;

    let telemetry_layer = otlp
        .as_ref()
        .map(|_| OpenTelemetryLayer::new(global::tracer(config.otel_service_name.clone())));
    let otel_log_layer = otlp
        .as_ref()
        .map(|otlp| OpenTelemetryTracingBridge::new(&otlp.logger_provider));

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let fmt_layer = if config.is_production() {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().pretty().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(telemetry_layer)
        .with(otel_log_layer)
        .with(fmt_layer)
        .init();

    match config.otel_exporter_endpoint.as_deref() {
        Some(endpoint) => tracing::info!(
            service = %config.otel_service_name,
            endpoint = %endpoint,
            "Telemetry initialized with OTLP trace, metric and log export"
        ),
        None => tracing::info!(
            service = %config.otel_service_name,
            "Telemetry initialized with console output only"
        ),
    }

    Ok(TelemetryGuard { otlp })
}
