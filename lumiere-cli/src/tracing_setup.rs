//! Log and trace output for the lumiere binary
//!
//!   lumiere --debug serve                     # debug level, targets shown
//!   lumiere --otel serve                      # also export spans over OTLP
//!   RUST_LOG=lumiere_server=debug lumiere serve
//!
//! `RUST_LOG` overrides the level chosen by `--debug`. OTLP export reads
//! `OTEL_EXPORTER_OTLP_ENDPOINT` and `OTEL_SERVICE_NAME`.
//!
//! Everything is written to stderr; stdout belongs to `lumiere openapi`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Flags from the command line
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    pub debug: bool,
    pub otel: bool,
}

impl TracingConfig {
    fn default_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_level()))
    }
}

/// Where spans go when `--otel` is set
#[cfg_attr(not(feature = "telemetry"), allow(dead_code))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtlpSettings {
    pub endpoint: String,
    pub service_name: String,
}

#[cfg_attr(not(feature = "telemetry"), allow(dead_code))]
impl OtlpSettings {
    const DEFAULT_ENDPOINT: &'static str = "http://localhost:4317";
    const DEFAULT_SERVICE: &'static str = "lumiere";

    /// Read settings through `lookup`, falling back to a local collector.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|| Self::DEFAULT_ENDPOINT.to_owned()),
            service_name: non_empty("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| Self::DEFAULT_SERVICE.to_owned()),
        }
    }
}

fn init_console(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(feature = "telemetry")]
fn init_with_otlp(config: &TracingConfig, settings: &OtlpSettings) -> Result<()> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&settings.endpoint)
        .build()
        .map_err(|e| anyhow!("OTLP exporter for {}: {e}", settings.endpoint))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(opentelemetry_sdk::Resource::new(vec![KeyValue::new(
            "service.name",
            settings.service_name.clone(),
        )]))
        .build();

    let spans = tracing_opentelemetry::layer().with_tracer(provider.tracer("lumiere"));
    // Held globally until shutdown_otel flushes it
    let _ = opentelemetry::global::set_tracer_provider(provider);

    tracing_subscriber::registry()
        .with(config.filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(config.debug)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(spans)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::info!(
        endpoint = %settings.endpoint,
        service = %settings.service_name,
        "Exporting spans over OTLP"
    );
    Ok(())
}

/// Flush buffered spans before exit.
#[cfg(feature = "telemetry")]
pub fn shutdown_otel() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown_otel() {}

/// Install the global subscriber.
pub fn init(config: &TracingConfig) -> Result<()> {
    if config.otel {
        #[cfg(feature = "telemetry")]
        {
            let settings = OtlpSettings::from_lookup(|key| std::env::var(key).ok());
            return init_with_otlp(config, &settings);
        }
        #[cfg(not(feature = "telemetry"))]
        eprintln!("--otel ignored: built without the `telemetry` feature");
    }
    init_console(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_picks_level() {
        assert_eq!(TracingConfig::default().default_level(), "info");
        let config = TracingConfig {
            debug: true,
            ..Default::default()
        };
        assert_eq!(config.default_level(), "debug");
    }

    #[test]
    fn otlp_defaults_to_local_collector() {
        let settings = OtlpSettings::from_lookup(|_| None);
        assert_eq!(settings.endpoint, "http://localhost:4317");
        assert_eq!(settings.service_name, "lumiere");
    }

    #[test]
    fn otlp_reads_env_and_skips_blank() {
        let settings = OtlpSettings::from_lookup(|key| match key {
            "OTEL_EXPORTER_OTLP_ENDPOINT" => Some("http://collector:4317".to_owned()),
            "OTEL_SERVICE_NAME" => Some("  ".to_owned()),
            _ => None,
        });
        assert_eq!(settings.endpoint, "http://collector:4317");
        assert_eq!(settings.service_name, "lumiere");
    }
}
