use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "coverdesk=debug,tower_http=debug";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. `log_format = "json"` switches the
/// console output to one JSON object per event.
pub fn init_telemetry(log_format: Option<&str>) -> Result<(), anyhow::Error> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if log_format == Some("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
    } else {
        let console_fmt = tracing_subscriber::fmt::layer()
            .event_format(Format::default().compact().with_target(false));
        tracing_subscriber::registry()
            .with(filter)
            .with(console_fmt)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
    }

    tracing::info!(format = log_format.unwrap_or("compact"), "Tracing initialized");
    Ok(())
}
