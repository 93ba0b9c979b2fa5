use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "shutterbox=debug,tower_http=debug";
const QUIET_FILTER: &str = "shutterbox=info,tower_http=info";

/// Filter used when `RUST_LOG` is unset.
fn default_filter(debug_enabled: bool) -> &'static str {
    if debug_enabled {
        DEFAULT_FILTER
    } else {
        QUIET_FILTER
    }
}

/// Initialize console tracing.
///
/// `RUST_LOG` overrides the default filter. Production output drops colours.
pub fn init_telemetry(
    environment: &str,
    debug_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(debug_enabled).into());

    let production = matches!(environment.to_lowercase().as_str(), "production" | "prod");

    let console_fmt = tracing_subscriber::fmt::layer()
        .with_ansi(!production)
        .event_format(Format::default().compact().with_target(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_fmt)
        .try_init()?;

    tracing::info!(environment = %environment, debug_enabled, "Tracing initialized");
    Ok(())
}
