//! Logging and tracing bootstrap for Herald.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use herald_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the tracing pipeline according to the configured log format.
///
/// `RUST_LOG` overrides the default `info` filter. Initialization is
/// idempotent-hostile by design: calling this twice in one process is a bug,
/// so the error from the second attempt is surfaced.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))
}
