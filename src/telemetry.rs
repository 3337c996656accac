use tracing_subscriber::{EnvFilter, util::TryInitError, fmt, prelude::*};

const DEFAULT_FILTER: &str = "user_registration=debug,sea_orm=info";

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the default filter and `LOG_FORMAT=json` switches to
/// JSON lines. Returns an error if a subscriber is already installed.
pub fn init_tracing() -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .try_init()
    }
}

