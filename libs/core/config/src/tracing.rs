use crate::{Environment, LogFormat};
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre with location sections on and env sections off.
///
/// Call early in `main()`. Repeated calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize the global subscriber.
///
/// - `LogFormat::Json`: one flattened JSON object per event, no module targets
/// - `LogFormat::Pretty`: human-readable multi-line output
///
/// Both variants carry a `tracing_error::ErrorLayer` so `eyre` reports include
/// span traces. `RUST_LOG` overrides the level filter; without it production
/// logs at `info` and development at `debug`.
///
/// Safe to call more than once: later calls leave the first subscriber in place.
pub fn init_tracing(environment: &Environment, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if environment.is_production() {
            EnvFilter::new("info,tower_http=info,sea_orm=warn,sqlx=warn")
        } else {
            EnvFilter::new("debug,hyper=info,h2=info")
        }
    });

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
    };

    match result {
        Ok(_) => info!(?environment, ?format, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
