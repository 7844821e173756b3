use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default directives when `RUST_LOG` is unset: request-level events at
/// info, driver chatter from the database stack at warn.
const DEFAULT_FILTER: &str = "info,sqlx=warn,sea_orm=warn";

/// Install the global JSON subscriber. Called once from `main`; logs are
/// newline-delimited JSON so the completion events from
/// `StructuredLogger` stay machine-parseable.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_ansi(false)
                .json(),
        )
        .init();
}
