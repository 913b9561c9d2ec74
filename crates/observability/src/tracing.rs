//! Tracing/logging initialization.
//!
//! JSON lines by default; set `VIDCAT_LOG_FORMAT=pretty` for human-readable
//! output during local development.

use tracing_subscriber::EnvFilter;

/// Output format for the fmt subscriber.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("VIDCAT_LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Initialize tracing/logging for the process.
///
/// `default_directives` applies when `RUST_LOG` is unset or unparsable.
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let _ = match LogFormat::from_env() {
        LogFormat::Json => builder.json().with_target(false).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
