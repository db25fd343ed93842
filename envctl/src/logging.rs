use std::env;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Filter precedence: `ENVCTL_DEBUG=true`, then `--log-level`, then `RUST_LOG`.
pub fn env_filter(log_level: Option<&str>) -> EnvFilter {
    if debug_forced() {
        return EnvFilter::new("trace");
    }
    match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    }
}

/// Logs go to stderr so the container's stdout stays untouched.
pub fn init_tracing(log_level: Option<&str>, json: bool) {
    let builder = fmt()
        .with_env_filter(env_filter(log_level))
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn debug_forced() -> bool {
    matches!(env::var("ENVCTL_DEBUG"), Ok(val) if val.eq_ignore_ascii_case("true"))
}
