//! Structured logging setup
//!
//! All output goes to stderr: in `serve` mode stdout is the protocol channel.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build the filter: `RUST_LOG` when set and valid, otherwise `default_level`
pub fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber; later calls are ignored
pub fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(default_level))
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_uses_default_level_without_env() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(build_filter("debug").to_string(), "debug");
        assert_eq!(build_filter("silicon_sampling=trace").to_string(), "silicon_sampling=trace");
    }

    #[test]
    fn test_filter_scoped_subscriber_does_not_leak() {
        let subscriber = tracing_subscriber::registry().with(build_filter("warn"));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("scoped to this test");
        });
    }
}
