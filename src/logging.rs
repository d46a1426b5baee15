// src/logging.rs
//
// Tracing setup for embedders and test binaries.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::time::FormatTime;

/// Environment variable holding the `EnvFilter` directives.
pub const LOG_ENV: &str = "FERRY_LOG";

/// Environment variable selecting the output style: `compact` or `full`.
pub const LOG_STYLE_ENV: &str = "FERRY_LOG_STYLE";

/// A timer that outputs nothing but still enables span timing calculation
struct NoTimestamp;

impl FormatTime for NoTimestamp {
    fn format_time(
        &self,
        _w: &mut tracing_subscriber::fmt::format::Writer<'_>,
    ) -> std::fmt::Result {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogStyle {
    /// No timestamp prefix; target, level and span timing only.
    #[default]
    Compact,
    /// Timestamps plus span open/close events.
    Full,
}

impl LogStyle {
    pub fn from_env_value(value: &str) -> Self {
        match value {
            "full" => LogStyle::Full,
            _ => LogStyle::Compact,
        }
    }
}

/// Install a stderr subscriber if `FERRY_LOG` is set.
///
/// Returns `false` when the variable is unset or invalid, or when another
/// global subscriber is already installed.
pub fn init() -> bool {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return false;
    };
    let style = LogStyle::from_env_value(&std::env::var(LOG_STYLE_ENV).unwrap_or_default());
    let installed = match style {
        LogStyle::Full => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
        LogStyle::Compact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_timer(NoTimestamp)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };
    if installed {
        tracing::debug!(?style, "tracing initialized");
    }
    installed
}
