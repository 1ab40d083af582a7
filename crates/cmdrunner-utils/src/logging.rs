//! Logging and observability infrastructure for cmdrunner
//!
//! Diagnostics go through `tracing`. The binary installs one subscriber that
//! writes to stderr, so stdout stays reserved for command results. Session log
//! entries are mirrored into the same subscriber under
//! [`crate::session_log::MIRROR_TARGET`].

use std::io::IsTerminal;
use std::time::Duration;
use tracing::{Level, span};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Check if colored output should be used.
///
/// Returns true only if stderr is a terminal and `NO_COLOR` is not set.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Filter applied when `RUST_LOG` is not set.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "cmdrunner=debug,info"
    } else {
        "cmdrunner=info,warn"
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flag. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_color())
                .with_target(verbose)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(false)
                .with_file(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

/// Span wrapping one command execution.
#[must_use]
pub fn execution_span(multi_line: bool, timeout: Duration) -> tracing::Span {
    span!(
        Level::INFO,
        "execute",
        multi_line = multi_line,
        timeout_ms = timeout.as_millis() as u64,
    )
}
