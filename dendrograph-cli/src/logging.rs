//! Process-wide diagnostics for the `dendrograph` binary.
//!
//! Layout results own stdout, so every span and event lands on stderr. The
//! [`LogFormat`] is read from `DENDROGRAPH_LOG_FORMAT`, and records emitted
//! through the `log` crate are forwarded into `tracing`.

use std::{env, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

const LOG_FORMAT_ENV: &str = "DENDROGRAPH_LOG_FORMAT";
const DEFAULT_FILTER: &str = "info";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Output style of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Human,
    /// One JSON object per line, with the span list attached.
    Json,
}

/// Reasons the diagnostics pipeline could not be set up.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The format variable is set but is not valid UTF-8.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Variable that was read.
        name: &'static str,
        /// Error reported by [`env::var`].
        #[source]
        source: env::VarError,
    },
    /// `DENDROGRAPH_LOG_FORMAT` names neither `human` nor `json`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Value after trimming and lowercasing.
        provided: String,
    },
    /// The global dispatcher slot was already taken.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Rejection returned by `try_init`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Sets up stderr diagnostics for the rest of the process.
///
/// Only the first call does any work. `RUST_LOG` picks the filter (`info`
/// when unset) and `DENDROGRAPH_LOG_FORMAT` picks between [`LogFormat::Human`]
/// and [`LogFormat::Json`]. Each span logs its fields once, when it closes.
///
/// # Errors
/// Returns [`LoggingError::InvalidUnicode`] or
/// [`LoggingError::UnsupportedFormat`] when the format variable cannot be
/// used. If a host already installed its own subscriber, that subscriber is
/// kept, a one-line notice goes to stderr and the call still succeeds.
pub fn init_logging() -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }

    match install_subscriber(log_format_from_env()?) {
        Ok(()) => {}
        Err(LoggingError::InstallFailed { source }) => {
            report_existing_subscriber(&source);
        }
        Err(err) => return Err(err),
    }
    let _ = INITIALISED.set(());
    Ok(())
}

fn log_format_from_env() -> Result<LogFormat, LoggingError> {
    match env::var(LOG_FORMAT_ENV) {
        Ok(raw) => parse_log_format(&raw),
        Err(env::VarError::NotPresent) => Ok(LogFormat::Human),
        Err(err @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
            name: LOG_FORMAT_ENV,
            source: err,
        }),
    }
}

fn install_subscriber(format: LogFormat) -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let fmt_layer = match format {
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Human => fmt_layer.boxed(),
    };

    // A host `log` logger wins; its records simply stay out of tracing.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

fn parse_log_format(raw: &str) -> Result<LogFormat, LoggingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "human" | "" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        other => Err(LoggingError::UnsupportedFormat {
            provided: other.to_owned(),
        }),
    }
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is owned by another subscriber at this point"
)]
fn report_existing_subscriber(source: &tracing_subscriber::util::TryInitError) {
    eprintln!("dendrograph: keeping the tracing subscriber installed by the host ({source})");
}
