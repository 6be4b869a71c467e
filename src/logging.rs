//! Logging for the bridge
//!
//! Structured events via `tracing`. Boundary events use fixed targets so
//! they can be filtered independently:
//! - `ffi`: export entry, return and failure
//! - `handles`: native object allocation and release
//! - `marshal`: data conversions at the boundary

use serde::{Deserialize, Serialize};
use tracing_appender::rolling;
use tracing_subscriber::{
    filter::{Directive, LevelFilter},
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

pub use tracing::{debug, error, info, trace, warn, Level};
pub use tracing_appender::non_blocking::WorkerGuard;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with timestamps
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
    /// JSON format for structured logging
    Json,
}

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    /// File with daily rotation
    File { directory: String, prefix: String },
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Emit span open/close events
    pub span_events: bool,
    /// Extra filter directives, e.g. "ffi=trace,handles=debug"
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            output: LogOutput::Stderr,
            span_events: false,
            filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Initialize the global subscriber
///
/// Returns the `WorkerGuard` of the non-blocking writer; keep it alive until
/// exit so buffered events are flushed. If a subscriber is already installed
/// the existing one is kept and `None` is returned.
pub fn init_logging(config: LogConfig) -> Option<WorkerGuard> {
    let (writer, guard) = match &config.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogOutput::File { directory, prefix } => {
            tracing_appender::non_blocking(rolling::daily(directory, prefix))
        }
    };

    if install(writer, &config) {
        Some(guard)
    } else {
        None
    }
}

fn install<W>(writer: W, config: &LogConfig) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = build_filter(config);
    let span_events = span_events_config(config.span_events);

    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .pretty()
                    .with_span_events(span_events)
                    .with_filter(filter),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .compact()
                    .with_span_events(span_events)
                    .with_filter(filter),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .json()
                    .with_span_events(span_events)
                    .with_filter(filter),
            )
            .try_init(),
    };

    result.is_ok()
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    let base_filter = EnvFilter::from_default_env()
        .add_directive(LevelFilter::from_level(config.level).into());

    match &config.filter {
        Some(filter_str) => filter_str
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .fold(base_filter, |filter, directive| {
                match directive.parse::<Directive>() {
                    Ok(parsed) => filter.add_directive(parsed),
                    Err(_) => {
                        warn!("Invalid filter directive: {}", directive);
                        filter
                    }
                }
            }),
        None => base_filter,
    }
}

fn span_events_config(enabled: bool) -> FmtSpan {
    if enabled {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

#[inline]
pub fn log_ffi_call(function_name: &str, args_count: usize) {
    trace!(target: "ffi", function = function_name, args_count, "FFI call");
}

#[inline]
pub fn log_ffi_return(function_name: &str, success: bool) {
    trace!(target: "ffi", function = function_name, success, "FFI return");
}

#[inline]
pub fn log_ffi_error(function_name: &str, error: &str) {
    error!(target: "ffi", function = function_name, error, "FFI error");
}

#[inline]
pub fn log_handle_alloc(kind: &str, handle: u64, live: usize) {
    debug!(target: "handles", kind, handle, live, "handle allocated");
}

#[inline]
pub fn log_handle_release(kind: &str, handle: u64, live: usize) {
    debug!(target: "handles", kind, handle, live, "handle released");
}

#[inline]
pub fn log_type_conversion(from: &str, to: &str) {
    trace!(target: "marshal", from, to, "type conversion");
}
