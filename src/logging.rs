//! Structured logging for direnv-reload
//!
//! Logs go to stderr and default to `warn`, so a successful reload prints
//! nothing. Raise the level with `RUST_LOG=info` (or `debug`) to follow each
//! step.
//!
//! # Log Format Conventions
//!
//! - `operation`: The step being performed ("check", "force_rebuild", "touch", "restamp")
//! - `status`: The result status ("success", "missing", "error")
//! - `path`: The file or directory involved
//! - `count`: Number of files affected

use std::fmt as std_fmt;
use std::io::{self, IsTerminal};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    fmt::{self, format::Writer},
    prelude::*,
    EnvFilter,
};

/// Formatter that tags every line with "(direnv-reload)" instead of the module path
struct ReloadFormatter {
    with_ansi: bool,
}

impl<S, N> FormatEvent<S, N> for ReloadFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std_fmt::Result {
        let meta = event.metadata();

        write!(
            writer,
            "{} ",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f%:z")
        )?;

        if self.with_ansi {
            let level_style = match *meta.level() {
                tracing::Level::ERROR => "\x1b[31m",
                tracing::Level::WARN => "\x1b[33m",
                tracing::Level::INFO => "\x1b[32m",
                tracing::Level::DEBUG => "\x1b[34m",
                tracing::Level::TRACE => "\x1b[35m",
            };
            write!(
                writer,
                "{}{:5}(direnv-reload)\x1b[0m: ",
                level_style,
                meta.level()
            )?;
        } else {
            write!(writer, "{:5}(direnv-reload): ", meta.level())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, colored when stderr is a terminal
    Pretty,
    /// Same layout without colors (CI)
    Compact,
    /// JSON lines
    Json,
}

impl LogFormat {
    /// Parse from environment variable (DIRENV_RELOAD_LOG_FORMAT)
    pub fn from_env() -> Self {
        Self::parse(
            std::env::var("DIRENV_RELOAD_LOG_FORMAT").ok().as_deref(),
            std::env::var("CI").is_ok(),
        )
    }

    fn parse(value: Option<&str>, ci: bool) -> Self {
        match value.unwrap_or_default().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            "pretty" => Self::Pretty,
            _ if ci => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Initialize the global tracing subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (default "warn")
/// - `DIRENV_RELOAD_LOG_FORMAT`: Set format ("pretty", "compact", "json")
/// - `CI`: If set, defaults to compact format
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match LogFormat::from_env() {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .event_format(ReloadFormatter {
                            with_ansi: io::stderr().is_terminal(),
                        })
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .event_format(ReloadFormatter { with_ansi: false })
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_file(false)
                        .with_line_number(false)
                        .with_ansi(false)
                        .with_writer(io::stderr)
                        .json(),
                )
                .init();
        }
    }
}

/// Operation names for consistent logging
pub mod operations {
    pub const CHECK: &str = "check";
    pub const FORCE_REBUILD: &str = "force_rebuild";
    pub const TOUCH: &str = "touch";
    pub const RESTAMP: &str = "restamp";
}

/// Status values for consistent logging
pub mod status {
    pub const SUCCESS: &str = "success";
    pub const MISSING: &str = "missing";
}
