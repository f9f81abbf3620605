//! Structured logging: line formatter, request log entry point, sink lifecycle
//!
//! Every `tracing` event is rendered by [`LogFormatter`] as one line:
//!
//! ```text
//! users.rs:48	[INFO]	[create_user]	User created successfully id=7 email=ada@example.com
//! ```
//!
//! - file:line is the call site, captured at compile time by the macros
//! - the caller is the innermost span name, else the last module segment
//! - fields follow the message as ` key=value`, in recording order
//!
//! Request logs go through [`request`] and use a denser fixed layout.
//!
//! The sink is console plus a rolling file under [`LoggingConfig::dir`].
//! Files rotate daily and at most [`MAX_LOG_FILES`] segments are kept.

use std::fmt::{self, Write as _};
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder as RollingBuilder, InitError, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Target used by [`request`]; the formatter switches layout on it.
pub const REQUEST_TARGET: &str = "checkin::request";

const LOG_FILE_PREFIX: &str = "server";
const LOG_FILE_SUFFIX: &str = "log";

/// Rotated segments kept on disk, one per day, so roughly a month of history
pub const MAX_LOG_FILES: usize = 30;

static ACTIVE_LOG_DIR: OnceCell<PathBuf> = OnceCell::new();

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("failed to create log directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open rolling log file: {0}")]
    Appender(#[from] InitError),

    #[error("failed to install log subscriber: {0}")]
    Subscriber(#[from] TryInitError),

    #[error("logging already initialized at {active:?}; refusing to switch to {requested:?}")]
    AlreadyInitialized { active: PathBuf, requested: PathBuf },
}

/// Keeps the file writer alive. Dropping it flushes buffered lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the process-wide sink.
///
/// Creates `config.dir` if needed. Calling again with the same directory is
/// a no-op that returns an empty guard; a different directory is rejected.
pub fn init(config: &LoggingConfig) -> Result<LogGuard, LoggingError> {
    if let Some(active) = ACTIVE_LOG_DIR.get() {
        if active == &config.dir {
            return Ok(LogGuard { _file: None });
        }
        return Err(LoggingError::AlreadyInitialized {
            active: active.clone(),
            requested: config.dir.clone(),
        });
    }

    std::fs::create_dir_all(&config.dir).map_err(|source| LoggingError::CreateDir {
        path: config.dir.clone(),
        source,
    })?;

    let appender = RollingBuilder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(&config.dir)?;
    let (file_writer, file_guard) = tracing_appender::non_blocking(appender);

    let console = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(LogFormatter)
        .with_writer(std::io::stdout);
    let file = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(LogFormatter)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter(config.debug))
        .with(console)
        .with(file)
        .try_init()?;

    let _ = ACTIVE_LOG_DIR.set(config.dir.clone());
    tracing::info!(dir = %config.dir.display(), "Logger initialized");

    Ok(LogGuard {
        _file: Some(file_guard),
    })
}

/// Flush and release the sink.
pub fn close(guard: LogGuard) {
    tracing::info!("Logger shutting down");
    drop(guard);
}

fn env_filter(debug: bool) -> EnvFilter {
    let default = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log one HTTP request in the dense request layout:
///
/// ```text
/// middleware.rs:31	[INFO]	[request] GET /api/users status=200 duration=1.2ms
/// ```
///
/// The location is the caller's, not this function's.
#[track_caller]
pub fn request(level: Level, method: &str, path: &str, status: u16, duration: Duration) {
    let location = Location::caller();

    macro_rules! emit {
        ($lvl:expr) => {
            tracing::event!(
                target: REQUEST_TARGET,
                $lvl,
                caller.file = location.file(),
                caller.line = location.line(),
                method,
                path,
                status,
                duration = ?duration,
            )
        };
    }

    if level == Level::ERROR {
        emit!(Level::ERROR)
    } else if level == Level::WARN {
        emit!(Level::WARN)
    } else if level == Level::DEBUG {
        emit!(Level::DEBUG)
    } else if level == Level::TRACE {
        emit!(Level::TRACE)
    } else {
        emit!(Level::INFO)
    }
}

/// Event formatter shared by every sink
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFormatter;

impl<S, N> FormatEvent<S, N> for LogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        if meta.target() == REQUEST_TARGET {
            let file = fields.file.as_deref().or(meta.file()).unwrap_or("unknown");
            let line = fields.line.or(meta.line()).unwrap_or(0);
            write!(
                writer,
                "{}:{}\t[{}]\t[request] {} {} status={} duration={}",
                basename(file),
                line,
                meta.level(),
                fields.get("method"),
                fields.get("path"),
                fields.get("status"),
                fields.get("duration"),
            )?;
            return writeln!(writer);
        }

        let caller = ctx
            .event_scope()
            .and_then(|mut scope| scope.next())
            .map(|span| span.name())
            .unwrap_or_else(|| caller_from_target(meta.target()));

        write!(
            writer,
            "{}:{}\t[{}]\t[{}]\t{}",
            basename(meta.file().unwrap_or("unknown")),
            meta.line().unwrap_or(0),
            meta.level(),
            caller,
            fields.message,
        )?;
        for (key, value) in &fields.pairs {
            write!(writer, " {key}={value}")?;
        }
        writeln!(writer)
    }
}

fn basename(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

fn caller_from_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    pairs: Vec<(&'static str, String)>,
    file: Option<String>,
    line: Option<u32>,
}

impl FieldCollector {
    fn get(&self, name: &str) -> &str {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("-")
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_owned(),
            "caller.file" => self.file = Some(value.to_owned()),
            name => self.pairs.push((name, value.to_owned())),
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "caller.line" => self.line = u32::try_from(value).ok(),
            name => self.pairs.push((name, value.to_string())),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            name => self.pairs.push((name, format!("{value:?}"))),
        }
    }
}
