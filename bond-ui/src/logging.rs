//! Log setup for the trainer.
//!
//! Two layers share one reloadable level filter: stdout (coloured on a
//! terminal, gated so a script run can silence it) and an append-only log
//! file that discards everything until [`enable_file_logging`] points it at
//! a path.

use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use anyhow::{Result, anyhow};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

/// `<local time> LEVEL file:line fields`
struct TrainerFormat;

impl<S, N> FormatEvent<S, N> for TrainerFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let time = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");

        if ansi {
            let colour = match *meta.level() {
                Level::ERROR => "1;31",
                Level::WARN => "1;33",
                Level::INFO => "1;32",
                Level::DEBUG => "1;34",
                Level::TRACE => "1;35",
            };
            write!(writer, "\x1b[2m{time}\x1b[0m \x1b[{colour}m{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{time} {:>5} ", meta.level())?;
        }

        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            // bond-core/src/form/record.rs -> form/record.rs
            let file = file.rsplit_once("src/").map_or(file, |(_, rest)| rest);
            if ansi {
                write!(writer, "\x1b[36m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

type LogFile = Arc<Mutex<Option<File>>>;

/// File writer that can be opened after the subscriber is installed.
#[derive(Clone)]
struct LogFileSlot(LogFile);

struct LogFileWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFileSlot {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

type Reload = Box<dyn Fn(EnvFilter) -> Result<()> + Send + Sync>;

struct Handles {
    level: Reload,
    stdout: Reload,
    file: LogFile,
}

static HANDLES: OnceLock<Handles> = OnceLock::new();

fn handles() -> Result<&'static Handles> {
    HANDLES.get().ok_or_else(|| anyhow!("logging not yet initialized"))
}

fn reloader<S>(handle: reload::Handle<EnvFilter, S>) -> Reload
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |filter| {
        handle
            .reload(filter)
            .map_err(|e| anyhow!("filter reload failed: {e}"))
    })
}

fn parse_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| anyhow!("invalid log level '{directive}': {e}"))
}

/// Installs the global subscriber. Call once at startup.
///
/// `RUST_LOG` takes precedence over `level`. A second call is a no-op.
pub fn init_logging(
    level: &str,
    stdout: bool,
) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(level)?,
    };

    let file: LogFile = Arc::new(Mutex::new(None));
    let (level_filter, level_handle) = reload::Layer::new(filter);
    let (gate, stdout_handle) = reload::Layer::new(stdout_gate(stdout));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(TrainerFormat)
        .with_ansi(io::stdout().is_terminal())
        .with_filter(gate);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(TrainerFormat)
        .with_ansi(false)
        .with_writer(LogFileSlot(Arc::clone(&file)));

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        let _ = HANDLES.set(Handles {
            level: reloader(level_handle),
            stdout: reloader(stdout_handle),
            file,
        });
    }
    Ok(())
}

fn stdout_gate(enabled: bool) -> EnvFilter {
    // The level filter is still the ceiling when open.
    EnvFilter::new(if enabled { "trace" } else { "off" })
}

/// Changes the level at runtime. Accepts a bare level or any `EnvFilter`
/// directive.
pub fn set_log_level(level: &str) -> Result<()> {
    (handles()?.level)(parse_filter(level)?)
}

/// Shows or hides log lines on stdout without touching the log file.
pub fn set_stdout_enabled(enabled: bool) -> Result<()> {
    (handles()?.stdout)(stdout_gate(enabled))
}

/// Appends log output to `path`, replacing any file already open.
///
/// The parent directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let handles = handles()?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow!("cannot open log file '{}': {e}", path.display()))?;
    *handles.file.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);
    Ok(())
}

/// Stops writing to the log file.
pub fn disable_file_logging() -> Result<()> {
    *handles()?
        .file
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = None;
    Ok(())
}
