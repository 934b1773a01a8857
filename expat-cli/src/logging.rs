use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

// --- Formatter ---

/// `<local time> <LEVEL> <file:line> <fields>`, colored on a terminal.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
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

        if ansi {
            write!(writer, "\x1b[2m")?
        }
        write!(writer, "{} ", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))?;
        if ansi {
            write!(writer, "\x1b[0m")?
        }

        let (pre, post) = if ansi {
            match *meta.level() {
                Level::ERROR => ("\x1b[1;31m", "\x1b[0m"),
                Level::WARN => ("\x1b[1;33m", "\x1b[0m"),
                Level::INFO => ("\x1b[1;32m", "\x1b[0m"),
                Level::DEBUG => ("\x1b[1;34m", "\x1b[0m"),
                Level::TRACE => ("\x1b[1;35m", "\x1b[0m"),
            }
        } else {
            ("", "")
        };
        write!(writer, "{}{:>5}{} ", pre, meta.level(), post)?;

        if let (Some(file), Some(line)) = (meta.file().map(short_path), meta.line()) {
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

/// Drops the crate-relative `src/` prefix so locations stay short.
fn short_path(file: &str) -> &str {
    file.rsplit_once("src/")
        .or_else(|| file.rsplit_once("src\\"))
        .map_or(file, |(_, rest)| rest)
}

// --- Log file writer ---

/// Shared append-only log file.
#[derive(Clone)]
struct FileSink(Arc<Mutex<File>>);

struct SinkWriter<'a>(MutexGuard<'a, File>);

impl Write for SinkWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for FileSink {
    type Writer = SinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        // a panic mid-write leaves the file usable
        SinkWriter(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

/// Builds the global filter. `RUST_LOG` wins over the configured level.
fn make_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow::anyhow!("invalid log level '{level}': {e}")),
    }
}

/// Initializes logging. Call once at startup.
///
/// - Stderr: colored when attached to a terminal, plain when piped. Stdout
///   is left to command output.
/// - File: appended to when `log_file` is set.
/// - Level: `level` (a bare level or any `EnvFilter` directive), unless
///   `RUST_LOG` is set.
///
/// A second call is a no-op.
pub fn init_logging(
    level: &str,
    log_file: Option<&Path>,
) -> Result<()> {
    let filter = make_filter(level)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = log_file
        .map(open_log_file)
        .transpose()?
        .map(|file| {
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt)
                .with_ansi(false)
                .with_writer(FileSink(Arc::new(Mutex::new(file))))
        });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn short_path_strips_source_dir() {
        assert_eq!(short_path("src/app.rs"), "app.rs");
        assert_eq!(short_path("expat-core/src/calculations/progressive.rs"), "calculations/progressive.rs");
        assert_eq!(short_path("main.rs"), "main.rs");
    }

    #[test]
    fn bad_level_is_rejected() {
        // only meaningful when RUST_LOG is unset
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(make_filter("loud=[").is_err());
        }
    }

    #[test]
    fn log_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expat.log");

        open_log_file(&path).unwrap();

        assert!(path.exists());
    }
}
