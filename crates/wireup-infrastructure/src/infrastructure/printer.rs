//! Printer implementations

use std::fmt;
use std::io::Write;
use std::sync::Mutex;
use tracing::Level;
use wireup_domain::ports::Printer;

/// Emits each line as a tracing event at a fixed level
#[derive(Debug, Clone, Copy)]
pub struct TracingPrinter {
    level: Level,
}

impl TracingPrinter {
    /// Printer emitting at `level`
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for TracingPrinter {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

impl Printer for TracingPrinter {
    fn print(&self, args: fmt::Arguments<'_>) {
        let level = self.level;
        if level == Level::ERROR {
            tracing::error!("{}", args);
        } else if level == Level::WARN {
            tracing::warn!("{}", args);
        } else if level == Level::DEBUG {
            tracing::debug!("{}", args);
        } else if level == Level::TRACE {
            tracing::trace!("{}", args);
        } else {
            tracing::info!("{}", args);
        }
    }
}

/// Writes each line, newline-terminated, to a writer
pub struct WriterPrinter<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterPrinter<W> {
    /// Printer writing to `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl WriterPrinter<std::io::Stderr> {
    /// Printer writing to standard error
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> Printer for WriterPrinter<W> {
    fn print(&self, args: fmt::Arguments<'_>) {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // A broken sink must not take the application down with it
        let _ = writeln!(writer, "{args}");
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NopPrinter;

impl Printer for NopPrinter {
    fn print(&self, _args: fmt::Arguments<'_>) {}
}
