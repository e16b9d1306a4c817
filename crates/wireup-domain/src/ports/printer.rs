//! Printer port
//!
//! The minimal text sink used by event loggers and diagnostics. Printers are
//! passed explicitly to whatever needs them; there is no process-wide default.

use std::fmt;
use std::sync::Arc;

/// Formatted-line sink
pub trait Printer: Send + Sync {
    /// Print one formatted line
    fn print(&self, args: fmt::Arguments<'_>);
}

impl<P: Printer + ?Sized> Printer for Arc<P> {
    fn print(&self, args: fmt::Arguments<'_>) {
        (**self).print(args);
    }
}

impl<P: Printer + ?Sized> Printer for &P {
    fn print(&self, args: fmt::Arguments<'_>) {
        (**self).print(args);
    }
}
