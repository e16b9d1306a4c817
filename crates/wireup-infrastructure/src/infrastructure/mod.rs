//! Runtime helpers built on the container
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`shutdown`] | Background tasks that request shutdown when they finish |
//! | [`event_logger`] | Tracing, printer, recording and no-op event loggers |
//! | [`printer`] | Tracing, writer and no-op printers |
//! | [`profiling`] | Process sampling and the lifecycle-bound profile recorder |

pub mod event_logger;
pub mod printer;
pub mod profiling;
pub mod shutdown;

pub use event_logger::{NopLogger, PrinterLogger, RecordingLogger, TracingLogger};
pub use printer::{NopPrinter, TracingPrinter, WriterPrinter};
pub use profiling::{ProcessSample, ProcessSampler, ProfileRecorder, ProfileSession, profiling};
pub use shutdown::{Task, TaskRunner, register_task};
