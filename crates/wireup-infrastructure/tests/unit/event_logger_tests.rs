//! Printer and event logger tests

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Level;
use wireup_domain::error::Result;
use wireup_domain::ports::{Event, EventLogger, Printer};
use wireup_infrastructure::di::{App, Wiring};
use wireup_infrastructure::infrastructure::{
    NopLogger, NopPrinter, PrinterLogger, RecordingLogger, TracingLogger, TracingPrinter,
    WriterPrinter,
};

#[derive(Default)]
struct Capture {
    lines: Mutex<Vec<String>>,
}

impl Capture {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Printer for Capture {
    fn print(&self, args: fmt::Arguments<'_>) {
        self.lines.lock().unwrap().push(args.to_string());
    }
}

struct Widget;

fn new_widget() -> Result<Widget> {
    Ok(Widget)
}

#[test]
fn test_writer_printer_terminates_lines() {
    let printer = WriterPrinter::new(Vec::new());
    printer.print(format_args!("hello {}", "world"));
    printer.print(format_args!("second"));

    let written = String::from_utf8(printer.into_inner()).unwrap();
    assert_eq!(written, "hello world\nsecond\n");
}

#[test]
fn test_nop_and_tracing_printers_accept_lines() {
    NopPrinter.print(format_args!("dropped"));
    TracingPrinter::default().print(format_args!("info line"));
    TracingPrinter::new(Level::ERROR).print(format_args!("error line"));
}

#[test]
fn test_printer_through_shared_pointer() {
    let capture = Arc::new(Capture::default());
    let shared: Arc<dyn Printer> = capture.clone();
    shared.print(format_args!("via arc"));

    assert_eq!(capture.lines(), vec!["via arc"]);
}

#[test]
fn test_printer_logger_renders_console_lines() {
    let capture = Arc::new(Capture::default());
    let logger = PrinterLogger::new(capture.clone());

    logger.log_event(&Event::Supplied {
        output: "Config".to_string(),
        error: None,
    });
    logger.log_event(&Event::Invoking {
        function: "setup".to_string(),
    });
    logger.log_event(&Event::OnStartExecuted {
        hook: "server".to_string(),
        runtime: Duration::from_millis(3),
        error: None,
    });
    logger.log_event(&Event::Stopping { exit_code: 2 });

    let lines = capture.lines();
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().all(|line| line.starts_with("[wireup] ")));
    assert!(lines[0].contains("SUPPLY"));
    assert!(lines[1].contains("INVOKE"));
    assert!(lines[2].contains("server"));
    assert!(lines[3].contains("exit code 2"));
}

#[test]
fn test_printer_logger_skips_successful_constructions() {
    let capture = Arc::new(Capture::default());
    let logger = PrinterLogger::new(capture.clone());

    logger.log_event(&Event::Constructed {
        constructor: "new_widget".to_string(),
        error: None,
    });
    logger.log_event(&Event::Constructed {
        constructor: "new_widget".to_string(),
        error: Some("boom".to_string()),
    });

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("boom"));
}

#[test]
fn test_recording_logger_sees_assembly_and_construction() {
    let recorder = Arc::new(RecordingLogger::new());
    let app = App::builder()
        .logger(recorder.clone())
        .wiring(Wiring::supply(1u8))
        .wiring(Wiring::provide(new_widget))
        .build()
        .unwrap();
    app.get::<Widget>().unwrap();

    let events = recorder.events();
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Supplied { output, error: None } if output == "u8"
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Provided { constructor, error: None, .. } if constructor.contains("new_widget")
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Constructed { constructor, error: None } if constructor.contains("new_widget")
    )));
}

#[tokio::test]
async fn test_recording_logger_sees_lifecycle() {
    let recorder = Arc::new(RecordingLogger::new());
    let app = App::builder().logger(recorder.clone()).build().unwrap();

    app.start().await.unwrap();
    app.stop().await.unwrap();

    let events = recorder.events();
    assert!(events.contains(&Event::Started { error: None }));
    assert!(events.contains(&Event::Stopped { error: None }));
}

#[test]
fn test_builtin_loggers_accept_every_event() {
    let events = [
        Event::RollingBack {
            start_error: "x".to_string(),
        },
        Event::RolledBack { error: None },
        Event::Decoded {
            type_name: "Config".to_string(),
            key: Some("service".to_string()),
            error: None,
        },
    ];
    let loggers: [Arc<dyn EventLogger>; 3] = [
        Arc::new(TracingLogger::new()),
        Arc::new(NopLogger),
        Arc::new(PrinterLogger::new(Arc::new(NopPrinter))),
    ];
    for logger in &loggers {
        for event in &events {
            logger.log_event(event);
        }
    }
}
