//! Error context extension tests

use std::io;
use wireup_domain::error::Error;
use wireup_infrastructure::ErrorContext;

fn io_failure() -> Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
}

#[test]
fn test_io_context_keeps_source() {
    let err = io_failure().io_context("Failed to read config").unwrap_err();

    match &err {
        Error::Io { message, source } => {
            assert!(message.starts_with("Failed to read config"));
            assert!(source.is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_config_context() {
    let err = io_failure().config_context("Bad settings").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("no such file"));
}

#[test]
fn test_tls_context() {
    let err = io_failure().tls_context("Bad certificate").unwrap_err();
    assert!(matches!(err, Error::Tls { .. }));
}

#[test]
fn test_lazy_context_only_on_error() {
    let ok: Result<u8, io::Error> = Ok(1);
    let value = ok
        .with_context(|| -> String { panic!("context must not be built") })
        .unwrap();
    assert_eq!(value, 1);

    let err = io_failure()
        .with_context(|| format!("attempt {}", 2))
        .unwrap_err();
    assert!(matches!(err, Error::Internal { .. }));
    assert!(err.to_string().contains("attempt 2"));
}
