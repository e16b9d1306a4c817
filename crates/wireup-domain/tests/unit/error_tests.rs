//! Error Tests

use wireup_domain::error::Error;

#[test]
fn test_combine_empty_is_ok() {
    assert!(Error::combine(Vec::new()).is_ok());
}

#[test]
fn test_combine_single_is_unwrapped() {
    let err = Error::combine(vec![Error::usage("bad tag")]).unwrap_err();
    assert!(matches!(err, Error::Usage { .. }));
    assert_eq!(err.to_string(), "Usage error: bad tag");
}

#[test]
fn test_combine_many_keeps_every_error() {
    let err = Error::combine(vec![
        Error::usage("first"),
        Error::internal("second"),
        Error::configuration("third"),
    ])
    .unwrap_err();

    assert_eq!(err.errors().len(), 3);
    let message = err.to_string();
    assert!(message.starts_with("3 errors occurred"));
    assert!(message.contains("first"));
    assert!(message.contains("second"));
    assert!(message.contains("third"));
}

#[test]
fn test_nested_multiple_errors_are_flattened() {
    let inner = Error::Multiple(vec![Error::usage("a"), Error::usage("b")]);
    let outer = Error::Multiple(vec![inner, Error::usage("c")]);
    assert_eq!(outer.errors().len(), 3);
}

#[test]
fn test_exit_error_displays_wrapped_error() {
    let err = Error::internal("boom").with_exit_code(7);
    assert_eq!(err.to_string(), "Internal error: boom");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_configuration_error_with_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err = Error::configuration_with_source("cannot read", io);
    match err {
        Error::Configuration { message, source } => {
            assert_eq!(message, "cannot read");
            assert!(source.is_some());
        }
        _ => panic!("Expected Configuration error"),
    }
}
