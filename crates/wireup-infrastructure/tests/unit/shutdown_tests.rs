//! Shutdown tests
//!
//! The shutdowner itself, the task runner that turns a finished task into a
//! shutdown request, and `Wiring::run_task` end to end.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use wireup_domain::constants::DEFAULT_EXIT_CODE;
use wireup_domain::error::Error;
use wireup_domain::exit::exit_code_mapper;
use wireup_infrastructure::di::{App, ShutdownSignal, Shutdowner, Wiring};
use wireup_infrastructure::infrastructure::{Task, TaskRunner};

// =============================================================================
// Shutdowner
// =============================================================================

#[test]
fn test_first_request_wins() {
    let shutdowner = Shutdowner::new();
    assert!(shutdowner.signal().is_none());

    assert!(shutdowner.shutdown(4));
    assert!(!shutdowner.shutdown(9));

    assert_eq!(shutdowner.signal(), Some(ShutdownSignal { exit_code: 4 }));
}

#[tokio::test]
async fn test_wait_returns_after_request() {
    let shutdowner = Arc::new(Shutdowner::new());
    let requester = Arc::clone(&shutdowner);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        requester.shutdown(2);
    });

    let signal = tokio::time::timeout(Duration::from_secs(2), shutdowner.wait())
        .await
        .unwrap();
    assert_eq!(signal.exit_code, 2);
}

#[tokio::test]
async fn test_wait_after_request_returns_immediately() {
    let shutdowner = Shutdowner::new();
    shutdowner.shutdown(0);

    assert_eq!(shutdowner.wait().await.exit_code, 0);
}

#[tokio::test]
async fn test_subscribers_see_request() {
    let shutdowner = Shutdowner::new();
    let mut receiver = shutdowner.subscribe();

    shutdowner.shutdown(6);
    receiver.changed().await.unwrap();

    assert_eq!(*receiver.borrow(), Some(ShutdownSignal { exit_code: 6 }));
}

// =============================================================================
// TaskRunner
// =============================================================================

#[tokio::test]
async fn test_successful_task_requests_zero() {
    let shutdowner = Arc::new(Shutdowner::new());
    let runner = TaskRunner::new(Arc::clone(&shutdowner));

    let code = runner
        .run_and_shutdown("ok", Task::future(async { Ok(()) }))
        .await
        .unwrap();

    assert_eq!(code, 0);
    assert_eq!(shutdowner.signal(), Some(ShutdownSignal { exit_code: 0 }));
}

#[tokio::test]
async fn test_error_code_travels_with_error() {
    let shutdowner = Arc::new(Shutdowner::new());
    let runner = TaskRunner::new(Arc::clone(&shutdowner));

    let code = runner
        .run_and_shutdown(
            "coded",
            Task::fallible(|| Err(Error::internal("bad input").with_exit_code(7))),
        )
        .await
        .unwrap();

    assert_eq!(code, 7);
}

#[tokio::test]
async fn test_plain_error_maps_to_default_code() {
    let shutdowner = Arc::new(Shutdowner::new());
    let runner = TaskRunner::new(shutdowner);

    let code = runner
        .run_and_shutdown("plain", Task::fallible(|| Err(Error::internal("broken"))))
        .await
        .unwrap();

    assert_eq!(code, DEFAULT_EXIT_CODE);
}

#[tokio::test]
async fn test_mapper_decides_when_error_has_no_code() {
    let shutdowner = Arc::new(Shutdowner::new());
    let runner = TaskRunner::new(shutdowner)
        .with_exit_code_mapper(Some(exit_code_mapper(|err| if err.is_some() { 42 } else { 5 })));

    let failed = runner
        .run_and_shutdown("failed", Task::fallible(|| Err(Error::internal("x"))))
        .await
        .unwrap();
    let succeeded = runner
        .run_and_shutdown("succeeded", Task::blocking(|| {}))
        .await
        .unwrap();

    assert_eq!(failed, 42);
    assert_eq!(succeeded, 5);
}

#[tokio::test]
async fn test_panicking_task_still_requests_shutdown() {
    let shutdowner = Arc::new(Shutdowner::new());
    let runner = TaskRunner::new(Arc::clone(&shutdowner));

    let code = runner
        .run_and_shutdown("panics", Task::blocking(|| panic!("task exploded")))
        .await
        .unwrap();

    assert_eq!(code, DEFAULT_EXIT_CODE);
    assert_eq!(shutdowner.signal().map(|signal| signal.exit_code), Some(1));
}

#[tokio::test]
async fn test_cancellable_task_stops_on_shutdown() {
    let shutdowner = Arc::new(Shutdowner::new());
    let runner = TaskRunner::new(Arc::clone(&shutdowner));
    let observed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&observed);

    let handle = runner.run_and_shutdown(
        "loop",
        Task::cancellable(move |token| async move {
            token.cancelled().await;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        }),
    );
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(runner.active_tasks(), 1);
    assert!(!runner.is_shutting_down());

    assert!(runner.shutdown(Duration::from_secs(1)).await);
    assert!(runner.is_shutting_down());
    assert!(observed.load(Ordering::SeqCst));
    assert_eq!(handle.await.unwrap(), 0);
}

#[tokio::test]
async fn test_shutdown_times_out_on_stuck_task() {
    let runner = TaskRunner::new(Arc::new(Shutdowner::new()));
    let _handle = runner.run_and_shutdown(
        "stuck",
        Task::future(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }),
    );

    assert!(!runner.shutdown(Duration::from_millis(20)).await);
}

// =============================================================================
// run_task
// =============================================================================

#[tokio::test]
async fn test_run_task_exit_code_becomes_app_exit_code() {
    let app = App::new(Wiring::run_task(
        "job",
        Task::future(async { Err(Error::generic("boom").with_exit_code(9)) }),
        None,
    ))
    .unwrap();

    assert_eq!(app.lifecycle().len(), 1);
    assert_eq!(app.run().await, 9);
}

#[tokio::test]
async fn test_run_task_success_exits_zero() {
    let app = App::new(Wiring::run_task("job", Task::blocking(|| {}), None)).unwrap();
    assert_eq!(app.run().await, 0);
}

#[tokio::test]
async fn test_run_task_is_cancelled_when_app_stops_first() {
    let observed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&observed);
    let app = App::new(Wiring::run_task(
        "server",
        Task::cancellable(move |token| async move {
            token.cancelled().await;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        }),
        None,
    ))
    .unwrap();

    app.start().await.unwrap();
    app.stop().await.unwrap();

    assert!(observed.load(Ordering::SeqCst));
}
