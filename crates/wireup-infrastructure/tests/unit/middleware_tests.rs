//! Listener middleware tests over TCP loopback

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use wireup_infrastructure::net::{
    BoxListener, ListenerMiddleware, TcpListenerAdapter, apply_middleware, filter, limit, logging,
};

async fn loopback() -> BoxListener {
    TcpListenerAdapter::bind("127.0.0.1:0").await.unwrap().boxed()
}

#[tokio::test]
async fn test_plain_listener_accepts_and_echoes() {
    let listener = apply_middleware(loopback().await, &[logging()]);
    let addr = listener.local_addr().unwrap();

    let mut client = TcpStream::connect(addr).await.unwrap();
    let (mut server, peer) = listener.accept().await.unwrap();
    assert!(peer.ip().is_loopback());

    client.write_all(b"ping").await.unwrap();
    let mut buf = [0u8; 4];
    server.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"ping");
}

#[tokio::test]
async fn test_middleware_applied_in_order() {
    let order = Arc::new(AtomicUsize::new(0));
    let first_seen = Arc::new(AtomicUsize::new(usize::MAX));
    let second_seen = Arc::new(AtomicUsize::new(usize::MAX));

    let mark = |slot: Arc<AtomicUsize>, counter: Arc<AtomicUsize>| -> ListenerMiddleware {
        Arc::new(move |inner: BoxListener| -> BoxListener {
            slot.store(counter.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
            inner
        })
    };

    let _listener = apply_middleware(
        loopback().await,
        &[
            mark(Arc::clone(&first_seen), Arc::clone(&order)),
            mark(Arc::clone(&second_seen), Arc::clone(&order)),
        ],
    );

    assert_eq!(first_seen.load(Ordering::SeqCst), 0);
    assert_eq!(second_seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_limit_blocks_until_a_connection_is_dropped() {
    let listener = apply_middleware(loopback().await, &[limit(1)]);
    let addr = listener.local_addr().unwrap();

    let _first_client = TcpStream::connect(addr).await.unwrap();
    let _second_client = TcpStream::connect(addr).await.unwrap();

    let (first, _) = listener.accept().await.unwrap();
    let blocked = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
    assert!(blocked.is_err());

    drop(first);
    let second = tokio::time::timeout(Duration::from_secs(2), listener.accept()).await;
    assert!(matches!(second, Ok(Ok(_))));
}

#[tokio::test]
async fn test_zero_limit_accepts_without_bound() {
    let listener = apply_middleware(loopback().await, &[limit(0)]);
    let addr = listener.local_addr().unwrap();

    let _first_client = TcpStream::connect(addr).await.unwrap();
    let _second_client = TcpStream::connect(addr).await.unwrap();

    let first = tokio::time::timeout(Duration::from_secs(2), listener.accept()).await;
    let second = tokio::time::timeout(Duration::from_secs(2), listener.accept()).await;
    assert!(matches!(first, Ok(Ok(_))));
    assert!(matches!(second, Ok(Ok(_))));
}

#[tokio::test]
async fn test_filter_accepts_matching_peers() {
    let listener = apply_middleware(
        loopback().await,
        &[filter(|peer: &std::net::SocketAddr| peer.ip().is_loopback())],
    );
    let addr = listener.local_addr().unwrap();

    let _client = TcpStream::connect(addr).await.unwrap();
    let accepted = tokio::time::timeout(Duration::from_secs(2), listener.accept()).await;
    assert!(matches!(accepted, Ok(Ok(_))));
}

#[tokio::test]
async fn test_filter_drops_rejected_peers() {
    let listener = apply_middleware(loopback().await, &[filter(|_: &std::net::SocketAddr| false)]);
    let addr = listener.local_addr().unwrap();

    let mut client = TcpStream::connect(addr).await.unwrap();
    let accepted = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
    assert!(accepted.is_err());

    // The rejected connection was closed by the server side
    let mut buf = [0u8; 1];
    let read = tokio::time::timeout(Duration::from_secs(2), client.read(&mut buf))
        .await
        .unwrap();
    assert!(matches!(read, Ok(0) | Err(_)));
}
