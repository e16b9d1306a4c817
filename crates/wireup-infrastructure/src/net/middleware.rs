//! Listener middleware
//!
//! A middleware wraps a listener in another listener. [`apply_middleware`]
//! applies a list in order, so the last middleware is the outermost one and
//! sees each accepted connection first.

use super::listener::{BoxConnection, BoxListener, Listener};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};

/// Transforms one listener into another
pub type ListenerMiddleware = Arc<dyn Fn(BoxListener) -> BoxListener + Send + Sync>;

/// Wrap `listener` in every middleware, in order
pub fn apply_middleware(listener: BoxListener, middleware: &[ListenerMiddleware]) -> BoxListener {
    middleware
        .iter()
        .fold(listener, |listener, wrap| wrap(listener))
}

/// Log every accepted connection and every accept failure
pub fn logging() -> ListenerMiddleware {
    Arc::new(|inner: BoxListener| -> BoxListener { Box::new(LoggingListener { inner }) })
}

/// Keep at most `max` accepted connections open at once
///
/// Accepting blocks while the limit is reached; dropping a connection frees
/// its slot. A `max` of zero means no limit and leaves the listener as is.
pub fn limit(max: usize) -> ListenerMiddleware {
    Arc::new(move |inner: BoxListener| -> BoxListener {
        if max == 0 {
            return inner;
        }
        Box::new(LimitListener {
            inner,
            permits: Arc::new(Semaphore::new(max)),
        })
    })
}

/// Drop connections whose peer address fails `predicate`
pub fn filter<F>(predicate: F) -> ListenerMiddleware
where
    F: Fn(&SocketAddr) -> bool + Send + Sync + 'static,
{
    let predicate: Arc<dyn Fn(&SocketAddr) -> bool + Send + Sync> = Arc::new(predicate);
    Arc::new(move |inner: BoxListener| -> BoxListener {
        Box::new(FilterListener {
            inner,
            predicate: Arc::clone(&predicate),
        })
    })
}

struct LoggingListener {
    inner: BoxListener,
}

#[async_trait]
impl Listener for LoggingListener {
    async fn accept(&self) -> io::Result<(BoxConnection, SocketAddr)> {
        match self.inner.accept().await {
            Ok((connection, peer)) => {
                info!(peer = %peer, "Accepted connection");
                Ok((connection, peer))
            }
            Err(err) => {
                warn!(error = %err, "Accept failed");
                Err(err)
            }
        }
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}

struct LimitListener {
    inner: BoxListener,
    permits: Arc<Semaphore>,
}

#[async_trait]
impl Listener for LimitListener {
    async fn accept(&self) -> io::Result<(BoxConnection, SocketAddr)> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(io::Error::other)?;
        let (inner, peer) = self.inner.accept().await?;
        Ok((
            Box::new(LimitedConnection {
                inner,
                _permit: permit,
            }),
            peer,
        ))
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}

/// Connection holding one slot of a [`limit`] middleware
struct LimitedConnection {
    inner: BoxConnection,
    _permit: OwnedSemaphorePermit,
}

impl AsyncRead for LimitedConnection {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncWrite for LimitedConnection {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

struct FilterListener {
    inner: BoxListener,
    predicate: Arc<dyn Fn(&SocketAddr) -> bool + Send + Sync>,
}

#[async_trait]
impl Listener for FilterListener {
    async fn accept(&self) -> io::Result<(BoxConnection, SocketAddr)> {
        loop {
            let (connection, peer) = self.inner.accept().await?;
            if (self.predicate)(&peer) {
                return Ok((connection, peer));
            }
            debug!(peer = %peer, "Connection rejected by filter");
            drop(connection);
        }
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}
