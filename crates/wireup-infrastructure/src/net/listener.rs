//! Listener abstraction

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, ToSocketAddrs};

/// A bidirectional byte stream accepted from a listener
pub trait Connection: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> Connection for T {}

/// Boxed connection
pub type BoxConnection = Box<dyn Connection>;

/// Source of incoming connections
#[async_trait]
pub trait Listener: Send + Sync {
    /// Wait for the next connection
    async fn accept(&self) -> io::Result<(BoxConnection, SocketAddr)>;

    /// Address the listener is bound to
    fn local_addr(&self) -> io::Result<SocketAddr>;
}

/// Boxed listener
pub type BoxListener = Box<dyn Listener>;

/// [`Listener`] over a tokio TCP listener
#[derive(Debug)]
pub struct TcpListenerAdapter {
    inner: TcpListener,
}

impl TcpListenerAdapter {
    /// Wrap a bound listener
    pub fn new(inner: TcpListener) -> Self {
        Self { inner }
    }

    /// Bind to `addr`
    pub async fn bind(addr: impl ToSocketAddrs) -> io::Result<Self> {
        TcpListener::bind(addr).await.map(Self::new)
    }

    /// Box this listener
    pub fn boxed(self) -> BoxListener {
        Box::new(self)
    }
}

#[async_trait]
impl Listener for TcpListenerAdapter {
    async fn accept(&self) -> io::Result<(BoxConnection, SocketAddr)> {
        let (stream, peer) = self.inner.accept().await?;
        Ok((Box::new(stream), peer))
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}
