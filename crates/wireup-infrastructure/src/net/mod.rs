//! Network listeners and listener middleware

pub mod listener;
pub mod middleware;

pub use listener::{BoxConnection, BoxListener, Connection, Listener, TcpListenerAdapter};
pub use middleware::{ListenerMiddleware, apply_middleware, filter, limit, logging};
