//! Port traits implemented by the infrastructure layer

pub mod events;
pub mod printer;

pub use events::{Event, EventLogger};
pub use printer::Printer;
