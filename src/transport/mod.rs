//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! One attempt against one endpoint:
//!     → connector.rs (Connector::connect, bounded by the send timeout)
//!     → protocol.rs (build RequestFrame, encode with serde_json)
//!     → framed.rs (length-prefixed write, bounded by the send timeout)
//!     → framed.rs (length-prefixed read, bounded by the receive timeout)
//!     → protocol.rs (decode ResponseFrame, check sequence id)
//!     → Connection::close
//! ```
//!
//! # Design Decisions
//! - A fresh connection per attempt; sockets are never pooled
//! - The codec is opaque to the retry engine; it only sees `Failure`
//! - `Connector` is a trait so tests can count or fake connections

pub mod connector;
pub mod framed;
pub mod protocol;

#[cfg(test)]
pub(crate) mod testing;

pub use connector::{Connection, Connector};
pub use framed::{FramedConnection, TcpConnector, MAX_FRAME_SIZE};
pub use protocol::{Outcome, RequestFrame, ResponseFrame};
