//! lp-wire: line framing, lock protocol codec and transports.

pub mod codec;
pub mod frame;
pub mod protocol;
pub mod transport;

pub use codec::ProtocolError;
pub use frame::WireError;
pub use protocol::{GuessReply, ProbeHint};
pub use transport::{LineTransport, StreamTransport, TcpTransport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
