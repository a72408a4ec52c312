//! lp-session: the end-to-end lock session and an offline simulated lock.
//!
//! A session is `rounds` guessing rounds (probe, then optimal guesses until
//! `Correct`), a recurrence recovery over the solved pins' indices, and
//! `predictions` predicted pins sent back to the lock.

pub mod session;
pub mod sim;

pub use session::{RoundOutcome, Session, SessionError, SessionOptions, SessionReport};
pub use sim::{serve_tcp, SimulatedLock};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
