//! lp-core: pins, the global pin numbering, feedback scoring and configuration.

pub mod config;
pub mod feedback;
pub mod numbering;
pub mod pin;

pub use config::{Config, ConfigError};
pub use feedback::{probe_digits, probe_feedback, score, Feedback, REFERENCE_PIN};
pub use numbering::{all_pins, PinTable, NUM_PINS};
pub use pin::{Pin, PinError, NUM_DIGITS, PIN_LEN};

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

#[cfg(test)]
mod pin_tests;
