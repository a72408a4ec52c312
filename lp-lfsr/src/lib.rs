//! lp-lfsr: recover a linear recurrence over Z/p from observed terms and
//! run it forward.
//!
//! The lock draws pins from an order-10 recurrence over Z/5039 on pin
//! indices. Twenty consecutive terms give a 10x10 system whose solution is
//! the coefficient vector; after that every future pin is predictable.

pub mod field;
pub mod linalg;
pub mod recurrence;

pub use field::{Fp, F5039, MODULUS};
pub use linalg::{solve, SolveError};
pub use recurrence::{recover_coefficients, Lfsr};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod recurrence_tests;
