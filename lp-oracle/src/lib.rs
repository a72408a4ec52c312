//! lp-oracle: the guessing engine for one round of the pin lock.
//!
//! A round opens with the probe reply, which pins down the digit set and the
//! exact count against "0123" ([`initial_candidates`]). From then on every
//! guess is the candidate minimizing the expected number of further guesses
//! ([`best_guess`]), and each reply shrinks the set ([`prune`]).

pub mod candidates;
pub mod round;
pub mod stats;
pub mod strategy;

pub use candidates::{decode_digit_mask, initial_candidates, prune, HintError};
pub use round::{Round, RoundError, RoundPhase};
pub use stats::{expected_guesses, guesses_for, GuessStats};
pub use strategy::{best_guess, BestGuess};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
