//! Candidate seeding from the probe reply, and pruning by later replies.

use itertools::Itertools;
use thiserror::Error;

use lp_core::{score, Feedback, Pin, NUM_DIGITS, PIN_LEN, REFERENCE_PIN};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HintError {
    #[error("probe reply encodes {got} digits, expected {PIN_LEN}")]
    DigitCount { got: usize },
}

/// Split the probe's packed misplaced value into `(misplaced0, digits)`.
///
/// `encoded = misplaced0 + 8 * mask`, bit d of `mask` set when digit d is in
/// the pin. Only bits 0..=9 are read. Digits come back ascending.
pub fn decode_digit_mask(encoded: u32) -> (u32, Vec<u8>) {
    let misplaced0 = encoded % 8;
    let mut mask = encoded / 8;
    let mut digits = Vec::with_capacity(PIN_LEN);
    for d in 0..NUM_DIGITS {
        if mask % 2 == 1 {
            digits.push(d);
        }
        mask /= 2;
    }
    (misplaced0, digits)
}

/// Seed a round's candidate set from the probe reply.
///
/// Keeps every ordering of the decoded digits that scores
/// `(exact0, misplaced0)` against "0123". Orderings are generated in
/// lexicographic order and that order is kept.
pub fn initial_candidates(exact0: u32, encoded: u32) -> Result<Vec<Pin>, HintError> {
    let (misplaced0, digits) = decode_digit_mask(encoded);
    if digits.len() != PIN_LEN {
        return Err(HintError::DigitCount { got: digits.len() });
    }

    let want = Feedback::new(exact0, misplaced0);
    let out = digits
        .into_iter()
        .permutations(PIN_LEN)
        .filter(|perm| score(&REFERENCE_PIN, perm) == want)
        .filter_map(|perm| Pin::from_digits(&perm).ok())
        .collect();
    Ok(out)
}

/// Keep the candidates `c` with `score(guess, c).exact == observed_exact`.
///
/// Only the exact count takes part; the misplaced count of a reply is not
/// used here.
pub fn prune(candidates: &[Pin], guess: &Pin, observed_exact: u32) -> Vec<Pin> {
    candidates
        .iter()
        .filter(|c| score(guess.as_slice(), c.as_slice()).exact == observed_exact)
        .copied()
        .collect()
}
