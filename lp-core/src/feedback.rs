//! Lock-compatible feedback scoring.
//!
//! The remote lock scores with a non-consuming membership test: every digit
//! of the guess is looked up in the secret, and counts as exact when the
//! secret's first occurrence of that digit sits at the same position. A
//! repeated guess digit is therefore counted once per occurrence. This has to
//! match the lock bit for bit, so it is kept as is.

use std::sync::OnceLock;

use crate::pin::{Pin, NUM_DIGITS};

/// The fixed reference pin the probe is scored against.
pub const REFERENCE_PIN: [u8; 4] = [0, 1, 2, 3];

/// Exact-position and wrong-position match counts.
///
/// Counts are `u32` because the probe reply packs the digit bitmask into the
/// misplaced count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Feedback {
    pub exact: u32,
    pub misplaced: u32,
}

impl Feedback {
    pub fn new(exact: u32, misplaced: u32) -> Self {
        Self { exact, misplaced }
    }
}

/// Score `guess` against `secret`. Both are digit-value slices; `guess` may be
/// of any length.
pub fn score(secret: &[u8], guess: &[u8]) -> Feedback {
    let mut fb = Feedback::default();
    for (i, g) in guess.iter().enumerate() {
        if let Some(pos) = secret.iter().position(|s| s == g) {
            if pos == i {
                fb.exact += 1;
            } else {
                fb.misplaced += 1;
            }
        }
    }
    fb
}

/// The round-opening probe: "0123" followed by each digit d repeated
/// `2^(d+3)` times.
///
/// Every digit after position 3 can only be misplaced, so scoring a pin
/// against the probe yields `exact` against "0123" and
/// `misplaced0 + 8 * digit_mask` where `misplaced0 < 8`.
pub fn probe_digits() -> &'static [u8] {
    static PROBE: OnceLock<Vec<u8>> = OnceLock::new();
    PROBE.get_or_init(|| {
        let mut out = REFERENCE_PIN.to_vec();
        for d in 0..NUM_DIGITS {
            let reps = 1usize << (d as usize + 3);
            out.extend(std::iter::repeat(d).take(reps));
        }
        out
    })
}

/// What the lock answers when `pin` is probed.
pub fn probe_feedback(pin: &Pin) -> Feedback {
    score(pin.as_slice(), probe_digits())
}
