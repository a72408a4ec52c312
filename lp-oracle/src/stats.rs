//! Whole-universe statistics: how many guesses the engine needs per pin.

use std::time::Instant;

use rayon::prelude::*;

use lp_core::{all_pins, probe_feedback, score, Pin};

use crate::round::{Round, RoundError};

/// Guess-count summary over every pin in the global numbering.
#[derive(Debug, Clone)]
pub struct GuessStats {
    pub pins: usize,
    /// Mean guesses per round, probe excluded.
    pub mean: f64,
    pub max: u32,
    /// `histogram[n]` = number of pins solved with exactly `n` guesses.
    pub histogram: Vec<u64>,
    pub elapsed_secs: f64,
}

/// Play one offline round against `pin` and return the number of guesses
/// sent after the probe (the accepted guess included).
pub fn guesses_for(pin: &Pin) -> Result<u32, RoundError> {
    let hint = probe_feedback(pin);
    let mut round = Round::seed(hint.exact, hint.misplaced)?;
    let mut n = 0u32;
    loop {
        let guess = round.next_guess()?;
        n += 1;
        if guess == *pin {
            round.accept(guess);
            return Ok(n);
        }
        round.observe(&guess, score(pin.as_slice(), guess.as_slice()))?;
    }
}

/// Run [`guesses_for`] over all 5040 pins.
pub fn expected_guesses() -> Result<GuessStats, RoundError> {
    let start = Instant::now();
    let counts = all_pins()
        .pins()
        .par_iter()
        .map(guesses_for)
        .collect::<Result<Vec<u32>, RoundError>>()?;

    let max = counts.iter().copied().max().unwrap_or(0);
    let mut histogram = vec![0u64; max as usize + 1];
    for &c in &counts {
        histogram[c as usize] += 1;
    }
    let total: u64 = counts.iter().map(|&c| c as u64).sum();
    let mean = if counts.is_empty() {
        0.0
    } else {
        total as f64 / counts.len() as f64
    };

    Ok(GuessStats {
        pins: counts.len(),
        mean,
        max,
        histogram,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}
