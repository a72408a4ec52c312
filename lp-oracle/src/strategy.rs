//! Expected-cost-optimal guess selection.
//!
//! For each candidate `q` taken as the next guess, the remaining candidates
//! split into buckets by their exact count against `q`. Bucket 4 is `q`
//! itself and ends the round; every other bucket is solved recursively. The
//! cost of `q` is `1 + sum(|bucket| * cost(bucket)) / |candidates|`.
//!
//! There is no memoization: the search is exponential, but a round never
//! holds more than 24 candidates (orderings of 4 known digits). Ties go to
//! the earliest candidate, and callers rely on that order.

use lp_core::{score, Pin, PIN_LEN};

/// Weighted sum every real candidate beats.
const INITIAL_BEST: f64 = 1e9;

/// The chosen guess and the expected number of guesses it leads to
/// (counting itself).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestGuess {
    /// `None` only for an empty candidate set.
    pub guess: Option<Pin>,
    pub expected_cost: f64,
}

/// Pick the guess minimizing the expected number of remaining guesses.
pub fn best_guess(candidates: &[Pin]) -> BestGuess {
    match candidates {
        [] => {
            return BestGuess {
                guess: None,
                expected_cost: 0.0,
            }
        }
        [only] => {
            return BestGuess {
                guess: Some(*only),
                expected_cost: 1.0,
            }
        }
        _ => {}
    }

    let mut best_sum = INITIAL_BEST;
    let mut best_q = None;
    for q in candidates {
        let buckets = partition(candidates, q);

        let mut sum = 0.0f64;
        for bucket in &buckets[..PIN_LEN] {
            sum += best_guess(bucket).expected_cost * bucket.len() as f64;
        }

        if sum < best_sum {
            best_sum = sum;
            best_q = Some(*q);
        }
    }

    BestGuess {
        guess: best_q,
        expected_cost: 1.0 + best_sum / candidates.len() as f64,
    }
}

/// Split `candidates` by exact count against `q` (index 0..=4).
fn partition(candidates: &[Pin], q: &Pin) -> [Vec<Pin>; PIN_LEN + 1] {
    let mut buckets: [Vec<Pin>; PIN_LEN + 1] = Default::default();
    for c in candidates {
        let exact = score(q.as_slice(), c.as_slice()).exact as usize;
        buckets[exact].push(*c);
    }
    buckets
}
