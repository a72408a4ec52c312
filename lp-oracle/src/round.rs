//! One guessing round: `Seeded -> Pruned -> ... -> Solved`.

use thiserror::Error;

use lp_core::{Feedback, Pin};

use crate::candidates::{initial_candidates, prune, HintError};
use crate::strategy::{best_guess, BestGuess};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("bad probe reply: {0}")]
    Hint(#[from] HintError),
    #[error("no candidate is consistent with the replies so far")]
    Exhausted,
    #[error("round is not solved ({remaining} candidates left)")]
    NotSolved { remaining: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Candidates come straight from the probe reply.
    Seeded,
    /// At least one guess reply has been applied.
    Pruned,
    /// A single candidate is left, or the lock accepted a guess.
    Solved,
}

/// Candidate set plus phase for the round in progress.
#[derive(Debug, Clone)]
pub struct Round {
    candidates: Vec<Pin>,
    phase: RoundPhase,
    replies: u32,
}

impl Round {
    /// Seed from the probe reply `(exact0, encoded)`.
    pub fn seed(exact0: u32, encoded: u32) -> Result<Self, RoundError> {
        let candidates = initial_candidates(exact0, encoded)?;
        Ok(Self::from_candidates(candidates))
    }

    /// Start from an explicit candidate set.
    pub fn from_candidates(candidates: Vec<Pin>) -> Self {
        let phase = if candidates.len() == 1 {
            RoundPhase::Solved
        } else {
            RoundPhase::Seeded
        };
        Self {
            candidates,
            phase,
            replies: 0,
        }
    }

    pub fn candidates(&self) -> &[Pin] {
        &self.candidates
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Number of non-terminal guess replies applied so far.
    pub fn replies(&self) -> u32 {
        self.replies
    }

    /// Best guess over the current candidates, with its expected cost.
    pub fn best(&self) -> BestGuess {
        best_guess(&self.candidates)
    }

    /// The guess to send next.
    pub fn next_guess(&self) -> Result<Pin, RoundError> {
        self.best().guess.ok_or(RoundError::Exhausted)
    }

    /// Apply the lock's reply to `guess`. Only `feedback.exact` is used.
    pub fn observe(&mut self, guess: &Pin, feedback: Feedback) -> Result<(), RoundError> {
        self.candidates = prune(&self.candidates, guess, feedback.exact);
        self.replies += 1;
        match self.candidates.len() {
            0 => Err(RoundError::Exhausted),
            1 => {
                self.phase = RoundPhase::Solved;
                Ok(())
            }
            _ => {
                self.phase = RoundPhase::Pruned;
                Ok(())
            }
        }
    }

    /// The lock accepted `guess`.
    pub fn accept(&mut self, guess: Pin) {
        self.candidates = vec![guess];
        self.phase = RoundPhase::Solved;
    }

    /// The solved pin, if the round is over.
    pub fn answer(&self) -> Result<Pin, RoundError> {
        match (self.phase, self.candidates.as_slice()) {
            (RoundPhase::Solved, [pin]) => Ok(*pin),
            _ => Err(RoundError::NotSolved {
                remaining: self.candidates.len(),
            }),
        }
    }
}
