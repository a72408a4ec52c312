//! Linear recurrence recovery and forward prediction.
//!
//! An order-`k` recurrence satisfies
//! `t[i] = sum(coefs[j] * t[i - k + j] for j in 0..k)`.
//! Given `2k` consecutive terms, the sliding windows `t[i..i+k]` for
//! `i in 0..k` form the rows of a `k x k` system with right-hand side
//! `t[k..2k]`.

use std::collections::VecDeque;

use crate::field::Fp;
use crate::linalg::{solve, SolveError};

/// Recover the coefficients from the first `2 * order` terms.
pub fn recover_coefficients<const P: u32>(
    terms: &[Fp<P>],
    order: usize,
) -> Result<Vec<Fp<P>>, SolveError> {
    let need = 2 * order;
    if order == 0 || terms.len() < need {
        return Err(SolveError::NotEnoughTerms {
            order,
            need,
            got: terms.len(),
        });
    }

    let a: Vec<Vec<Fp<P>>> = (0..order).map(|i| terms[i..i + order].to_vec()).collect();
    let b = &terms[order..need];
    solve(&a, b)
}

/// Sliding-window recurrence generator.
#[derive(Debug, Clone)]
pub struct Lfsr<const P: u32> {
    state: VecDeque<Fp<P>>,
    coefs: Vec<Fp<P>>,
}

impl<const P: u32> Lfsr<P> {
    /// `state` holds the last `coefs.len()` terms, oldest first.
    pub fn new(state: Vec<Fp<P>>, coefs: Vec<Fp<P>>) -> Result<Self, SolveError> {
        if state.len() != coefs.len() || coefs.is_empty() {
            return Err(SolveError::Shape {
                msg: "state and coefficient lengths must match and be non-zero",
            });
        }
        Ok(Self {
            state: state.into(),
            coefs,
        })
    }

    /// Recover the recurrence from observed terms and position the generator
    /// right after the last one.
    ///
    /// The first `2 * order` terms determine the coefficients; any further
    /// terms must agree with them.
    pub fn recover(terms: &[Fp<P>], order: usize) -> Result<Self, SolveError> {
        let coefs = recover_coefficients(terms, order)?;

        let mut lfsr = Self::new(terms[order..2 * order].to_vec(), coefs)?;
        for (index, &t) in terms.iter().enumerate().skip(2 * order) {
            if lfsr.step() != t {
                return Err(SolveError::Inconsistent { index });
            }
        }
        Ok(lfsr)
    }

    pub fn coefs(&self) -> &[Fp<P>] {
        &self.coefs
    }

    pub fn state(&self) -> impl Iterator<Item = Fp<P>> + '_ {
        self.state.iter().copied()
    }

    pub fn order(&self) -> usize {
        self.coefs.len()
    }

    /// Produce the next term: dot(state, coefs), then slide the window.
    pub fn step(&mut self) -> Fp<P> {
        let n: Fp<P> = self
            .state
            .iter()
            .zip(self.coefs.iter())
            .map(|(&s, &c)| s * c)
            .sum();
        self.state.pop_front();
        self.state.push_back(n);
        n
    }
}

impl<const P: u32> Iterator for Lfsr<P> {
    type Item = Fp<P>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.step())
    }
}
