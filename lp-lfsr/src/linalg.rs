//! Gauss-Jordan elimination over Z/P.

use thiserror::Error;

use crate::field::Fp;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    /// No non-zero pivot in `column`: the system has no unique solution.
    #[error("singular system: no pivot in column {column}")]
    Singular { column: usize },
    #[error("shape mismatch: {msg}")]
    Shape { msg: &'static str },
    #[error("need {need} terms to recover an order-{order} recurrence, got {got}")]
    NotEnoughTerms {
        order: usize,
        need: usize,
        got: usize,
    },
    /// A term beyond the ones used for the solve disagrees with the recovered recurrence.
    #[error("term {index} does not follow the recovered recurrence")]
    Inconsistent { index: usize },
}

/// Solve `a x = b` for square `a`.
///
/// Pivot choice is the first non-zero entry at or below the diagonal.
pub fn solve<const P: u32>(a: &[Vec<Fp<P>>], b: &[Fp<P>]) -> Result<Vec<Fp<P>>, SolveError> {
    let n = a.len();
    if b.len() != n {
        return Err(SolveError::Shape {
            msg: "right-hand side length differs from row count",
        });
    }
    if a.iter().any(|row| row.len() != n) {
        return Err(SolveError::Shape {
            msg: "coefficient matrix is not square",
        });
    }

    // Augmented matrix [a | b].
    let mut m: Vec<Vec<Fp<P>>> = a
        .iter()
        .zip(b.iter())
        .map(|(row, &rhs)| {
            let mut r = Vec::with_capacity(n + 1);
            r.extend_from_slice(row);
            r.push(rhs);
            r
        })
        .collect();

    for col in 0..n {
        let pivot = (col..n)
            .find(|&r| !m[r][col].is_zero())
            .ok_or(SolveError::Singular { column: col })?;
        m.swap(col, pivot);

        let inv = m[col][col]
            .inv()
            .ok_or(SolveError::Singular { column: col })?;
        for v in m[col][col..].iter_mut() {
            *v *= inv;
        }

        for r in 0..n {
            if r == col || m[r][col].is_zero() {
                continue;
            }
            let factor = m[r][col];
            for c in col..=n {
                let t = m[col][c];
                m[r][c] -= factor * t;
            }
        }
    }

    Ok(m.into_iter().map(|row| row[n]).collect())
}
