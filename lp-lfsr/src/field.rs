//! Prime field element.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Modulus of the lock's recurrence (7! - 1, prime).
pub const MODULUS: u32 = 5039;

/// Element of Z/P. `P` must be prime for [`Fp::inv`] to be correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Fp<const P: u32>(u32);

/// The lock's field.
pub type F5039 = Fp<MODULUS>;

impl<const P: u32> Fp<P> {
    pub const ZERO: Self = Fp(0);
    pub const ONE: Self = Fp(1 % P);

    /// Reduce `v` mod P.
    pub fn new(v: u64) -> Self {
        Fp((v % P as u64) as u32)
    }

    /// Canonical representative in `0..P`.
    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn pow(self, mut exp: u64) -> Self {
        let mut base = self;
        let mut acc = Self::ONE;
        while exp > 0 {
            if exp & 1 == 1 {
                acc *= base;
            }
            base *= base;
            exp >>= 1;
        }
        acc
    }

    /// Multiplicative inverse via Fermat's little theorem; `None` for zero.
    pub fn inv(self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self.pow(P as u64 - 2))
        }
    }
}

impl<const P: u32> From<u32> for Fp<P> {
    fn from(v: u32) -> Self {
        Fp(v % P)
    }
}

impl<const P: u32> Add for Fp<P> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 as u64 + rhs.0 as u64)
    }
}

impl<const P: u32> Sub for Fp<P> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.0 as u64 + P as u64 - rhs.0 as u64)
    }
}

impl<const P: u32> Mul for Fp<P> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.0 as u64 * rhs.0 as u64)
    }
}

impl<const P: u32> Neg for Fp<P> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

impl<const P: u32> AddAssign for Fp<P> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const P: u32> SubAssign for Fp<P> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<const P: u32> MulAssign for Fp<P> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<const P: u32> Sum for Fp<P> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |a, b| a + b)
    }
}

impl<const P: u32> fmt::Display for Fp<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
