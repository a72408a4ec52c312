//! Deterministic fixtures shared by the benches.

use lp_core::{all_pins, Pin};

/// `n` pins drawn from the global numbering with a fixed LCG.
pub fn sample_pins(n: usize) -> Vec<Pin> {
    let table = all_pins();
    let mut x: u64 = 0xA5A5_A5A5_0123_4567;
    (0..n)
        .filter_map(|_| {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            table.pin((x >> 33) as usize % table.len())
        })
        .collect()
}

/// `n` pseudo-random terms in `0..modulus` from the same LCG.
pub fn sample_terms(n: usize, modulus: u32) -> Vec<u32> {
    let mut x: u64 = 0x0123_4567_89AB_CDEF;
    (0..n)
        .map(|_| {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((x >> 33) % modulus as u64) as u32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_deterministic() {
        assert_eq!(sample_pins(16), sample_pins(16));
        assert_eq!(sample_pins(16).len(), 16);
        assert!(sample_terms(64, 5039).iter().all(|&t| t < 5039));
    }
}
