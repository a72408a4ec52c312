//! Global pin numbering.
//!
//! Every pin with 4 distinct digits gets a fixed index: pins are listed in
//! increasing numeric order, so "0123" is index 0 and "9876" is index 5039.
//! The recurrence stage works on these indices, so the ordering must never
//! change.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::pin::{Pin, PIN_LEN};

/// Number of valid pins: 10 * 9 * 8 * 7.
pub const NUM_PINS: usize = 5040;

/// Forward (index -> pin) and reverse (pin -> index) lookup over all pins.
pub struct PinTable {
    pins: Vec<Pin>,
    index: FxHashMap<Pin, usize>,
}

impl PinTable {
    fn build() -> Self {
        let mut pins = Vec::with_capacity(NUM_PINS);
        for n in 0u16..10_000 {
            let mut digits = [0u8; PIN_LEN];
            let mut x = n;
            for d in digits.iter_mut().rev() {
                *d = (x % 10) as u8;
                x /= 10;
            }
            // Pin::new rejects repeated digits, which is exactly the filter we want.
            if let Ok(pin) = Pin::new(digits) {
                pins.push(pin);
            }
        }
        debug_assert_eq!(pins.len(), NUM_PINS);

        let mut index = FxHashMap::default();
        index.reserve(pins.len());
        for (i, &p) in pins.iter().enumerate() {
            index.insert(p, i);
        }
        PinTable { pins, index }
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Pin at `idx`, or `None` when out of range.
    pub fn pin(&self, idx: usize) -> Option<Pin> {
        self.pins.get(idx).copied()
    }

    /// Index of `pin` in the global numbering.
    pub fn index_of(&self, pin: &Pin) -> Option<usize> {
        self.index.get(pin).copied()
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }
}

/// The process-wide numbering table (built on first use).
pub fn all_pins() -> &'static PinTable {
    static TABLE: OnceLock<PinTable> = OnceLock::new();
    TABLE.get_or_init(PinTable::build)
}
