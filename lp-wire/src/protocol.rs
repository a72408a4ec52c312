//! Lock protocol definitions.
//!
//! Replies are single text lines. A hint line looks like `<label>: A<e>B<m>`
//! and is read positionally: after the first `": "`, byte 1 is the exact
//! count and byte 3 the misplaced count. The probe reply instead carries a
//! decimal number after the first `B`. Any line containing `Correct` means
//! the guess was accepted.

use lp_core::Feedback;

/// Separator before the hint payload.
pub const HINT_SEPARATOR: &[u8] = b": ";

/// Marker of an accepted guess.
pub const CORRECT_MARKER: &[u8] = b"Correct";

/// Payload offsets of the single-digit counts in a guess reply.
pub const EXACT_OFFSET: usize = 1;
pub const MISPLACED_OFFSET: usize = 3;

/// Label the simulated lock puts before hints.
pub const HINT_LABEL: &str = "Hint";

/// Decoded probe reply: exact count against "0123" and the packed
/// `misplaced0 + 8 * digit_mask` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeHint {
    pub exact: u32,
    pub encoded: u32,
}

/// Decoded reply to a regular guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessReply {
    /// The lock accepted the guess; the full line is kept for logging.
    Correct(String),
    Hint(Feedback),
}
