//! Text codec for the lock protocol.

use thiserror::Error;

use lp_core::{probe_digits, Feedback, Pin};

use crate::protocol::{
    GuessReply, ProbeHint, CORRECT_MARKER, EXACT_OFFSET, HINT_LABEL, HINT_SEPARATOR,
    MISPLACED_OFFSET,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("reply has no \": \" separator: {0:?}")]
    MissingSeparator(String),
    #[error("reply is missing the {field} field: {line:?}")]
    MissingField { field: &'static str, line: String },
    #[error("expected an ASCII digit at payload offset {offset}, got {byte:#04x}")]
    BadDigit { offset: usize, byte: u8 },
    #[error("invalid number after 'B': {0:?}")]
    BadNumber(String),
}

/// The probe as sent on the wire (ASCII digits, no newline).
pub fn encode_probe() -> Vec<u8> {
    probe_digits().iter().map(|&d| b'0' + d).collect()
}

pub fn encode_pin(pin: &Pin) -> [u8; 4] {
    pin.to_ascii()
}

/// `true` when the lock accepted the last guess.
pub fn is_correct(line: &[u8]) -> bool {
    line.windows(CORRECT_MARKER.len())
        .any(|w| w == CORRECT_MARKER)
}

/// Parse the reply to the probe.
pub fn decode_probe_reply(line: &[u8]) -> Result<ProbeHint, ProtocolError> {
    let payload = hint_payload(line)?;
    let exact = digit_at(payload, EXACT_OFFSET, "exact", line)?;

    // The packed value sits between the first 'B' and the next one (if any).
    let field = line
        .split(|&b| b == b'B')
        .nth(1)
        .ok_or_else(|| ProtocolError::MissingField {
            field: "B",
            line: lossy(line),
        })?;
    let text = std::str::from_utf8(field)
        .map_err(|_| ProtocolError::BadNumber(lossy(field)))?
        .trim();
    let encoded = text
        .parse::<u32>()
        .map_err(|_| ProtocolError::BadNumber(text.to_string()))?;

    Ok(ProbeHint { exact, encoded })
}

/// Parse the reply to a regular guess.
pub fn decode_guess_reply(line: &[u8]) -> Result<GuessReply, ProtocolError> {
    if is_correct(line) {
        return Ok(GuessReply::Correct(lossy(line)));
    }
    let payload = hint_payload(line)?;
    let exact = digit_at(payload, EXACT_OFFSET, "exact", line)?;
    let misplaced = digit_at(payload, MISPLACED_OFFSET, "misplaced", line)?;
    Ok(GuessReply::Hint(Feedback::new(exact, misplaced)))
}

/// Hint line as the lock writes it: `Hint: A<e>B<m>`.
pub fn encode_hint(fb: Feedback) -> Vec<u8> {
    format!("{}: A{}B{}", HINT_LABEL, fb.exact, fb.misplaced).into_bytes()
}

fn hint_payload(line: &[u8]) -> Result<&[u8], ProtocolError> {
    let sep = HINT_SEPARATOR;
    line.windows(sep.len())
        .position(|w| w == sep)
        .map(|i| &line[i + sep.len()..])
        .ok_or_else(|| ProtocolError::MissingSeparator(lossy(line)))
}

fn digit_at(
    payload: &[u8],
    offset: usize,
    field: &'static str,
    line: &[u8],
) -> Result<u32, ProtocolError> {
    let byte = *payload
        .get(offset)
        .ok_or_else(|| ProtocolError::MissingField {
            field,
            line: lossy(line),
        })?;
    if !byte.is_ascii_digit() {
        return Err(ProtocolError::BadDigit { offset, byte });
    }
    Ok((byte - b'0') as u32)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_reply_fields() {
        let hint = decode_probe_reply(b"Hint: A1B123").unwrap();
        assert_eq!(
            hint,
            ProbeHint {
                exact: 1,
                encoded: 123
            }
        );
        // Whitespace around the number is tolerated.
        let hint = decode_probe_reply(b"Hint: A0B 7680 ").unwrap();
        assert_eq!(hint.encoded, 7680);
    }

    #[test]
    fn guess_reply_fields() {
        assert_eq!(
            decode_guess_reply(b"Hint: A2B1").unwrap(),
            GuessReply::Hint(Feedback::new(2, 1))
        );
        assert_eq!(
            decode_guess_reply(b"Correct! 3 left").unwrap(),
            GuessReply::Correct("Correct! 3 left".to_string())
        );
    }

    #[test]
    fn hint_encoding_roundtrips_through_both_decoders() {
        let line = encode_hint(Feedback::new(3, 0));
        assert_eq!(line, b"Hint: A3B0");
        assert_eq!(
            decode_guess_reply(&line).unwrap(),
            GuessReply::Hint(Feedback::new(3, 0))
        );
        let line = encode_hint(Feedback::new(0, 7684));
        assert_eq!(
            decode_probe_reply(&line).unwrap(),
            ProbeHint {
                exact: 0,
                encoded: 7684
            }
        );
    }

    #[test]
    fn malformed_replies() {
        assert!(matches!(
            decode_guess_reply(b"A1B2"),
            Err(ProtocolError::MissingSeparator(_))
        ));
        assert!(matches!(
            decode_guess_reply(b"Hint: A1"),
            Err(ProtocolError::MissingField {
                field: "misplaced",
                ..
            })
        ));
        assert_eq!(
            decode_guess_reply(b"Hint: Ax B2"),
            Err(ProtocolError::BadDigit {
                offset: 1,
                byte: b'x'
            })
        );
        assert!(matches!(
            decode_probe_reply(b"Hint: A1 no number"),
            Err(ProtocolError::MissingField { field: "B", .. })
        ));
        assert!(matches!(
            decode_probe_reply(b"Hint: A1Bxyz"),
            Err(ProtocolError::BadNumber(_))
        ));
    }

    #[test]
    fn probe_encoding() {
        let p = encode_probe();
        assert!(p.starts_with(b"012300000000"));
        assert!(p.iter().all(u8::is_ascii_digit));
        assert_eq!(p.len(), probe_digits().len());
        assert_eq!(&encode_pin(&"9410".parse().unwrap()), b"9410");
    }
}
