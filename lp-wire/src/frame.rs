//! Newline-delimited framing.

use std::io::{BufRead, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line too long: more than {max} bytes")]
    TooLong { max: usize },
    #[error("unexpected EOF while reading line")]
    UnexpectedEof,
}

pub const MAX_LINE_LEN: usize = 64 * 1024; // 64 KiB guardrail

/// Write `payload` followed by `\n`, then flush.
pub fn write_line<W: Write>(w: &mut W, payload: &[u8]) -> Result<(), WireError> {
    w.write_all(payload)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}

/// Read one line, without its `\n` (and without a trailing `\r`).
///
/// A final line cut off by EOF is returned as is; EOF before any byte is
/// an error.
pub fn read_line<R: BufRead>(r: &mut R) -> Result<Vec<u8>, WireError> {
    let mut out = Vec::new();
    loop {
        let buf = r.fill_buf()?;
        if buf.is_empty() {
            if out.is_empty() {
                return Err(WireError::UnexpectedEof);
            }
            break;
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(i) => {
                out.extend_from_slice(&buf[..i]);
                r.consume(i + 1);
                break;
            }
            None => {
                let n = buf.len();
                out.extend_from_slice(buf);
                r.consume(n);
            }
        }
        if out.len() > MAX_LINE_LEN {
            return Err(WireError::TooLong { max: MAX_LINE_LEN });
        }
    }
    if out.len() > MAX_LINE_LEN {
        return Err(WireError::TooLong { max: MAX_LINE_LEN });
    }
    if out.last() == Some(&b'\r') {
        out.pop();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_in_order() {
        let mut c = Cursor::new(b"first\r\nsecond\nthird".to_vec());
        assert_eq!(read_line(&mut c).unwrap(), b"first");
        assert_eq!(read_line(&mut c).unwrap(), b"second");
        assert_eq!(read_line(&mut c).unwrap(), b"third");
        assert!(matches!(read_line(&mut c), Err(WireError::UnexpectedEof)));
    }

    #[test]
    fn empty_line_is_not_eof() {
        let mut c = Cursor::new(b"\nx\n".to_vec());
        assert_eq!(read_line(&mut c).unwrap(), b"");
        assert_eq!(read_line(&mut c).unwrap(), b"x");
    }

    #[test]
    fn write_appends_newline() {
        let mut out = Vec::new();
        write_line(&mut out, b"0123").unwrap();
        write_line(&mut out, b"").unwrap();
        assert_eq!(out, b"0123\n\n");
    }

    #[test]
    fn overlong_line_is_rejected() {
        let mut data = vec![b'7'; MAX_LINE_LEN + 1];
        data.push(b'\n');
        let mut c = Cursor::new(data);
        assert!(matches!(read_line(&mut c), Err(WireError::TooLong { .. })));
    }
}
