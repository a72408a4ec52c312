use crate::{Pin, PinError};

#[test]
fn parse_and_display() {
    let p: Pin = "0918".parse().unwrap();
    assert_eq!(p.digits(), &[0, 9, 1, 8]);
    assert_eq!(p.to_string(), "0918");
    assert_eq!(&p.to_ascii(), b"0918");
    assert_eq!(p.value(), 918);
    assert_eq!(p.digit_mask(), (1 << 0) | (1 << 9) | (1 << 1) | (1 << 8));
}

#[test]
fn rejects_bad_input() {
    assert_eq!("012".parse::<Pin>(), Err(PinError::Length(3)));
    assert_eq!("01a3".parse::<Pin>(), Err(PinError::BadDigit(b'a')));
    assert_eq!("0113".parse::<Pin>(), Err(PinError::Repeated(1)));
    assert_eq!(Pin::new([0, 1, 2, 10]), Err(PinError::BadDigit(10)));
    assert_eq!(Pin::from_digits(&[1, 2, 3]), Err(PinError::Length(3)));
}
