//! Short id encoding module
//!
//! A short id is the base-36 rendering of a second-granularity insertion
//! timestamp, written as the decimal number `YYYYMMDDHHMMSS`.

use chrono::{Datelike, Local, Timelike};

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const BASE: u64 = 36;

/// Encode a non-negative integer as lowercase base-36
pub fn base36_encode(mut number: u64) -> String {
    if number == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while number != 0 {
        #[allow(clippy::cast_possible_truncation)]
        digits.push(ALPHABET[(number % BASE) as usize]);
        number /= BASE;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Decode a lowercase base-36 string
///
/// Returns None for the empty string, characters outside `[0-9a-z]`, or
/// values that overflow u64.
pub fn base36_decode(encoded: &str) -> Option<u64> {
    if encoded.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    for c in encoded.chars() {
        let digit = match c {
            '0'..='9' => c as u64 - '0' as u64,
            'a'..='z' => c as u64 - 'a' as u64 + 10,
            _ => return None,
        };
        value = value.checked_mul(BASE)?.checked_add(digit)?;
    }
    Some(value)
}

/// Current local time as the decimal stamp `YYYYMMDDHHMMSS`
pub fn current_stamp() -> u64 {
    let now = Local::now();
    let date =
        u64::from(now.year().unsigned_abs()) * 10_000 + u64::from(now.month()) * 100 + u64::from(now.day());
    let time = u64::from(now.hour()) * 10_000 + u64::from(now.minute()) * 100 + u64::from(now.second());
    date * 1_000_000 + time
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(base36_encode(0), "0");
        assert_eq!(base36_encode(35), "z");
        assert_eq!(base36_encode(36), "10");
        assert_eq!(base36_encode(1296), "100");
        assert_eq!(base36_encode(20_260_807_093_015), "76jopfac7");
    }

    #[test]
    fn test_round_trip() {
        for number in [0, 1, 35, 36, 1_000, 20_260_807_093_015, u64::MAX] {
            assert_eq!(base36_decode(&base36_encode(number)), Some(number));
        }
    }

    #[test]
    fn test_decode_rejects_invalid() {
        assert_eq!(base36_decode(""), None);
        assert_eq!(base36_decode("ABC"), None);
        assert_eq!(base36_decode("a b"), None);
        assert_eq!(base36_decode("abc+"), None);
    }

    #[test]
    fn test_decode_overflow() {
        // 14 z's exceeds u64::MAX
        assert_eq!(base36_decode("zzzzzzzzzzzzzz"), None);
    }

    #[test]
    fn test_stamp_shape() {
        let stamp = current_stamp();
        // YYYYMMDDHHMMSS is 14 decimal digits
        assert_eq!(stamp.to_string().len(), 14);
        let seconds = stamp % 100;
        let minutes = (stamp / 100) % 100;
        assert!(seconds < 60);
        assert!(minutes < 60);
    }
}
