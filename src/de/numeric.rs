//! The numeric-string test used for leaf coercion and container inference.
//!
//! Querystrings carry no types, so a value is treated as a number whenever
//! its whole text reads as one under the lax rules of the web platform:
//!
//! - surrounding whitespace is ignored, and blank text reads as `0`
//! - decimal literals with optional sign, fraction and exponent
//!   (`12`, `-1.5`, `.5`, `5.`, `1e3`)
//! - `Infinity` with an optional sign
//! - unsigned `0x`, `0o` and `0b` integer literals

/// Parses `s` as a number, returning `None` if it is not entirely numeric.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim_matches(is_whitespace);
    if s.is_empty() {
        return Some(0.0);
    }

    if let Some(n) = parse_radix_literal(s) {
        return Some(n);
    }

    let (negative, unsigned) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if unsigned == "Infinity" {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    // `f64::from_str` also accepts `inf` and `nan` spelled any way, which are
    // not numbers here
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Returns true if `s` is entirely numeric.
pub fn is_numeric(s: &str) -> bool {
    parse_number(s).is_some()
}

/// Parses a sequence index: a canonical decimal integer (`0`, `12`, but not
/// `012`, `+1` or `1.0`) no greater than `max_index`.
pub fn parse_index(s: &str, max_index: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    s.parse::<usize>().ok().filter(|i| *i <= max_index)
}

fn parse_radix_literal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let mut n = 0f64;
    for c in s[2..].chars() {
        n = n * f64::from(radix) + f64::from(c.to_digit(radix)?);
    }
    Some(n)
}

/// White space and line terminators, which differ from `char::is_whitespace`
/// on U+0085 and U+FEFF.
fn is_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}
