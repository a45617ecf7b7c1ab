use std::borrow::Cow;

#[inline(always)]
fn hex_digit(c: u8) -> Option<u8> {
    char::from(c).to_digit(16).map(|d| d as u8)
}

/// Decodes one querystring component, applying the following:
/// - Replaces `+` with a space
/// - Decodes percent-encoded bytes, leaving malformed escapes as they are
/// - Converts the result to UTF-8, replacing invalid sequences
pub fn decode(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    if !bytes.iter().any(|&b| b == b'+' || b == b'%') {
        // nothing to decode
        return Cow::Borrowed(input);
    }

    let mut decoded = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'+' => decoded.push(b' '),
            b'%' => {
                let escaped = bytes
                    .get(idx + 1)
                    .and_then(|&h| hex_digit(h))
                    .zip(bytes.get(idx + 2).and_then(|&l| hex_digit(l)));
                match escaped {
                    Some((h, l)) => {
                        decoded.push(h * 0x10 + l);
                        idx += 2;
                    }
                    // not an escape, keep the `%`
                    None => decoded.push(b'%'),
                }
            }
            b => decoded.push(b),
        }
        idx += 1;
    }

    match String::from_utf8(decoded) {
        Ok(s) => Cow::Owned(s),
        Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}
