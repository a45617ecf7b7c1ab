use std::borrow::Cow;

use percent_encoding::AsciiSet;

/// As defined in https://url.spec.whatwg.org/#query-percent-encode-set
///
/// The set of characters that need to be encoded in a _query_ string
/// are:
/// - CONTROL characters
/// - SPACE (but we'll separately encode it as `+`)
/// - U+0022 ("), U+0023 (#), U+003C (<), and U+003E (>).
///
/// NOTE: we add our querystring-specific characters here
/// because the encode method is only ever called on
/// keys and values. This means that we _do_ want them to
/// be percent-encoded here.
const MINIMAL_QS_SET: &AsciiSet = &percent_encoding::CONTROLS
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    // a literal `%` would otherwise be read back as an escape
    .add(b'%')
    // `+` is used to represent a space in query strings
    .add(b'+')
    // denote nested keys
    .add(b'[')
    .add(b']')
    // key, value separator
    .add(b'=')
    // denote key-value pairs
    .add(b'&');

/// As defined in https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set
///
/// All code points except the ASCII alphanumerics, U+002A (*), U+002D (-),
/// U+002E (.), and U+005F (_). Space is left out here and written as `+`.
const FORM_URLENCODED_SET: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Encodes a key segment or value for use in a querystring.
///
/// ## Form Encoding (default)
/// Uses the `application/x-www-form-urlencoded` set, which encodes
/// brackets too: `a[0]` becomes `a%5B0%5D`.
///
/// ## Query-String Encoding
/// Uses the minimal WHATWG query percent-encode set plus the characters
/// that carry meaning in a querystring.
///
/// In both modes spaces are written as `+`. The function returns an iterator
/// to avoid allocations when no encoding is needed.
pub fn encode(s: &str, use_form_encoding: bool) -> impl Iterator<Item = Cow<'_, str>> + '_ {
    let set = if use_form_encoding {
        FORM_URLENCODED_SET
    } else {
        MINIMAL_QS_SET
    };
    percent_encoding::utf8_percent_encode(s, set).map(|chunk| {
        if chunk.contains(' ') {
            Cow::Owned(chunk.replace(' ', "+"))
        } else {
            Cow::Borrowed(chunk)
        }
    })
}

/// The opening and closing bracket of a nested key segment.
pub fn brackets(use_form_encoding: bool) -> (&'static str, &'static str) {
    if use_form_encoding {
        ("%5B", "%5D")
    } else {
        ("[", "]")
    }
}
