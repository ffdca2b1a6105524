//! URI component escaping (RFC 3986), as used by parameter values.

use crate::error::{CodecError, CodecResult};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except ASCII alphanumerics and `-_.!~*'()` is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `value` with uppercase hex escapes of its UTF-8 bytes.
pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Reverse [`encode_component`].
///
/// Every `%` must start a two-digit hex escape and the decoded bytes must
/// be valid UTF-8.
pub(crate) fn decode_component(encoded: &str) -> CodecResult<String> {
    let bytes = encoded.as_bytes();
    let mut i = 0;
    while let Some(offset) = bytes[i..].iter().position(|&b| b == b'%') {
        let at = i + offset;
        let well_formed = bytes.len() > at + 2
            && bytes[at + 1].is_ascii_hexdigit()
            && bytes[at + 2].is_ascii_hexdigit();
        if !well_formed {
            return Err(CodecError::decode(format!(
                "malformed percent escape at byte {at} in \"{encoded}\""
            )));
        }
        i = at + 3;
    }

    percent_decode_str(encoded)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| {
            CodecError::decode_with(format!("\"{encoded}\" does not decode to UTF-8 text"), e)
        })
}
