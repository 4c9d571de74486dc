//! Percent-encoding and percent-decoding, layered into the encode sets the
//! rest of the crate needs.
//!
//! [Specification](https://url.spec.whatwg.org/#percent-encoded-bytes)

const HEX_DIGITS_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// <https://infra.spec.whatwg.org/#c0-control>
#[inline]
#[must_use]
pub fn is_c0_control(c: char) -> bool {
    c <= '\u{001F}'
}

/// <https://url.spec.whatwg.org/#c0-control-percent-encode-set>
#[inline]
#[must_use]
pub fn is_c0_percent_encode_set(c: char) -> bool {
    is_c0_control(c) || c > '\u{007E}'
}

/// <https://url.spec.whatwg.org/#fragment-percent-encode-set>
#[inline]
#[must_use]
pub fn is_fragment_percent_encode_set(c: char) -> bool {
    is_c0_percent_encode_set(c) || matches!(c, ' ' | '"' | '<' | '>' | '`')
}

/// <https://url.spec.whatwg.org/#query-percent-encode-set>
#[inline]
#[must_use]
pub fn is_query_percent_encode_set(c: char) -> bool {
    is_c0_percent_encode_set(c) || matches!(c, ' ' | '"' | '#' | '<' | '>')
}

/// <https://url.spec.whatwg.org/#special-query-percent-encode-set>
#[inline]
#[must_use]
pub fn is_special_query_percent_encode_set(c: char) -> bool {
    is_query_percent_encode_set(c) || c == '\''
}

/// <https://url.spec.whatwg.org/#path-percent-encode-set>
#[inline]
#[must_use]
pub fn is_path_percent_encode_set(c: char) -> bool {
    is_query_percent_encode_set(c) || matches!(c, '?' | '`' | '{' | '}')
}

/// <https://url.spec.whatwg.org/#userinfo-percent-encode-set>
#[inline]
#[must_use]
pub fn is_userinfo_percent_encode_set(c: char) -> bool {
    is_path_percent_encode_set(c) || matches!(c, '/' | ':' | ';' | '=' | '@' | '['..='^' | '|')
}

/// <https://url.spec.whatwg.org/#component-percent-encode-set>
#[inline]
#[must_use]
pub fn is_component_percent_encode_set(c: char) -> bool {
    is_userinfo_percent_encode_set(c) || matches!(c, '$' | '%' | '&' | '+' | ',')
}

/// <https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set>
#[inline]
#[must_use]
pub fn is_form_urlencoded_percent_encode_set(c: char) -> bool {
    is_component_percent_encode_set(c) || matches!(c, '!' | '\'' | '(' | ')' | '~')
}

/// <https://url.spec.whatwg.org/#string-percent-encode-after-encoding>
///
/// `input` is encoded as UTF-8 first, matching this crate's decision to not
/// support any other output encoding.
pub fn percent_encode(input: &str, in_encode_set: impl Fn(char) -> bool, out: &mut String) {
    for c in input.chars() {
        percent_encode_char(c, &in_encode_set, out);
    }
}

/// Same as [`percent_encode`], but returning a freshly allocated `String`.
#[must_use]
pub fn percent_encode_to_string(input: &str, in_encode_set: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(input.len());
    percent_encode(input, in_encode_set, &mut out);
    out
}

#[inline]
pub fn percent_encode_char(c: char, in_encode_set: impl Fn(char) -> bool, out: &mut String) {
    let mut buffer = [0; 4];
    let encoded = c.encode_utf8(&mut buffer);

    if encoded.len() == 1 && !in_encode_set(c) {
        out.push(c);
        return;
    }

    for &byte in encoded.as_bytes() {
        percent_encode_byte(byte, out);
    }
}

/// <https://url.spec.whatwg.org/#percent-encode>
#[inline]
pub fn percent_encode_byte(byte: u8, out: &mut String) {
    out.push('%');
    out.push(HEX_DIGITS_UPPER[(byte >> 4) as usize] as char);
    out.push(HEX_DIGITS_UPPER[(byte & 0xF) as usize] as char);
}

/// <https://url.spec.whatwg.org/#percent-decode>
///
/// Decoded bytes are reassembled into a `String` via lossy UTF-8 decoding,
/// since this is a crate of `str`/`String`, not byte sequences.
#[must_use]
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() && is_hex_digit(bytes[i + 1]) && is_hex_digit(bytes[i + 2])
        {
            let hi = hex_value(bytes[i + 1]);
            let lo = hex_value(bytes[i + 2]);
            output.push(hi * 16 + lo);
            i += 3;
        } else {
            output.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8_lossy(&output).into_owned()
}

#[inline]
fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline]
fn hex_value(b: u8) -> u8 {
    (b as char).to_digit(16).expect("caller checked is_hex_digit") as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_byte_examples() {
        // https://url.spec.whatwg.org/#example-percent-encode-operations
        let mut out = String::new();
        percent_encode_byte(0x23, &mut out);
        assert_eq!(out, "%23");

        out.clear();
        percent_encode_byte(0x7F, &mut out);
        assert_eq!(out, "%7F");
    }

    #[test]
    fn decode_examples() {
        // https://url.spec.whatwg.org/#example-percent-encode-operations
        assert_eq!(percent_decode("%25%s%1G"), "%%s%1G");
    }

    #[test]
    fn decode_passes_through_invalid_escapes() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%"), "%");
    }

    #[test]
    fn round_trip_unreserved() {
        let s = "abcXYZ019-._~";
        assert_eq!(percent_decode(&percent_encode_to_string(s, is_path_percent_encode_set)), s);
    }

    #[test]
    fn userinfo_set_is_superset_of_path_set() {
        for c in [':', '@', '/', '['] {
            assert!(is_userinfo_percent_encode_set(c));
        }
    }
}
