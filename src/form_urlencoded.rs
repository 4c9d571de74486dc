//! The `application/x-www-form-urlencoded` format, as used by HTML forms and
//! a URL's query string.
//!
//! [Specification](https://url.spec.whatwg.org/#application/x-www-form-urlencoded)

use crate::error::FormDecodeError;
use crate::percent_encode::{is_form_urlencoded_percent_encode_set, percent_encode_char};

/// <https://url.spec.whatwg.org/#concept-urlencoded-parser>
///
/// Lenient parsing: malformed `%XX` escapes are passed through verbatim
/// rather than rejected, matching how browsers actually treat query strings.
#[must_use]
pub fn parse(input: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for piece in input.split('&') {
        if piece.is_empty() {
            continue;
        }

        let (name, value) = match piece.split_once('=') {
            Some((name, value)) => (name, value),
            None => (piece, ""),
        };

        pairs.push((decode_component(name), decode_component(value)));
    }

    pairs
}

/// Strict variant of [`parse`] that rejects malformed percent-encoding
/// instead of passing it through.
pub fn decode(input: &str) -> Result<Vec<(String, String)>, FormDecodeError> {
    let mut pairs = Vec::new();

    for piece in input.split('&') {
        if piece.is_empty() {
            continue;
        }

        let (name, value) = match piece.split_once('=') {
            Some((name, value)) => (name, value),
            None => (piece, ""),
        };

        pairs.push((
            decode_component_strict(name)?,
            decode_component_strict(value)?,
        ));
    }

    Ok(pairs)
}

fn decode_component(input: &str) -> String {
    let replaced = replace_plus(input);
    crate::percent_encode::percent_decode(&replaced)
}

fn decode_component_strict(input: &str) -> Result<String, FormDecodeError> {
    let replaced = replace_plus(input);
    let bytes = replaced.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let rest = &bytes[i + 1..];
            if rest.len() < 2 {
                return Err(FormDecodeError::UnexpectedEndOfInput);
            }
            if !rest[0].is_ascii_hexdigit() || !rest[1].is_ascii_hexdigit() {
                return Err(FormDecodeError::InvalidPercentEncoding {
                    position: i,
                    found: [rest[0], rest[1]],
                });
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    Ok(crate::percent_encode::percent_decode(&replaced))
}

fn replace_plus(input: &str) -> String {
    input.chars().map(|c| if c == '+' { ' ' } else { c }).collect()
}

/// <https://url.spec.whatwg.org/#concept-urlencoded-serializer>
#[must_use]
pub fn serialize<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut serializer = Serializer::new();
    for (name, value) in pairs {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}

/// A builder for incrementally constructing an
/// `application/x-www-form-urlencoded` string.
///
/// ```
/// # use url::form_urlencoded::Serializer;
/// let mut serializer = Serializer::new();
/// serializer.append_pair("foo", "é&").append_pair("bar", "");
/// assert_eq!(serializer.finish(), "foo=%C3%A9%26&bar=");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Serializer {
    output: String,
}

impl Serializer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    pub fn append_pair(&mut self, name: &str, value: &str) -> &mut Self {
        self.append_separator_if_needed();
        encode_component(name, &mut self.output);
        self.output.push('=');
        encode_component(value, &mut self.output);
        self
    }

    pub fn append_key_only(&mut self, name: &str) -> &mut Self {
        self.append_separator_if_needed();
        encode_component(name, &mut self.output);
        self
    }

    pub fn append_pairs<'a, I>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in pairs {
            self.append_pair(name, value);
        }
        self
    }

    fn append_separator_if_needed(&mut self) {
        if !self.output.is_empty() {
            self.output.push('&');
        }
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }
}

fn encode_component(input: &str, out: &mut String) {
    for c in input.chars() {
        if c == ' ' {
            out.push('+');
        } else {
            percent_encode_char(c, is_form_urlencoded_percent_encode_set, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_the_spec_example() {
        let pairs = [
            ("foo".to_string(), "é&".to_string()),
            ("bar".to_string(), String::new()),
            ("foo".to_string(), "#".to_string()),
        ];

        let encoded = serialize(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        assert_eq!(encoded, "foo=%C3%A9%26&bar=&foo=%23");
        assert_eq!(parse(&encoded), pairs);
    }

    #[test]
    fn plus_decodes_to_space() {
        assert_eq!(parse("q=a+b"), vec![("q".to_string(), "a b".to_string())]);
    }

    #[test]
    fn bare_key_has_empty_value() {
        assert_eq!(parse("flag"), vec![("flag".to_string(), String::new())]);
    }

    #[test]
    fn strict_decode_rejects_truncated_escape() {
        assert_eq!(decode("a=%4"), Err(FormDecodeError::UnexpectedEndOfInput));
    }

    #[test]
    fn strict_decode_rejects_non_hex_escape() {
        assert!(matches!(
            decode("a=%zz"),
            Err(FormDecodeError::InvalidPercentEncoding { .. })
        ));
    }

    #[test]
    fn lenient_parse_passes_through_malformed_escapes() {
        assert_eq!(parse("a=%zz"), vec![("a".to_string(), "%zz".to_string())]);
    }

    #[test]
    fn serializer_builder_matches_serialize() {
        let mut serializer = Serializer::new();
        serializer.append_pair("a", "1").append_pair("b", "2");
        assert_eq!(serializer.finish(), "a=1&b=2");
    }
}
