//! Host parsing and serialization.
//!
//! [Specification](https://url.spec.whatwg.org/#hosts-(domains-and-ip-addresses))

use std::fmt;
use std::net;

use crate::error::{HostParseError, ValidationError, ValidationErrorHandler};
use crate::ip;
use crate::percent_encode::{is_c0_control, is_c0_percent_encode_set, percent_encode_to_string};
use crate::util::is_url_codepoint;

/// <https://url.spec.whatwg.org/#forbidden-host-code-point>
fn is_forbidden_host_code_point(c: char) -> bool {
    matches!(
        c,
        '\u{0000}'
            | '\u{0009}'
            | '\u{000A}'
            | '\u{000D}'
            | ' '
            | '#'
            | '/'
            | ':'
            | '<'
            | '>'
            | '?'
            | '@'
            | '['
            | '\\'
            | ']'
            | '^'
            | '|'
    )
}

/// <https://url.spec.whatwg.org/#forbidden-domain-code-point>
fn is_forbidden_domain_code_point(c: char) -> bool {
    is_forbidden_host_code_point(c) || is_c0_control(c) || matches!(c, '%' | '\u{007F}')
}

/// A network address, or an opaque identifier in situations where a network
/// address is not required.
///
/// [Specification](https://url.spec.whatwg.org/#concept-host)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Host {
    /// An ASCII domain name, e.g. `example.org`.
    Domain(String),

    /// An IPv4 or IPv6 address, e.g. `127.0.0.1` or `[::1]`.
    Ip(net::IpAddr),

    /// A host with no internal structure, used by non-special URLs, e.g.
    /// the `example.org` in `foo://example.org/bar`.
    Opaque(String),

    /// The empty host, e.g. the (absent) host in `file:///etc/passwd`.
    Empty,
}

impl Host {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(domain) => f.write_str(domain),
            Self::Ip(net::IpAddr::V4(addr)) => write!(f, "{addr}"),
            // std's Ipv6Addr Display already implements RFC 5952 canonical
            // formatting, which matches https://url.spec.whatwg.org/#concept-ipv6-serializer.
            Self::Ip(net::IpAddr::V6(addr)) => write!(f, "[{addr}]"),
            Self::Opaque(s) => f.write_str(s),
            Self::Empty => Ok(()),
        }
    }
}

/// <https://url.spec.whatwg.org/#concept-host-parser>
pub fn parse_host(
    input: &str,
    is_not_special: bool,
    handler: &mut impl ValidationErrorHandler,
) -> Result<Host, HostParseError> {
    // If input starts with U+005B ([), then:
    if let Some(stripped) = input.strip_prefix('[') {
        // If input does not end with U+005D (]), validation error, return failure.
        if !input.ends_with(']') {
            handler.validation_error(ValidationError::IPv6Unclosed);
            return Err(HostParseError::Unclosed);
        }

        // Return the result of IPv6 parsing input with its leading [ and trailing ] removed.
        let ipv6_text = &stripped[..stripped.len() - 1];
        let addr = ip::parse_ipv6(ipv6_text, handler)?;
        return Ok(Host::Ip(net::IpAddr::V6(addr)));
    }

    // If isNotSpecial is true, then return the result of opaque-host parsing input.
    if is_not_special {
        return Ok(Host::Opaque(opaque_host_parse(input, handler)?));
    }

    // Assert: input is not the empty string.
    if input.is_empty() {
        return Ok(Host::Empty);
    }

    // Let domain be the result of running UTF-8 decode without BOM on the
    // percent-decoding of input. This crate only ever deals with `str`, which
    // is already valid UTF-8, so percent-decoding input is sufficient.
    let domain = crate::percent_encode::percent_decode(input);

    // Let asciiDomain be the result of running domain to ASCII with domain and false.
    // This crate has no IDNA/Punycode table, so non-ASCII domains are
    // accepted as-is rather than Punycode-encoded; ASCII domains are
    // unaffected by this simplification.
    let ascii_domain = domain;

    // If asciiDomain contains a forbidden domain code point, validation error, return failure.
    if ascii_domain.contains(is_forbidden_domain_code_point) {
        handler.validation_error(ValidationError::DomainInvalidCodepoint);
        return Err(HostParseError::ForbiddenCodePoint);
    }

    // If asciiDomain ends in a number, then return the result of IPv4 parsing asciiDomain.
    if ends_in_a_number(&ascii_domain) {
        let addr = ip::parse_ipv4(&ascii_domain, handler)?;
        return Ok(Host::Ip(net::IpAddr::V4(addr)));
    }

    // Return asciiDomain.
    Ok(Host::Domain(ascii_domain))
}

/// <https://url.spec.whatwg.org/#ends-in-a-number-checker>
fn ends_in_a_number(input: &str) -> bool {
    let mut parts = input.split('.').collect::<Vec<_>>();

    if let Some(&"") = parts.last() {
        if parts.len() == 1 {
            return false;
        }
        parts.pop();
    }

    let Some(last) = parts.last() else {
        return false;
    };

    if !last.is_empty() && last.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    is_hex_ipv4_part(last)
}

fn is_hex_ipv4_part(part: &str) -> bool {
    let digits = part
        .strip_prefix("0x")
        .or_else(|| part.strip_prefix("0X"));
    match digits {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// <https://url.spec.whatwg.org/#concept-opaque-host-parser>
fn opaque_host_parse(
    input: &str,
    handler: &mut impl ValidationErrorHandler,
) -> Result<String, HostParseError> {
    // If input contains a forbidden host code point, validation error, return failure.
    if input.contains(is_forbidden_host_code_point) {
        handler.validation_error(ValidationError::HostInvalidCodepoint);
        return Err(HostParseError::ForbiddenCodePoint);
    }

    // If input contains a code point that is not a URL code point and not U+0025 (%), validation error.
    if input.contains(|c| !is_url_codepoint(c) && c != '%') {
        handler.validation_error(ValidationError::InvalidURLUnit);
    }

    // If input contains a U+0025 (%) and the two code points following it are
    // not ASCII hex digits, validation error.
    let bytes = input.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'%' {
            let valid = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
            if !valid {
                handler.validation_error(ValidationError::InvalidURLUnit);
            }
        }
    }

    // Return the result of running UTF-8 percent-encode on input using the
    // C0 control percent-encode set.
    Ok(percent_encode_to_string(input, is_c0_percent_encode_set))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IgnoreValidationErrors;

    fn parse(input: &str, is_not_special: bool) -> Result<Host, HostParseError> {
        parse_host(input, is_not_special, &mut IgnoreValidationErrors)
    }

    #[test]
    fn parses_domain() {
        assert_eq!(
            parse("example.org", false),
            Ok(Host::Domain("example.org".to_string()))
        );
    }

    #[test]
    fn parses_ipv4_looking_domain() {
        assert_eq!(
            parse("127.0.0.1", false),
            Ok(Host::Ip(net::IpAddr::V4(net::Ipv4Addr::LOCALHOST)))
        );
    }

    #[test]
    fn parses_bracketed_ipv6() {
        assert_eq!(
            parse("[::1]", false),
            Ok(Host::Ip(net::IpAddr::V6(net::Ipv6Addr::LOCALHOST)))
        );
    }

    #[test]
    fn unclosed_ipv6_bracket_fails() {
        assert_eq!(parse("[::1", false), Err(HostParseError::Unclosed));
    }

    #[test]
    fn non_special_host_is_opaque() {
        assert_eq!(
            parse("ExAmple.org", true),
            Ok(Host::Opaque("ExAmple.org".to_string()))
        );
    }

    #[test]
    fn empty_host_is_allowed() {
        assert_eq!(parse("", false), Ok(Host::Empty));
    }

    #[test]
    fn forbidden_code_point_in_domain_fails() {
        assert_eq!(
            parse("exa<mple.org", false),
            Err(HostParseError::ForbiddenCodePoint)
        );
    }

    #[test]
    fn display_wraps_ipv6_in_brackets() {
        let host = Host::Ip(net::IpAddr::V6(net::Ipv6Addr::LOCALHOST));
        assert_eq!(host.to_string(), "[::1]");
    }

    #[test]
    fn opaque_host_percent_encodes_non_ascii() {
        // Every byte of a stored/serialized opaque host must be in 0x21..=0x7E;
        // non-ASCII bytes fall outside the C0-control percent-encode set's
        // exclusion range (<= 0x1F) and so must be escaped, not left literal.
        assert_eq!(
            parse("café", true),
            Ok(Host::Opaque("caf%C3%A9".to_string()))
        );
    }
}
