//! The error taxonomy used throughout this crate.
//!
//! Every fallible operation returns one of the closed enums below -- never a
//! boxed or string error -- so callers can `match` on failure kind instead of
//! parsing messages.
//!
//! Separately, the WHATWG algorithm defines *validation errors*: anomalies
//! that are reported but do not abort parsing (a URL with a redundant leading
//! zero in an IPv4 part, for example). Those are reported through
//! [`ValidationErrorHandler`] rather than through a `Result`.

use std::fmt;

/// A non-fatal parsing anomaly.
///
/// [Specification](https://url.spec.whatwg.org/#validation-error)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The input's host contains a forbidden domain code point.
    DomainInvalidCodepoint,

    /// An opaque host (in a URL that is not special) contains a forbidden host code point.
    HostInvalidCodepoint,

    /// An IPv4 address ends with a `.`.
    IPv4EmptyPart,

    /// An IPv4 address does not consist of exactly 4 parts.
    IPv4TooManyParts,

    /// An IPv4 address part is not numeric.
    IPv4NonNumericPart,

    /// An IPv4 address part is expressed using hexadecimal or octal digits.
    IPv4NonDecimalPart,

    /// An IPv4 address part exceeds 255.
    IPv4OutOfRangePart,

    /// An IPv6 address is missing the closing `]`.
    IPv6Unclosed,

    /// An IPv6 address begins with improper compression.
    IPv6InvalidCompression,

    /// An IPv6 address contains more than 8 pieces.
    IPv6TooManyPieces,

    /// An IPv6 address is compressed in more than one spot.
    IPv6MultipleCompression,

    /// An IPv6 address contains a code point that is neither an ASCII hex digit nor `:`,
    /// or it unexpectedly ends.
    IPv6InvalidCodepoint,

    /// An uncompressed IPv6 address contains fewer than 8 pieces.
    IPv6TooFewPieces,

    /// An IPv6 address with embedded IPv4 syntax has more than 6 pieces before the dotted quad.
    IPv4InIPv6TooManyPieces,

    /// An IPv6 address with embedded IPv4 syntax has a malformed IPv4 part.
    IPv4InIPv6InvalidCodepoint,

    /// An IPv6 address with embedded IPv4 syntax has a part exceeding 255.
    IPv4InIPv6OutOfRangePart,

    /// An IPv6 address with embedded IPv4 syntax has too few IPv4 parts.
    IPv4InIPv6TooFewParts,

    /// A code point was found that is not a URL code point, and is not `%`.
    InvalidURLUnit,

    /// A special scheme is not followed by `//`.
    SpecialSchemeMissingFollowingSolidus,

    /// No scheme could be determined and no usable base URL was provided.
    MissingSchemeNonRelativeURL,

    /// A special URL uses `\` instead of `/`.
    InvalidReverseSolidus,

    /// The input attaches credentials where none may be attached.
    InvalidCredentials,

    /// A special-scheme URL is missing a host.
    HostMissing,

    /// The input's port is out of range.
    PortOutOfRange,

    /// The input's port is not a number.
    PortInvalid,

    /// A relative reference starts with a Windows drive letter against a `file:` base.
    FileInvalidWindowsDriveLetter,

    /// A `file:` URL's host is itself a Windows drive letter.
    FileInvalidWindowsDriveLetterHost,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::DomainInvalidCodepoint => "domain contains a forbidden code point",
            Self::HostInvalidCodepoint => "opaque host contains a forbidden code point",
            Self::IPv4EmptyPart => "IPv4 address has an empty part",
            Self::IPv4TooManyParts => "IPv4 address has more than 4 parts",
            Self::IPv4NonNumericPart => "IPv4 address part is not numeric",
            Self::IPv4NonDecimalPart => "IPv4 address part is not decimal",
            Self::IPv4OutOfRangePart => "IPv4 address part exceeds 255",
            Self::IPv6Unclosed => "IPv6 address is missing the closing ]",
            Self::IPv6InvalidCompression => "IPv6 address has invalid :: compression",
            Self::IPv6TooManyPieces => "IPv6 address has more than 8 pieces",
            Self::IPv6MultipleCompression => "IPv6 address is compressed more than once",
            Self::IPv6InvalidCodepoint => "IPv6 address has an invalid code point",
            Self::IPv6TooFewPieces => "IPv6 address has fewer than 8 pieces",
            Self::IPv4InIPv6TooManyPieces => "embedded IPv4 has too many preceding IPv6 pieces",
            Self::IPv4InIPv6InvalidCodepoint => "embedded IPv4 part is malformed",
            Self::IPv4InIPv6OutOfRangePart => "embedded IPv4 part exceeds 255",
            Self::IPv4InIPv6TooFewParts => "embedded IPv4 has too few parts",
            Self::InvalidURLUnit => "input contains a code point that is not a URL unit",
            Self::SpecialSchemeMissingFollowingSolidus => {
                "special scheme is not followed by \"//\""
            },
            Self::MissingSchemeNonRelativeURL => "no scheme and no usable base URL",
            Self::InvalidReverseSolidus => "special URL uses \\ instead of /",
            Self::InvalidCredentials => "credentials may not be attached here",
            Self::HostMissing => "special URL is missing a host",
            Self::PortOutOfRange => "port is out of range",
            Self::PortInvalid => "port is not a number",
            Self::FileInvalidWindowsDriveLetter => {
                "relative reference starts with a Windows drive letter"
            },
            Self::FileInvalidWindowsDriveLetterHost => "file: host is a Windows drive letter",
        };
        f.write_str(msg)
    }
}

/// Receives [`ValidationError`]s as they occur during parsing.
///
/// Validation errors are non-fatal by definition: the parse continues
/// regardless of what the handler does with them. The default handler,
/// [`IgnoreValidationErrors`], discards them at zero cost.
pub trait ValidationErrorHandler {
    fn validation_error(&mut self, error: ValidationError);
}

/// A [`ValidationErrorHandler`] that discards every error.
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreValidationErrors;

impl ValidationErrorHandler for IgnoreValidationErrors {
    #[inline]
    fn validation_error(&mut self, _error: ValidationError) {}
}

/// A [`ValidationErrorHandler`] that collects every error it sees, for tests
/// and conformance harnesses that want to assert on them.
#[derive(Clone, Debug, Default)]
pub struct CollectValidationErrors(pub Vec<ValidationError>);

impl ValidationErrorHandler for CollectValidationErrors {
    fn validation_error(&mut self, error: ValidationError) {
        self.0.push(error);
    }
}

/// Why [`crate::ip::parse_ipv4`] or [`crate::ip::parse_ipv6`] failed.
///
/// [Specification](https://url.spec.whatwg.org/#concept-ipv4-parser)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IPParseError {
    /// An IPv4 part exceeded `255`.
    Ipv4NumberTooLarge,
    /// The last IPv4 number doesn't fit in the remaining bits.
    Ipv4InvalidLastNumber,
    /// An IPv4 part was not parseable as a number in any supported radix.
    Ipv4NonNumericPart,
    /// More than four dot-separated IPv4 parts.
    Ipv4TooManyParts,
    /// `::` appeared without a following `:`.
    Ipv6InvalidCompression,
    /// More than eight 16-bit pieces.
    Ipv6TooManyPieces,
    /// `::` appeared twice.
    Ipv6MultipleCompression,
    /// An embedded IPv4 tail appeared after more than six IPv6 pieces.
    Ipv4InIpv6TooManyParts,
    /// An embedded IPv4 part wasn't a plain decimal number.
    Ipv4InIpv6InvalidCodepoint,
    /// An embedded IPv4 part exceeded `255`.
    Ipv4InIpv6OutOfRangePart,
    /// An embedded IPv4 tail had fewer than four parts.
    Ipv4InIpv6TooFewParts,
    /// A code point that is neither an ASCII hex digit nor `:` appeared, or input ended mid-piece.
    Ipv6InvalidCodepoint,
    /// An uncompressed address had fewer than eight pieces.
    Ipv6TooFewPieces,
}

impl fmt::Display for IPParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Ipv4NumberTooLarge => "IPv4 part exceeds 255",
            Self::Ipv4InvalidLastNumber => "last IPv4 number is out of range for its position",
            Self::Ipv4NonNumericPart => "IPv4 part is not numeric",
            Self::Ipv4TooManyParts => "IPv4 address has more than 4 parts",
            Self::Ipv6InvalidCompression => "invalid :: compression",
            Self::Ipv6TooManyPieces => "IPv6 address has more than 8 pieces",
            Self::Ipv6MultipleCompression => "IPv6 address compressed more than once",
            Self::Ipv4InIpv6TooManyParts => "embedded IPv4 preceded by too many IPv6 pieces",
            Self::Ipv4InIpv6InvalidCodepoint => "embedded IPv4 part is malformed",
            Self::Ipv4InIpv6OutOfRangePart => "embedded IPv4 part exceeds 255",
            Self::Ipv4InIpv6TooFewParts => "embedded IPv4 has fewer than 4 parts",
            Self::Ipv6InvalidCodepoint => "invalid code point in IPv6 address",
            Self::Ipv6TooFewPieces => "IPv6 address has fewer than 8 pieces",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for IPParseError {}

/// Why [`crate::host::parse_host`] failed.
///
/// [Specification](https://url.spec.whatwg.org/#concept-host-parser)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostParseError {
    /// An IPv6 literal was missing its closing bracket.
    Unclosed,
    /// The host contains a code point that is never allowed in a host.
    ForbiddenCodePoint,
    /// Domain validation (IDNA) rejected the host.
    InvalidDomain,
    /// The embedded IPv4/IPv6 literal failed to parse.
    Ip(IPParseError),
}

impl fmt::Display for HostParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unclosed => f.write_str("IPv6 literal is missing its closing ]"),
            Self::ForbiddenCodePoint => f.write_str("host contains a forbidden code point"),
            Self::InvalidDomain => f.write_str("domain failed IDNA validation"),
            Self::Ip(inner) => write!(f, "invalid IP address: {inner}"),
        }
    }
}

impl std::error::Error for HostParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ip(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<IPParseError> for HostParseError {
    fn from(value: IPParseError) -> Self {
        Self::Ip(value)
    }
}

/// Why the Basic URL Parser rejected an input.
///
/// [Specification](https://url.spec.whatwg.org/#concept-basic-url-parser)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum URLParseError {
    /// The trimmed input was empty and no base URL was given.
    EmptyInput,
    /// The scheme could not be parsed.
    InvalidScheme,
    /// A special scheme was not followed by `//`.
    MissingSchemeSeparator,
    /// The host could not be parsed.
    InvalidHost(HostParseError),
    /// The port is not a valid 16-bit number.
    InvalidPort,
    /// Credentials were attached where none may be attached.
    CannotHaveCredentials,
}

impl fmt::Display for URLParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("input is empty and no base URL was provided"),
            Self::InvalidScheme => f.write_str("invalid scheme"),
            Self::MissingSchemeSeparator => f.write_str("special scheme must be followed by //"),
            Self::InvalidHost(inner) => write!(f, "invalid host: {inner}"),
            Self::InvalidPort => f.write_str("invalid port"),
            Self::CannotHaveCredentials => {
                f.write_str("cannot attach credentials to this URL")
            },
        }
    }
}

impl std::error::Error for URLParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidHost(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<HostParseError> for URLParseError {
    fn from(value: HostParseError) -> Self {
        Self::InvalidHost(value)
    }
}

/// Why [`crate::form_urlencoded::decode`] failed.
///
/// [Specification](https://url.spec.whatwg.org/#concept-urlencoded-parser)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormDecodeError {
    /// A `%XX` escape was followed by fewer than two bytes.
    UnexpectedEndOfInput,
    /// A `%XX` escape's two bytes were not both ASCII hex digits.
    InvalidPercentEncoding { position: usize, found: [u8; 2] },
}

impl fmt::Display for FormDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEndOfInput => f.write_str("unexpected end of input after '%'"),
            Self::InvalidPercentEncoding { position, found } => write!(
                f,
                "invalid percent-encoding at byte {position}: %{}{}",
                found[0] as char, found[1] as char
            ),
        }
    }
}

impl std::error::Error for FormDecodeError {}
