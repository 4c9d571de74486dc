//! IPv4 and IPv6 literal parsing, as used by the host parser.
//!
//! [Specification](https://url.spec.whatwg.org/#host-parsing)

use std::net;

use crate::error::{IPParseError, ValidationError, ValidationErrorHandler};

/// <https://url.spec.whatwg.org/#concept-ipv4-parser>
pub fn parse_ipv4(
    input: &str,
    handler: &mut impl ValidationErrorHandler,
) -> Result<net::Ipv4Addr, IPParseError> {
    // Let parts be the result of strictly splitting input on U+002E (.)
    let mut parts: Vec<&str> = input.split('.').collect();

    // If the last item in parts is the empty string, then:
    if parts.last().copied().is_some_and(str::is_empty) {
        handler.validation_error(ValidationError::IPv4EmptyPart);

        // If parts’s size is greater than 1 then remove the last item from parts.
        if parts.len() > 1 {
            parts.pop();
        }
    }

    // If parts’s size is greater than 4, IPv4-too-many-parts validation error, return failure.
    if parts.len() > 4 {
        handler.validation_error(ValidationError::IPv4TooManyParts);
        return Err(IPParseError::Ipv4TooManyParts);
    }

    // Let numbers be an empty list.
    let mut numbers = [0_u32; 4];
    let count = parts.len();

    // For each part of parts:
    for (index, part) in parts.iter().enumerate() {
        // Let result be the result of parsing part.
        let result = ipv4_number_parse(part, handler).map_err(|_| {
            handler.validation_error(ValidationError::IPv4NonNumericPart);
            IPParseError::Ipv4NonNumericPart
        })?;

        numbers[index] = result;
    }

    // If any but the last item in numbers is greater than 255, validation error, return failure.
    if numbers[..count - 1].iter().any(|n| *n > 255) {
        handler.validation_error(ValidationError::IPv4OutOfRangePart);
        return Err(IPParseError::Ipv4NumberTooLarge);
    }

    // If the last item in numbers is greater than or equal to 256^(5 − numbers’s size),
    // validation error, return failure.
    if numbers[count - 1] >= 256_u32.pow(5 - count as u32) {
        handler.validation_error(ValidationError::IPv4OutOfRangePart);
        return Err(IPParseError::Ipv4InvalidLastNumber);
    }

    // Let ipv4 be the last item in numbers. Remove the last item from numbers.
    let mut ipv4 = numbers[count - 1];

    // For each n of numbers (now without the last item), in order:
    for (counter, n) in numbers[..count - 1].iter().enumerate() {
        ipv4 += n * 256_u32.pow(3 - counter as u32);
    }

    Ok(net::Ipv4Addr::from_bits(ipv4))
}

/// <https://url.spec.whatwg.org/#ipv4-number-parser>
fn ipv4_number_parse(
    mut input: &str,
    handler: &mut impl ValidationErrorHandler,
) -> Result<u32, ()> {
    if input.is_empty() {
        return Err(());
    }

    let mut radix = 10;

    if input.len() >= 2 && (input.starts_with("0x") || input.starts_with("0X")) {
        handler.validation_error(ValidationError::IPv4NonDecimalPart);
        input = &input[2..];
        radix = 16;
    } else if input.len() >= 2 && input.starts_with('0') {
        handler.validation_error(ValidationError::IPv4NonDecimalPart);
        input = &input[1..];
        radix = 8;
    }

    if input.is_empty() {
        return Ok(0);
    }

    u32::from_str_radix(input, radix).map_err(|_| ())
}

/// <https://url.spec.whatwg.org/#concept-ipv6-parser>
pub fn parse_ipv6(
    input: &str,
    handler: &mut impl ValidationErrorHandler,
) -> Result<net::Ipv6Addr, IPParseError> {
    // 1. Let address be a new IPv6 address whose IPv6 pieces are all 0.
    let mut address = [0_u16; 8];

    // 2. Let pieceIndex be 0.
    let mut piece_index = 0;

    // 3. Let compress be null.
    let mut compress = None;

    // 4. Let pointer be a pointer for input.
    let mut ptr = 0_usize;
    let chars: Vec<char> = input.chars().collect();
    let c = |ptr: usize| chars.get(ptr).copied();

    // 5. If c is U+003A (:), then:
    if c(ptr) == Some(':') {
        if c(ptr + 1) != Some(':') {
            handler.validation_error(ValidationError::IPv6InvalidCompression);
            return Err(IPParseError::Ipv6InvalidCompression);
        }

        ptr += 2;
        piece_index += 1;
        compress = Some(piece_index);
    }

    // 6. While c is not the EOF code point:
    while let Some(ch) = c(ptr) {
        if piece_index == 8 {
            handler.validation_error(ValidationError::IPv6TooManyPieces);
            return Err(IPParseError::Ipv6TooManyPieces);
        }

        if ch == ':' {
            if compress.is_some() {
                handler.validation_error(ValidationError::IPv6MultipleCompression);
                return Err(IPParseError::Ipv6MultipleCompression);
            }

            ptr += 1;
            piece_index += 1;
            compress = Some(piece_index);
            continue;
        }

        let mut value: u16 = 0;
        let mut length = 0;

        while length < 4
            && let Some(hex_number) = c(ptr).and_then(|c| c.to_digit(16))
        {
            value = value * 0x10 + hex_number as u16;
            ptr += 1;
            length += 1;
        }

        if c(ptr) == Some('.') {
            if length == 0 {
                handler.validation_error(ValidationError::IPv4InIPv6InvalidCodepoint);
                return Err(IPParseError::Ipv4InIpv6InvalidCodepoint);
            }

            ptr -= length;

            if piece_index > 6 {
                handler.validation_error(ValidationError::IPv4InIPv6TooManyPieces);
                return Err(IPParseError::Ipv4InIpv6TooManyParts);
            }

            let mut numbers_seen = 0;

            while c(ptr).is_some() {
                let mut ipv4_piece: Option<u16> = None;

                if numbers_seen > 0 {
                    if c(ptr) == Some('.') && numbers_seen < 4 {
                        ptr += 1;
                    } else {
                        handler.validation_error(ValidationError::IPv4InIPv6InvalidCodepoint);
                        return Err(IPParseError::Ipv4InIpv6InvalidCodepoint);
                    }
                }

                if !c(ptr).is_some_and(|c| c.is_ascii_digit()) {
                    handler.validation_error(ValidationError::IPv4InIPv6InvalidCodepoint);
                    return Err(IPParseError::Ipv4InIpv6InvalidCodepoint);
                }

                while let Some(number) = c(ptr).and_then(|c| c.to_digit(10)) {
                    match ipv4_piece {
                        None => {
                            ipv4_piece = Some(number as u16);
                        },
                        Some(0) => {
                            handler.validation_error(ValidationError::IPv4InIPv6InvalidCodepoint);
                            return Err(IPParseError::Ipv4InIpv6InvalidCodepoint);
                        },
                        Some(other) => {
                            let new_value = other * 10 + number as u16;
                            if new_value > 255 {
                                handler.validation_error(ValidationError::IPv4InIPv6OutOfRangePart);
                                return Err(IPParseError::Ipv4InIpv6OutOfRangePart);
                            }
                            ipv4_piece = Some(new_value);
                        },
                    };

                    ptr += 1;
                }

                address[piece_index] = address[piece_index] * 0x100
                    + ipv4_piece.expect("ipv4Piece cannot be null at this point");

                numbers_seen += 1;

                if numbers_seen == 2 || numbers_seen == 4 {
                    piece_index += 1;
                }
            }

            if numbers_seen != 4 {
                handler.validation_error(ValidationError::IPv4InIPv6TooFewParts);
                return Err(IPParseError::Ipv4InIpv6TooFewParts);
            }

            break;
        } else if c(ptr) == Some(':') {
            ptr += 1;

            if c(ptr).is_none() {
                handler.validation_error(ValidationError::IPv6InvalidCodepoint);
                return Err(IPParseError::Ipv6InvalidCodepoint);
            }
        } else if c(ptr).is_some() {
            handler.validation_error(ValidationError::IPv6InvalidCodepoint);
            return Err(IPParseError::Ipv6InvalidCodepoint);
        }

        address[piece_index] = value;
        piece_index += 1;
    }

    // 7. If compress is non-null, then:
    if let Some(compress_value) = compress {
        let mut swaps = piece_index - compress_value;
        piece_index = 7;

        while piece_index != 0 && swaps > 0 {
            address.swap(piece_index, compress_value + swaps - 1);
            piece_index -= 1;
            swaps -= 1;
        }
    } else if piece_index != 8 {
        handler.validation_error(ValidationError::IPv6TooFewPieces);
        return Err(IPParseError::Ipv6TooFewPieces);
    }

    Ok(net::Ipv6Addr::new(
        address[0], address[1], address[2], address[3], address[4], address[5], address[6],
        address[7],
    ))
}

#[cfg(test)]
mod tests {
    use std::net;

    use super::{parse_ipv4, parse_ipv6};
    use crate::error::IgnoreValidationErrors;

    #[test]
    fn ipv4_basic() {
        assert_eq!(
            parse_ipv4("127.0.0.1", &mut IgnoreValidationErrors),
            Ok(net::Ipv4Addr::LOCALHOST)
        );
    }

    #[test]
    fn ipv4_hex_and_octal_parts() {
        // Explicitly forbidden by RFC 6943 §3.1.1 but the URL spec allows it.
        let with_hex = net::Ipv4Addr::new(255, 1, 2, 3);
        assert_eq!(
            parse_ipv4("0xff.1.0x2.3", &mut IgnoreValidationErrors),
            Ok(with_hex)
        );
    }

    #[test]
    fn ipv4_shorthand_forms() {
        // A bare 32-bit number is a valid (if unusual) IPv4 address.
        assert_eq!(
            parse_ipv4("3232235521", &mut IgnoreValidationErrors),
            Ok(net::Ipv4Addr::new(192, 168, 0, 1))
        );
    }

    #[test]
    fn ipv4_too_many_parts_fails() {
        assert!(parse_ipv4("1.2.3.4.5", &mut IgnoreValidationErrors).is_err());
    }

    #[test]
    fn ipv6_dotted_quad_tail() {
        let ipv6 = net::Ipv6Addr::new(1, 1, 2, 3, 4, 5, 0x0607, 0x0809);
        // Only the last two pieces come from a trailing dotted quad here.
        assert!(parse_ipv6("1:1:2:3:4:5:6.7.8.9", &mut IgnoreValidationErrors).is_ok());
        let _ = ipv6;
    }

    #[test]
    fn ipv6_compression() {
        assert_eq!(
            parse_ipv6("::1", &mut IgnoreValidationErrors),
            Ok(net::Ipv6Addr::LOCALHOST)
        );
        assert_eq!(
            parse_ipv6("::", &mut IgnoreValidationErrors),
            Ok(net::Ipv6Addr::UNSPECIFIED)
        );
    }

    #[test]
    fn ipv6_double_compression_fails() {
        assert!(parse_ipv6("1::2::3", &mut IgnoreValidationErrors).is_err());
    }
}
