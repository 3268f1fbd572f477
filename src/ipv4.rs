/// IPv4 address parser supporting decimal, octal, and hexadecimal notation
/// Based on https://url.spec.whatwg.org/#concept-ipv4-parser
use crate::error::{ParseError, Result};
use crate::validation::Reporter;

/// Outcome of the IPv4 parser. The host parser needs a three-way answer:
/// a parsed address, a hard failure, or "this is a domain after all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv4Outcome {
    /// The input parsed as an IPv4 address
    Address(u32),
    /// The input is not IPv4-shaped; treat it as a domain
    Domain,
}

/// Parse an IPv4 address string into a u32.
/// Supports:
/// - Decimal: 192.168.1.1
/// - Hex: 0xC0A80101
/// - Octal: 0300.0250.01.01
/// - Mixed: 192.0x00A80001
/// - Fewer than four parts: 0x7f.1 is 127.0.0.1
pub fn parse_ipv4(input: &str, reporter: &Reporter<'_>) -> Result<Ipv4Outcome> {
    let mut parts: Vec<&str> = input.split('.').collect();

    // A trailing dot is allowed and dropped
    if parts.last() == Some(&"") {
        reporter.report("IPv4 input has a trailing dot");
        if parts.len() > 1 {
            parts.pop();
        }
    }

    if parts.len() > 4 {
        return Ok(Ipv4Outcome::Domain);
    }

    let mut numbers: Vec<u64> = Vec::with_capacity(parts.len());
    for part in parts {
        if part.is_empty() {
            return Ok(Ipv4Outcome::Domain);
        }
        let Some((number, flagged)) = parse_ipv4_number(part) else {
            return Ok(Ipv4Outcome::Domain);
        };
        if flagged {
            reporter.report("IPv4 number has a leading zero or radix prefix");
        }
        numbers.push(number);
    }

    if numbers.iter().any(|&n| n > 255) {
        reporter.report("IPv4 part exceeds 255");
    }

    // All but the last number are single bytes; the last fills the rest
    let last_index = numbers.len() - 1;
    if numbers[..last_index].iter().any(|&n| n > 255) {
        return Err(ParseError::InvalidIpv4);
    }
    if numbers[last_index] >= 256u64.pow(5 - numbers.len() as u32) {
        return Err(ParseError::InvalidIpv4);
    }

    let mut ipv4 = numbers[last_index] as u32;
    for (i, &number) in numbers[..last_index].iter().enumerate() {
        ipv4 |= (number as u32) << (8 * (3 - i));
    }

    Ok(Ipv4Outcome::Address(ipv4))
}

/// Parse a single IPv4 number with radix detection: `0x`/`0X` means hex,
/// a leading zero on a longer part means octal, otherwise decimal. The
/// second tuple element reports whether a prefix was stripped (a validation
/// error at the caller). `None` means the part is not a number at all.
fn parse_ipv4_number(input: &str) -> Option<(u64, bool)> {
    let (digits, radix, flagged) = if let Some(hex) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        (hex, 16u32, true)
    } else if input.len() >= 2 && input.starts_with('0') {
        (&input[1..], 8u32, true)
    } else {
        (input, 10u32, false)
    };

    // Bare "0x" is zero
    if digits.is_empty() {
        return Some((0, true));
    }

    let mut value: u64 = 0;
    for c in digits.chars() {
        let digit = u64::from(c.to_digit(radix)?);
        // Saturate: anything this large already fails the range checks
        value = value.saturating_mul(u64::from(radix)).saturating_add(digit);
    }
    Some((value, flagged))
}

/// Serialize an IPv4 address (u32) to dotted decimal notation
pub fn serialize_ipv4(ipv4: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        (ipv4 >> 24) & 0xFF,
        (ipv4 >> 16) & 0xFF,
        (ipv4 >> 8) & 0xFF,
        ipv4 & 0xFF
    )
}
