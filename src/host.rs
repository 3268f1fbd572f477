use crate::character_sets::is_forbidden_host_code_point;
use crate::error::{ParseError, Result};
use crate::ipv4::{parse_ipv4, serialize_ipv4, Ipv4Outcome};
use crate::ipv6::{parse_ipv6, serialize_ipv6};
use crate::unicode::idna::domain_to_ascii;
use crate::unicode::percent_encode::{
    string_percent_decode, utf8_percent_encode_char_into, C0_CONTROL_SET,
};
use crate::validation::Reporter;

/// A parsed URL host (https://url.spec.whatwg.org/#concept-host)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Host {
    /// ASCII domain produced by IDNA processing
    Domain(String),
    /// Opaque host of a non-special URL (percent-encoded verbatim)
    Opaque(String),
    /// The empty host (file URLs, `localhost` coercion)
    Empty,
    /// IPv4 address as a 32-bit integer
    Ipv4(u32),
    /// IPv6 address as eight 16-bit pieces
    Ipv6([u16; 8]),
}

impl Host {
    /// Serialize per https://url.spec.whatwg.org/#concept-host-serializer
    pub fn serialize(&self) -> String {
        match self {
            Self::Domain(domain) => domain.clone(),
            Self::Opaque(host) => host.clone(),
            Self::Empty => String::new(),
            Self::Ipv4(address) => serialize_ipv4(*address),
            Self::Ipv6(pieces) => serialize_ipv6(pieces),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl core::fmt::Display for Host {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Parse a host string per https://url.spec.whatwg.org/#concept-host-parser.
/// `is_not_special` selects the opaque-host path for non-special URLs.
pub(crate) fn parse_host(input: &str, is_not_special: bool, reporter: &Reporter<'_>) -> Result<Host> {
    if input.starts_with('[') {
        if !input.ends_with(']') {
            reporter.report("IPv6 host is missing its closing ']'");
            return Err(ParseError::InvalidIpv6);
        }
        return parse_ipv6(&input[1..input.len() - 1], reporter).map(Host::Ipv6);
    }
    if is_not_special {
        return parse_opaque_host(input, reporter);
    }

    let domain = String::from_utf8_lossy(&string_percent_decode(input)).into_owned();
    let ascii_domain = domain_to_ascii(&domain, false)?;
    if let Some(c) = ascii_domain.chars().find(|&c| is_forbidden_host_code_point(c)) {
        reporter.report(&format!("domain contains a forbidden host code point {c:?}"));
        return Err(ParseError::InvalidDomainCharacter);
    }
    if ascii_domain.is_empty() {
        return Ok(Host::Empty);
    }
    match parse_ipv4(&ascii_domain, reporter)? {
        Ipv4Outcome::Address(address) => Ok(Host::Ipv4(address)),
        Ipv4Outcome::Domain => Ok(Host::Domain(ascii_domain)),
    }
}

/// Opaque hosts keep their code points, C0-control percent-encoded. '%' is
/// allowed (unlike in domains) so percent-encoded hosts survive re-parsing.
fn parse_opaque_host(input: &str, reporter: &Reporter<'_>) -> Result<Host> {
    if input
        .chars()
        .any(|c| c != '%' && is_forbidden_host_code_point(c))
    {
        reporter.report("opaque host contains a forbidden host code point");
        return Err(ParseError::InvalidHost);
    }
    if input.is_empty() {
        return Ok(Host::Empty);
    }
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        utf8_percent_encode_char_into(&mut output, c, C0_CONTROL_SET);
    }
    Ok(Host::Opaque(output))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(input: &str, is_not_special: bool) -> Result<Host> {
        parse_host(input, is_not_special, &Reporter::default())
    }

    #[test]
    fn test_parse_domain() {
        assert_eq!(
            parse("Example.COM", false).unwrap(),
            Host::Domain("example.com".to_string())
        );
        // Trailing dot is preserved
        assert_eq!(
            parse("example.com.", false).unwrap(),
            Host::Domain("example.com.".to_string())
        );
    }

    #[test]
    fn test_parse_percent_encoded_domain() {
        assert_eq!(
            parse("ex%61mple.com", false).unwrap(),
            Host::Domain("example.com".to_string())
        );
    }

    #[test]
    fn test_parse_unicode_domain() {
        let host = parse("日本.jp", false).unwrap();
        match host {
            Host::Domain(domain) => assert!(domain.starts_with("xn--")),
            other => panic!("expected a domain, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_ipv4_host() {
        assert_eq!(parse("127.0.0.1", false).unwrap(), Host::Ipv4(0x7F00_0001));
        assert_eq!(parse("0x7f.1", false).unwrap(), Host::Ipv4(0x7F00_0001));
    }

    #[test]
    fn test_parse_ipv6_host() {
        assert_eq!(
            parse("[::1]", false).unwrap(),
            Host::Ipv6([0, 0, 0, 0, 0, 0, 0, 1])
        );
        assert_eq!(parse("[::1", false), Err(ParseError::InvalidIpv6));
    }

    #[test]
    fn test_forbidden_code_points() {
        assert_eq!(parse("exa mple.com", false), Err(ParseError::InvalidDomainCharacter));
        assert_eq!(parse("a%23b", false), Err(ParseError::InvalidDomainCharacter));
        // Opaque hosts allow '%', reject the rest
        assert!(parse("a%23b", true).is_ok());
        assert_eq!(parse("a#b", true), Err(ParseError::InvalidHost));
    }

    #[test]
    fn test_opaque_host_encoding() {
        assert_eq!(
            parse("héllo", true).unwrap(),
            Host::Opaque("h%C3%A9llo".to_string())
        );
        assert_eq!(parse("host", true).unwrap(), Host::Opaque("host".to_string()));
        assert_eq!(parse("", true).unwrap(), Host::Empty);
    }

    #[test]
    fn test_serialize() {
        assert_eq!(Host::Domain("example.com".to_string()).serialize(), "example.com");
        assert_eq!(Host::Ipv4(0x7F00_0001).serialize(), "127.0.0.1");
        assert_eq!(
            Host::Ipv6([0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]).serialize(),
            "[2001:db8::1]"
        );
        assert_eq!(Host::Empty.serialize(), "");
    }
}
