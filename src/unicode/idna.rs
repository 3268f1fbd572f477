use crate::error::{ParseError, Result};

/// Check if 4 bytes match "xn--" (case insensitive)
fn is_punycode_prefix(slice: &[u8]) -> bool {
    slice.len() >= 4
        && matches!(slice[0], b'x' | b'X')
        && matches!(slice[1], b'n' | b'N')
        && slice[2] == b'-'
        && slice[3] == b'-'
}

/// Check if domain contains Punycode (xn-- prefix, case insensitive)
pub fn has_punycode(domain: &str) -> bool {
    let bytes = domain.as_bytes();
    if bytes.len() < 4 {
        return false;
    }

    if is_punycode_prefix(bytes) {
        return true;
    }

    // Check for .xn-- patterns using memchr for faster scanning
    memchr::memchr_iter(b'.', bytes).any(|pos| is_punycode_prefix(&bytes[pos + 1..]))
}

/// Process a domain using the UTS-46 ToASCII algorithm.
///
/// `be_strict` selects UseSTD3ASCIIRules and VerifyDnsLength; the URL parser
/// always calls with `be_strict = false`. CheckHyphens stays off and
/// transitional processing is never used.
pub fn domain_to_ascii(domain: &str, be_strict: bool) -> Result<String> {
    // Fast path: pure ASCII without percent-encoding or Punycode.
    // Non-strict UTS-46 reduces to ASCII lowercasing here; Punycode labels
    // still need validation, so they take the slow path.
    if !be_strict && domain.is_ascii() && !domain.contains('%') && !has_punycode(domain) {
        return Ok(domain.to_ascii_lowercase());
    }

    let result = if be_strict {
        idna::domain_to_ascii_strict(domain)
    } else {
        idna::domain_to_ascii(domain)
    };
    result.map_err(|_| ParseError::IdnaError)
}

/// Process a domain using the UTS-46 ToUnicode algorithm.
/// Errors are ignored per the URL Standard; the mapped string is returned.
pub fn domain_to_unicode(domain: &str) -> String {
    idna::domain_to_unicode(domain).0
}
