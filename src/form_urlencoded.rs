/// `application/x-www-form-urlencoded` parsing and serialization
/// (https://url.spec.whatwg.org/#application/x-www-form-urlencoded)
use crate::unicode::percent_encode::{percent_decode_bytes, percent_encode_byte_into};

/// Parse a byte sequence into (name, value) pairs in input order.
/// Empty chunks between '&' are dropped; a chunk without '=' is a name with
/// an empty value; '+' means space in both halves.
pub fn parse_bytes(input: &[u8]) -> Vec<(String, String)> {
    let mut output = Vec::new();
    for sequence in input.split(|&byte| byte == b'&') {
        if sequence.is_empty() {
            continue;
        }
        let (name, value) = match memchr::memchr(b'=', sequence) {
            Some(index) => (&sequence[..index], &sequence[index + 1..]),
            None => (sequence, &[][..]),
        };
        output.push((decode_component(name), decode_component(value)));
    }
    output
}

/// Parse a query string into (name, value) pairs
pub fn parse_str(input: &str) -> Vec<(String, String)> {
    parse_bytes(input.as_bytes())
}

/// Serialize pairs, joining with '&'. The '=' between name and value is
/// always emitted, even for empty values.
pub fn serialize(pairs: &[(String, String)]) -> String {
    let mut output = String::new();
    for (i, (name, value)) in pairs.iter().enumerate() {
        if i > 0 {
            output.push('&');
        }
        serialize_component(&mut output, name);
        output.push('=');
        serialize_component(&mut output, value);
    }
    output
}

/// Byte serializer: space becomes '+', the form-safe bytes pass through,
/// everything else is percent-encoded.
fn serialize_component(output: &mut String, input: &str) {
    for byte in input.bytes() {
        match byte {
            b' ' => output.push('+'),
            b'*' | b'-' | b'.' | b'0'..=b'9' | b'A'..=b'Z' | b'_' | b'a'..=b'z' => {
                output.push(byte as char);
            }
            _ => percent_encode_byte_into(output, byte),
        }
    }
}

fn decode_component(bytes: &[u8]) -> String {
    let unplussed: Vec<u8> = bytes
        .iter()
        .map(|&byte| if byte == b'+' { b' ' } else { byte })
        .collect();
    String::from_utf8_lossy(&percent_decode_bytes(&unplussed)).into_owned()
}
