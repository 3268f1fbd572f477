use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

// Define encode sets following the WHATWG URL spec
// Based on https://url.spec.whatwg.org/#percent-encoded-bytes
// Each set is a strict superset of the previous one; bytes >= 0x80 are
// always encoded by the percent-encoding crate, which matches the
// "C0 control or > U+007E" definition.

/// C0 control percent-encode set
pub const C0_CONTROL_SET: &AsciiSet = CONTROLS;

/// Fragment percent-encode set
/// C0 control + space, ", <, >, \`
pub const FRAGMENT_SET: &AsciiSet = &C0_CONTROL_SET
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// Path percent-encode set
/// Fragment + #, ?, {, }
pub const PATH_SET: &AsciiSet = &FRAGMENT_SET.add(b'#').add(b'?').add(b'{').add(b'}');

/// Userinfo percent-encode set
/// Path + /, :, ;, =, @, [, \, ], ^, |
pub const USERINFO_SET: &AsciiSet = &PATH_SET
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// Special query percent-encode set (http, https, ws, wss, ftp, file)
/// C0 control + space, ", #, <, >, '
pub const SPECIAL_QUERY_SET: &AsciiSet = &C0_CONTROL_SET
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'\'');

/// Query percent-encode set (non-special URLs)
/// Same as the special set minus the single quote
pub const QUERY_SET: &AsciiSet = &C0_CONTROL_SET
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>');

/// Percent-encode a single byte as "%HH" with uppercase hex
pub fn percent_encode_byte(byte: u8) -> String {
    percent_encoding::percent_encode_byte(byte).to_string()
}

/// Write a percent-encoded byte directly into a buffer
pub fn percent_encode_byte_into(output: &mut String, byte: u8) {
    output.push_str(percent_encoding::percent_encode_byte(byte));
}

/// UTF-8 percent-encode a single code point against an encode set.
/// Code points outside the set pass through verbatim.
pub fn utf8_percent_encode_char_into(output: &mut String, c: char, set: &'static AsciiSet) {
    let mut buf = [0u8; 4];
    for chunk in utf8_percent_encode(c.encode_utf8(&mut buf), set) {
        output.push_str(chunk);
    }
}

/// Percent-encode a whole string against an encode set, writing into `output`
pub fn utf8_percent_encode_str_into(output: &mut String, input: &str, set: &'static AsciiSet) {
    output.reserve(input.len());
    for chunk in utf8_percent_encode(input, set) {
        output.push_str(chunk);
    }
}

/// Percent-encode a whole string against an encode set
pub fn percent_encode_with_set(input: &str, set: &'static AsciiSet) -> String {
    utf8_percent_encode(input, set).to_string()
}

/// Percent-encode a byte sequence against an encode set (used by the query
/// state, which operates on the UTF-8 bytes of its buffer)
pub fn percent_encode_bytes_into(output: &mut String, input: &[u8], set: &'static AsciiSet) {
    for chunk in percent_encoding::percent_encode(input, set) {
        output.push_str(chunk);
    }
}

/// Percent-decode a byte sequence. Total: a '%' not followed by two ASCII
/// hex digits passes through verbatim.
pub fn percent_decode_bytes(input: &[u8]) -> Vec<u8> {
    percent_encoding::percent_decode(input).collect()
}

/// Percent-decode the UTF-8 bytes of a string
pub fn string_percent_decode(input: &str) -> Vec<u8> {
    percent_decode_bytes(input.as_bytes())
}
