/// Check if a character is an ASCII tab or newline
pub fn is_ascii_tab_or_newline(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
}

/// Check if a character is a C0 control or space (U+0000 to U+0020).
/// These are stripped from the ends of parser input.
pub fn is_c0_control_or_space(c: char) -> bool {
    c <= '\u{20}'
}

/// Forbidden host code points per
/// <https://url.spec.whatwg.org/#forbidden-host-code-point>
pub fn is_forbidden_host_code_point(c: char) -> bool {
    matches!(
        c,
        '\0' | '\t' | '\n' | '\r' | ' ' | '#' | '%' | '/' | ':' | '?' | '@' | '[' | '\\' | ']'
    )
}

/// URL code points per <https://url.spec.whatwg.org/#url-code-points>.
/// Anything else in a path, query, or fragment is a validation error
/// (but still gets percent-encoded and kept).
pub fn is_url_code_point(c: char) -> bool {
    if c.is_ascii_alphanumeric() {
        return true;
    }
    if matches!(
        c,
        '!' | '$'
            | '&'
            | '\''
            | '('
            | ')'
            | '*'
            | '+'
            | ','
            | '-'
            | '.'
            | '/'
            | ':'
            | ';'
            | '='
            | '?'
            | '@'
            | '_'
            | '~'
    ) {
        return true;
    }
    // U+00A0 to U+10FFFD, excluding noncharacters
    let cp = c as u32;
    (0xA0..=0x10_FFFD).contains(&cp) && !(0xFDD0..=0xFDEF).contains(&cp) && (cp & 0xFFFE) != 0xFFFE
}
