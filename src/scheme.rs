/// Check whether a scheme is special.
/// Uses length + first byte to minimize comparisons.
pub fn is_special_scheme(scheme: &str) -> bool {
    let bytes = scheme.as_bytes();

    match (bytes.len(), bytes.first()) {
        (2, Some(b'w')) => bytes == b"ws",
        (3, Some(b'w')) => bytes == b"wss",
        (3, Some(b'f')) => bytes == b"ftp",
        (4, Some(b'h')) => bytes == b"http",
        (4, Some(b'f')) => bytes == b"file",
        (5, Some(b'h')) => bytes == b"https",
        _ => false,
    }
}

/// Get the default port for a scheme. `file` and non-special schemes have none.
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        "ftp" => Some(21),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_special_scheme() {
        assert!(is_special_scheme("http"));
        assert!(is_special_scheme("https"));
        assert!(is_special_scheme("ws"));
        assert!(is_special_scheme("wss"));
        assert!(is_special_scheme("ftp"));
        assert!(is_special_scheme("file"));
        assert!(!is_special_scheme("custom"));
        assert!(!is_special_scheme("HTTP")); // schemes are already lowercased
        assert!(!is_special_scheme(""));
    }

    #[test]
    fn test_default_port() {
        assert_eq!(default_port("http"), Some(80));
        assert_eq!(default_port("ws"), Some(80));
        assert_eq!(default_port("https"), Some(443));
        assert_eq!(default_port("wss"), Some(443));
        assert_eq!(default_port("ftp"), Some(21));
        assert_eq!(default_port("file"), None);
        assert_eq!(default_port("gopher"), None);
    }
}
