use crate::character_sets::is_ascii_tab_or_newline;

/// Fast check if string contains tabs or newlines
pub fn has_tabs_or_newline(input: &str) -> bool {
    memchr::memchr3(b'\t', b'\n', b'\r', input.as_bytes()).is_some()
}

/// Remove all ASCII tabs and newlines (the parser strips them anywhere in
/// the input, not just at the edges).
pub fn remove_tabs_and_newlines(input: &str) -> String {
    input.chars().filter(|&c| !is_ascii_tab_or_newline(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_tabs_or_newline() {
        assert!(has_tabs_or_newline("a\tb"));
        assert!(has_tabs_or_newline("a\nb"));
        assert!(has_tabs_or_newline("a\rb"));
        assert!(!has_tabs_or_newline("http://example.com/"));
    }

    #[test]
    fn test_remove_tabs_and_newlines() {
        assert_eq!(remove_tabs_and_newlines("hel\tlo\nworld\r"), "helloworld");
        assert_eq!(remove_tabs_and_newlines("plain"), "plain");
        assert_eq!(remove_tabs_and_newlines("\t\n\r"), "");
        // Spaces are kept; only tab/LF/CR are removed here
        assert_eq!(remove_tabs_and_newlines("a b"), "a b");
    }
}
