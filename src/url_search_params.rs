use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::{ParseError, Result};
use crate::form_urlencoded;
use crate::record::UrlRecord;

/// Ordered query-parameter list, WHATWG `URLSearchParams`.
///
/// A view obtained from [`crate::Url::search_params`] shares its list with
/// the URL and holds a weak back-reference to the URL record: every mutation
/// re-serializes the list into the owner's query. A standalone instance has
/// no owner and just manages its list.
///
/// Cloning a view produces another handle onto the same list, not a copy.
#[derive(Debug, Clone, Default)]
pub struct UrlSearchParams {
    list: Rc<RefCell<Vec<(String, String)>>>,
    url: Weak<RefCell<UrlRecord>>,
}

impl UrlSearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a query string, tolerating a leading '?'
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        Self {
            list: Rc::new(RefCell::new(form_urlencoded::parse_str(input))),
            url: Weak::new(),
        }
    }

    /// Build from ordered (name, value) pairs. This also covers mapping
    /// initializers: iterate the mapping in its enumeration order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let list = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self {
            list: Rc::new(RefCell::new(list)),
            url: Weak::new(),
        }
    }

    /// Build from a sequence of inner sequences, each of which must hold
    /// exactly a name and a value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidSearchParams`] when an inner sequence is
    /// not of length 2.
    pub fn from_sequence<I, S>(sequence: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Vec::new();
        for pair in sequence {
            let mut pair = pair.into_iter();
            match (pair.next(), pair.next(), pair.next()) {
                (Some(name), Some(value), None) => list.push((name.into(), value.into())),
                _ => return Err(ParseError::InvalidSearchParams),
            }
        }
        Ok(Self {
            list: Rc::new(RefCell::new(list)),
            url: Weak::new(),
        })
    }

    pub(crate) fn with_owner(
        list: Vec<(String, String)>,
        url: Weak<RefCell<UrlRecord>>,
    ) -> Self {
        Self {
            list: Rc::new(RefCell::new(list)),
            url,
        }
    }

    pub(crate) fn replace_list(&self, list: Vec<(String, String)>) {
        *self.list.borrow_mut() = list;
    }

    pub(crate) fn clear_list(&self) {
        self.list.borrow_mut().clear();
    }

    /// Append a pair at the end
    pub fn append(&mut self, name: &str, value: &str) {
        self.list
            .borrow_mut()
            .push((name.to_string(), value.to_string()));
        self.update();
    }

    /// Delete pairs with the given name. With `value`, only pairs matching
    /// both name and value are deleted.
    pub fn delete(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => self
                .list
                .borrow_mut()
                .retain(|(n, v)| n != name || v != value),
            None => self.list.borrow_mut().retain(|(n, _)| n != name),
        }
        self.update();
    }

    /// First value for a name
    pub fn get(&self, name: &str) -> Option<String> {
        self.list
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// All values for a name, in order
    pub fn get_all(&self, name: &str) -> Vec<String> {
        self.list
            .borrow()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Whether a name exists; with `value`, whether that exact pair exists
    pub fn has(&self, name: &str, value: Option<&str>) -> bool {
        match value {
            Some(value) => self.list.borrow().iter().any(|(n, v)| n == name && v == value),
            None => self.list.borrow().iter().any(|(n, _)| n == name),
        }
    }

    /// Set a name to a single value: the first match is overwritten in
    /// place, later matches are removed, and a missing name is appended.
    pub fn set(&mut self, name: &str, value: &str) {
        {
            let mut list = self.list.borrow_mut();
            let mut found = false;
            list.retain_mut(|(n, v)| {
                if n != name {
                    return true;
                }
                if found {
                    return false;
                }
                found = true;
                *v = value.to_string();
                true
            });
            if !found {
                list.push((name.to_string(), value.to_string()));
            }
        }
        self.update();
    }

    /// Stable sort by name, comparing UTF-16 code units (the JavaScript
    /// string order the standard specifies). Pairs with equal names keep
    /// their relative order.
    pub fn sort(&mut self) {
        self.list
            .borrow_mut()
            .sort_by(|a, b| a.0.encode_utf16().cmp(b.0.encode_utf16()));
        self.update();
    }

    /// Number of pairs
    pub fn size(&self) -> usize {
        self.list.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.borrow().is_empty()
    }

    /// Iterate over (name, value) pairs in insertion order.
    /// The iterator works on a snapshot of the list.
    pub fn iter(&self) -> impl Iterator<Item = (String, String)> {
        self.list.borrow().clone().into_iter()
    }

    /// Alias for `iter`, matching the WHATWG API name
    pub fn entries(&self) -> impl Iterator<Item = (String, String)> {
        self.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = String> {
        self.iter().map(|(name, _)| name)
    }

    pub fn values(&self) -> impl Iterator<Item = String> {
        self.iter().map(|(_, value)| value)
    }

    /// Write the serialized list back into the owning URL's query.
    /// An empty list clears the query entirely.
    fn update(&self) {
        let Some(url) = self.url.upgrade() else {
            return;
        };
        let query = form_urlencoded::serialize(&self.list.borrow());
        url.borrow_mut().query = if query.is_empty() { None } else { Some(query) };
    }
}

impl core::fmt::Display for UrlSearchParams {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&form_urlencoded::serialize(&self.list.borrow()))
    }
}

impl From<&str> for UrlSearchParams {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for UrlSearchParams {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_question_mark() {
        let params = UrlSearchParams::parse("?key=value");
        assert_eq!(params.size(), 1);
        assert_eq!(params.get("key"), Some("value".to_string()));
    }

    #[test]
    fn test_from_pairs_keeps_order() {
        let params = UrlSearchParams::from_pairs([("b", "2"), ("a", "1")]);
        let keys: Vec<String> = params.keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_from_sequence_checks_pair_length() {
        let ok = UrlSearchParams::from_sequence([vec!["a", "1"], vec!["b", "2"]]).unwrap();
        assert_eq!(ok.get("b"), Some("2".to_string()));

        assert!(matches!(
            UrlSearchParams::from_sequence([vec!["a"]]),
            Err(ParseError::InvalidSearchParams)
        ));
        assert!(matches!(
            UrlSearchParams::from_sequence([vec!["a", "1", "extra"]]),
            Err(ParseError::InvalidSearchParams)
        ));
    }

    #[test]
    fn test_set_overwrites_first_and_drops_rest() {
        let mut params = UrlSearchParams::parse("k=1&j=2&k=3");
        params.set("k", "9");
        assert_eq!(params.to_string(), "k=9&j=2");
    }

    #[test]
    fn test_sort_is_stable_on_equal_names() {
        let mut params = UrlSearchParams::parse("k=5&k=1&j=2");
        params.sort();
        assert_eq!(params.to_string(), "j=2&k=5&k=1");
    }

    #[test]
    fn test_sort_compares_utf16_code_units() {
        // By code point U+1D306 > U+FFFD, but its leading surrogate 0xD834
        // is below 0xFFFD, so UTF-16 order puts it first.
        let mut params = UrlSearchParams::from_pairs([("\u{FFFD}", "1"), ("\u{1D306}", "2")]);
        params.sort();
        let keys: Vec<String> = params.keys().collect();
        assert_eq!(keys, ["\u{1D306}", "\u{FFFD}"]);
    }

    #[test]
    fn test_delete_with_and_without_value() {
        let mut params = UrlSearchParams::parse("k=1&k=2&j=3");
        params.delete("k", Some("1"));
        assert_eq!(params.to_string(), "k=2&j=3");
        params.delete("k", None);
        assert_eq!(params.to_string(), "j=3");
    }

    #[test]
    fn test_has() {
        let params = UrlSearchParams::parse("k=1&j=2");
        assert!(params.has("k", None));
        assert!(params.has("k", Some("1")));
        assert!(!params.has("k", Some("2")));
        assert!(!params.has("x", None));
    }

    #[test]
    fn test_display_is_form_urlencoded() {
        let mut params = UrlSearchParams::new();
        params.append("key", "value with spaces");
        params.append("sym", "&=");
        assert_eq!(params.to_string(), "key=value+with+spaces&sym=%26%3D");
    }

    #[test]
    fn test_standalone_instance_has_no_owner() {
        // update() on an unowned instance must be a no-op, not a panic
        let mut params = UrlSearchParams::new();
        params.append("a", "1");
        assert_eq!(params.size(), 1);
    }
}
