#![allow(clippy::unwrap_used, clippy::panic, clippy::expect_used)]

/// URLSearchParams tests: construction, list operations, sorting, and the
/// bidirectional synchronization with an owning URL.
use wurl::{ParseError, Url, UrlSearchParams};

#[test]
fn test_parse_empty() {
    let params = UrlSearchParams::parse("");
    assert_eq!(params.size(), 0);
    assert!(params.is_empty());
}

#[test]
fn test_parse_single_and_multiple() {
    let params = UrlSearchParams::parse("key=value");
    assert_eq!(params.size(), 1);
    assert_eq!(params.get("key"), Some("value".to_string()));

    let params = UrlSearchParams::parse("a=1&b=2&c=3");
    assert_eq!(params.size(), 3);
    assert_eq!(params.get("c"), Some("3".to_string()));
}

#[test]
fn test_parse_with_question_mark() {
    let params = UrlSearchParams::parse("?key=value");
    assert_eq!(params.get("key"), Some("value".to_string()));
}

#[test]
fn test_parse_no_value_and_empty_chunks() {
    let params = UrlSearchParams::parse("key1&key2=value2&&&");
    assert_eq!(params.size(), 2);
    assert_eq!(params.get("key1"), Some(String::new()));
    assert_eq!(params.get("key2"), Some("value2".to_string()));
}

#[test]
fn test_parse_duplicate_keys() {
    let params = UrlSearchParams::parse("key=value1&key=value2");
    assert_eq!(params.size(), 2);
    assert_eq!(params.get("key"), Some("value1".to_string()));
    assert_eq!(params.get_all("key"), ["value1", "value2"]);
}

#[test]
fn test_append_and_delete() {
    let mut params = UrlSearchParams::new();
    params.append("key1", "value1");
    params.append("key2", "value2");
    params.append("key1", "value3");
    assert_eq!(params.size(), 3);

    params.delete("key1", None);
    assert_eq!(params.size(), 1);
    assert_eq!(params.get("key1"), None);

    let mut params = UrlSearchParams::parse("k=1&k=2&j=3");
    params.delete("k", Some("2"));
    assert_eq!(params.get_all("k"), ["1"]);
}

#[test]
fn test_set_replaces_all_values() {
    let mut params = UrlSearchParams::parse("key=value1&key=value2");
    params.set("key", "newvalue");
    assert_eq!(params.size(), 1);
    assert_eq!(params.get("key"), Some("newvalue".to_string()));

    let mut params = UrlSearchParams::new();
    params.set("key", "value");
    assert_eq!(params.get("key"), Some("value".to_string()));
}

#[test]
fn test_has_with_and_without_value() {
    let params = UrlSearchParams::parse("key1=value1&key2=value2");
    assert!(params.has("key1", None));
    assert!(params.has("key1", Some("value1")));
    assert!(!params.has("key1", Some("value2")));
    assert!(!params.has("key3", None));
}

#[test]
fn test_sort_spec_scenario() {
    let mut params = UrlSearchParams::parse("k=5&k=1&j=2");
    params.sort();
    assert_eq!(params.to_string(), "j=2&k=5&k=1");
}

#[test]
fn test_sort_repeated_keys_is_stable() {
    let mut params = UrlSearchParams::new();
    params.append("z", "1");
    params.append("a", "2");
    params.append("z", "3");
    params.append("a", "4");
    params.sort();
    let entries: Vec<(String, String)> = params.iter().collect();
    assert_eq!(
        entries,
        [
            ("a".to_string(), "2".to_string()),
            ("a".to_string(), "4".to_string()),
            ("z".to_string(), "1".to_string()),
            ("z".to_string(), "3".to_string()),
        ]
    );
}

#[test]
fn test_iteration_is_insertion_ordered() {
    let params = UrlSearchParams::parse("b=2&a=1&c=3");
    let keys: Vec<String> = params.keys().collect();
    assert_eq!(keys, ["b", "a", "c"]);
    let values: Vec<String> = params.values().collect();
    assert_eq!(values, ["2", "1", "3"]);
    assert_eq!(params.entries().count(), 3);
}

#[test]
fn test_space_and_plus_handling() {
    let mut params = UrlSearchParams::new();
    params.append("key", "value with spaces");
    assert_eq!(params.to_string(), "key=value+with+spaces");

    let params = UrlSearchParams::parse("key=value+with+spaces");
    assert_eq!(params.get("key"), Some("value with spaces".to_string()));

    let mut params = UrlSearchParams::new();
    params.append("math", "1+1=2");
    assert_eq!(params.to_string(), "math=1%2B1%3D2");
}

#[test]
fn test_percent_round_trip() {
    let mut params = UrlSearchParams::new();
    params.append("special", "!@#$%^&*()");
    params.append("name", "François");
    let serialized = params.to_string();

    let reparsed = UrlSearchParams::parse(&serialized);
    assert_eq!(reparsed.get("special"), Some("!@#$%^&*()".to_string()));
    assert_eq!(reparsed.get("name"), Some("François".to_string()));
}

#[test]
fn test_from_pairs_and_sequence() {
    let params = UrlSearchParams::from_pairs([("a", "1"), ("b", "2")]);
    assert_eq!(params.to_string(), "a=1&b=2");

    let params = UrlSearchParams::from_sequence([["a", "1"], ["b", "2"]]).unwrap();
    assert_eq!(params.to_string(), "a=1&b=2");

    assert!(matches!(
        UrlSearchParams::from_sequence([vec!["a", "1"], vec!["b"]]),
        Err(ParseError::InvalidSearchParams)
    ));
}

#[test]
fn test_view_mutations_rewrite_owner_query() {
    let url = Url::parse("https://example.org/p?a=1&b=2", None).unwrap();
    let mut params = url.search_params();

    params.append("c", "3");
    assert_eq!(url.href(), "https://example.org/p?a=1&b=2&c=3");

    params.set("a", "9");
    assert_eq!(url.search(), "?a=9&b=2&c=3");

    params.sort();
    assert_eq!(url.search(), "?a=9&b=2&c=3");

    params.delete("a", None);
    params.delete("b", None);
    params.delete("c", None);
    // Empty list means null query
    assert_eq!(url.search(), "");
    assert_eq!(url.href(), "https://example.org/p");
}

#[test]
fn test_owner_setters_rewrite_view_list() {
    let mut url = Url::parse("https://example.org/?a=1", None).unwrap();
    let params = url.search_params();
    assert_eq!(params.get("a"), Some("1".to_string()));

    url.set_search("x=1&y=2");
    assert_eq!(params.size(), 2);
    assert_eq!(params.get("x"), Some("1".to_string()));

    url.set_search("");
    assert_eq!(params.size(), 0);

    url.set_href("https://example.org/?z=3").unwrap();
    assert_eq!(url.search_params().get("z"), Some("3".to_string()));
}

#[test]
fn test_view_serialization_matches_query_encoding() {
    let url = Url::parse("https://example.org/", None).unwrap();
    let mut params = url.search_params();
    params.append("name", "a b&c");
    assert_eq!(url.search(), "?name=a+b%26c");
    assert_eq!(url.search_params().get("name"), Some("a b&c".to_string()));
}

#[test]
fn test_standalone_params_do_not_panic_without_owner() {
    let mut params = UrlSearchParams::parse("a=1");
    params.append("b", "2");
    params.sort();
    params.delete("a", None);
    assert_eq!(params.to_string(), "b=2");
}
