use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::ParseError;
use crate::form_urlencoded;
use crate::host::Host;
use crate::parser::{self, State};
use crate::record::{BlobUrlEntry, UrlRecord};
use crate::unicode::percent_encode::{utf8_percent_encode_str_into, USERINFO_SET};
use crate::url_search_params::UrlSearchParams;
use crate::validation::Reporter;
use crate::Result;

/// Blob URL store lookup hook. The store lives in the embedder; this build
/// has none, so resolution always yields `None`.
fn resolve_blob_url_entry(url: &UrlRecord) -> Option<BlobUrlEntry> {
    let _ = url;
    None
}

/// WHATWG `URL` accessor object.
///
/// Holds a parsed URL record and a query-parameter view kept in sync with
/// it. Getters read from the record (or serialize it); setters re-enter the
/// basic URL parser at the state the standard prescribes for each field.
///
/// A `Url` and its [`UrlSearchParams`] view form one logical object and are
/// not meant to cross threads.
#[derive(Debug)]
pub struct Url {
    record: Rc<RefCell<UrlRecord>>,
    query: UrlSearchParams,
}

impl Url {
    /// Parse a URL string with an optional base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the input (or the base) is invalid according to
    /// the WHATWG URL Standard.
    pub fn parse(input: &str, base: Option<&str>) -> Result<Self> {
        Self::parse_inner(input, base, Reporter::default())
    }

    /// Parse while reporting validation errors to `handler`. Validation
    /// errors are recoverable diagnostics; a handler receiving some does not
    /// mean parsing failed.
    ///
    /// # Errors
    ///
    /// Same failure conditions as [`Url::parse`].
    pub fn parse_with_handler(
        input: &str,
        base: Option<&str>,
        handler: &dyn Fn(&str),
    ) -> Result<Self> {
        Self::parse_inner(input, base, Reporter::new(handler))
    }

    fn parse_inner(input: &str, base: Option<&str>, reporter: Reporter<'_>) -> Result<Self> {
        let base_record = base
            .map(|base| parser::basic_parse_with(base, None, None, None, None, reporter))
            .transpose()?;
        let mut record =
            parser::basic_parse_with(input, base_record.as_ref(), None, None, None, reporter)?;
        if record.scheme == "blob" {
            record.blob_url_entry = resolve_blob_url_entry(&record);
        }
        Ok(Self::from_record(record))
    }

    fn from_record(record: UrlRecord) -> Self {
        let list = record
            .query
            .as_deref()
            .map(form_urlencoded::parse_str)
            .unwrap_or_default();
        let record = Rc::new(RefCell::new(record));
        let query = UrlSearchParams::with_owner(list, Rc::downgrade(&record));
        Self { record, query }
    }

    /// Check if a URL string can be parsed without keeping the result
    pub fn can_parse(input: &str, base: Option<&str>) -> bool {
        Self::parse(input, base).is_ok()
    }

    /// A copy of the underlying URL record
    pub fn record(&self) -> UrlRecord {
        self.record.borrow().clone()
    }

    // Getters

    /// Full serialized URL
    pub fn href(&self) -> String {
        self.record.borrow().serialize(false)
    }

    /// Serialized origin; opaque origins serialize to "null"
    pub fn origin(&self) -> String {
        self.record.borrow().origin().serialize()
    }

    /// Scheme with its trailing ':'
    pub fn protocol(&self) -> String {
        format!("{}:", self.record.borrow().scheme)
    }

    pub fn username(&self) -> String {
        self.record.borrow().username.clone()
    }

    pub fn password(&self) -> String {
        self.record.borrow().password.clone()
    }

    /// Host with the port when one is set, e.g. "example.com:8080"
    pub fn host(&self) -> String {
        let record = self.record.borrow();
        let Some(host) = &record.host else {
            return String::new();
        };
        match record.port {
            Some(port) => format!("{}:{port}", host.serialize()),
            None => host.serialize(),
        }
    }

    /// Host without the port
    pub fn hostname(&self) -> String {
        self.record
            .borrow()
            .host
            .as_ref()
            .map(Host::serialize)
            .unwrap_or_default()
    }

    /// Port digits, or "" for a null (default) port
    pub fn port(&self) -> String {
        self.record
            .borrow()
            .port
            .map(|port| port.to_string())
            .unwrap_or_default()
    }

    /// '/'-joined path, or the opaque path of a cannot-be-a-base URL
    pub fn pathname(&self) -> String {
        let record = self.record.borrow();
        if record.cannot_be_a_base_url {
            return record.path.first().cloned().unwrap_or_default();
        }
        let mut output = String::new();
        for segment in &record.path {
            output.push('/');
            output.push_str(segment);
        }
        output
    }

    /// Query with its leading '?', or "" when null or empty
    pub fn search(&self) -> String {
        match self.record.borrow().query.as_deref() {
            None | Some("") => String::new(),
            Some(query) => format!("?{query}"),
        }
    }

    /// Fragment with its leading '#', or "" when null or empty
    pub fn hash(&self) -> String {
        match self.record.borrow().fragment.as_deref() {
            None | Some("") => String::new(),
            Some(fragment) => format!("#{fragment}"),
        }
    }

    /// Live view over the query parameters. Mutating the view rewrites this
    /// URL's query; `set_search`/`set_href` rewrite the view's list.
    pub fn search_params(&self) -> UrlSearchParams {
        self.query.clone()
    }

    /// The serialization, for JSON embedding
    pub fn to_json(&self) -> String {
        self.href()
    }

    // Setters

    /// Replace the whole URL by re-parsing `value`.
    ///
    /// # Errors
    ///
    /// Unlike the other setters, a parse failure here propagates.
    pub fn set_href(&mut self, value: &str) -> Result<()> {
        let record = parser::basic_parse(value, None, None, None)?;
        *self.record.borrow_mut() = record;
        self.sync_query_list();
        Ok(())
    }

    /// Change the scheme. No-op when the parser's scheme-override rules
    /// reject the transition (special vs non-special, file constraints).
    pub fn set_protocol(&mut self, value: &str) {
        self.reparse(&format!("{value}:"), State::SchemeStart);
    }

    /// No-op when the URL cannot have credentials (null/empty host, file
    /// scheme, or cannot-be-a-base).
    pub fn set_username(&mut self, value: &str) {
        let mut record = self.record.borrow_mut();
        if record.cannot_have_username_password_port() {
            return;
        }
        let mut encoded = String::new();
        utf8_percent_encode_str_into(&mut encoded, value, USERINFO_SET);
        record.username = encoded;
    }

    /// No-op under the same conditions as [`Url::set_username`]
    pub fn set_password(&mut self, value: &str) {
        let mut record = self.record.borrow_mut();
        if record.cannot_have_username_password_port() {
            return;
        }
        let mut encoded = String::new();
        utf8_percent_encode_str_into(&mut encoded, value, USERINFO_SET);
        record.password = encoded;
    }

    /// Set host and optionally port ("example.com:8080"). No-op for
    /// cannot-be-a-base URLs.
    pub fn set_host(&mut self, value: &str) {
        if self.record.borrow().cannot_be_a_base_url {
            return;
        }
        self.reparse(value, State::Host);
    }

    /// Set the host, leaving the port alone. No-op for cannot-be-a-base URLs.
    pub fn set_hostname(&mut self, value: &str) {
        if self.record.borrow().cannot_be_a_base_url {
            return;
        }
        self.reparse(value, State::Hostname);
    }

    /// Set or (with "") clear the port. No-op when the URL cannot have one.
    pub fn set_port(&mut self, value: &str) {
        if self.record.borrow().cannot_have_username_password_port() {
            return;
        }
        if value.is_empty() {
            self.record.borrow_mut().port = None;
            return;
        }
        self.reparse(value, State::Port);
    }

    /// Replace the path. No-op for cannot-be-a-base URLs.
    pub fn set_pathname(&mut self, value: &str) {
        if self.record.borrow().cannot_be_a_base_url {
            return;
        }
        self.reparse_with(value, State::PathStart, |record| record.path.clear());
    }

    /// Replace the query ("" clears it) and the search-params list with it
    pub fn set_search(&mut self, value: &str) {
        if value.is_empty() {
            self.record.borrow_mut().query = None;
            self.query.clear_list();
            return;
        }
        let input = value.strip_prefix('?').unwrap_or(value);
        self.reparse_with(input, State::Query, |record| {
            record.query = Some(String::new());
        });
        self.query.replace_list(form_urlencoded::parse_str(input));
    }

    /// Replace the fragment ("" clears it)
    pub fn set_hash(&mut self, value: &str) {
        if value.is_empty() {
            self.record.borrow_mut().fragment = None;
            return;
        }
        let input = value.strip_prefix('#').unwrap_or(value);
        self.reparse_with(input, State::Fragment, |record| {
            record.fragment = Some(String::new());
        });
    }

    fn reparse(&mut self, input: &str, state: State) {
        self.reparse_with(input, state, |_| {});
    }

    /// Re-enter the parser at `state` on a copy of the record and commit
    /// only on success, so a failed setter leaves the URL untouched.
    fn reparse_with(&mut self, input: &str, state: State, prepare: impl FnOnce(&mut UrlRecord)) {
        let mut record = self.record.borrow().clone();
        prepare(&mut record);
        if let Ok(updated) = parser::basic_parse(input, None, Some(record), Some(state)) {
            *self.record.borrow_mut() = updated;
        }
    }

    fn sync_query_list(&mut self) {
        let list = self
            .record
            .borrow()
            .query
            .as_deref()
            .map(form_urlencoded::parse_str)
            .unwrap_or_default();
        self.query.replace_list(list);
    }
}

impl Clone for Url {
    /// Deep copy: the clone gets its own record and its own params view
    fn clone(&self) -> Self {
        Self::from_record(self.record.borrow().clone())
    }
}

impl PartialEq for Url {
    fn eq(&self, other: &Self) -> bool {
        *self.record.borrow() == *other.record.borrow()
    }
}

impl Eq for Url {}

impl core::fmt::Display for Url {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.href())
    }
}

impl FromStr for Url {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, None)
    }
}
