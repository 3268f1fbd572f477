use core::fmt::Write;

use crate::host::Host;
use crate::parser::{self, is_normalized_windows_drive_letter};
use crate::scheme::{default_port, is_special_scheme};

/// Opaque handle into a blob URL store. The store itself lives in the
/// embedder; this crate never resolves entries (see `Url`'s resolver hook).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobUrlEntry;

/// A URL record per https://url.spec.whatwg.org/#concept-url
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlRecord {
    /// Lowercase ASCII scheme without the trailing colon
    pub scheme: String,
    /// Percent-encoded username
    pub username: String,
    /// Percent-encoded password
    pub password: String,
    pub host: Option<Host>,
    /// Always `None` when equal to the scheme's default port
    pub port: Option<u16>,
    /// Path segments; a single opaque string for cannot-be-a-base URLs
    pub path: Vec<String>,
    /// Query without the leading '?'
    pub query: Option<String>,
    /// Fragment without the leading '#'
    pub fragment: Option<String>,
    pub cannot_be_a_base_url: bool,
    pub blob_url_entry: Option<BlobUrlEntry>,
}

impl UrlRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the scheme is one of ftp, file, http, https, ws, wss
    pub fn is_special(&self) -> bool {
        is_special_scheme(&self.scheme)
    }

    pub fn includes_credentials(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }

    /// https://url.spec.whatwg.org/#cannot-have-a-username-password-port
    pub fn cannot_have_username_password_port(&self) -> bool {
        matches!(self.host, None | Some(Host::Empty))
            || self.cannot_be_a_base_url
            || self.scheme == "file"
    }

    /// Remove the last path segment. A file URL whose whole path is a
    /// normalized Windows drive letter keeps it.
    pub(crate) fn shorten_path(&mut self) {
        if self.path.is_empty() {
            return;
        }
        if self.scheme == "file"
            && self.path.len() == 1
            && is_normalized_windows_drive_letter(&self.path[0])
        {
            return;
        }
        self.path.pop();
    }

    /// Serialize per https://url.spec.whatwg.org/#concept-url-serializer
    pub fn serialize(&self, exclude_fragment: bool) -> String {
        let mut output = String::new();
        output.push_str(&self.scheme);
        output.push(':');

        if let Some(host) = &self.host {
            output.push_str("//");
            if self.includes_credentials() {
                output.push_str(&self.username);
                if !self.password.is_empty() {
                    output.push(':');
                    output.push_str(&self.password);
                }
                output.push('@');
            }
            output.push_str(&host.serialize());
            if let Some(port) = self.port {
                let _ = write!(output, ":{port}");
            }
        } else if self.scheme == "file" {
            // file URLs with a null host still serialize with "//"
            output.push_str("//");
        }

        if self.cannot_be_a_base_url {
            if let Some(first) = self.path.first() {
                output.push_str(first);
            }
        } else {
            for segment in &self.path {
                output.push('/');
                output.push_str(segment);
            }
        }

        if let Some(query) = &self.query {
            output.push('?');
            output.push_str(query);
        }
        if !exclude_fragment {
            if let Some(fragment) = &self.fragment {
                output.push('#');
                output.push_str(fragment);
            }
        }
        output
    }

    /// Compute the origin per https://url.spec.whatwg.org/#origin.
    /// `blob:` URLs take the origin of the URL in their path; `file:` and
    /// everything non-special is opaque.
    pub fn origin(&self) -> Origin {
        match self.scheme.as_str() {
            "blob" => {
                let Some(inner) = self.path.first() else {
                    return Origin::Opaque;
                };
                match parser::basic_parse(inner, None, None, None) {
                    Ok(url) => url.origin(),
                    Err(_) => Origin::Opaque,
                }
            }
            "ftp" | "http" | "https" | "ws" | "wss" => Origin::Tuple {
                scheme: self.scheme.clone(),
                host: self.host.clone().unwrap_or(Host::Empty),
                port: self.port,
            },
            _ => Origin::Opaque,
        }
    }

    pub fn default_port(&self) -> Option<u16> {
        default_port(&self.scheme)
    }
}

/// A URL origin: either opaque or a (scheme, host, port) tuple.
/// The domain component of the standard's tuple is always null here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Serializes to the literal "null" and is never equal to a tuple origin
    Opaque,
    Tuple {
        scheme: String,
        host: Host,
        port: Option<u16>,
    },
}

impl Origin {
    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque)
    }

    pub fn serialize(&self) -> String {
        match self {
            Self::Opaque => "null".to_string(),
            Self::Tuple { scheme, host, port } => {
                let mut output = format!("{scheme}://{}", host.serialize());
                if let Some(port) = port {
                    let _ = write!(output, ":{port}");
                }
                output
            }
        }
    }
}

impl core::fmt::Display for Origin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record_with(scheme: &str, host: Option<Host>) -> UrlRecord {
        UrlRecord {
            scheme: scheme.to_string(),
            host,
            ..UrlRecord::default()
        }
    }

    #[test]
    fn test_serialize_basic() {
        let mut url = record_with("https", Some(Host::Domain("example.com".to_string())));
        url.path = vec!["a".to_string(), "b".to_string()];
        url.query = Some("x=1".to_string());
        url.fragment = Some("f".to_string());
        assert_eq!(url.serialize(false), "https://example.com/a/b?x=1#f");
        assert_eq!(url.serialize(true), "https://example.com/a/b?x=1");
    }

    #[test]
    fn test_serialize_credentials_and_port() {
        let mut url = record_with("https", Some(Host::Domain("example.com".to_string())));
        url.username = "u".to_string();
        url.password = "p".to_string();
        url.port = Some(8080);
        url.path = vec![String::new()];
        assert_eq!(url.serialize(false), "https://u:p@example.com:8080/");
    }

    #[test]
    fn test_serialize_null_host_file() {
        let mut url = record_with("file", None);
        url.path = vec!["tmp".to_string()];
        assert_eq!(url.serialize(false), "file:///tmp");
    }

    #[test]
    fn test_serialize_cannot_be_a_base() {
        let mut url = record_with("mailto", None);
        url.cannot_be_a_base_url = true;
        url.path = vec!["a@b".to_string()];
        assert_eq!(url.serialize(false), "mailto:a@b");
    }

    #[test]
    fn test_shorten_path_keeps_file_drive_letter() {
        let mut url = record_with("file", Some(Host::Empty));
        url.path = vec!["C:".to_string()];
        url.shorten_path();
        assert_eq!(url.path, vec!["C:".to_string()]);

        url.path = vec!["C:".to_string(), "dir".to_string()];
        url.shorten_path();
        assert_eq!(url.path, vec!["C:".to_string()]);

        let mut http = record_with("http", Some(Host::Empty));
        http.path = vec!["C:".to_string()];
        http.shorten_path();
        assert!(http.path.is_empty());
    }

    #[test]
    fn test_cannot_have_username_password_port() {
        assert!(record_with("http", None).cannot_have_username_password_port());
        assert!(record_with("http", Some(Host::Empty)).cannot_have_username_password_port());
        assert!(record_with("file", Some(Host::Domain("h".to_string())))
            .cannot_have_username_password_port());
        assert!(!record_with("http", Some(Host::Domain("h".to_string())))
            .cannot_have_username_password_port());
    }

    #[test]
    fn test_origin_tuple_and_opaque() {
        let mut url = record_with("https", Some(Host::Domain("example.org".to_string())));
        url.port = Some(8080);
        assert_eq!(url.origin().serialize(), "https://example.org:8080");

        let file = record_with("file", Some(Host::Empty));
        assert!(file.origin().is_opaque());
        assert_eq!(file.origin().serialize(), "null");

        let data = record_with("data", None);
        assert!(data.origin().is_opaque());
    }

    #[test]
    fn test_origin_blob() {
        let mut url = record_with("blob", None);
        url.cannot_be_a_base_url = true;
        url.path = vec!["https://example.org/x".to_string()];
        assert_eq!(url.origin().serialize(), "https://example.org");

        url.path = vec!["not a url".to_string()];
        assert!(url.origin().is_opaque());
    }
}
