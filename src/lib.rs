//! Implementation of the WHATWG URL Standard: the basic URL parser state
//! machine over URL records, host parsing (IPv4/IPv6/IDNA/opaque),
//! percent-encoding, `application/x-www-form-urlencoded`, and the `URL` /
//! `URLSearchParams` accessor surface.

// Internal modules (not public API)
mod character_sets;
mod error;
mod form_urlencoded;
mod helpers;
mod host;
mod ipv4;
mod ipv6;
mod record;
mod scheme;
mod url;
mod url_search_params;
mod validation;

// The parser-level API (records, states, basic_parse) and the encoding
// primitives are public for embedders that want more than the accessor
// object.
pub mod parser;
pub mod unicode;

// Public API
pub use error::ParseError;
pub use host::Host;
pub use record::{BlobUrlEntry, Origin, UrlRecord};
pub use unicode::idna::{domain_to_ascii, domain_to_unicode};
pub use url::Url;
pub use url_search_params::UrlSearchParams;
pub use validation::{set_validation_error_handler, ValidationErrorHandler};

pub type Result<T> = core::result::Result<T, ParseError>;
