/// States of the basic URL parser
/// (https://url.spec.whatwg.org/#scheme-start-state and friends).
///
/// Setters re-enter the parser at a specific state via the state-override
/// parameter; see the accessor object for which setter uses which state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Scheme start state
    SchemeStart,
    /// Scheme state
    Scheme,
    /// No scheme state
    NoScheme,
    /// Special relative or authority state
    SpecialRelativeOrAuthority,
    /// Path or authority state
    PathOrAuthority,
    /// Relative state
    Relative,
    /// Relative slash state
    RelativeSlash,
    /// Special authority slashes state
    SpecialAuthoritySlashes,
    /// Special authority ignore slashes state
    SpecialAuthorityIgnoreSlashes,
    /// Authority state
    Authority,
    /// Host state
    Host,
    /// Hostname state (identical to Host apart from override early exits)
    Hostname,
    /// Port state
    Port,
    /// File state
    File,
    /// File slash state
    FileSlash,
    /// File host state
    FileHost,
    /// Path start state
    PathStart,
    /// Path state
    Path,
    /// Cannot-be-a-base-URL path state (opaque single-segment paths)
    CannotBeABaseUrlPath,
    /// Query state
    Query,
    /// Fragment state
    Fragment,
}
