//! Field declaration parsing.
//!
//! A declaration is the string given in `#[qstring("...")]`:
//!
//! - `""` (no declaration): the key is the lower-cased field name
//! - `"name"`: the key is `name`
//! - `"name,omitempty"`: the key is `name`, and encoding omits the field when
//!   it holds its zero value
//! - `"-"`: the field is ignored by both decoding and encoding
//!
//! Option tokens other than `omitempty` are ignored.

/// Declaration that excludes a field entirely.
pub const SKIP: &str = "-";

/// Option token that omits zero values when encoding.
pub const OMIT_EMPTY: &str = "omitempty";

/// A declaration resolved against its field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// External key the field reads from and writes to.
    pub key: String,
    /// The field takes no part in decoding or encoding.
    pub skip: bool,
    /// Encoding drops the field when it holds its zero value.
    pub omit_if_empty: bool,
}

/// Split a declaration into its name and whether `omitempty` was given.
///
/// ```
/// use qstring::tag::parse_tag;
///
/// assert_eq!(parse_tag("page,omitempty"), ("page", true));
/// assert_eq!(parse_tag("page,bogus"), ("page", false));
/// assert_eq!(parse_tag(""), ("", false));
/// ```
pub fn parse_tag(declaration: &str) -> (&str, bool) {
    let mut tokens = declaration.split(',');
    let name = tokens.next().unwrap_or_default();
    let omit = tokens.any(|opt| opt == OMIT_EMPTY);
    (name, omit)
}

/// Resolve a field's declaration into its external key and flags.
///
/// Pure function of its inputs; callers recompute it on every traversal.
///
/// ```
/// use qstring::tag::resolve;
///
/// let tag = resolve("", "Limit");
/// assert_eq!(tag.key, "limit");
/// assert!(!tag.skip);
///
/// assert!(resolve("-", "Hidden").skip);
/// ```
pub fn resolve(declaration: &str, fallback_name: &str) -> Tag {
    let (name, omit_if_empty) = parse_tag(declaration);
    let key = if name.is_empty() {
        fallback_name.to_lowercase()
    } else {
        name.to_string()
    };
    Tag {
        skip: key == SKIP,
        key,
        omit_if_empty,
    }
}
