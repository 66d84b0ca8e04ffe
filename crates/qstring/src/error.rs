//! Error types for query string decoding and encoding.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::types::ScalarKind;

/// Boxed error returned by custom codecs and passed through untouched.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during query string decoding or encoding.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The decode target was not a non-nil record reference.
    #[error(transparent)]
    InvalidUnmarshal(#[from] InvalidUnmarshalError),

    /// The encode source was not a non-nil record reference.
    #[error(transparent)]
    InvalidMarshal(#[from] InvalidMarshalError),

    /// A raw value could not be converted into the field's declared type.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// Error returned by a type's own `UnmarshalQuery`/`MarshalQuery` impl.
    #[error(transparent)]
    Custom(BoxError),
}

impl QueryError {
    /// The custom codec error, if this is one. Downcast it to recover the
    /// concrete type the codec returned.
    pub fn as_custom(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            QueryError::Custom(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Invalid argument passed to [`unmarshal`](crate::unmarshal).
///
/// The three variants render distinct messages; callers match on the text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidUnmarshalError {
    #[error("qstring: Unmarshal(nil)")]
    Nil,
    #[error("qstring: Unmarshal(non-pointer {0})")]
    NonPointer(&'static str),
    #[error("qstring: Unmarshal(nil *{0})")]
    NilPointer(&'static str),
}

/// Invalid argument passed to [`marshal`](crate::marshal) or
/// [`marshal_string`](crate::marshal_string).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMarshalError {
    #[error("qstring: MarshalString(nil)")]
    Nil,
    #[error("qstring: MarshalString(non-pointer {0})")]
    NonPointer(&'static str),
    #[error("qstring: MarshalString(nil *{0})")]
    NilPointer(&'static str),
}

/// A raw query value that could not be coerced into its target type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("qstring: invalid boolean {raw:?}")]
    InvalidBoolean { raw: String },

    #[error("qstring: invalid {kind} {raw:?}: {source}")]
    InvalidInteger {
        raw: String,
        kind: ScalarKind,
        #[source]
        source: ParseIntError,
    },

    #[error("qstring: invalid float {raw:?}: {source}")]
    InvalidFloat {
        raw: String,
        #[source]
        source: ParseFloatError,
    },

    /// An unsigned field was given an explicit `+` sign.
    #[error("qstring: invalid unsigned integer {raw:?}: unexpected sign")]
    UnexpectedSign { raw: String },

    /// Parsed at 64 bits but does not fit the field's declared width.
    #[error("qstring: {raw:?} out of range for {target}")]
    OutOfRange { raw: String, target: &'static str },
}

impl CoercionError {
    /// The raw string that failed to coerce.
    pub fn raw(&self) -> &str {
        match self {
            CoercionError::InvalidBoolean { raw }
            | CoercionError::InvalidInteger { raw, .. }
            | CoercionError::InvalidFloat { raw, .. }
            | CoercionError::UnexpectedSign { raw }
            | CoercionError::OutOfRange { raw, .. } => raw,
        }
    }
}

/// Convenience alias used throughout qstring.
pub type Result<T> = std::result::Result<T, QueryError>;
