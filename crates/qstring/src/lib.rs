//! # qstring
//!
//! Decode query strings into typed structs and encode structs back into query
//! strings.
//!
//! Input and output share one shape, [`QueryValues`]: every key maps to an
//! ordered list of strings, as produced by parsing an HTTP query string.
//! `#[derive(Query)]` generates the per-field traversal for a struct, so no
//! conversion code is written by hand.
//!
//! ## Quick start
//!
//! ```rust
//! use qstring::{marshal_string, unmarshal, Query, QueryValues};
//!
//! #[derive(Query, Default, Debug, PartialEq)]
//! pub struct Paging {
//!     pub page: i32,
//!     pub limit: i32,
//! }
//!
//! #[derive(Query, Default, Debug, PartialEq)]
//! pub struct Params {
//!     pub paging: Paging,
//!     pub name: String,
//!     #[qstring("fields,omitempty")]
//!     pub fields: Vec<String>,
//! }
//!
//! let query = QueryValues::parse("name=x&page=1&limit=50");
//! let mut params = Params::default();
//! unmarshal(&query, &mut params).unwrap();
//! assert_eq!(params.paging, Paging { page: 1, limit: 50 });
//!
//! assert_eq!(marshal_string(&params).unwrap(), "limit=50&name=x&page=1");
//! ```
//!
//! ## Field declarations
//!
//! - no attribute: the key is the lower-cased field name
//! - `#[qstring("key")]`: explicit key
//! - `#[qstring("key,omitempty")]`: encoding drops zero values
//! - `#[qstring("-")]`: ignored entirely
//!
//! Fields that are not `pub` are ignored as well.
//!
//! Nested records are not prefixed: their fields read from and write to the
//! same flat key namespace as the enclosing record.
//!
//! ## Modules
//!
//! - [`decoder`]: query values → record
//! - [`encoder`]: record → query values
//! - [`coerce`]: scalar and sequence conversions
//! - [`tag`]: field declaration parsing
//! - [`types`]: field descriptors and capability traits
//! - [`values`]: the [`QueryValues`] map
//! - [`error`]: error types

pub mod coerce;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod tag;
pub mod types;
pub mod values;

pub use coerce::{Scalar, ScalarValue};
pub use decoder::{unmarshal, DecodeTarget, Decoder};
pub use encoder::{marshal, marshal_string, EncodeTarget, Encoder};
pub use error::{
    BoxError, CoercionError, InvalidMarshalError, InvalidUnmarshalError, QueryError, Result,
};
pub use qstring_derive::Query;
pub use types::{
    FieldDescriptor, Marshal, MarshalQuery, QueryField, ScalarKind, Shape, Unmarshal,
    UnmarshalQuery,
};
pub use values::QueryValues;
