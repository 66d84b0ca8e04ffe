//! Record → query values encoding.
//!
//! Mirrors the decoder. Fields are visited in declaration order; skipped
//! fields and `omitempty` fields holding their zero value are left out.
//! Scalars bind a one-element list, sequences bind every element in order,
//! and nested records encode into their own map which is then merged into the
//! parent's. A later field overwrites an earlier one on key collision.
//!
//! A record deriving `Query` with `#[qstring(custom)]` encodes itself
//! entirely through [`MarshalQuery`](crate::MarshalQuery).

use crate::error::{InvalidMarshalError, Result};
use crate::types::{FieldDescriptor, Marshal, QueryField};
use crate::values::QueryValues;

/// Encode the record behind `source` into query values.
///
/// ```
/// use qstring::{marshal, Query};
///
/// #[derive(Query)]
/// pub struct Params {
///     pub page: u32,
///     #[qstring("q,omitempty")]
///     pub search: String,
/// }
///
/// let values = marshal(&Params { page: 3, search: String::new() }).unwrap();
/// assert_eq!(values.get("page"), Some("3"));
/// assert!(!values.contains_key("q"));
/// ```
pub fn marshal<T: EncodeTarget>(source: T) -> Result<QueryValues> {
    let record = source.encode_target()?;
    record.marshal_fields()
}

/// Encode `source` and render it as a percent-encoded query string, keys in
/// ascending order.
pub fn marshal_string<T: EncodeTarget>(source: T) -> Result<String> {
    let values = marshal(source)?;
    Ok(values.encode())
}

/// Something that may be handed to [`marshal`].
pub trait EncodeTarget {
    fn encode_target(&self) -> std::result::Result<&dyn Marshal, InvalidMarshalError>;
}

impl<R: Marshal> EncodeTarget for &R {
    fn encode_target(&self) -> std::result::Result<&dyn Marshal, InvalidMarshalError> {
        Ok(*self)
    }
}

impl<R: Marshal> EncodeTarget for &mut R {
    fn encode_target(&self) -> std::result::Result<&dyn Marshal, InvalidMarshalError> {
        Ok(&**self)
    }
}

impl<R: Marshal> EncodeTarget for Option<&R> {
    fn encode_target(&self) -> std::result::Result<&dyn Marshal, InvalidMarshalError> {
        match self {
            Some(record) => Ok(*record),
            None => Err(InvalidMarshalError::NilPointer(std::any::type_name::<R>())),
        }
    }
}

impl EncodeTarget for () {
    fn encode_target(&self) -> std::result::Result<&dyn Marshal, InvalidMarshalError> {
        Err(InvalidMarshalError::Nil)
    }
}

/// Accumulates one record's fields into a flat output map.
#[derive(Debug, Default)]
pub struct Encoder {
    output: QueryValues,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode one field.
    pub fn field<F: QueryField>(
        &mut self,
        field: &F,
        declaration: &str,
        name: &'static str,
    ) -> Result<()> {
        let descriptor = FieldDescriptor::resolve(declaration, name, F::SHAPE);
        if descriptor.skip || (descriptor.omit_if_empty && field.is_empty_value()) {
            return Ok(());
        }
        log::trace!("qstring: encoding {name} as {:?}", descriptor.key);
        field.encode_values(&descriptor.key, &mut self.output)
    }

    pub fn finish(self) -> QueryValues {
        self.output
    }
}
