//! Query values → record decoding.
//!
//! Fields are visited in declaration order. For each one the declaration is
//! resolved to an external key and then:
//!
//! 1. a custom codec whose key is present decodes itself from the key's
//!    values, and decoding of the **whole enclosing record stops** there
//! 2. a sequence whose key is present coerces every value, all or nothing
//! 3. a scalar whose key is present coerces the first value
//! 4. a nested record recurses with the same, unmodified input, so its
//!    fields resolve against the flat top-level namespace
//! 5. anything else keeps its current value
//!
//! The first error aborts decoding. Fields set before the failing one keep
//! their new values.

use std::ops::ControlFlow;

use crate::error::{InvalidUnmarshalError, Result};
use crate::types::{FieldDescriptor, QueryField, Shape, Unmarshal};
use crate::values::QueryValues;

/// Decode `data` into the record behind `target`.
///
/// `target` must be a live mutable reference to a record. The unit value, a
/// `None` reference, and a record passed by value are rejected with the
/// matching [`InvalidUnmarshalError`].
///
/// ```
/// use qstring::{unmarshal, Query, QueryValues};
///
/// #[derive(Query, Default)]
/// pub struct Params {
///     #[qstring("page")]
///     pub page: i32,
///     pub fields: Vec<String>,
/// }
///
/// let mut params = Params::default();
/// unmarshal(&QueryValues::parse("page=2&fields=a&fields=b"), &mut params).unwrap();
/// assert_eq!(params.page, 2);
/// assert_eq!(params.fields, ["a", "b"]);
/// ```
pub fn unmarshal<T: DecodeTarget>(data: &QueryValues, mut target: T) -> Result<()> {
    let record = target.decode_target()?;
    record.unmarshal_fields(data)
}

/// Something that may be handed to [`unmarshal`].
pub trait DecodeTarget {
    fn decode_target(&mut self) -> std::result::Result<&mut dyn Unmarshal, InvalidUnmarshalError>;
}

impl<R: Unmarshal> DecodeTarget for &mut R {
    fn decode_target(&mut self) -> std::result::Result<&mut dyn Unmarshal, InvalidUnmarshalError> {
        Ok(&mut **self)
    }
}

impl<R: Unmarshal> DecodeTarget for Option<&mut R> {
    fn decode_target(&mut self) -> std::result::Result<&mut dyn Unmarshal, InvalidUnmarshalError> {
        match self {
            Some(record) => Ok(&mut **record),
            None => Err(InvalidUnmarshalError::NilPointer(std::any::type_name::<R>())),
        }
    }
}

/// The unit value stands for "no value at all".
impl DecodeTarget for () {
    fn decode_target(&mut self) -> std::result::Result<&mut dyn Unmarshal, InvalidUnmarshalError> {
        Err(InvalidUnmarshalError::Nil)
    }
}

/// Drives field-by-field decoding of one record against a flat input.
///
/// Generated [`Unmarshal`] impls call [`Decoder::field`] once per field and
/// return as soon as it breaks.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    data: &'a QueryValues,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a QueryValues) -> Self {
        Self { data }
    }

    /// Decode one field.
    ///
    /// Breaks when a custom codec consumed its key; the caller must then
    /// leave the rest of the record alone.
    pub fn field<F: QueryField>(
        &self,
        field: &mut F,
        declaration: &str,
        name: &'static str,
    ) -> Result<ControlFlow<()>> {
        let descriptor = FieldDescriptor::resolve(declaration, name, F::SHAPE);
        if descriptor.skip {
            return Ok(ControlFlow::Continue(()));
        }

        match (descriptor.shape, self.data.get_all(&descriptor.key)) {
            (Shape::CustomCodec, Some(values)) => {
                log::trace!("qstring: custom decode of {name} from {:?}", descriptor.key);
                field.decode_values(values)?;
                log::debug!("qstring: custom codec field {name} ends decoding of its record");
                return Ok(ControlFlow::Break(()));
            }
            (Shape::NestedRecord, _) | (Shape::CustomCodec, None) => {
                log::trace!("qstring: descending into {name}");
                field.decode_nested(self.data)?;
            }
            (Shape::Scalar(_) | Shape::Sequence(_), Some(values)) => {
                log::trace!("qstring: decoding {name} from {:?}", descriptor.key);
                field.decode_values(values)?;
            }
            (Shape::Scalar(_) | Shape::Sequence(_), None) => {}
        }
        Ok(ControlFlow::Continue(()))
    }
}

