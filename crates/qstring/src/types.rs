//! Field descriptors and the capability traits the codec dispatches on.
//!
//! `#[derive(Query)]` implements [`Unmarshal`], [`Marshal`] and [`QueryField`]
//! for a record, so that each of its fields can be driven through
//! [`Decoder::field`](crate::Decoder::field) and
//! [`Encoder::field`](crate::Encoder::field). Scalar and sequence field types
//! get their [`QueryField`] impls from [`coerce`](crate::coerce).

use std::fmt;

use crate::error::{BoxError, Result};
use crate::tag;
use crate::values::QueryValues;

/// The scalar types a single query value can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Text,
    Boolean,
    SignedInt,
    UnsignedInt,
    Float,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::Text => "text",
            ScalarKind::Boolean => "boolean",
            ScalarKind::SignedInt => "signed integer",
            ScalarKind::UnsignedInt => "unsigned integer",
            ScalarKind::Float => "float",
        })
    }
}

/// How a field is decoded and encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// One value, taken from the first entry bound to the key.
    Scalar(ScalarKind),
    /// Every value bound to the key, coerced element-wise.
    Sequence(ScalarKind),
    /// A record whose fields share the parent's flat key namespace.
    NestedRecord,
    /// A type that decodes and encodes itself.
    CustomCodec,
}

/// Per-field metadata derived at traversal time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared in the record.
    pub name: &'static str,
    pub key: String,
    pub skip: bool,
    pub omit_if_empty: bool,
    pub shape: Shape,
}

impl FieldDescriptor {
    /// Resolve a field's declaration into a descriptor.
    pub fn resolve(declaration: &str, name: &'static str, shape: Shape) -> Self {
        let tag::Tag {
            key,
            skip,
            omit_if_empty,
        } = tag::resolve(declaration, name);
        Self {
            name,
            key,
            skip,
            omit_if_empty,
            shape,
        }
    }
}

/// A type that can sit in a record field.
pub trait QueryField {
    const SHAPE: Shape;

    /// Decode from the values bound to the field's key. Only called when the
    /// key is present in the input.
    fn decode_values(&mut self, values: &[String]) -> Result<()>;

    /// Decode against the whole flat input. Records recurse here; called for
    /// [`Shape::NestedRecord`] fields, and for [`Shape::CustomCodec`] fields
    /// whose key is absent.
    fn decode_nested(&mut self, _data: &QueryValues) -> Result<()> {
        Ok(())
    }

    /// Write the field into `output` under `key`, or merge a record's own
    /// output into it.
    fn encode_values(&self, key: &str, output: &mut QueryValues) -> Result<()>;

    /// Whether the value is its type's zero value, for `omitempty`.
    fn is_empty_value(&self) -> bool;
}

/// A record whose fields can be populated from query values.
pub trait Unmarshal {
    fn unmarshal_fields(&mut self, data: &QueryValues) -> Result<()>;
}

/// A record that can be flattened into query values.
pub trait Marshal {
    fn marshal_fields(&self) -> Result<QueryValues>;
}

/// Custom decoding from the ordered values bound to a field's key.
///
/// When a field of this type finds its key in the input, decoding of the
/// enclosing record stops after this method returns: fields declared after it
/// are left untouched.
pub trait UnmarshalQuery {
    fn unmarshal_query(&mut self, values: &[String]) -> std::result::Result<(), BoxError>;
}

/// Custom encoding into query values, merged into the enclosing output.
pub trait MarshalQuery {
    fn marshal_query(&self) -> std::result::Result<QueryValues, BoxError>;

    /// Whether `omitempty` should drop this value.
    fn is_empty_query(&self) -> bool {
        false
    }
}

/// An optional field. A present key decodes into `Some`; a `None` record is
/// a reference that cannot be addressed, so nested decoding skips it.
impl<T> QueryField for Option<T>
where
    T: QueryField + Default,
{
    const SHAPE: Shape = T::SHAPE;

    fn decode_values(&mut self, values: &[String]) -> Result<()> {
        match self {
            Some(inner) => inner.decode_values(values),
            None => {
                let mut inner = T::default();
                inner.decode_values(values)?;
                *self = Some(inner);
                Ok(())
            }
        }
    }

    fn decode_nested(&mut self, data: &QueryValues) -> Result<()> {
        match self {
            Some(inner) => inner.decode_nested(data),
            None => Ok(()),
        }
    }

    fn encode_values(&self, key: &str, output: &mut QueryValues) -> Result<()> {
        match self {
            Some(inner) => inner.encode_values(key, output),
            None => Ok(()),
        }
    }

    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}
