//! Scalar and sequence coercion between query strings and typed values.
//!
//! Decoding parses every integer at 64-bit width and every float as `f64`,
//! then narrows into the field's declared type. Integers that do not fit fail
//! with [`CoercionError::OutOfRange`]; floats narrow to `f32` silently.
//!
//! Encoding is total:
//!
//! - booleans render as `true` / `false`
//! - integers render in base 10
//! - floats render in the shortest form that parses back to the same value,
//!   switching to exponent notation (`1E+06`, `1E-05`) when the decimal
//!   exponent is below -4 or at least 6

use crate::error::{CoercionError, QueryError, Result};
use crate::types::{QueryField, ScalarKind, Shape};
use crate::values::QueryValues;

/// A single coerced query value, before narrowing into a field type.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Boolean(bool),
    SignedInt(i64),
    UnsignedInt(u64),
    Float(f64),
}

impl ScalarValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::Text(_) => ScalarKind::Text,
            ScalarValue::Boolean(_) => ScalarKind::Boolean,
            ScalarValue::SignedInt(_) => ScalarKind::SignedInt,
            ScalarValue::UnsignedInt(_) => ScalarKind::UnsignedInt,
            ScalarValue::Float(_) => ScalarKind::Float,
        }
    }

    /// Zero value of the kind: empty text, `false`, or numeric zero.
    pub fn is_zero(&self) -> bool {
        match self {
            ScalarValue::Text(s) => s.is_empty(),
            ScalarValue::Boolean(b) => !b,
            ScalarValue::SignedInt(n) => *n == 0,
            ScalarValue::UnsignedInt(n) => *n == 0,
            ScalarValue::Float(f) => *f == 0.0,
        }
    }
}

/// Coerce one raw string into a value of the given kind.
pub fn to_value(raw: &str, kind: ScalarKind) -> std::result::Result<ScalarValue, CoercionError> {
    Ok(match kind {
        ScalarKind::Text => ScalarValue::Text(raw.to_string()),
        ScalarKind::Boolean => ScalarValue::Boolean(parse_bool(raw)?),
        ScalarKind::SignedInt => ScalarValue::SignedInt(parse_int(raw)?),
        ScalarKind::UnsignedInt => ScalarValue::UnsignedInt(parse_uint(raw)?),
        ScalarKind::Float => ScalarValue::Float(parse_float(raw)?),
    })
}

/// Render a value back into its query string form.
pub fn to_string(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Text(s) => s.clone(),
        ScalarValue::Boolean(b) => b.to_string(),
        ScalarValue::SignedInt(n) => n.to_string(),
        ScalarValue::UnsignedInt(n) => n.to_string(),
        ScalarValue::Float(f) => format_float(*f),
    }
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> std::result::Result<bool, CoercionError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CoercionError::InvalidBoolean {
            raw: raw.to_string(),
        }),
    }
}

pub fn parse_int(raw: &str) -> std::result::Result<i64, CoercionError> {
    raw.parse::<i64>()
        .map_err(|source| CoercionError::InvalidInteger {
            raw: raw.to_string(),
            kind: ScalarKind::SignedInt,
            source,
        })
}

/// Unsigned values take no sign at all, `+` included.
pub fn parse_uint(raw: &str) -> std::result::Result<u64, CoercionError> {
    if raw.starts_with('+') {
        return Err(CoercionError::UnexpectedSign {
            raw: raw.to_string(),
        });
    }
    raw.parse::<u64>()
        .map_err(|source| CoercionError::InvalidInteger {
            raw: raw.to_string(),
            kind: ScalarKind::UnsignedInt,
            source,
        })
}

pub fn parse_float(raw: &str) -> std::result::Result<f64, CoercionError> {
    raw.parse::<f64>().map_err(|source| CoercionError::InvalidFloat {
        raw: raw.to_string(),
        source,
    })
}

/// Format a float in its shortest round-trippable form.
///
/// ```
/// use qstring::coerce::format_float;
///
/// assert_eq!(format_float(7000.0), "7000");
/// assert_eq!(format_float(0.25), "0.25");
/// assert_eq!(format_float(1e6), "1E+06");
/// assert_eq!(format_float(0.00001), "1E-05");
/// assert_eq!(format_float(f64::NEG_INFINITY), "-Inf");
/// ```
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // `{:e}` yields the shortest digits, e.g. "-1.2345e-7".
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if !(-4..6).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}E{sign}{:02}", exponent.unsigned_abs())
    } else {
        // Display never uses exponent notation and keeps the shortest digits.
        value.to_string()
    }
}

/// A type that a single query value coerces into.
pub trait Scalar: Sized {
    const KIND: ScalarKind;

    fn from_query(raw: &str) -> std::result::Result<Self, CoercionError>;

    fn to_scalar_value(&self) -> ScalarValue;

    /// Zero value check used by `omitempty`.
    fn is_zero(&self) -> bool {
        self.to_scalar_value().is_zero()
    }

    fn to_query(&self) -> String {
        to_string(&self.to_scalar_value())
    }
}

/// Coerce every raw value, or none: the first failure discards the sequence.
pub fn coerce_sequence<T: Scalar>(raw: &[String]) -> std::result::Result<Vec<T>, CoercionError> {
    raw.iter().map(|value| T::from_query(value)).collect()
}

/// Render every element in source order.
pub fn flatten_sequence<T: Scalar>(values: &[T]) -> Vec<String> {
    values.iter().map(Scalar::to_query).collect()
}

/// First value bound to a key, or the empty string if the list is empty.
fn first(values: &[String]) -> &str {
    values.first().map(String::as_str).unwrap_or_default()
}

macro_rules! impl_query_field_for_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl QueryField for $ty {
            const SHAPE: Shape = Shape::Scalar(<$ty as Scalar>::KIND);

            fn decode_values(&mut self, values: &[String]) -> Result<()> {
                *self = <$ty as Scalar>::from_query(first(values))?;
                Ok(())
            }

            fn encode_values(&self, key: &str, output: &mut QueryValues) -> Result<()> {
                output.set(key, self.to_query());
                Ok(())
            }

            fn is_empty_value(&self) -> bool {
                <$ty as Scalar>::is_zero(self)
            }
        }
    )*};
}

macro_rules! impl_signed {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::SignedInt;

            fn from_query(raw: &str) -> std::result::Result<Self, CoercionError> {
                let wide = parse_int(raw)?;
                <$ty>::try_from(wide).map_err(|_| CoercionError::OutOfRange {
                    raw: raw.to_string(),
                    target: stringify!($ty),
                })
            }

            fn to_scalar_value(&self) -> ScalarValue {
                ScalarValue::SignedInt(*self as i64)
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::UnsignedInt;

            fn from_query(raw: &str) -> std::result::Result<Self, CoercionError> {
                let wide = parse_uint(raw)?;
                <$ty>::try_from(wide).map_err(|_| CoercionError::OutOfRange {
                    raw: raw.to_string(),
                    target: stringify!($ty),
                })
            }

            fn to_scalar_value(&self) -> ScalarValue {
                ScalarValue::UnsignedInt(*self as u64)
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn from_query(raw: &str) -> std::result::Result<Self, CoercionError> {
        Ok(raw.to_string())
    }

    fn to_scalar_value(&self) -> ScalarValue {
        ScalarValue::Text(self.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_query(&self) -> String {
        self.clone()
    }
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Boolean;

    fn from_query(raw: &str) -> std::result::Result<Self, CoercionError> {
        parse_bool(raw)
    }

    fn to_scalar_value(&self) -> ScalarValue {
        ScalarValue::Boolean(*self)
    }
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::Float;

    fn from_query(raw: &str) -> std::result::Result<Self, CoercionError> {
        parse_float(raw)
    }

    fn to_scalar_value(&self) -> ScalarValue {
        ScalarValue::Float(*self)
    }
}

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::Float;

    fn from_query(raw: &str) -> std::result::Result<Self, CoercionError> {
        Ok(parse_float(raw)? as f32)
    }

    fn to_scalar_value(&self) -> ScalarValue {
        ScalarValue::Float(f64::from(*self))
    }
}

impl_query_field_for_scalar!(
    String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);

impl<T: Scalar> QueryField for Vec<T> {
    const SHAPE: Shape = Shape::Sequence(T::KIND);

    fn decode_values(&mut self, values: &[String]) -> Result<()> {
        *self = coerce_sequence(values).map_err(QueryError::from)?;
        Ok(())
    }

    fn encode_values(&self, key: &str, output: &mut QueryValues) -> Result<()> {
        output.insert(key, flatten_sequence(self));
        Ok(())
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}
