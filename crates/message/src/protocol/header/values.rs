//! Admission of header values.
//!
//! Header values enter the table either as a single scalar or as an ordered
//! list of scalars. Both shapes are normalized into a non-empty `Vec<String>`
//! by [`filter_values`] before anything is stored, so every value in a
//! [`HeaderTable`](super::HeaderTable) has already passed validation.

use serde_json::Value;

use crate::ensure;
use crate::protocol::MessageError;
use crate::protocol::header::validator;

/// Header values as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValues {
    Single(String),
    Multi(Vec<String>),
}

impl HeaderValues {
    /// Flattens into a list without validating.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            HeaderValues::Single(value) => vec![value],
            HeaderValues::Multi(values) => values,
        }
    }
}

/// Validates and normalizes header values.
///
/// Rejects an empty list and any value that fails
/// [`validate_value`](validator::validate_value).
pub fn filter_values(values: HeaderValues) -> Result<Vec<String>, MessageError> {
    let values = values.into_vec();
    ensure!(!values.is_empty(), MessageError::invalid_header_value("header values can't be an empty list"));

    for value in &values {
        validator::validate_value(value)?;
    }
    Ok(values)
}

/// Coerces a dynamically typed value into [`HeaderValues`].
///
/// Strings and numbers are accepted as-is (numbers in their decimal form), as is
/// an array whose every element is a string or a number. Booleans, null,
/// nested arrays and objects are rejected.
pub fn coerce_admissible(value: &Value) -> Result<HeaderValues, MessageError> {
    match value {
        Value::Array(items) => items.iter().map(coerce_scalar).collect::<Result<Vec<_>, _>>().map(HeaderValues::Multi),
        other => coerce_scalar(other).map(HeaderValues::Single),
    }
}

fn coerce_scalar(value: &Value) -> Result<String, MessageError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Err(MessageError::invalid_header_value("null is not a valid header value")),
        Value::Bool(b) => Err(MessageError::invalid_header_value(format!("boolean {b} is not a valid header value"))),
        Value::Array(_) => Err(MessageError::invalid_header_value("nested lists are not valid header values")),
        Value::Object(_) => Err(MessageError::invalid_header_value("objects are not valid header values")),
    }
}

impl From<&str> for HeaderValues {
    fn from(value: &str) -> Self {
        HeaderValues::Single(value.to_owned())
    }
}

impl From<String> for HeaderValues {
    fn from(value: String) -> Self {
        HeaderValues::Single(value)
    }
}

impl From<&String> for HeaderValues {
    fn from(value: &String) -> Self {
        HeaderValues::Single(value.clone())
    }
}

impl From<Vec<String>> for HeaderValues {
    fn from(values: Vec<String>) -> Self {
        HeaderValues::Multi(values)
    }
}

impl From<Vec<&str>> for HeaderValues {
    fn from(values: Vec<&str>) -> Self {
        HeaderValues::Multi(values.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for HeaderValues {
    fn from(values: &[&str]) -> Self {
        HeaderValues::Multi(values.iter().map(|v| (*v).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for HeaderValues {
    fn from(values: [&str; N]) -> Self {
        HeaderValues::Multi(values.iter().map(|v| (*v).to_owned()).collect())
    }
}

impl<const N: usize> From<[String; N]> for HeaderValues {
    fn from(values: [String; N]) -> Self {
        HeaderValues::Multi(values.into())
    }
}

macro_rules! numeric_header_values {
    ($($t:ty),*) => {
        $(
            impl From<$t> for HeaderValues {
                fn from(value: $t) -> Self {
                    HeaderValues::Single(value.to_string())
                }
            }

            impl From<Vec<$t>> for HeaderValues {
                fn from(values: Vec<$t>) -> Self {
                    HeaderValues::Multi(values.iter().map(ToString::to_string).collect())
                }
            }
        )*
    };
}

numeric_header_values!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);
