//! Property values and typed conversions.

use serde::{Deserialize, Serialize};

/// A dynamically typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
    /// Boolean value.
    Bool(bool),
    /// Explicit null.
    Null,
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::String(s) => write!(f, "\"{}\"", s),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Null => write!(f, "null"),
        }
    }
}

/// Conversion from a [`PropertyValue`] into a concrete type.
pub trait FromPropertyValue: Sized {
    /// Convert, returning `None` on type or range mismatch.
    fn from_property_value(value: &PropertyValue) -> Option<Self>;
}

/// Conversion from a concrete type into a [`PropertyValue`].
pub trait ToPropertyValue {
    /// Convert into a property value.
    fn to_property_value(&self) -> PropertyValue;
}

macro_rules! integer_property {
    ($($t:ty),*) => {
        $(
            impl FromPropertyValue for $t {
                fn from_property_value(value: &PropertyValue) -> Option<Self> {
                    match value {
                        PropertyValue::Integer(i) => <$t>::try_from(*i).ok(),
                        _ => None,
                    }
                }
            }

            impl ToPropertyValue for $t {
                fn to_property_value(&self) -> PropertyValue {
                    PropertyValue::Integer(i64::from(*self))
                }
            }
        )*
    };
}

integer_property!(u8, u16, u32);

impl FromPropertyValue for f64 {
    fn from_property_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl ToPropertyValue for f64 {
    fn to_property_value(&self) -> PropertyValue {
        PropertyValue::Float(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_range_checked() {
        assert_eq!(u8::from_property_value(&PropertyValue::Integer(12)), Some(12));
        assert_eq!(u8::from_property_value(&PropertyValue::Integer(300)), None);
        assert_eq!(u8::from_property_value(&PropertyValue::Integer(-1)), None);
        assert_eq!(u16::from_property_value(&PropertyValue::Float(8.0)), None);
    }

    #[test]
    fn test_float_accepts_integer() {
        assert_eq!(f64::from_property_value(&PropertyValue::Integer(29)), Some(29.0));
        assert_eq!(f64::from_property_value(&PropertyValue::Float(2.15)), Some(2.15));
        assert_eq!(f64::from_property_value(&PropertyValue::Bool(true)), None);
    }
}
