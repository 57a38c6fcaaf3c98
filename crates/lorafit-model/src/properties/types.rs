//! Property type definitions and metadata.

use super::value::PropertyValue;
use std::fmt;
use std::marker::PhantomData;

/// Base type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyBaseType {
    /// Integer.
    Integer,
    /// Floating point; integers are accepted.
    Float,
}

impl PropertyBaseType {
    /// Whether a value is acceptable for this type.
    pub fn matches(&self, value: &PropertyValue) -> bool {
        matches!(
            (self, value),
            (PropertyBaseType::Integer, PropertyValue::Integer(_))
                | (PropertyBaseType::Float, PropertyValue::Float(_))
                | (PropertyBaseType::Float, PropertyValue::Integer(_))
        )
    }
}

impl fmt::Display for PropertyBaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyBaseType::Integer => "integer",
            PropertyBaseType::Float => "float",
        };
        f.write_str(name)
    }
}

/// Compile-time default for a property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyDefault {
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
}

impl PropertyDefault {
    const fn base_type(&self) -> PropertyBaseType {
        match self {
            PropertyDefault::Integer(_) => PropertyBaseType::Integer,
            PropertyDefault::Float(_) => PropertyBaseType::Float,
        }
    }

    fn to_value(self) -> PropertyValue {
        match self {
            PropertyDefault::Integer(i) => PropertyValue::Integer(i),
            PropertyDefault::Float(f) => PropertyValue::Float(f),
        }
    }
}

impl fmt::Display for PropertyDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyDefault::Integer(i) => write!(f, "{}", i),
            PropertyDefault::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Type-erased property metadata.
///
/// Identity (equality and hashing) is by name.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDef {
    /// Full name, e.g. `radio/bandwidth_khz`.
    pub name: &'static str,
    /// User-facing description.
    pub description: &'static str,
    /// Built-in default.
    pub default: PropertyDefault,
    /// Accepted value type.
    pub value_type: PropertyBaseType,
    /// Unit label, if any.
    pub unit: Option<&'static str>,
    /// Inclusive bounds for integer values.
    pub range: Option<(i64, i64)>,
}

impl PropertyDef {
    /// The default as a [`PropertyValue`].
    pub fn default_value(&self) -> PropertyValue {
        self.default.to_value()
    }

    /// Namespace part of the name (before the first `/`).
    pub fn namespace(&self) -> Option<&'static str> {
        self.name.split_once('/').map(|(ns, _)| ns)
    }

    /// Whether `name` refers to this property.
    pub fn matches(&self, name: &str) -> bool {
        self.name == name
    }
}

impl PartialEq for PropertyDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PropertyDef {}

impl std::hash::Hash for PropertyDef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A property with a compile-time value type.
#[derive(Debug, Clone, Copy)]
pub struct Property<T> {
    /// Type-erased metadata.
    pub def: PropertyDef,
    _type: PhantomData<fn() -> T>,
}

impl<T> Property<T> {
    /// Define a new property.
    pub const fn new(name: &'static str, description: &'static str, default: PropertyDefault) -> Self {
        Self {
            def: PropertyDef {
                name,
                description,
                default,
                value_type: default.base_type(),
                unit: None,
                range: None,
            },
            _type: PhantomData,
        }
    }

    /// Attach a unit label.
    pub const fn with_unit(mut self, unit: &'static str) -> Self {
        self.def.unit = Some(unit);
        self
    }

    /// Restrict integer values to `min..=max`.
    pub const fn with_range(mut self, min: i64, max: i64) -> Self {
        self.def.range = Some((min, max));
        self
    }

    /// Full property name.
    pub fn name(&self) -> &'static str {
        self.def.name
    }
}
