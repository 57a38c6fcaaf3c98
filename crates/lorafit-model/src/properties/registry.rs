//! Property registry, lookup functions, and property set types.
//!
//! This module provides:
//! - [`ALL_PROPERTIES`] - Array of all registered property definitions
//! - Lookup functions for finding properties by name
//! - [`ResolvedProperties`] - A complete set of property values with defaults
//! - [`UnresolvedProperties`] - A partial set of properties from YAML parsing

use super::definitions::*;
use super::types::{Property, PropertyDef};
use super::value::{FromPropertyValue, PropertyValue, ToPropertyValue};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::warn;

// ============================================================================
// All Properties Array (for runtime lookup)
// ============================================================================

/// All registered property definitions (for runtime lookup).
pub const ALL_PROPERTIES: &[&PropertyDef] = &[
    // Radio
    &RADIO_BANDWIDTH_KHZ.def,
    &RADIO_CODING_RATE.def,
    &RADIO_PREAMBLE_LENGTH.def,
    &RADIO_SYNC_WORD.def,
    &RADIO_ANTENNA_GAIN_DBI.def,
    &RADIO_NOISE_FIGURE_DB.def,
    &RADIO_SNR_THRESHOLD_SF7_DB.def,
    &RADIO_SNR_THRESHOLD_SF8_DB.def,
    &RADIO_SNR_THRESHOLD_SF9_DB.def,
    &RADIO_SNR_THRESHOLD_SF10_DB.def,
    &RADIO_SNR_THRESHOLD_SF11_DB.def,
    &RADIO_SNR_THRESHOLD_SF12_DB.def,
    // Attenuation
    &WALL_DRYWALL_DB.def,
    &WALL_BRICK_DB.def,
    &WALL_CONCRETE_DB.def,
    &FLOOR_LOSS_DB.def,
    // Planner
    &PLANNER_SAFETY_MARGIN_DB.def,
    // Fallback
    &FALLBACK_SPREADING_FACTOR.def,
    &FALLBACK_NO_RECEIVERS_SPREADING_FACTOR.def,
];

// ============================================================================
// Lookup Functions
// ============================================================================

/// Check if a property name is registered.
pub fn is_known_property(name: &str) -> bool {
    ALL_PROPERTIES.iter().any(|p| p.matches(name))
}

/// Get a property definition by name.
pub fn get_property_def(name: &str) -> Option<&'static PropertyDef> {
    ALL_PROPERTIES.iter().find(|p| p.matches(name)).copied()
}

/// Get all known namespaces.
pub fn known_namespaces() -> Vec<&'static str> {
    let mut namespaces: Vec<&'static str> = ALL_PROPERTIES
        .iter()
        .filter_map(|p| p.namespace())
        .collect();
    namespaces.sort();
    namespaces.dedup();
    namespaces
}

/// Get all properties in a given namespace.
pub fn properties_by_namespace(namespace: &str) -> impl Iterator<Item = &'static PropertyDef> + '_ {
    ALL_PROPERTIES
        .iter()
        .filter(move |p| p.namespace() == Some(namespace))
        .copied()
}

// ============================================================================
// Property Set Errors
// ============================================================================

/// Errors that can occur when manipulating a property set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertySetError {
    /// Unknown property name.
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Unsupported value type.
    #[error("Unsupported value type for property {0}: {1}")]
    UnsupportedValueType(String, String),

    /// Type mismatch between expected and actual value.
    #[error("Type mismatch for property '{property}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Property name.
        property: String,
        /// Expected type.
        expected: String,
        /// Actual type.
        actual: String,
    },

    /// Integer value outside the property's accepted range.
    #[error("Value {value} out of range for property '{property}': expected {min} to {max}")]
    OutOfRange {
        /// Property name.
        property: String,
        /// Rejected value.
        value: i64,
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
}

// ============================================================================
// Resolved Property Set
// ============================================================================

/// A complete set of property values, starting from built-in defaults.
#[derive(Debug, Clone)]
pub struct ResolvedProperties {
    values: HashMap<&'static PropertyDef, PropertyValue>,
}

impl ResolvedProperties {
    /// Create a new property set with all defaults.
    pub fn new() -> Self {
        let values = ALL_PROPERTIES
            .iter()
            .map(|p| (*p, p.default_value()))
            .collect();

        Self { values }
    }

    /// Set a property value using a static property reference.
    pub fn set<T: ToPropertyValue>(&mut self, prop: &'static Property<T>, value: T) {
        self.values.insert(&prop.def, value.to_property_value());
    }

    /// Get a property value with compile-time type safety.
    ///
    /// Values are type and range checked before they are stored, so a
    /// failed conversion indicates a registry bug; it is reported and the
    /// default is used.
    pub fn get<T: FromPropertyValue + Default>(&self, prop: &Property<T>) -> T {
        let value = self.get_raw(prop);
        T::from_property_value(&value).unwrap_or_else(|| {
            warn!(
                "Property '{}' has unusable value {}; using default",
                prop.def.name, value
            );
            T::from_property_value(&prop.def.default_value()).unwrap_or_default()
        })
    }

    /// Get the raw PropertyValue for a property.
    pub fn get_raw<T>(&self, prop: &Property<T>) -> PropertyValue {
        self.values
            .get(&prop.def)
            .cloned()
            .unwrap_or_else(|| prop.def.default_value())
    }

    /// Apply unresolved properties to this resolved set.
    pub fn apply_unresolved(&mut self, unresolved: &UnresolvedProperties) {
        for (prop, value) in &unresolved.values {
            self.values.insert(*prop, value.clone());
        }
    }
}

impl Default for ResolvedProperties {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Unresolved Property Set
// ============================================================================

/// A set of unresolved (partial) property values parsed from YAML.
///
/// Only explicitly specified properties are present.
#[derive(Debug, Clone, Default)]
pub struct UnresolvedProperties {
    pub(crate) values: HashMap<&'static PropertyDef, PropertyValue>,
}

impl UnresolvedProperties {
    /// Create a new empty unresolved property set.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Number of specified properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was specified.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if a property was specified.
    pub fn contains<T>(&self, prop: &Property<T>) -> bool {
        self.values.contains_key(&prop.def)
    }

    /// Insert a value by property name, checking its type and range.
    pub fn insert_by_name(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertySetError> {
        let prop_def =
            get_property_def(name).ok_or_else(|| PropertySetError::UnknownProperty(name.to_string()))?;

        if !prop_def.value_type.matches(&value) {
            return Err(PropertySetError::TypeMismatch {
                property: prop_def.name.to_string(),
                expected: prop_def.value_type.to_string(),
                actual: describe_value_type(&value),
            });
        }

        if let (Some((min, max)), PropertyValue::Integer(i)) = (prop_def.range, &value) {
            if !(min..=max).contains(i) {
                return Err(PropertySetError::OutOfRange {
                    property: prop_def.name.to_string(),
                    value: *i,
                    min,
                    max,
                });
            }
        }

        self.values.insert(prop_def, value);
        Ok(())
    }
}

/// Describe the type of a PropertyValue for error messages.
fn describe_value_type(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Integer(_) => "integer".to_string(),
        PropertyValue::Float(_) => "float".to_string(),
        PropertyValue::String(_) => "string".to_string(),
        PropertyValue::Bool(_) => "bool".to_string(),
        PropertyValue::Null => "null".to_string(),
    }
}

// ============================================================================
// Custom Deserializer for UnresolvedProperties
// ============================================================================

impl<'de> Deserialize<'de> for UnresolvedProperties {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(UnresolvedPropertiesVisitor)
    }
}

struct UnresolvedPropertiesVisitor;

impl<'de> Visitor<'de> for UnresolvedPropertiesVisitor {
    type Value = UnresolvedProperties;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a map of planner properties")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut result = UnresolvedProperties::new();
        let mut pending: Vec<(String, serde_yaml::Value)> = Vec::new();

        while let Some((key, value)) = map.next_entry::<String, serde_yaml::Value>()? {
            pending.push((key, value));
        }

        for (key, value) in pending {
            process_yaml_property::<M>(&mut result, &key, &value)?;
        }

        Ok(result)
    }
}

/// Process a single YAML property, recursively handling nested maps.
fn process_yaml_property<'de, M: MapAccess<'de>>(
    result: &mut UnresolvedProperties,
    prefix: &str,
    value: &serde_yaml::Value,
) -> Result<(), M::Error> {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                if let serde_yaml::Value::String(key) = k {
                    let full_name = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}/{}", prefix, key)
                    };
                    process_yaml_property::<M>(result, &full_name, v)?;
                }
            }
            Ok(())
        }
        _ => {
            if !is_known_property(prefix) {
                return Err(de::Error::custom(format!(
                    "unknown property: '{}'. Run \"lorafit properties\" for more details",
                    prefix,
                )));
            }

            let prop_value = yaml_value_to_property(value).map_err(|e| {
                de::Error::custom(format!("invalid value for property '{}': {}", prefix, e))
            })?;

            result
                .insert_by_name(prefix, prop_value)
                .map_err(|e| de::Error::custom(e.to_string()))
        }
    }
}

/// Convert a serde_yaml::Value to a PropertyValue.
fn yaml_value_to_property(value: &serde_yaml::Value) -> Result<PropertyValue, PropertySetError> {
    match value {
        serde_yaml::Value::Bool(b) => Ok(PropertyValue::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(PropertyValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(PropertyValue::Float(f))
            } else {
                Err(PropertySetError::UnsupportedValueType(
                    "number".to_string(),
                    format!("{:?}", n),
                ))
            }
        }
        serde_yaml::Value::String(s) => Ok(PropertyValue::String(s.clone())),
        serde_yaml::Value::Null => Ok(PropertyValue::Null),
        serde_yaml::Value::Sequence(_) => Err(PropertySetError::UnsupportedValueType(
            "sequence".to_string(),
            "list value".to_string(),
        )),
        serde_yaml::Value::Mapping(_) => Err(PropertySetError::UnsupportedValueType(
            "mapping".to_string(),
            "nested mapping".to_string(),
        )),
        serde_yaml::Value::Tagged(_) => Err(PropertySetError::UnsupportedValueType(
            "tagged".to_string(),
            "tagged value".to_string(),
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_get_defaults() {
        let props = ResolvedProperties::new();

        let bandwidth: u32 = props.get(&RADIO_BANDWIDTH_KHZ);
        assert_eq!(bandwidth, 125);

        let sync: u8 = props.get(&RADIO_SYNC_WORD);
        assert_eq!(sync, 0x12);

        let concrete: f64 = props.get(&WALL_CONCRETE_DB);
        assert_eq!(concrete, 29.0);

        let fallback: u8 = props.get(&FALLBACK_SPREADING_FACTOR);
        assert_eq!(fallback, 9);
    }

    #[test]
    fn test_typed_set_and_get() {
        let mut props = ResolvedProperties::new();
        props.set(&PLANNER_SAFETY_MARGIN_DB, 8.0);
        assert_eq!(props.get(&PLANNER_SAFETY_MARGIN_DB), 8.0);
    }

    #[test]
    fn test_out_of_range_value_rejected() {
        let mut unresolved = UnresolvedProperties::new();
        let err = unresolved
            .insert_by_name("radio/sync_word", PropertyValue::Integer(4096))
            .unwrap_err();
        assert_eq!(
            err,
            PropertySetError::OutOfRange {
                property: "radio/sync_word".to_string(),
                value: 4096,
                min: 0,
                max: 255,
            }
        );
        assert!(unresolved.is_empty());

        unresolved
            .insert_by_name("radio/sync_word", PropertyValue::Integer(0x34))
            .unwrap();
        let mut props = ResolvedProperties::new();
        props.apply_unresolved(&unresolved);
        assert_eq!(props.get(&RADIO_SYNC_WORD), 0x34);
    }

    #[test]
    fn test_out_of_range_yaml_rejected() {
        for yaml in [
            "radio:\n  bandwidth_khz: -125\n",
            "radio:\n  sync_word: 4096\n",
            "radio:\n  coding_rate: 200\n",
            "radio:\n  coding_rate: 4\n",
            "fallback:\n  spreading_factor: 13\n",
        ] {
            let err = serde_yaml::from_str::<UnresolvedProperties>(yaml).unwrap_err();
            assert!(err.to_string().contains("out of range"), "{}: {}", yaml, err);
        }

        let props: UnresolvedProperties = serde_yaml::from_str("radio:\n  coding_rate: 8\n").unwrap();
        assert!(props.contains(&RADIO_CODING_RATE));
    }

    #[test]
    fn test_property_lookup() {
        assert!(is_known_property("radio/bandwidth_khz"));
        assert!(is_known_property("wall/brick_db"));
        assert!(!is_known_property("radio/frequency_hz"));
        assert_eq!(
            known_namespaces(),
            vec!["fallback", "floor", "planner", "radio", "wall"]
        );
        assert_eq!(properties_by_namespace("wall").count(), 3);
    }

    #[test]
    fn test_unresolved_properties_deserialize() {
        let yaml = r#"
            wall:
                concrete_db: 25
                brick_db: 5.5
            planner:
                safety_margin_db: 8.0
        "#;

        let props: UnresolvedProperties = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(props.len(), 3);
        assert!(props.contains(&WALL_CONCRETE_DB));
        assert!(props.contains(&WALL_BRICK_DB));
        assert!(!props.contains(&WALL_DRYWALL_DB));

        let mut resolved = ResolvedProperties::new();
        resolved.apply_unresolved(&props);
        // Integers are accepted for float properties.
        assert_eq!(resolved.get(&WALL_CONCRETE_DB), 25.0);
        assert_eq!(resolved.get(&WALL_BRICK_DB), 5.5);
        assert_eq!(resolved.get(&PLANNER_SAFETY_MARGIN_DB), 8.0);
    }

    #[test]
    fn test_flat_keys_deserialize() {
        let props: UnresolvedProperties = serde_yaml::from_str("floor/loss_db: 18").unwrap();
        assert!(props.contains(&FLOOR_LOSS_DB));
    }

    #[test]
    fn test_unknown_property_rejected() {
        let err = serde_yaml::from_str::<UnresolvedProperties>("radio:\n  frequency_hz: 1\n")
            .unwrap_err();
        assert!(err.to_string().contains("unknown property: 'radio/frequency_hz'"));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let err = serde_yaml::from_str::<UnresolvedProperties>("radio:\n  bandwidth_khz: 62.5\n")
            .unwrap_err();
        assert!(err.to_string().contains("Type mismatch"));
    }

    #[test]
    fn test_later_apply_wins() {
        let first: UnresolvedProperties =
            serde_yaml::from_str("planner:\n  safety_margin_db: 3.0\n").unwrap();
        let second: UnresolvedProperties =
            serde_yaml::from_str("planner:\n  safety_margin_db: 7.0\n").unwrap();

        let mut resolved = ResolvedProperties::new();
        resolved.apply_unresolved(&first);
        resolved.apply_unresolved(&second);
        assert_eq!(resolved.get(&PLANNER_SAFETY_MARGIN_DB), 7.0);
    }
}
