//! Interop with `serde_json::Value`, the host-native tree representation.
//!
//! This is the bridge the `OutputMode::Native` path renders through, and the
//! easiest way to feed existing JSON-shaped data into `dumps`. The mapping is
//! tag-transparent: `Known` and `UnknownTagged` contribute only their
//! payloads, since JSON has nowhere to put a tag. Duplicate map keys collapse
//! to last-seen-wins on the JSON side (a `serde_json::Map` cannot hold them);
//! the Duper side never collapses.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number, Value};

use crate::binder::BoundValue;
use crate::types::DuperValue;

/// Convert a bound value into a `serde_json::Value`, dropping tags.
///
/// Non-finite floats become `null` (JSON has no literal for them); integers
/// stay integers. Field order is preserved via `serde_json`'s
/// `preserve_order` feature.
pub fn to_json(value: &BoundValue) -> Value {
    match value {
        BoundValue::Null => Value::Null,
        BoundValue::Bool(b) => Value::Bool(*b),
        BoundValue::Integer(i) => Value::Number(Number::from(*i)),
        BoundValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        BoundValue::String(s) => Value::String(s.clone()),
        BoundValue::List(items) => Value::Array(items.iter().map(to_json).collect()),
        BoundValue::Known { payload, .. } | BoundValue::UnknownTagged { payload, .. } => {
            to_json(payload)
        }
        BoundValue::UntaggedMap(fields) => {
            let mut map = Map::with_capacity(fields.len());
            for (key, item) in fields {
                map.insert(key.clone(), to_json(item));
            }
            Value::Object(map)
        }
    }
}

/// Convert a `serde_json::Value` into a bound value. Objects become
/// [`BoundValue::UntaggedMap`]; there are no tags to recover. Numbers beyond
/// `i64` range (large `u64`s) degrade to floats, matching what the format's
/// integer policy can carry.
pub fn from_json(value: &Value) -> BoundValue {
    match value {
        Value::Null => BoundValue::Null,
        Value::Bool(b) => BoundValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                BoundValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                BoundValue::Float(f)
            } else {
                BoundValue::Null
            }
        }
        Value::String(s) => BoundValue::String(s.clone()),
        Value::Array(items) => BoundValue::List(items.iter().map(from_json).collect()),
        Value::Object(map) => BoundValue::UntaggedMap(
            map.iter()
                .map(|(key, item)| (key.clone(), from_json(item)))
                .collect(),
        ),
    }
}

/// Tag-transparent `Serialize`: a `DuperValue` serializes as the plain data
/// it carries, so it can be handed to any serde backend.
impl Serialize for DuperValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DuperValue::Null => serializer.serialize_none(),
            DuperValue::Bool(b) => serializer.serialize_bool(*b),
            DuperValue::Integer(i) => serializer.serialize_i64(*i),
            DuperValue::Float(f) => serializer.serialize_f64(*f),
            DuperValue::String(s) => serializer.serialize_str(s),
            DuperValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DuperValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
            DuperValue::Tagged { value, .. } => value.serialize(serializer),
        }
    }
}
