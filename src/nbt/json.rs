//! JSON bridge for NBT tag trees
//!
//! The CLI accepts and emits JSON; conversion payloads are NBT. The mapping
//! is intentionally lossy on numeric width (JSON has one number kind) —
//! resolvers normalize the field types they care about themselves.
//!
//! Inference on the way in: bool becomes Byte, integers become Int (Long when
//! outside the i32 range), floats become Double, objects become Compound and
//! arrays become List.

use serde_json::{Map, Number, Value};

use super::{Compound, Tag};

/// Convert a tag tree to a JSON value.
pub fn to_json(tag: &Tag) -> Value {
    match tag {
        Tag::Byte(v) => Value::Number((*v).into()),
        Tag::Short(v) => Value::Number((*v).into()),
        Tag::Int(v) => Value::Number((*v).into()),
        Tag::Long(v) => Value::Number((*v).into()),
        Tag::Float(v) => Number::from_f64(*v as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Tag::Double(v) => Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null),
        Tag::ByteArray(bytes) => Value::Array(bytes.iter().map(|b| (*b).into()).collect()),
        Tag::String(s) => Value::String(s.clone()),
        Tag::List(items) => Value::Array(items.iter().map(to_json).collect()),
        Tag::Compound(compound) => compound_to_json(compound),
        Tag::IntArray(values) => Value::Array(values.iter().map(|v| (*v).into()).collect()),
        Tag::LongArray(values) => Value::Array(values.iter().map(|v| (*v).into()).collect()),
    }
}

/// Convert a compound to a JSON object, preserving key order.
pub fn compound_to_json(compound: &Compound) -> Value {
    let mut map = Map::new();
    for (key, value) in compound.iter() {
        map.insert(key.to_string(), to_json(value));
    }
    Value::Object(map)
}

/// Convert a JSON value to a tag using the documented inference rules.
pub fn from_json(value: &Value) -> Tag {
    match value {
        Value::Null => Tag::Byte(0),
        Value::Bool(b) => Tag::Byte(*b as i8),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                    Tag::Int(i as i32)
                } else {
                    Tag::Long(i)
                }
            } else {
                Tag::Double(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => Tag::String(s.clone()),
        Value::Array(items) => Tag::List(items.iter().map(from_json).collect()),
        Value::Object(_) => Tag::Compound(compound_from_json(value)),
    }
}

/// Convert a JSON object to a compound. Non-object values yield an empty
/// compound.
pub fn compound_from_json(value: &Value) -> Compound {
    let mut compound = Compound::new();
    if let Value::Object(map) = value {
        for (key, value) in map {
            compound.put(key.clone(), from_json(value));
        }
    }
    compound
}
