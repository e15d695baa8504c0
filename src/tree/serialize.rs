//! Serde support for tree nodes.
//!
//! Nodes without attributes serialize as their plain value. Annotated nodes
//! use the `{"$attributes": {...}, "$value": ...}` convention so JSON and
//! YAML output keep the attribute map.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::node::{TreeNode, TreeValue};

pub const ATTRIBUTES_KEY: &str = "$attributes";
pub const VALUE_KEY: &str = "$value";

impl Serialize for TreeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TreeValue::String(s) => serializer.serialize_str(s),
            TreeValue::Int64(i) => serializer.serialize_i64(*i),
            TreeValue::Uint64(u) => serializer.serialize_u64(*u),
            TreeValue::Double(d) => serializer.serialize_f64(*d),
            TreeValue::Boolean(b) => serializer.serialize_bool(*b),
            TreeValue::Entity => serializer.serialize_unit(),
            TreeValue::List(items) => items.serialize(serializer),
            TreeValue::Map(fields) => fields.serialize(serializer),
        }
    }
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.has_attributes() {
            return self.value.serialize(serializer);
        }
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(ATTRIBUTES_KEY, &self.attributes)?;
        map.serialize_entry(VALUE_KEY, &self.value)?;
        map.end()
    }
}
