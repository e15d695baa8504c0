//! Generic tree value representation.
//!
//! Rich paths render into, and their attribute literals parse into, a small
//! tree model: every `TreeNode` wraps a `TreeValue` (a scalar, a list or a
//! map) together with an optional attribute map. An empty attribute map means
//! the node carries no attributes at all.
//!
//! # Example
//!
//! ```
//! use richpath::tree::node::{TreeNode, TreeValue};
//! use indexmap::IndexMap;
//!
//! // A plain string node
//! let node = TreeNode::string("//home");
//! assert!(!node.has_attributes());
//!
//! // A map with an annotated child
//! let mut fields = IndexMap::new();
//! fields.insert("row_index".to_string(), TreeNode::int64(10));
//! let limit = TreeNode::map(fields).with_attribute("origin", TreeNode::string("user"));
//! assert!(limit.value().is_map());
//! assert_eq!(limit.attributes().len(), 1);
//! ```

use indexmap::IndexMap;

/// Named attributes attached to a node.
///
/// Equality is order-insensitive: two maps are equal when they hold the same
/// set of entries.
pub type AttributeMap = IndexMap<String, TreeNode>;

/// A tree value without attributes.
///
/// Equality treats every NaN double as equal to every other NaN, so a value
/// parsed from `%nan` compares equal to itself.
#[derive(Debug, Clone)]
pub enum TreeValue {
    /// A text string
    String(String),
    /// A signed 64-bit integer
    Int64(i64),
    /// An unsigned 64-bit integer (`10u` in text form)
    Uint64(u64),
    /// A double precision float
    Double(f64),
    /// A boolean (`%true` / `%false` in text form)
    Boolean(bool),
    /// The entity (null) value, `#` in text form
    Entity,
    /// An ordered list of nodes
    List(Vec<TreeNode>),
    /// A map from string keys to nodes
    Map(IndexMap<String, TreeNode>),
}

impl TreeValue {
    /// Returns true for every value that is neither a list nor a map.
    ///
    /// # Example
    ///
    /// ```
    /// use richpath::tree::node::TreeValue;
    ///
    /// assert!(TreeValue::Int64(1).is_scalar());
    /// assert!(TreeValue::Entity.is_scalar());
    /// assert!(!TreeValue::List(vec![]).is_scalar());
    /// ```
    pub fn is_scalar(&self) -> bool {
        !matches!(self, TreeValue::List(_) | TreeValue::Map(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TreeValue::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, TreeValue::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TreeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as `i64`, accepting unsigned values that fit.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TreeValue::Int64(i) => Some(*i),
            TreeValue::Uint64(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TreeNode]> {
        match self {
            TreeValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, TreeNode>> {
        match self {
            TreeValue::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Short lowercase name of the value kind, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            TreeValue::String(_) => "string",
            TreeValue::Int64(_) => "int64",
            TreeValue::Uint64(_) => "uint64",
            TreeValue::Double(_) => "double",
            TreeValue::Boolean(_) => "boolean",
            TreeValue::Entity => "entity",
            TreeValue::List(_) => "list",
            TreeValue::Map(_) => "map",
        }
    }
}

impl PartialEq for TreeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TreeValue::String(a), TreeValue::String(b)) => a == b,
            (TreeValue::Int64(a), TreeValue::Int64(b)) => a == b,
            (TreeValue::Uint64(a), TreeValue::Uint64(b)) => a == b,
            (TreeValue::Double(a), TreeValue::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (TreeValue::Boolean(a), TreeValue::Boolean(b)) => a == b,
            (TreeValue::Entity, TreeValue::Entity) => true,
            (TreeValue::List(a), TreeValue::List(b)) => a == b,
            (TreeValue::Map(a), TreeValue::Map(b)) => a == b,
            _ => false,
        }
    }
}

/// A tree value together with its attribute map.
///
/// `TreeNode` is the unit the rest of the crate builds and compares. The
/// attribute map is kept even when empty so equality never has to tell
/// "no map" from "empty map" apart.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub(crate) value: TreeValue,
    pub(crate) attributes: AttributeMap,
}

impl TreeNode {
    /// Creates a node with the given value and no attributes.
    ///
    /// # Example
    ///
    /// ```
    /// use richpath::tree::node::{TreeNode, TreeValue};
    ///
    /// let node = TreeNode::new(TreeValue::Boolean(true));
    /// assert!(matches!(node.value(), TreeValue::Boolean(true)));
    /// assert!(node.attributes().is_empty());
    /// ```
    pub fn new(value: TreeValue) -> Self {
        Self {
            value,
            attributes: AttributeMap::new(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(TreeValue::String(value.into()))
    }

    pub fn int64(value: i64) -> Self {
        Self::new(TreeValue::Int64(value))
    }

    pub fn uint64(value: u64) -> Self {
        Self::new(TreeValue::Uint64(value))
    }

    pub fn double(value: f64) -> Self {
        Self::new(TreeValue::Double(value))
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(TreeValue::Boolean(value))
    }

    pub fn entity() -> Self {
        Self::new(TreeValue::Entity)
    }

    pub fn list(items: Vec<TreeNode>) -> Self {
        Self::new(TreeValue::List(items))
    }

    pub fn map(fields: IndexMap<String, TreeNode>) -> Self {
        Self::new(TreeValue::Map(fields))
    }

    /// Adds every entry of `attributes` to this node, replacing existing names.
    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Adds one attribute to this node, replacing an existing one of the same name.
    pub fn with_attribute(mut self, name: impl Into<String>, node: TreeNode) -> Self {
        self.attributes.insert(name.into(), node);
        self
    }

    pub fn value(&self) -> &TreeValue {
        &self.value
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Splits the node into its value and attribute map.
    pub fn into_parts(self) -> (TreeValue, AttributeMap) {
        (self.value, self.attributes)
    }
}

impl From<&str> for TreeNode {
    fn from(value: &str) -> Self {
        TreeNode::string(value)
    }
}

impl From<String> for TreeNode {
    fn from(value: String) -> Self {
        TreeNode::string(value)
    }
}

impl From<i64> for TreeNode {
    fn from(value: i64) -> Self {
        TreeNode::int64(value)
    }
}

impl From<u64> for TreeNode {
    fn from(value: u64) -> Self {
        TreeNode::uint64(value)
    }
}

impl From<f64> for TreeNode {
    fn from(value: f64) -> Self {
        TreeNode::double(value)
    }
}

impl From<bool> for TreeNode {
    fn from(value: bool) -> Self {
        TreeNode::boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_has_no_attributes() {
        let node = TreeNode::int64(42);
        assert!(!node.has_attributes());
        assert_eq!(node.value(), &TreeValue::Int64(42));
    }

    #[test]
    fn test_nan_equals_nan() {
        assert_eq!(TreeNode::double(f64::NAN), TreeNode::double(f64::NAN));
        assert_ne!(TreeNode::double(f64::NAN), TreeNode::double(1.0));
        assert_ne!(TreeNode::double(1.0), TreeNode::int64(1));
    }

    #[test]
    fn test_attribute_equality_ignores_order() {
        let first = TreeNode::string("x")
            .with_attribute("a", TreeNode::int64(1))
            .with_attribute("b", TreeNode::int64(2));
        let second = TreeNode::string("x")
            .with_attribute("b", TreeNode::int64(2))
            .with_attribute("a", TreeNode::int64(1));

        assert_eq!(first, second);
    }

    #[test]
    fn test_attributes_change_equality() {
        let plain = TreeNode::string("x");
        let annotated = TreeNode::string("x").with_attribute("a", TreeNode::boolean(true));
        assert_ne!(plain, annotated);
    }

    #[test]
    fn test_with_attribute_replaces_existing() {
        let node = TreeNode::entity()
            .with_attribute("a", TreeNode::int64(1))
            .with_attribute("a", TreeNode::int64(2));
        assert_eq!(node.attributes().len(), 1);
        assert_eq!(node.attributes()["a"], TreeNode::int64(2));
    }

    #[test]
    fn test_as_i64_accepts_small_unsigned() {
        assert_eq!(TreeValue::Uint64(7).as_i64(), Some(7));
        assert_eq!(TreeValue::Uint64(u64::MAX).as_i64(), None);
        assert_eq!(TreeValue::String("7".to_string()).as_i64(), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(TreeValue::Double(1.5).type_name(), "double");
        assert_eq!(TreeValue::Map(IndexMap::new()).type_name(), "map");
        assert_eq!(TreeValue::Entity.type_name(), "entity");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(TreeNode::from("a"), TreeNode::string("a"));
        assert_eq!(TreeNode::from(3i64), TreeNode::int64(3));
        assert_eq!(TreeNode::from(3u64), TreeNode::uint64(3));
        assert_eq!(TreeNode::from(false), TreeNode::boolean(false));
    }
}
