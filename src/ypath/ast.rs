//! Structured form of a rich path expression.

use crate::tree::node::{AttributeMap, TreeNode};

/// One bound of a range.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeLimit {
    /// The side is open.
    Unbounded,
    /// Absolute row position (`#10`).
    RowIndex(i64),
    /// A key tuple of scalars; a single key is a one-element tuple.
    Key(Vec<TreeNode>),
}

impl RangeLimit {
    pub fn row(index: i64) -> Self {
        RangeLimit::RowIndex(index)
    }

    /// Builds a key limit from its parts.
    ///
    /// # Example
    ///
    /// ```
    /// use richpath::ypath::ast::RangeLimit;
    /// use richpath::tree::node::TreeNode;
    ///
    /// let limit = RangeLimit::key(["x", "y"]);
    /// assert_eq!(limit, RangeLimit::Key(vec![TreeNode::string("x"), TreeNode::string("y")]));
    /// ```
    pub fn key<I, T>(parts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TreeNode>,
    {
        RangeLimit::Key(parts.into_iter().map(Into::into).collect())
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, RangeLimit::Unbounded)
    }
}

/// A lower/upper pair of limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub lower: RangeLimit,
    pub upper: RangeLimit,
}

impl Range {
    pub fn new(lower: RangeLimit, upper: RangeLimit) -> Self {
        Self { lower, upper }
    }

    /// A range selecting a single point: both limits equal `limit`.
    pub fn exact(limit: RangeLimit) -> Self {
        Self {
            lower: limit.clone(),
            upper: limit,
        }
    }

    /// The `[:]` range, open on both sides.
    pub fn unbounded() -> Self {
        Self::new(RangeLimit::Unbounded, RangeLimit::Unbounded)
    }

    /// True when both limits are the same bounded limit.
    pub fn is_exact(&self) -> bool {
        !self.lower.is_unbounded() && self.lower == self.upper
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// A parsed rich path: `<attributes>path{columns}[ranges]`.
///
/// Columns and ranges are optional wrappers so a missing clause (`//t`) and an
/// explicitly empty one (`//t{}`, `//t[]`) stay distinct.
///
/// # Example
///
/// ```
/// use richpath::ypath::ast::{RangeLimit, RichPath};
/// use richpath::tree::node::TreeNode;
///
/// let expected = RichPath::simple("//home/ignat")
///     .with_attribute("a", TreeNode::string("b"))
///     .with_columns(["a", "b"])
///     .with_range(RangeLimit::key([100i64]), RangeLimit::key([200i64]));
///
/// assert_eq!(richpath::parse("<a=b>//home/ignat{a,b}[100:200]").unwrap(), expected);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RichPath {
    pub(crate) path: String,
    pub(crate) attributes: AttributeMap,
    pub(crate) columns: Option<Vec<String>>,
    pub(crate) ranges: Option<Vec<Range>>,
}

impl RichPath {
    /// A rich path with no attributes, columns or ranges.
    ///
    /// The path is taken as is; use [`Parser::validate_path`](super::Parser::validate_path)
    /// first when it does not come from trusted text.
    pub fn simple(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            attributes: AttributeMap::new(),
            columns: None,
            ranges: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn ranges(&self) -> Option<&[Range]> {
        self.ranges.as_deref()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, node: TreeNode) -> Self {
        self.attributes.insert(name.into(), node);
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Sets the column projection, replacing any previous one.
    pub fn with_columns<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Appends a range built from two limits.
    pub fn with_range(self, lower: RangeLimit, upper: RangeLimit) -> Self {
        self.plus_range(Range::new(lower, upper))
    }

    /// Appends a range, creating the range list if it was absent.
    pub fn plus_range(mut self, range: Range) -> Self {
        self.ranges.get_or_insert_with(Vec::new).push(range);
        self
    }

    /// Sets the range list, replacing any previous one.
    pub fn with_ranges<I: IntoIterator<Item = Range>>(mut self, ranges: I) -> Self {
        self.ranges = Some(ranges.into_iter().collect());
        self
    }
}
