//! Conversions between `RichPath`, the tree model and canonical text.

use std::fmt::{self, Write};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ast::{Range, RangeLimit, RichPath};
use super::error::RichPathError;
use super::parser::Parser;
use crate::tree::node::{TreeNode, TreeValue};
use crate::tree::text::{write_attributes, write_name};

pub const COLUMNS_ATTRIBUTE: &str = "columns";
pub const RANGES_ATTRIBUTE: &str = "ranges";
pub const LOWER_LIMIT_KEY: &str = "lower_limit";
pub const UPPER_LIMIT_KEY: &str = "upper_limit";
pub const EXACT_KEY: &str = "exact";
pub const ROW_INDEX_KEY: &str = "row_index";
pub const KEY_KEY: &str = "key";

/// What to do when a literal attribute is named `columns` or `ranges`
/// and the rich path also carries the matching clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeConflictPolicy {
    /// The computed attribute replaces the literal one.
    #[default]
    ComputedWins,
    /// The literal attribute is kept and the computed one dropped.
    KeepLiteral,
    /// Rendering fails with `RichPathError::AttributeConflict`.
    Reject,
}

impl RichPath {
    /// Renders into the tree model: a string node holding the path, annotated
    /// with the literal attributes plus `columns` and `ranges` when present.
    ///
    /// Computed attributes win over literal ones of the same name.
    ///
    /// # Example
    ///
    /// ```
    /// use richpath::tree::node::TreeNode;
    ///
    /// let rendered = richpath::parse("//home{a}").unwrap().to_tree();
    /// let expected: TreeNode = r#"<columns=["a"]>"//home""#.parse().unwrap();
    /// assert_eq!(rendered, expected);
    ///
    /// // Without clauses the node is a bare string.
    /// assert_eq!(richpath::parse("//home").unwrap().to_tree(), TreeNode::string("//home"));
    /// ```
    pub fn to_tree(&self) -> TreeNode {
        self.render(AttributeConflictPolicy::ComputedWins)
    }

    /// Renders into the tree model, resolving name collisions with `policy`.
    pub fn to_tree_with(&self, policy: AttributeConflictPolicy) -> Result<TreeNode, RichPathError> {
        if policy == AttributeConflictPolicy::Reject {
            if let Some(name) = self.conflicting_attribute() {
                return Err(RichPathError::AttributeConflict {
                    name: name.to_string(),
                });
            }
        }
        Ok(self.render(policy))
    }

    /// Name of the first literal attribute that collides with a computed one.
    pub fn conflicting_attribute(&self) -> Option<&'static str> {
        [
            (COLUMNS_ATTRIBUTE, self.columns.is_some()),
            (RANGES_ATTRIBUTE, self.ranges.is_some()),
        ]
        .into_iter()
        .find(|(name, present)| *present && self.attributes.contains_key(*name))
        .map(|(name, _)| name)
    }

    fn render(&self, policy: AttributeConflictPolicy) -> TreeNode {
        let mut computed = Vec::new();
        if let Some(columns) = &self.columns {
            computed.push((COLUMNS_ATTRIBUTE, columns_node(columns)));
        }
        if let Some(ranges) = &self.ranges {
            computed.push((RANGES_ATTRIBUTE, TreeNode::list(ranges.iter().map(range_node).collect())));
        }

        let mut attributes = self.attributes.clone();
        for (name, node) in computed {
            if policy == AttributeConflictPolicy::KeepLiteral && attributes.contains_key(name) {
                debug!(attribute = name, "keeping literal attribute over computed one");
                continue;
            }
            attributes.insert(name.to_string(), node);
        }
        TreeNode::string(self.path.clone()).with_attributes(attributes)
    }

    /// Rebuilds a rich path from its tree form.
    ///
    /// The node must be a string; its `columns` and `ranges` attributes are
    /// lifted into typed clauses and the remaining attributes are kept as is.
    /// Range maps may use `exact` as well as `lower_limit`/`upper_limit`.
    /// The path must be one the parser could have extracted, see
    /// [`Parser::validate_path`]. Errors other than path errors report
    /// position 0 since there is no source text.
    pub fn from_tree(node: &TreeNode) -> Result<RichPath, RichPathError> {
        let path = match node.value() {
            TreeValue::String(path) => {
                Parser::validate_path(path)?;
                path.clone()
            }
            other => return Err(RichPathError::invalid(0, other.type_name(), "string node")),
        };

        let mut attributes = node.attributes().clone();
        let columns = attributes
            .shift_remove(COLUMNS_ATTRIBUTE)
            .map(|node| columns_from_tree(&node))
            .transpose()?;
        let ranges = attributes
            .shift_remove(RANGES_ATTRIBUTE)
            .map(|node| ranges_from_tree(&node))
            .transpose()?;

        Ok(RichPath {
            path,
            attributes,
            columns,
            ranges,
        })
    }
}

fn columns_node(columns: &[String]) -> TreeNode {
    TreeNode::list(columns.iter().map(|c| TreeNode::string(c.as_str())).collect())
}

fn range_node(range: &Range) -> TreeNode {
    let mut fields = IndexMap::new();
    if let Some(lower) = limit_node(&range.lower) {
        fields.insert(LOWER_LIMIT_KEY.to_string(), lower);
    }
    if let Some(upper) = limit_node(&range.upper) {
        fields.insert(UPPER_LIMIT_KEY.to_string(), upper);
    }
    TreeNode::map(fields)
}

fn limit_node(limit: &RangeLimit) -> Option<TreeNode> {
    let mut fields = IndexMap::new();
    match limit {
        RangeLimit::Unbounded => return None,
        RangeLimit::RowIndex(index) => {
            fields.insert(ROW_INDEX_KEY.to_string(), TreeNode::int64(*index));
        }
        RangeLimit::Key(parts) => {
            fields.insert(KEY_KEY.to_string(), TreeNode::list(parts.clone()));
        }
    }
    Some(TreeNode::map(fields))
}

fn columns_from_tree(node: &TreeNode) -> Result<Vec<String>, RichPathError> {
    let items = node
        .value()
        .as_list()
        .ok_or_else(|| RichPathError::invalid(0, node.value().type_name(), "list of column names"))?;
    items
        .iter()
        .map(|item| {
            item.value()
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| RichPathError::invalid(0, item.value().type_name(), "column name"))
        })
        .collect()
}

fn ranges_from_tree(node: &TreeNode) -> Result<Vec<Range>, RichPathError> {
    let items = node
        .value()
        .as_list()
        .ok_or_else(|| RichPathError::invalid(0, node.value().type_name(), "list of ranges"))?;
    items.iter().map(range_from_tree).collect()
}

fn range_from_tree(node: &TreeNode) -> Result<Range, RichPathError> {
    let fields = node
        .value()
        .as_map()
        .ok_or_else(|| RichPathError::invalid(0, node.value().type_name(), "range map"))?;

    if let Some(exact) = fields.get(EXACT_KEY) {
        if fields.len() > 1 {
            return Err(RichPathError::malformed(0, "'exact' cannot be combined with other limits"));
        }
        return Ok(Range::exact(limit_from_tree(exact)?));
    }

    let mut range = Range::unbounded();
    for (name, limit) in fields {
        match name.as_str() {
            LOWER_LIMIT_KEY => range.lower = limit_from_tree(limit)?,
            UPPER_LIMIT_KEY => range.upper = limit_from_tree(limit)?,
            other => return Err(RichPathError::invalid(0, other, "lower_limit or upper_limit")),
        }
    }
    Ok(range)
}

fn limit_from_tree(node: &TreeNode) -> Result<RangeLimit, RichPathError> {
    let fields = node
        .value()
        .as_map()
        .ok_or_else(|| RichPathError::invalid(0, node.value().type_name(), "range limit map"))?;
    if fields.len() != 1 {
        return Err(RichPathError::malformed(0, "range limit must hold exactly one of row_index or key"));
    }

    match (fields.get(ROW_INDEX_KEY), fields.get(KEY_KEY)) {
        (Some(index), _) => index
            .value()
            .as_i64()
            .map(RangeLimit::RowIndex)
            .ok_or_else(|| RichPathError::malformed(0, "row_index must be an integer")),
        (_, Some(key)) => match key.value().as_list() {
            Some(parts) if !parts.is_empty() && parts.iter().all(|p| p.value().is_scalar()) => {
                Ok(RangeLimit::Key(parts.to_vec()))
            }
            _ => Err(RichPathError::malformed(0, "key must be a non-empty list of scalars")),
        },
        _ => Err(RichPathError::malformed(0, "range limit must hold row_index or key")),
    }
}

/// Writes the canonical text form.
///
/// Paths that came from the parser or from [`RichPath::from_tree`] parse
/// back to an equal `RichPath`. [`RichPath::simple`] does not check its
/// argument, so a path holding unescaped delimiters is written as is.
impl fmt::Display for RichPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.attributes.is_empty() {
            write_attributes(f, &self.attributes)?;
        }
        f.write_str(&self.path)?;

        if let Some(columns) = &self.columns {
            f.write_char('{')?;
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                write_name(f, column)?;
            }
            f.write_char('}')?;
        }

        if let Some(ranges) = &self.ranges {
            f.write_char('[')?;
            for (i, range) in ranges.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                if range.is_exact() {
                    write_limit(f, &range.lower)?;
                } else {
                    write_limit(f, &range.lower)?;
                    f.write_char(':')?;
                    write_limit(f, &range.upper)?;
                }
            }
            f.write_char(']')?;
        }
        Ok(())
    }
}

fn write_limit(f: &mut fmt::Formatter<'_>, limit: &RangeLimit) -> fmt::Result {
    match limit {
        RangeLimit::Unbounded => Ok(()),
        RangeLimit::RowIndex(index) => write!(f, "#{}", index),
        RangeLimit::Key(parts) if parts.len() == 1 => write!(f, "{}", parts[0]),
        RangeLimit::Key(parts) => {
            f.write_char('(')?;
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                write!(f, "{}", part)?;
            }
            f.write_char(')')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ypath::error::Segment;

    fn tree(text: &str) -> TreeNode {
        text.parse().unwrap()
    }

    #[test]
    fn test_bare_path_renders_as_scalar() {
        let node = Parser::parse("//home").unwrap().to_tree();
        assert_eq!(node, TreeNode::string("//home"));
        assert!(!node.has_attributes());
    }

    #[test]
    fn test_render_full_expression() {
        let node = Parser::parse("<a=b>//home/ignat{a,b}[100:200]").unwrap().to_tree();
        assert_eq!(
            node,
            tree(r#"<a=b;columns=[a;b];ranges=[{lower_limit={key=[100]};upper_limit={key=[200]}}]>"//home/ignat""#)
        );
    }

    #[test]
    fn test_render_row_and_unbounded_limits() {
        let node = Parser::parse("//t[#1:,:]").unwrap().to_tree();
        assert_eq!(node, tree(r#"<ranges=[{lower_limit={row_index=1}};{}]>"//t""#));
    }

    #[test]
    fn test_conflict_policies() {
        let path = Parser::parse("<columns=literal>//t{a}").unwrap();
        assert_eq!(path.conflicting_attribute(), Some(COLUMNS_ATTRIBUTE));

        let computed = path.to_tree_with(AttributeConflictPolicy::ComputedWins).unwrap();
        assert_eq!(computed.attributes()[COLUMNS_ATTRIBUTE], tree("[a]"));

        let literal = path.to_tree_with(AttributeConflictPolicy::KeepLiteral).unwrap();
        assert_eq!(literal.attributes()[COLUMNS_ATTRIBUTE], TreeNode::string("literal"));

        assert_eq!(
            path.to_tree_with(AttributeConflictPolicy::Reject),
            Err(RichPathError::AttributeConflict {
                name: COLUMNS_ATTRIBUTE.to_string()
            })
        );
    }

    #[test]
    fn test_no_conflict_without_clause() {
        let path = Parser::parse("<columns=literal>//t").unwrap();
        assert_eq!(path.conflicting_attribute(), None);
        assert!(path.to_tree_with(AttributeConflictPolicy::Reject).is_ok());
    }

    #[test]
    fn test_from_tree_inverts_to_tree() {
        for input in ["//t", "<a=[1;2]>//t{x,y}[#1:#2,(a,1):,k]", "//t{}[]", "//t[:]"] {
            let path = Parser::parse(input).unwrap();
            assert_eq!(RichPath::from_tree(&path.to_tree()).unwrap(), path, "input: {}", input);
        }
    }

    #[test]
    fn test_from_tree_accepts_exact() {
        let path = RichPath::from_tree(&tree(r#"<ranges=[{exact={key=[x]}}]>"//t""#)).unwrap();
        assert_eq!(path, Parser::parse("//t[x]").unwrap());
    }

    #[test]
    fn test_from_tree_rejects_malformed() {
        assert!(RichPath::from_tree(&TreeNode::int64(1)).is_err());
        assert!(RichPath::from_tree(&TreeNode::string("")).is_err());
        assert!(RichPath::from_tree(&tree(r#"<columns=[1]>"//t""#)).is_err());
        assert!(RichPath::from_tree(&tree(r#"<ranges=[{lower_limit={key=[]}}]>"//t""#)).is_err());
        assert!(RichPath::from_tree(&tree(r#"<ranges=[{middle={key=[a]}}]>"//t""#)).is_err());
        assert!(RichPath::from_tree(&tree(r#"<ranges=[{lower_limit={row_index=a}}]>"//t""#)).is_err());
    }

    #[test]
    fn test_from_tree_rejects_paths_with_delimiters() {
        assert_eq!(
            RichPath::from_tree(&TreeNode::string("//a{b")),
            Err(RichPathError::MisplacedSegment { segment: Segment::Columns, position: 3 })
        );
        assert_eq!(
            RichPath::from_tree(&TreeNode::string("   ")),
            Err(RichPathError::EmptyPath { position: 0 })
        );
        assert!(RichPath::from_tree(&TreeNode::string("<a=b>//t")).is_err());
        assert!(RichPath::from_tree(&TreeNode::string("//t ")).is_err());
        assert!(RichPath::from_tree(&TreeNode::string("//t]")).is_err());

        let escaped = RichPath::from_tree(&TreeNode::string(r"//a\{b")).unwrap();
        assert_eq!(Parser::parse(&escaped.to_string()).unwrap(), escaped);
    }

    #[test]
    fn test_canonical_text() {
        let path = Parser::parse(" <a = b> //t { x , \"y z\" } [ #1 : #2 , (a, 1) : , k , : ]").unwrap();
        assert_eq!(path.to_string(), r#"<a="b">//t{x,"y z"}[#1:#2,("a",1):,"k",:]"#);
    }

    #[test]
    fn test_canonical_text_reparses() {
        for input in ["<a={b=[1;%true]}>//t{c}[x:y,#5]", "//t[(1u, 2.5):]", "//t"] {
            let path = Parser::parse(input).unwrap();
            assert_eq!(Parser::parse(&path.to_string()).unwrap(), path, "input: {}", input);
        }
    }
}
