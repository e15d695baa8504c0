//! YSON-style text form of tree nodes.
//!
//! Writing goes through `Display`; reading goes through `FromStr`, which
//! delegates to the literal grammar shared with rich path attributes.
//!
//! ```
//! use richpath::tree::node::TreeNode;
//!
//! let node: TreeNode = "<a=b>[1;%true;#]".parse().unwrap();
//! assert_eq!(node.to_string(), r#"<a="b">[1;%true;#]"#);
//! ```

use std::fmt::{self, Write};
use std::str::FromStr;

use super::node::{AttributeMap, TreeNode, TreeValue};
use crate::ypath::error::RichPathError;
use crate::ypath::literal;

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_attributes() {
            write_attributes(f, &self.attributes)?;
        }
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for TreeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeValue::String(s) => write_quoted(f, s),
            TreeValue::Int64(i) => write!(f, "{}", i),
            TreeValue::Uint64(u) => write!(f, "{}u", u),
            TreeValue::Double(d) => f.write_str(&format_double(*d)),
            TreeValue::Boolean(true) => f.write_str("%true"),
            TreeValue::Boolean(false) => f.write_str("%false"),
            TreeValue::Entity => f.write_char('#'),
            TreeValue::List(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(';')?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_char(']')
            }
            TreeValue::Map(fields) => {
                f.write_char('{')?;
                write_entries(f, fields)?;
                f.write_char('}')
            }
        }
    }
}

impl FromStr for TreeNode {
    type Err = RichPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        literal::parse_node(s)
    }
}

/// Writes `<name=value;...>`.
pub(crate) fn write_attributes<W: Write>(out: &mut W, attributes: &AttributeMap) -> fmt::Result {
    out.write_char('<')?;
    write_entries(out, attributes)?;
    out.write_char('>')
}

fn write_entries<W: Write>(out: &mut W, entries: &AttributeMap) -> fmt::Result {
    for (i, (name, node)) in entries.iter().enumerate() {
        if i > 0 {
            out.write_char(';')?;
        }
        write_name(out, name)?;
        write!(out, "={}", node)?;
    }
    Ok(())
}

/// Writes a map key or column name, bare when the bare-string grammar allows it.
pub(crate) fn write_name<W: Write>(out: &mut W, name: &str) -> fmt::Result {
    if literal::is_bare_string(name) {
        out.write_str(name)
    } else {
        write_quoted(out, name)
    }
}

pub(crate) fn write_quoted<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\t' => out.write_str("\\t")?,
            '\r' => out.write_str("\\r")?,
            c if (c as u32) < 0x20 => write!(out, "\\x{:02x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

/// Doubles always carry a decimal point or exponent so they read back as doubles.
fn format_double(value: f64) -> String {
    if value.is_nan() {
        "%nan".to_string()
    } else if value == f64::INFINITY {
        "%inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "%-inf".to_string()
    } else {
        format!("{:?}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_scalars() {
        assert_eq!(TreeNode::string("a").to_string(), "\"a\"");
        assert_eq!(TreeNode::int64(-5).to_string(), "-5");
        assert_eq!(TreeNode::uint64(5).to_string(), "5u");
        assert_eq!(TreeNode::double(2.0).to_string(), "2.0");
        assert_eq!(TreeNode::double(f64::NEG_INFINITY).to_string(), "%-inf");
        assert_eq!(TreeNode::boolean(false).to_string(), "%false");
        assert_eq!(TreeNode::entity().to_string(), "#");
    }

    #[test]
    fn test_string_escapes() {
        let node = TreeNode::string("a\"b\\c\nd\u{1}");
        assert_eq!(node.to_string(), r#""a\"b\\c\nd\x01""#);
    }

    #[test]
    fn test_containers() {
        let mut fields = IndexMap::new();
        fields.insert("key".to_string(), TreeNode::list(vec![TreeNode::int64(1), TreeNode::string("x")]));
        fields.insert("odd name".to_string(), TreeNode::entity());
        assert_eq!(TreeNode::map(fields).to_string(), r#"{key=[1;"x"];"odd name"=#}"#);
    }

    #[test]
    fn test_attributes_prefix() {
        let node = TreeNode::string("//home").with_attribute("append", TreeNode::boolean(true));
        assert_eq!(node.to_string(), r#"<append=%true>"//home""#);
    }

    #[test]
    fn test_from_str_reads_written_text() {
        let node = TreeNode::list(vec![TreeNode::double(0.5), TreeNode::uint64(3)])
            .with_attribute("a", TreeNode::string("b"));
        let reread: TreeNode = node.to_string().parse().unwrap();
        assert_eq!(reread, node);
    }
}
