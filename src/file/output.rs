//! Text output of rendered trees.

use anyhow::{Context, Result};

use crate::config::OutputFormat;
use crate::tree::node::TreeNode;

/// Formats a tree node in the requested output format.
///
/// `pretty` only affects JSON; YSON is always written in its compact
/// canonical form and YAML is always block style.
///
/// # Example
///
/// ```
/// use richpath::config::OutputFormat;
/// use richpath::file::output::format_node;
///
/// let node = richpath::parse("//home{a}").unwrap().to_tree();
/// let text = format_node(&node, OutputFormat::Json, false).unwrap();
/// assert_eq!(text, r#"{"$attributes":{"columns":["a"]},"$value":"//home"}"#);
/// ```
pub fn format_node(node: &TreeNode, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Yson => Ok(node.to_string()),
        OutputFormat::Json if pretty => {
            serde_json::to_string_pretty(node).context("Failed to serialize JSON")
        }
        OutputFormat::Json => serde_json::to_string(node).context("Failed to serialize JSON"),
        OutputFormat::Yaml => serde_yaml::to_string(node).context("Failed to serialize YAML"),
    }
}
