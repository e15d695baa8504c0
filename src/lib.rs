//! Parser for rich YPath expressions.
//!
//! A rich path is `<attributes>path{columns}[ranges]`: a path in a
//! hierarchical namespace plus free-form attributes, a column projection and
//! row/key ranges. Parsed paths render into a generic tree model and back.
//!
//! ```
//! use richpath::{parse, RangeLimit, RichPath};
//!
//! let path = parse("//home[#1:#2,x:y]").unwrap();
//! assert_eq!(
//!     path,
//!     RichPath::simple("//home")
//!         .with_range(RangeLimit::row(1), RangeLimit::row(2))
//!         .with_range(RangeLimit::key(["x"]), RangeLimit::key(["y"]))
//! );
//! ```

pub mod config;
pub mod file;
pub mod tree;
pub mod ypath;

pub use tree::node::{AttributeMap, TreeNode, TreeValue};
pub use ypath::{parse, AttributeConflictPolicy, Range, RangeLimit, RichPath, RichPathError};
