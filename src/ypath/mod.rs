//! Rich YPath parsing.
//!
//! A rich path addresses a node in a hierarchical namespace together with
//! read-time selection metadata.
//!
//! # Supported Syntax
//!
//! - `<name=value; ...>` - attribute map prefix, values in the YSON literal grammar
//! - `//home/table` - the path itself, up to the first unescaped `{` or `[`
//! - `{a,b}` - column projection, in order
//! - `[lower:upper, ...]` - row/key ranges, in order
//!
//! Range limits are `#N` row indexes, scalar keys (`x`, `100`, `"a b"`) or
//! composite keys (`(x, 1)`). Either side may be empty; a range without `:`
//! selects a single point.
//!
//! # Examples
//!
//! ```
//! use richpath::ypath::{parse, RangeLimit, RichPathError};
//!
//! let path = parse("<a=b>//home/ignat{a,b}[100:200]").unwrap();
//! assert_eq!(path.path(), "//home/ignat");
//! assert_eq!(path.columns(), Some(&["a".to_string(), "b".to_string()][..]));
//!
//! let path = parse("//home[#1:#2,x:y]").unwrap();
//! assert_eq!(path.ranges().unwrap()[0].lower, RangeLimit::row(1));
//!
//! let path = parse("//home[(x, y):(a, b)]").unwrap();
//! assert_eq!(path.ranges().unwrap()[0].upper, RangeLimit::key(["a", "b"]));
//!
//! assert!(parse("//home[:]").unwrap().ranges().unwrap()[0].lower.is_unbounded());
//! assert!(matches!(parse("//home{a"), Err(RichPathError::UnterminatedSegment { .. })));
//! ```

pub mod ast;
pub mod error;
pub mod literal;
pub mod parser;
pub mod render;
pub(crate) mod scanner;

use std::str::FromStr;

pub use ast::{Range, RangeLimit, RichPath};
pub use error::{RichPathError, Segment};
pub use parser::Parser;
pub use render::AttributeConflictPolicy;
pub use scanner::MAX_NESTING_DEPTH;

/// Parses a rich path expression.
pub fn parse(input: &str) -> Result<RichPath, RichPathError> {
    Parser::parse(input)
}

impl FromStr for RichPath {
    type Err = RichPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::parse(s)
    }
}
