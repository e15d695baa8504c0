//! Generic tree value model used for attribute literals and rendered rich paths.

pub mod node;
pub mod serialize;
pub mod text;

pub use node::{AttributeMap, TreeNode, TreeValue};
