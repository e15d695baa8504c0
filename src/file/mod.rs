//! File-facing helpers: fixture corpora and formatted output.

pub mod corpus;
pub mod output;
