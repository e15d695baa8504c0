//! Error types for rich path parsing and rendering.

use std::fmt;

/// A delimited construct of the rich path grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// `<...>` attribute map
    Attributes,
    /// `{...}` column list
    Columns,
    /// `[...]` range list
    Ranges,
    /// `(...)` composite key inside a range
    KeyTuple,
    /// `[...]` list literal inside an attribute value
    List,
    /// `{...}` map literal inside an attribute value
    Map,
}

impl Segment {
    pub fn opener(self) -> char {
        match self {
            Segment::Attributes => '<',
            Segment::Columns | Segment::Map => '{',
            Segment::Ranges | Segment::List => '[',
            Segment::KeyTuple => '(',
        }
    }

    pub fn closer(self) -> char {
        match self {
            Segment::Attributes => '>',
            Segment::Columns | Segment::Map => '}',
            Segment::Ranges | Segment::List => ']',
            Segment::KeyTuple => ')',
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Segment::Attributes => "attribute map",
            Segment::Columns => "column list",
            Segment::Ranges => "range list",
            Segment::KeyTuple => "key tuple",
            Segment::List => "list literal",
            Segment::Map => "map literal",
        };
        write!(f, "{} '{}'", name, self.opener())
    }
}

/// Errors that can occur while parsing or rendering a rich path.
///
/// Positions are byte offsets into the original input string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RichPathError {
    /// A delimiter was opened but never closed.
    #[error("Unterminated {segment} opened at position {position}")]
    UnterminatedSegment { segment: Segment, position: usize },

    /// Nothing is left of the path once attributes and whitespace are removed.
    #[error("Empty path at position {position}")]
    EmptyPath { position: usize },

    /// A token does not match the production expected at its position.
    #[error("Invalid literal '{found}' at position {position}, expected {expected}")]
    InvalidLiteral {
        position: usize,
        found: String,
        expected: String,
    },

    /// A segment delimiter appeared outside of its slot.
    #[error("Misplaced {segment} at position {position}")]
    MisplacedSegment { segment: Segment, position: usize },

    /// A range side is not a valid row index, key or key tuple.
    #[error("Malformed range specifier at position {position}: {message}")]
    MalformedRangeSpecifier { position: usize, message: String },

    /// A literal attribute shares its name with a computed one.
    #[error("Attribute '{name}' conflicts with the computed attribute of the same name")]
    AttributeConflict { name: String },
}

impl RichPathError {
    /// Returns the byte offset the error points at, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            RichPathError::UnterminatedSegment { position, .. }
            | RichPathError::EmptyPath { position }
            | RichPathError::InvalidLiteral { position, .. }
            | RichPathError::MisplacedSegment { position, .. }
            | RichPathError::MalformedRangeSpecifier { position, .. } => Some(*position),
            RichPathError::AttributeConflict { .. } => None,
        }
    }

    pub(crate) fn invalid(position: usize, found: impl Into<String>, expected: impl Into<String>) -> Self {
        RichPathError::InvalidLiteral {
            position,
            found: found.into(),
            expected: expected.into(),
        }
    }

    pub(crate) fn malformed(position: usize, message: impl Into<String>) -> Self {
        RichPathError::MalformedRangeSpecifier {
            position,
            message: message.into(),
        }
    }
}
