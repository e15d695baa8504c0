//! Rich path expression parser.
//!
//! Segments are read strictly in order, `[attributes] path [columns] [ranges]`,
//! in a single left-to-right pass. Once a segment's opening delimiter is
//! consumed the segment must close; segments never repeat.

use tracing::{debug, trace};

use super::ast::{Range, RangeLimit, RichPath};
use super::error::{RichPathError, Segment};
use super::literal;
use super::scanner::Scanner;
use crate::tree::node::{AttributeMap, TreeNode};

/// Parser for rich path expressions.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Parser<'a> {
    /// Creates a parser for the given expression.
    pub fn new(input: &'a str) -> Self {
        Self {
            scanner: Scanner::new(input),
        }
    }

    /// Parses the expression into a `RichPath`.
    pub fn parse(input: &str) -> Result<RichPath, RichPathError> {
        let mut parser = Parser::new(input);
        parser.parse_rich_path()
    }

    /// Checks that `path` is exactly what the path segment of an expression
    /// would capture: non-empty, without outer whitespace, a leading `<` or
    /// unescaped `{`, `[`, `}`, `]`.
    pub fn validate_path(path: &str) -> Result<(), RichPathError> {
        if path.trim().is_empty() {
            return Err(RichPathError::EmptyPath { position: 0 });
        }
        if path.trim() != path {
            return Err(RichPathError::invalid(0, path, "path without outer whitespace"));
        }
        let mut parser = Parser::new(path);
        parser.parse_path()?;
        parser.expect_end()
    }

    fn parse_rich_path(&mut self) -> Result<RichPath, RichPathError> {
        debug!(input = self.scanner.input(), "parsing rich path");

        let attributes = if self.scanner.peek() == Some('<') {
            literal::parse_attribute_map(&mut self.scanner)?
        } else {
            AttributeMap::new()
        };

        let path = self.parse_path()?;

        let columns = if self.scanner.peek() == Some('{') {
            Some(self.parse_columns()?)
        } else {
            None
        };

        self.scanner.skip_whitespace();
        let ranges = if self.scanner.peek() == Some('[') {
            Some(self.parse_ranges()?)
        } else {
            None
        };

        self.expect_end()?;

        debug!(
            path = %path,
            attributes = attributes.len(),
            columns = ?columns.as_ref().map(Vec::len),
            ranges = ?ranges.as_ref().map(Vec::len),
            "parsed rich path"
        );
        Ok(RichPath {
            path,
            attributes,
            columns,
            ranges,
        })
    }

    /// Reads the path up to the first unescaped `{`, `[` or end of input.
    fn parse_path(&mut self) -> Result<String, RichPathError> {
        self.scanner.skip_whitespace();
        let start = self.scanner.position();
        if self.scanner.peek() == Some('<') {
            return Err(RichPathError::MisplacedSegment {
                segment: Segment::Attributes,
                position: start,
            });
        }

        let mut escaped = false;
        while let Some(ch) = self.scanner.peek() {
            if escaped {
                escaped = false;
            } else {
                match ch {
                    '\\' => escaped = true,
                    '{' | '[' => break,
                    '}' => return Err(self.misplaced(Segment::Columns)),
                    ']' => return Err(self.misplaced(Segment::Ranges)),
                    _ => {}
                }
            }
            self.scanner.next();
        }
        if escaped {
            return Err(RichPathError::invalid(
                self.scanner.position(),
                "end of input",
                "escaped character",
            ));
        }

        let path = self.scanner.slice(start, self.scanner.position()).trim_end();
        if path.is_empty() {
            return Err(RichPathError::EmptyPath { position: start });
        }
        trace!(path, "extracted path segment");
        Ok(path.to_string())
    }

    /// Parses `{name, ...}` starting at the `{`.
    fn parse_columns(&mut self) -> Result<Vec<String>, RichPathError> {
        let open = self.scanner.position();
        self.scanner.next();
        self.scanner.require_closer(Segment::Columns, open)?;

        let mut columns = Vec::new();
        self.scanner.skip_whitespace();
        if self.scanner.eat('}') {
            return Ok(columns);
        }
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_eof() {
                return Err(self.scanner.unterminated(Segment::Columns, open));
            }
            columns.push(literal::parse_string(&mut self.scanner, "column name")?);

            self.scanner.skip_whitespace();
            if self.scanner.eat('}') {
                break;
            }
            if !self.scanner.eat(',') {
                return Err(self.scanner.unexpected(Segment::Columns, open, "',' or '}'"));
            }
        }
        trace!(count = columns.len(), "parsed column list");
        Ok(columns)
    }

    /// Parses `[range, ...]` starting at the `[`.
    fn parse_ranges(&mut self) -> Result<Vec<Range>, RichPathError> {
        let open = self.scanner.position();
        self.scanner.next();
        self.scanner.require_closer(Segment::Ranges, open)?;

        let mut ranges = Vec::new();
        self.scanner.skip_whitespace();
        if self.scanner.eat(']') {
            return Ok(ranges);
        }
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_eof() {
                return Err(self.scanner.unterminated(Segment::Ranges, open));
            }
            ranges.push(self.parse_range()?);

            self.scanner.skip_whitespace();
            if self.scanner.eat(']') {
                break;
            }
            if !self.scanner.eat(',') {
                return Err(self.scanner.unexpected(Segment::Ranges, open, "',' or ']'"));
            }
        }
        trace!(count = ranges.len(), "parsed range list");
        Ok(ranges)
    }

    /// Parses `lower:upper`, `lower:`, `:upper`, `:` or a single exact limit.
    fn parse_range(&mut self) -> Result<Range, RichPathError> {
        let start = self.scanner.position();
        let lower = match self.scanner.peek() {
            Some(':') => RangeLimit::Unbounded,
            Some(',') | Some(']') => {
                return Err(RichPathError::malformed(start, "empty range specifier"))
            }
            _ => self.parse_limit()?,
        };

        self.scanner.skip_whitespace();
        if !self.scanner.eat(':') {
            return Ok(Range::exact(lower));
        }

        self.scanner.skip_whitespace();
        let upper = match self.scanner.peek() {
            Some(',') | Some(']') | None => RangeLimit::Unbounded,
            _ => self.parse_limit()?,
        };
        Ok(Range::new(lower, upper))
    }

    fn parse_limit(&mut self) -> Result<RangeLimit, RichPathError> {
        match self.scanner.peek() {
            Some('#') => self.parse_row_index(),
            Some('(') => self.parse_key_tuple(),
            _ => Ok(RangeLimit::Key(vec![self.parse_key()?])),
        }
    }

    fn parse_row_index(&mut self) -> Result<RangeLimit, RichPathError> {
        let start = self.scanner.position();
        self.scanner.next();
        if self.scanner.peek() == Some('(') {
            return Err(RichPathError::malformed(
                start,
                "row index cannot be combined with a key tuple",
            ));
        }

        let token = self
            .scanner
            .take_while(|ch| !ch.is_whitespace() && !is_range_delimiter(ch));
        if token.is_empty() {
            return Err(RichPathError::malformed(start, "missing row index after '#'"));
        }
        token
            .parse::<i64>()
            .map(RangeLimit::RowIndex)
            .map_err(|_| RichPathError::malformed(start, format!("malformed row index '#{}'", token)))
    }

    /// Parses `(key, ...)` starting at the `(`.
    fn parse_key_tuple(&mut self) -> Result<RangeLimit, RichPathError> {
        let open = self.scanner.position();
        self.scanner.next();
        self.scanner.require_closer(Segment::KeyTuple, open)?;

        let mut keys = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            match self.scanner.peek() {
                None => return Err(self.scanner.unterminated(Segment::KeyTuple, open)),
                Some(')') if keys.is_empty() => {
                    return Err(RichPathError::malformed(open, "empty key tuple"))
                }
                Some('#') => {
                    return Err(RichPathError::malformed(
                        self.scanner.position(),
                        "row index cannot appear inside a key tuple",
                    ))
                }
                _ => {}
            }
            keys.push(self.parse_key()?);

            self.scanner.skip_whitespace();
            if self.scanner.eat(')') {
                return Ok(RangeLimit::Key(keys));
            }
            if !self.scanner.eat(',') {
                return Err(self.scanner.unexpected(Segment::KeyTuple, open, "',' or ')'"));
            }
        }
    }

    fn parse_key(&mut self) -> Result<TreeNode, RichPathError> {
        if self.scanner.peek() == Some('#') {
            return Err(RichPathError::malformed(
                self.scanner.position(),
                "row index cannot appear inside a key tuple",
            ));
        }
        literal::parse_scalar(&mut self.scanner)
    }

    fn expect_end(&mut self) -> Result<(), RichPathError> {
        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            None => Ok(()),
            Some('<') => Err(self.misplaced(Segment::Attributes)),
            Some('{') | Some('}') => Err(self.misplaced(Segment::Columns)),
            Some('[') | Some(']') => Err(self.misplaced(Segment::Ranges)),
            Some(_) => Err(RichPathError::invalid(
                self.scanner.position(),
                self.scanner.rest(),
                "end of input",
            )),
        }
    }

    fn misplaced(&self, segment: Segment) -> RichPathError {
        RichPathError::MisplacedSegment {
            segment,
            position: self.scanner.position(),
        }
    }
}

fn is_range_delimiter(ch: char) -> bool {
    matches!(ch, ':' | ',' | '(' | ')' | '[' | ']' | '{' | '}' | '<' | '>')
}
