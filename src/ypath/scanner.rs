//! Character cursor over a rich path expression.

use super::error::{RichPathError, Segment};

/// Deepest nesting of lists, maps and attribute maps inside one literal.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Left-to-right cursor with one character of lookahead.
///
/// The cursor only walks the outer-trimmed part of the input, but positions
/// are byte offsets into the original string so errors point at the text the
/// caller passed in.
pub(crate) struct Scanner<'a> {
    input: &'a str,
    position: usize,
    end: usize,
    /// Sorted offsets of openers that have no matching closer.
    unclosed: Vec<usize>,
    depth: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner that ignores leading and trailing whitespace of `input`.
    pub(crate) fn new(input: &'a str) -> Self {
        let start = input.len() - input.trim_start().len();
        let end = input.trim_end().len().max(start);
        Self {
            input,
            position: start,
            end,
            unclosed: find_unclosed(input, start, end),
            depth: 0,
        }
    }

    pub(crate) fn input(&self) -> &'a str {
        self.input
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// Returns the current character without advancing.
    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Returns the current character and advances past it.
    pub(crate) fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Advances past `expected` if it is the current character.
    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.position >= self.end
    }

    /// The unread part of the trimmed input.
    pub(crate) fn rest(&self) -> &'a str {
        &self.input[self.position..self.end]
    }

    /// Text between two byte offsets previously returned by `position`.
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Consumes characters while `pred` holds and returns them.
    pub(crate) fn take_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.position += ch.len_utf8();
        }
        &self.input[start..self.position]
    }

    /// Describes the current character for diagnostics.
    pub(crate) fn found(&self) -> String {
        match self.peek() {
            Some(ch) => ch.to_string(),
            None => "end of input".to_string(),
        }
    }

    /// Error for an opened segment whose closer never appears in the rest of the input.
    pub(crate) fn unterminated(&self, segment: Segment, open: usize) -> RichPathError {
        RichPathError::UnterminatedSegment {
            segment,
            position: open,
        }
    }

    fn is_unclosed(&self, open: usize) -> bool {
        self.unclosed.binary_search(&open).is_ok()
    }

    /// Fails early when `segment`, opened at `open`, has no matching closer.
    pub(crate) fn require_closer(&self, segment: Segment, open: usize) -> Result<(), RichPathError> {
        if self.is_unclosed(open) {
            Err(self.unterminated(segment, open))
        } else {
            Ok(())
        }
    }

    /// Error for an unexpected character inside `segment`.
    ///
    /// Reported as unterminated when the segment's opener has no matching
    /// closer, since the missing closer is the real cause.
    pub(crate) fn unexpected(&self, segment: Segment, open: usize, expected: &str) -> RichPathError {
        if self.is_eof() || self.is_unclosed(open) {
            self.unterminated(segment, open)
        } else {
            RichPathError::invalid(self.position, self.found(), expected)
        }
    }

    /// Enters one more level of literal nesting.
    pub(crate) fn descend(&mut self) -> Result<(), RichPathError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(RichPathError::invalid(
                self.position,
                self.found(),
                format!("at most {} levels of nesting", MAX_NESTING_DEPTH),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

fn closer_of(opener: char) -> char {
    match opener {
        '<' => '>',
        '{' => '}',
        '[' => ']',
        _ => ')',
    }
}

/// Matches brackets over `input[start..end]` in one pass and returns the
/// offsets of openers left without a closer.
///
/// Quoted text inside a segment is skipped, as is any character after a
/// backslash. At the top level only `{`, `[` and a leading `<` open a
/// segment, so quotes and parentheses in the path are plain text. A closer
/// that does not match the innermost opener closes the nearest enclosing
/// opener it does match, and everything above that opener stays unclosed.
fn find_unclosed(input: &str, start: usize, end: usize) -> Vec<usize> {
    let mut stack: Vec<(usize, char)> = Vec::new();
    let mut unclosed = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, ch) in input[start..end].char_indices() {
        let position = start + offset;
        if escaped {
            escaped = false;
            continue;
        }
        if let Some(q) = quote {
            match ch {
                '\\' => escaped = true,
                _ if ch == q => quote = None,
                _ => {}
            }
            continue;
        }

        let nested = !stack.is_empty();
        match ch {
            '\\' => escaped = true,
            '"' | '\'' if nested => quote = Some(ch),
            '{' | '[' => stack.push((position, ch)),
            '<' if nested || position == start => stack.push((position, ch)),
            '(' if nested => stack.push((position, ch)),
            '>' | '}' | ']' | ')' => {
                if let Some(index) = stack.iter().rposition(|&(_, open)| closer_of(open) == ch) {
                    unclosed.extend(stack.drain(index + 1..).map(|(open, _)| open));
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    unclosed.extend(stack.into_iter().map(|(open, _)| open));
    unclosed.sort_unstable();
    unclosed
}
