//! Recursive-descent parser for the YSON-style literal language.
//!
//! The same grammar serves attribute values (`<a=[1;{b=%true}]>`), range
//! keys (`[(x, 1):(y, 2)]`) and the text form of tree nodes:
//!
//! - `"text"` / `'text'` quoted strings, escapes `\n \t \r \\ \" \' \xHH`
//! - `text` bare strings, `[A-Za-z_][A-Za-z0-9_.-]*`
//! - `42`, `-7` signed integers and `42u` unsigned integers
//! - `1.5`, `1e3`, `%nan`, `%inf`, `%-inf` doubles
//! - `%true`, `%false` booleans and `#` for the entity
//! - `[a; b]` lists and `{k=v; ...}` maps, `;` or `,` separated
//! - a `<k=v; ...>` attribute map in front of any value

use tracing::trace;

use super::error::{RichPathError, Segment};
use super::scanner::Scanner;
#[cfg(test)]
use super::scanner::MAX_NESTING_DEPTH;
use crate::tree::node::{AttributeMap, TreeNode, TreeValue};

/// Parses the complete text form of a tree node.
///
/// # Example
///
/// ```
/// use richpath::ypath::literal::parse_node;
/// use richpath::tree::node::TreeNode;
///
/// let node = parse_node("<a=b> [1; 2u]").unwrap();
/// assert_eq!(node.attributes()["a"], TreeNode::string("b"));
/// assert!(node.value().is_list());
/// ```
pub fn parse_node(text: &str) -> Result<TreeNode, RichPathError> {
    let mut scanner = Scanner::new(text);
    if scanner.is_eof() {
        return Err(RichPathError::invalid(scanner.position(), scanner.found(), "value"));
    }
    let node = parse_node_at(&mut scanner)?;
    scanner.skip_whitespace();
    if !scanner.is_eof() {
        return Err(RichPathError::invalid(
            scanner.position(),
            scanner.found(),
            "end of input",
        ));
    }
    Ok(node)
}

/// Returns true when `s` can be written without quotes.
pub fn is_bare_string(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_bare_start(first) => chars.all(is_bare_continue),
        _ => false,
    }
}

fn is_bare_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_bare_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.')
}

/// Parses an optional attribute prefix followed by a value.
///
/// Every call is one level of nesting; past `MAX_NESTING_DEPTH` levels the
/// literal is rejected instead of recursing further.
pub(crate) fn parse_node_at(scanner: &mut Scanner<'_>) -> Result<TreeNode, RichPathError> {
    scanner.skip_whitespace();
    scanner.descend()?;
    let node = parse_annotated(scanner);
    scanner.ascend();
    node
}

fn parse_annotated(scanner: &mut Scanner<'_>) -> Result<TreeNode, RichPathError> {
    let attributes = if scanner.peek() == Some('<') {
        let attributes = parse_attribute_map(scanner)?;
        scanner.skip_whitespace();
        attributes
    } else {
        AttributeMap::new()
    };
    let value = parse_value(scanner)?;
    Ok(TreeNode { value, attributes })
}

/// Parses `<name=value, ...>` starting at the `<`.
pub(crate) fn parse_attribute_map(scanner: &mut Scanner<'_>) -> Result<AttributeMap, RichPathError> {
    let open = scanner.position();
    scanner.next();
    scanner.require_closer(Segment::Attributes, open)?;
    let attributes = parse_entries(scanner, Segment::Attributes, open)?;
    trace!(count = attributes.len(), "parsed attribute map");
    Ok(attributes)
}

/// Parses a single scalar, rejecting lists, maps and attribute prefixes.
pub(crate) fn parse_scalar(scanner: &mut Scanner<'_>) -> Result<TreeNode, RichPathError> {
    match scanner.peek() {
        Some('[') | Some('{') | Some('<') | None => Err(RichPathError::invalid(
            scanner.position(),
            scanner.found(),
            "scalar literal",
        )),
        _ => parse_value(scanner).map(TreeNode::new),
    }
}

/// Parses a string that must be either quoted or bare.
pub(crate) fn parse_string(scanner: &mut Scanner<'_>, expected: &str) -> Result<String, RichPathError> {
    match scanner.peek() {
        Some('"') | Some('\'') => parse_quoted(scanner),
        Some(ch) if is_bare_start(ch) => Ok(scanner.take_while(is_bare_continue).to_string()),
        _ => Err(RichPathError::invalid(scanner.position(), scanner.found(), expected)),
    }
}

fn parse_value(scanner: &mut Scanner<'_>) -> Result<TreeValue, RichPathError> {
    match scanner.peek() {
        Some('"') | Some('\'') => parse_quoted(scanner).map(TreeValue::String),
        Some('[') => parse_list(scanner),
        Some('{') => {
            let open = scanner.position();
            scanner.next();
            scanner.require_closer(Segment::Map, open)?;
            parse_entries(scanner, Segment::Map, open).map(TreeValue::Map)
        }
        Some('#') => {
            scanner.next();
            Ok(TreeValue::Entity)
        }
        Some('%') => parse_keyword(scanner),
        Some(ch) if ch.is_ascii_digit() || ch == '-' || ch == '+' => parse_number(scanner),
        Some(ch) if is_bare_start(ch) => {
            Ok(TreeValue::String(scanner.take_while(is_bare_continue).to_string()))
        }
        _ => Err(RichPathError::invalid(scanner.position(), scanner.found(), "value")),
    }
}

/// Parses `name=value` entries up to the segment closer; the opener is already consumed.
fn parse_entries(
    scanner: &mut Scanner<'_>,
    segment: Segment,
    open: usize,
) -> Result<AttributeMap, RichPathError> {
    let closer = segment.closer();
    let mut entries = AttributeMap::new();
    loop {
        scanner.skip_whitespace();
        if scanner.eat(closer) {
            return Ok(entries);
        }
        if scanner.is_eof() {
            return Err(scanner.unterminated(segment, open));
        }

        let key_position = scanner.position();
        let key = parse_string(scanner, "attribute name")?;
        scanner.skip_whitespace();
        if !scanner.eat('=') {
            return Err(scanner.unexpected(segment, open, "'='"));
        }
        scanner.skip_whitespace();
        if scanner.is_eof() {
            return Err(scanner.unterminated(segment, open));
        }
        let value = parse_node_at(scanner)?;
        if entries.contains_key(&key) {
            return Err(RichPathError::invalid(key_position, key, "unique attribute name"));
        }
        entries.insert(key, value);

        scanner.skip_whitespace();
        if scanner.eat(closer) {
            return Ok(entries);
        }
        if !scanner.eat(';') && !scanner.eat(',') {
            return Err(scanner.unexpected(segment, open, &format!("';', ',' or '{}'", closer)));
        }
    }
}

fn parse_list(scanner: &mut Scanner<'_>) -> Result<TreeValue, RichPathError> {
    let open = scanner.position();
    scanner.next();
    scanner.require_closer(Segment::List, open)?;
    let mut items = Vec::new();
    loop {
        scanner.skip_whitespace();
        if scanner.eat(']') {
            return Ok(TreeValue::List(items));
        }
        if scanner.is_eof() {
            return Err(scanner.unterminated(Segment::List, open));
        }
        items.push(parse_node_at(scanner)?);

        scanner.skip_whitespace();
        if scanner.eat(']') {
            return Ok(TreeValue::List(items));
        }
        if !scanner.eat(';') && !scanner.eat(',') {
            return Err(scanner.unexpected(Segment::List, open, "';', ',' or ']'"));
        }
    }
}

/// Parses a quoted string starting at the opening quote.
///
/// `\xHH` escapes are raw bytes, so `"\xc3\xa9"` is `"é"`; the decoded bytes
/// must form valid UTF-8.
fn parse_quoted(scanner: &mut Scanner<'_>) -> Result<String, RichPathError> {
    let start = scanner.position();
    let quote = match scanner.next() {
        Some(ch) => ch,
        None => return Err(RichPathError::invalid(start, "end of input", "quoted string")),
    };

    let mut bytes = Vec::new();
    let mut buf = [0u8; 4];
    loop {
        let escape_position = scanner.position();
        let ch = match scanner.next() {
            Some(ch) if ch == quote => {
                return String::from_utf8(bytes).map_err(|_| {
                    RichPathError::invalid(
                        start,
                        scanner.slice(start, scanner.position()),
                        "escapes forming valid UTF-8",
                    )
                })
            }
            Some('\\') => match scanner.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some('\\') => '\\',
                Some('\'') => '\'',
                Some('"') => '"',
                Some('x') => {
                    bytes.push(parse_hex_escape(scanner, escape_position)?);
                    continue;
                }
                Some(other) => {
                    return Err(RichPathError::invalid(
                        escape_position,
                        format!("\\{}", other),
                        "escape sequence",
                    ))
                }
                None => break,
            },
            Some(ch) => ch,
            None => break,
        };
        bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }
    Err(RichPathError::invalid(
        start,
        scanner.slice(start, scanner.position()),
        format!("closing quote {}", quote),
    ))
}

fn parse_hex_escape(scanner: &mut Scanner<'_>, escape_position: usize) -> Result<u8, RichPathError> {
    let start = scanner.position();
    for _ in 0..2 {
        match scanner.peek() {
            Some(ch) if ch.is_ascii_hexdigit() => {
                scanner.next();
            }
            _ => break,
        }
    }
    let digits = scanner.slice(start, scanner.position());
    u8::from_str_radix(digits, 16)
        .ok()
        .filter(|_| digits.len() == 2)
        .ok_or_else(|| {
            RichPathError::invalid(escape_position, format!("\\x{}", digits), "two hex digits")
        })
}

/// Parses `%true`, `%false`, `%nan`, `%inf`, `%+inf` and `%-inf`.
fn parse_keyword(scanner: &mut Scanner<'_>) -> Result<TreeValue, RichPathError> {
    let start = scanner.position();
    scanner.next();
    let word = scanner.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '+' || ch == '-');
    match word {
        "true" => Ok(TreeValue::Boolean(true)),
        "false" => Ok(TreeValue::Boolean(false)),
        "nan" => Ok(TreeValue::Double(f64::NAN)),
        "inf" | "+inf" => Ok(TreeValue::Double(f64::INFINITY)),
        "-inf" => Ok(TreeValue::Double(f64::NEG_INFINITY)),
        _ => Err(RichPathError::invalid(
            start,
            format!("%{}", word),
            "%true, %false, %nan or %inf",
        )),
    }
}

fn parse_number(scanner: &mut Scanner<'_>) -> Result<TreeValue, RichPathError> {
    let start = scanner.position();
    let token = scanner.take_while(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'));
    let invalid = || RichPathError::invalid(start, token, "number");

    let unsigned = token.trim_start_matches(['+', '-']);
    if !unsigned.starts_with(|ch: char| ch.is_ascii_digit()) {
        return Err(invalid());
    }

    if let Some(digits) = token.strip_suffix('u') {
        digits.parse::<u64>().map(TreeValue::Uint64).map_err(|_| invalid())
    } else if token.contains(['.', 'e', 'E']) {
        token.parse::<f64>().map(TreeValue::Double).map_err(|_| invalid())
    } else {
        token.parse::<i64>().map(TreeValue::Int64).map_err(|_| invalid())
    }
}
