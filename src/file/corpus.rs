//! Fixture corpus loading and checking.
//!
//! A corpus file holds one case per line. Lines starting with `##` and blank
//! lines are skipped. Accepted-corpus lines pair an expression with the tree
//! text it must render to:
//!
//! ```text
//! ## attributes and columns
//! <a=b>//home{x} -::- <a=b;columns=[x]>"//home"
//! ```
//!
//! Rejected-corpus lines hold only the expression; anything after the
//! separator is ignored.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::tree::node::TreeNode;
use crate::ypath::literal::parse_node;
use crate::ypath::{AttributeConflictPolicy, Parser};

pub const CASE_SEPARATOR: &str = " -::- ";
pub const COMMENT_PREFIX: &str = "##";

/// One line of a corpus file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusCase {
    /// 1-based line number in the source file
    pub line: usize,
    pub expression: String,
    /// Expected tree text, for accepted corpora
    pub expected: Option<String>,
}

/// A case that did not behave as the corpus requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFailure {
    pub line: usize,
    pub expression: String,
    pub reason: String,
}

/// Outcome of checking a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusReport {
    pub total: usize,
    pub failures: Vec<CorpusFailure>,
}

impl CorpusReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn passed(&self) -> usize {
        self.total - self.failures.len()
    }

    fn fail(&mut self, case: &CorpusCase, reason: String) {
        self.failures.push(CorpusFailure {
            line: case.line,
            expression: case.expression.clone(),
            reason,
        });
    }
}

/// Splits corpus text into cases.
pub fn parse_corpus(content: &str) -> Vec<CorpusCase> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(|(index, line)| {
            let (expression, expected) = match line.split_once(CASE_SEPARATOR) {
                Some((expression, expected)) => (expression, Some(expected.trim().to_string())),
                None => (line, None),
            };
            CorpusCase {
                line: index + 1,
                expression: expression.to_string(),
                expected,
            }
        })
        .collect()
}

/// Loads and splits a corpus file.
///
/// # Examples
///
/// ```no_run
/// use richpath::file::corpus::{check_accepted, load_corpus};
/// use richpath::ypath::AttributeConflictPolicy;
///
/// let cases = load_corpus("good-rich-ypath.txt").unwrap();
/// let report = check_accepted(&cases, AttributeConflictPolicy::ComputedWins);
/// assert!(report.is_success());
/// ```
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<CorpusCase>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file {}", path.display()))?;
    let cases = parse_corpus(&content);
    debug!(path = %path.display(), cases = cases.len(), "loaded corpus");
    Ok(cases)
}

/// Checks that every case parses and renders to its expected tree.
pub fn check_accepted(cases: &[CorpusCase], policy: AttributeConflictPolicy) -> CorpusReport {
    let mut report = CorpusReport {
        total: cases.len(),
        failures: Vec::new(),
    };
    for case in cases {
        if let Err(reason) = check_accepted_case(case, policy) {
            report.fail(case, reason);
        }
    }
    report
}

fn check_accepted_case(case: &CorpusCase, policy: AttributeConflictPolicy) -> Result<(), String> {
    let expected_text = case
        .expected
        .as_deref()
        .ok_or_else(|| "missing expected tree".to_string())?;
    let expected: TreeNode =
        parse_node(expected_text).map_err(|e| format!("invalid expected tree: {}", e))?;
    let actual = Parser::parse(&case.expression)
        .and_then(|path| path.to_tree_with(policy))
        .map_err(|e| e.to_string())?;
    if actual == expected {
        Ok(())
    } else {
        Err(format!("rendered {} but expected {}", actual, expected))
    }
}

/// Checks that every case fails to parse.
pub fn check_rejected(cases: &[CorpusCase]) -> CorpusReport {
    let mut report = CorpusReport {
        total: cases.len(),
        failures: Vec::new(),
    };
    for case in cases {
        if let Ok(path) = Parser::parse(&case.expression) {
            report.fail(case, format!("parsed as {}", path));
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_corpus_skips_comments_and_blanks() {
        let content = "## header\n\n//a -::- \"//a\"\n  \n//b\n";
        let cases = parse_corpus(content);
        assert_eq!(
            cases,
            vec![
                CorpusCase {
                    line: 3,
                    expression: "//a".to_string(),
                    expected: Some("\"//a\"".to_string()),
                },
                CorpusCase {
                    line: 5,
                    expression: "//b".to_string(),
                    expected: None,
                },
            ]
        );
    }

    #[test]
    fn test_check_accepted_reports_mismatch() {
        let cases = parse_corpus("//a{x} -::- \"//a\"\n//b -::- \"//b\"");
        let report = check_accepted(&cases, AttributeConflictPolicy::ComputedWins);
        assert_eq!(report.total, 2);
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failures[0].line, 1);
    }

    #[test]
    fn test_check_accepted_requires_expected() {
        let cases = parse_corpus("//a");
        let report = check_accepted(&cases, AttributeConflictPolicy::ComputedWins);
        assert_eq!(report.failures[0].reason, "missing expected tree");
    }

    #[test]
    fn test_check_rejected() {
        let cases = parse_corpus("//a{\n//b");
        let report = check_rejected(&cases);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].expression, "//b");
    }
}
