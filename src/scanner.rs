use crate::config::{ScanConfig, ScanError};
use serde::Serialize;
use std::fmt;

/// Keywords that introduce an indented block and require a trailing `:`.
const BLOCK_KEYWORDS: &[&str] = &[
    "if", "elif", "else", "for", "while", "def", "class", "try", "except", "finally", "with",
];

/// Category of a suspected defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A string literal opened on the line is never closed on it.
    UnterminatedString,
    /// A block-introducing statement has no `:` anywhere on the line.
    MissingColon,
    /// Leading whitespace after a block opener is not a multiple of the
    /// configured indent unit.
    BadIndentation,
    /// Reserved for future checks; nothing currently emits it.
    Other,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnterminatedString => "unterminated-string",
            DiagnosticKind::MissingColon => "missing-colon",
            DiagnosticKind::BadIndentation => "bad-indentation",
            DiagnosticKind::Other => "other",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suspected syntax problem on one source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDiagnostic {
    /// 1-based line number in the scanned text.
    pub line: usize,
    /// What category of problem was suspected.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
}

/// Line-by-line heuristic scanner that surfaces several candidate syntax
/// problems in one pass.
///
/// This is a complement to a precise compiler-style check, which stops at
/// the first error: the scanner trades completeness for breadth, so an
/// editor's problem panel can show everything suspicious at once. It does
/// not attempt grammar validation, cross-line bracket balancing, or
/// multi-line string tracking.
///
/// Scanning is deterministic and side-effect free; identical input always
/// yields the identical diagnostic sequence, ordered by line number.
///
/// # Example
///
/// ```
/// use script_scan::{DiagnosticKind, ScanConfig, Scanner};
///
/// let scanner = Scanner::new(ScanConfig::default()).unwrap();
/// let diagnostics = scanner.scan("if True\n    pass\n");
/// assert_eq!(diagnostics.len(), 1);
/// assert_eq!(diagnostics[0].line, 1);
/// assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingColon);
/// ```
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    /// Creates a scanner, validating the configuration first.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidConfiguration`] for a config that fails
    /// [`ScanConfig::validate`].
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Scans `source` and returns every suspected problem, in line order.
    ///
    /// Blank and comment-only lines are skipped entirely; they neither
    /// receive checks nor count as the preceding line for the indentation
    /// check. A single line can contribute one diagnostic per check, in
    /// fixed check order: unterminated string, missing colon, bad
    /// indentation.
    pub fn scan(&self, source: &str) -> Vec<LineDiagnostic> {
        let mut diagnostics = Vec::new();
        let mut after_block_opener = false;

        for (index, line) in source.lines().enumerate() {
            let number = index + 1;
            let stripped = line.trim();
            if stripped.is_empty() || stripped.starts_with('#') {
                continue;
            }

            if let Some(d) = check_unterminated_string(line, number) {
                diagnostics.push(d);
            }
            if let Some(d) = check_missing_colon(stripped, number) {
                diagnostics.push(d);
            }
            if after_block_opener {
                if let Some(d) = self.check_indentation(line, number) {
                    diagnostics.push(d);
                }
            }

            after_block_opener = opens_block(stripped);
        }

        diagnostics
    }

    fn check_indentation(&self, line: &str, number: usize) -> Option<LineDiagnostic> {
        if !line.starts_with(' ') && !line.starts_with('\t') {
            return None;
        }
        let unit = self.config.indent_unit;
        let width = leading_width(line, unit);
        if width % unit == 0 {
            return None;
        }
        Some(LineDiagnostic {
            line: number,
            kind: DiagnosticKind::BadIndentation,
            message: format!("indentation of {width} is not a multiple of {unit} spaces"),
        })
    }
}

/// Width of the leading whitespace in columns; a tab counts as one indent
/// unit so pure-tab indentation never trips the check.
fn leading_width(line: &str, indent_unit: usize) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { indent_unit } else { 1 })
        .sum()
}

/// First identifier word of the stripped line, if it is a block keyword.
fn leading_keyword(stripped: &str) -> Option<&'static str> {
    let end = stripped
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(stripped.len());
    let word = &stripped[..end];
    BLOCK_KEYWORDS.iter().find(|kw| **kw == word).copied()
}

/// Whether the stripped line opens an indented block: it starts with a
/// block keyword and ends with `:`.
fn opens_block(stripped: &str) -> bool {
    leading_keyword(stripped).is_some() && stripped.ends_with(':')
}

fn check_missing_colon(stripped: &str, number: usize) -> Option<LineDiagnostic> {
    let keyword = leading_keyword(stripped)?;
    if stripped.contains(':') {
        return None;
    }
    Some(LineDiagnostic {
        line: number,
        kind: DiagnosticKind::MissingColon,
        message: format!("'{keyword}' statement is missing a ':'"),
    })
}

/// Walks the line tracking quote state: backslash escapes the next
/// character, an unescaped `#` outside a string starts a trailing comment,
/// and a string is closed only by the same unescaped quote that opened it.
/// Lines containing a triple-quote sequence are exempt — multi-line strings
/// cannot be judged from a single line.
fn check_unterminated_string(line: &str, number: usize) -> Option<LineDiagnostic> {
    if line.contains("\"\"\"") || line.contains("'''") {
        return None;
    }

    let mut open: Option<char> = None;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        match open {
            Some(quote) if c == quote => open = None,
            Some(_) => {}
            None => match c {
                '#' => break,
                '"' | '\'' => open = Some(c),
                _ => {}
            },
        }
    }

    open.map(|quote| LineDiagnostic {
        line: number,
        kind: DiagnosticKind::UnterminatedString,
        message: format!("unterminated string literal (opened with {quote})"),
    })
}
