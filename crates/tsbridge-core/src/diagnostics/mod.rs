//! Diagnostic types and triage
//!
//! The external engine produces a flat diagnostic list; this module
//! partitions it by severity, groups buckets by originating file, and maps
//! byte offsets to line/character positions. Classification and grouping are
//! pure and total: empty input yields empty buckets, never an error.

mod renderer;

pub use renderer::ReportRenderer;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reserved group key for diagnostics that carry no file
pub const COMPILER_GROUP: &str = "Compiler";

/// Severity of a compiler-reported finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Message,
}

impl std::fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// One compiler-reported finding
///
/// `start`/`end` are zero-based byte offsets into the named file. A
/// diagnostic may be program-wide, with no file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    /// Name of the plugin reporting the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Diagnostic {
    pub fn new(category: DiagnosticCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            file: None,
            start: None,
            end: None,
            text: text.into(),
            code: None,
            source: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Error, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Warning, text)
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Message, text)
    }

    /// Attach the originating file and start offset
    pub fn with_location(mut self, file: impl Into<String>, start: usize) -> Self {
        self.file = Some(file.into());
        self.start = Some(start);
        self
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A flat diagnostic list triaged into severity buckets
///
/// The union of the three buckets, in original relative order, is exactly
/// the input list: a partition with no loss and no duplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub error: Vec<Diagnostic>,
    pub warning: Vec<Diagnostic>,
    pub message: Vec<Diagnostic>,
}

impl DiagnosticsReport {
    /// Partition a flat list by category, preserving relative order
    pub fn split(diagnostics: Vec<Diagnostic>) -> Self {
        let mut report = Self::default();
        for diagnostic in diagnostics {
            match diagnostic.category {
                DiagnosticCategory::Error => report.error.push(diagnostic),
                DiagnosticCategory::Warning => report.warning.push(diagnostic),
                DiagnosticCategory::Message => report.message.push(diagnostic),
            }
        }
        report
    }

    /// Wrap an opaque failure as a one-element error report, so the
    /// caller-visible failure surface is always printable
    pub fn from_error_text(text: impl Into<String>) -> Self {
        Self {
            error: vec![Diagnostic::error(text)],
            ..Self::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.error.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.error.len() + self.warning.len() + self.message.len()
    }
}

/// Group diagnostics by originating file name, preserving encounter order
///
/// File-less diagnostics land under the reserved [`COMPILER_GROUP`] key.
pub fn group_by_file(diagnostics: &[Diagnostic]) -> IndexMap<String, Vec<&Diagnostic>> {
    let mut groups: IndexMap<String, Vec<&Diagnostic>> = IndexMap::new();
    for diagnostic in diagnostics {
        let key = diagnostic
            .file
            .clone()
            .unwrap_or_else(|| COMPILER_GROUP.to_string());
        groups.entry(key).or_default().push(diagnostic);
    }
    groups
}

/// Byte-offset to line/character conversion for one source text
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self { line_starts }
    }

    /// Zero-based `(line, character)` for a byte offset, clamped to the
    /// start of the last line when out of range
    pub fn line_and_character(&self, offset: usize) -> (usize, usize) {
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        (line, offset - self.line_starts[line])
    }
}

/// Offset lookup across the files named by a diagnostic list
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    sources: HashMap<String, LineIndex>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: impl Into<String>, text: &str) {
        self.sources.insert(file.into(), LineIndex::new(text));
    }

    pub fn line_and_character(&self, file: &str, offset: usize) -> Option<(usize, usize)> {
        self.sources
            .get(file)
            .map(|index| index.line_and_character(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Diagnostic> {
        vec![
            Diagnostic::error("e1").with_location("a.ts", 0),
            Diagnostic::warning("w1").with_location("a.ts", 5),
            Diagnostic::error("e2").with_location("b.ts", 3),
            Diagnostic::message("m1"),
            Diagnostic::warning("w2"),
        ]
    }

    #[test]
    fn test_split_is_a_stable_partition() {
        let input = sample();
        let report = DiagnosticsReport::split(input.clone());

        assert_eq!(report.len(), input.len());
        let error_texts: Vec<&str> = report.error.iter().map(|d| d.text.as_str()).collect();
        let warning_texts: Vec<&str> = report.warning.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(error_texts, vec!["e1", "e2"]);
        assert_eq!(warning_texts, vec!["w1", "w2"]);
        assert_eq!(report.message[0].text, "m1");
    }

    #[test]
    fn test_split_empty_is_empty() {
        let report = DiagnosticsReport::split(Vec::new());
        assert!(report.is_empty());
        assert!(!report.has_errors());
    }

    #[test]
    fn test_group_by_file_totality() {
        let input = sample();
        let groups = group_by_file(&input);

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, input.len());
        assert_eq!(groups.get("a.ts").unwrap().len(), 2);
        assert_eq!(groups.get(COMPILER_GROUP).unwrap().len(), 2);
        // Encounter order of the keys is preserved
        let keys: Vec<&String> = groups.keys().collect();
        assert_eq!(keys, vec!["a.ts", "b.ts", COMPILER_GROUP]);
    }

    #[test]
    fn test_line_index_positions() {
        let index = LineIndex::new("ab\ncd\nefghijklmn\n");
        assert_eq!(index.line_and_character(0), (0, 0));
        assert_eq!(index.line_and_character(4), (1, 1));
        // Offset at zero-based line 2, character 9
        assert_eq!(index.line_and_character(15), (2, 9));
    }

    #[test]
    fn test_from_error_text_is_printable_report() {
        let report = DiagnosticsReport::from_error_text("engine exploded");
        assert!(report.has_errors());
        assert_eq!(report.error[0].text, "engine exploded");
    }
}
