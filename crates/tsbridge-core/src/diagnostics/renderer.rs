//! Human-readable rendering of a diagnostics report
//!
//! The printed shape is a stable contract: for each non-empty severity
//! bucket, in order Errors -> Warnings -> Messages, a colored header line
//! `"[TS]  <Title>:"`, then per file a `"[TS]    <fileName>:"` line, then
//! each diagnostic indented four spaces under it.

use super::{Diagnostic, DiagnosticsReport, SourceMap, group_by_file};
use crate::console::{Color, Console};

/// Prefix stamped on every report line
const LINE_PREFIX: &str = "[TS]  ";

/// Code suffix prefix used when the diagnostic names no reporting source
const DEFAULT_CODE_PREFIX: &str = "TS";

/// Renders diagnostics into display lines; pure formatting, never fails
pub struct ReportRenderer {
    console: Console,
    sources: SourceMap,
}

impl ReportRenderer {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            sources: SourceMap::new(),
        }
    }

    /// Attach source texts so offsets can be rendered as `[line,column]`
    pub fn with_sources(mut self, sources: SourceMap) -> Self {
        self.sources = sources;
        self
    }

    /// Render one diagnostic into a display string
    ///
    /// With a file, a start offset, and known source text the message is
    /// prefixed by a 1-based `[line,column]` pair; a `[<prefix><code>]`
    /// suffix is appended whenever a code is present.
    pub fn format_one(&self, diagnostic: &Diagnostic) -> String {
        let mut rendered = String::new();

        if let (Some(file), Some(start)) = (&diagnostic.file, diagnostic.start)
            && let Some((line, character)) = self.sources.line_and_character(file, start)
        {
            let position = format!("[{},{}]", line + 1, character + 1);
            rendered.push_str(&self.console.colorize(&position, Color::Dim));
            rendered.push(' ');
        }

        rendered.push_str(&diagnostic.text);

        if let Some(code) = diagnostic.code {
            let prefix = diagnostic.source.as_deref().unwrap_or(DEFAULT_CODE_PREFIX);
            let suffix = format!("[{prefix}{code}]");
            rendered.push(' ');
            rendered.push_str(&self.console.colorize(&suffix, Color::Magenta));
        }

        rendered
    }

    /// Render the full report into printable lines
    ///
    /// Empty buckets are skipped entirely; an empty report renders to no
    /// lines at all.
    pub fn format_report(&self, report: &DiagnosticsReport) -> Vec<String> {
        let mut lines = Vec::new();
        self.format_group(&mut lines, "Errors", Color::Red, &report.error);
        self.format_group(&mut lines, "Warnings", Color::Yellow, &report.warning);
        self.format_group(&mut lines, "Messages", Color::Blue, &report.message);
        lines
    }

    fn format_group(
        &self,
        lines: &mut Vec<String>,
        title: &str,
        color: Color,
        bucket: &[Diagnostic],
    ) {
        if bucket.is_empty() {
            return;
        }

        let prefix = self.console.colorize(LINE_PREFIX, Color::Dim);
        lines.push(format!(
            "{prefix}{}",
            self.console.colorize(&format!("{title}:"), color)
        ));

        for (file, diagnostics) in group_by_file(bucket) {
            lines.push(format!("{prefix}{}", pad(&format!("{file}:"), 2)));
            for diagnostic in diagnostics {
                lines.push(format!("{prefix}{}", pad(&self.format_one(diagnostic), 4)));
            }
        }
    }

    /// Print the report to stdout, one line at a time
    pub fn print_report(&self, report: &DiagnosticsReport) {
        for line in self.format_report(report) {
            println!("{line}");
        }
    }
}

fn pad(text: &str, count: usize) -> String {
    format!("{}{}", " ".repeat(count), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCategory;

    fn renderer_with(file: &str, text: &str) -> ReportRenderer {
        let mut sources = SourceMap::new();
        sources.insert(file, text);
        ReportRenderer::new(Console::no_colors()).with_sources(sources)
    }

    #[test]
    fn test_format_one_position_is_one_based() {
        // Offset 25 sits at zero-based line 3, character 10
        let text = "aaaa\nbbbb\ncccc\nddddddddddXX\n";
        assert_eq!(&text.as_bytes()[25], &b'X');
        let renderer = renderer_with("a.ts", text);

        let diagnostic = Diagnostic::error("Unexpected token")
            .with_location("a.ts", 25)
            .with_code(1005);
        assert_eq!(
            renderer.format_one(&diagnostic),
            "[4,11] Unexpected token [TS1005]"
        );
    }

    #[test]
    fn test_format_one_without_file_keeps_code_suffix() {
        let renderer = ReportRenderer::new(Console::no_colors());
        let diagnostic = Diagnostic::error("Cannot find tsconfig").with_code(5058);
        assert_eq!(
            renderer.format_one(&diagnostic),
            "Cannot find tsconfig [TS5058]"
        );
    }

    #[test]
    fn test_format_one_custom_source_prefix() {
        let renderer = ReportRenderer::new(Console::no_colors());
        let diagnostic = Diagnostic::warning("deprecated API")
            .with_code(6385)
            .with_source("LINT");
        assert_eq!(renderer.format_one(&diagnostic), "deprecated API [LINT6385]");
    }

    #[test]
    fn test_format_report_groups_and_order() {
        let renderer = ReportRenderer::new(Console::no_colors());
        let report = DiagnosticsReport::split(vec![
            Diagnostic::warning("w").with_location("a.ts", 0),
            Diagnostic::error("e1").with_location("a.ts", 0),
            Diagnostic::new(DiagnosticCategory::Error, "e2"),
        ]);

        let lines = renderer.format_report(&report);
        assert_eq!(
            lines,
            vec![
                "[TS]  Errors:",
                "[TS]    a.ts:",
                "[TS]      e1",
                "[TS]    Compiler:",
                "[TS]      e2",
                "[TS]  Warnings:",
                "[TS]    a.ts:",
                "[TS]      w",
            ]
        );
    }

    #[test]
    fn test_empty_report_renders_nothing() {
        let renderer = ReportRenderer::new(Console::no_colors());
        assert!(renderer.format_report(&DiagnosticsReport::default()).is_empty());
    }
}
