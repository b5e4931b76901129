//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - StyleReport (domain) is converted to various external representations
//! - Each formatter encapsulates the rules for its specific output format
//! - Truncation is a display concern only; counts always reflect the full report

use crate::domain::violations::{GuardError, GuardResult, Severity, StyleReport, Violation};
use colored::{Color, Colorize};
use serde_json::Value as JsonValue;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

const BANNER_WIDTH: usize = 70;

/// Supported output formats for style reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Banner report for terminals
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// GitHub Actions workflow annotations
    GitHub,
}

impl OutputFormat {
    /// Parse format from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "github" => Some(Self::GitHub),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json", "github"]
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Warnings listed before the rest are summarised as "... and N more"
    pub warning_display_limit: usize,
    /// Whether to print suggested renames under each violation
    pub show_suggestions: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            warning_display_limit: 20,
            show_suggestions: false,
        }
    }
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Header printed before a human-format run starts
    pub fn format_header(&self, target: &Path) -> String {
        format!(
            "🔍 Checking coding style in: {}\n{}\n",
            target.display(),
            "=".repeat(BANNER_WIDTH)
        )
    }

    /// Format a style report in the specified format
    pub fn format_report(&self, report: &StyleReport, format: OutputFormat) -> GuardResult<String> {
        match format {
            OutputFormat::Human => Ok(self.format_human(report)),
            OutputFormat::Json => self.format_json(report),
            OutputFormat::GitHub => Ok(self.format_github(report)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &StyleReport,
        format: OutputFormat,
        mut writer: W,
    ) -> GuardResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.options.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn push_violation(&self, output: &mut String, violation: &Violation) {
        let _ = writeln!(output, "  {}", violation.format_display());
        if self.options.show_suggestions {
            if let Some(suggestion) = &violation.suggested_fix {
                let hint = format!("💡 {suggestion}");
                let _ = writeln!(output, "    {}", self.paint(&hint, Color::Green));
            }
        }
    }

    /// Banner, counts, errors in full, warnings up to the display limit
    fn format_human(&self, report: &StyleReport) -> String {
        let mut output = String::new();
        let banner = "=".repeat(BANNER_WIDTH);

        let _ = writeln!(output, "\n{banner}");
        let _ = writeln!(output, "Coding Style Check Report");
        let _ = writeln!(output, "{banner}");
        let _ = writeln!(output, "Files checked: {}", report.summary.files_checked);
        let _ = writeln!(output, "Errors: {}", report.error_count());
        let _ = writeln!(output, "Warnings: {}", report.warning_count());
        let _ = writeln!(output, "{banner}\n");

        if report.error_count() > 0 {
            let _ = writeln!(output, "❌ {}", self.paint("ERRORS (Must Fix):", Color::Red));
            for violation in report.violations_by_severity(Severity::Error) {
                self.push_violation(&mut output, violation);
            }
            output.push('\n');
        }

        let warning_count = report.warning_count();
        if warning_count > 0 {
            let limit = self.options.warning_display_limit;
            let _ = writeln!(output, "⚠️  {}", self.paint("WARNINGS (Should Fix):", Color::Yellow));
            for violation in report.violations_by_severity(Severity::Warning).take(limit) {
                self.push_violation(&mut output, violation);
            }
            if warning_count > limit {
                let _ = writeln!(output, "  ... and {} more warnings", warning_count - limit);
            }
            output.push('\n');
        }

        if !report.has_violations() {
            let _ = writeln!(
                output,
                "✅ {}",
                self.paint("All checks passed! Code follows the naming conventions.", Color::Green)
            );
        }

        output
    }

    /// Format report in JSON format
    fn format_json(&self, report: &StyleReport) -> GuardResult<String> {
        let json_violations: Vec<JsonValue> = report
            .violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "rule_id": v.rule_id,
                    "severity": v.severity.as_str(),
                    "file_path": v.file_path.display().to_string(),
                    "line_number": v.line_number,
                    "message": v.message,
                    "context": v.context,
                    "suggested_fix": v.suggested_fix,
                })
            })
            .collect();

        let json_report = serde_json::json!({
            "violations": json_violations,
            "summary": {
                "files_checked": report.summary.files_checked,
                "violations_by_severity": {
                    "error": report.summary.violations_by_severity.error,
                    "warning": report.summary.violations_by_severity.warning
                },
                "execution_time_ms": report.summary.execution_time_ms,
                "validated_at": report.summary.validated_at.to_rfc3339()
            },
            "config_fingerprint": report.config_fingerprint
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| GuardError::config(format!("JSON serialization failed: {e}")))
    }

    /// Format report for GitHub Actions
    fn format_github(&self, report: &StyleReport) -> String {
        let mut output = String::new();

        for violation in &report.violations {
            let _ = writeln!(
                output,
                "::{} file={},line={},title={}::{}",
                violation.severity.as_str(),
                violation.file_path.display(),
                violation.line_number,
                violation.rule_id,
                violation.message
            );
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn plain() -> ReportFormatter {
        ReportFormatter::new(ReportOptions {
            use_colors: false,
            ..Default::default()
        })
    }

    fn warning(line: u32) -> Violation {
        Violation::new(
            "member_prefix",
            Severity::Warning,
            PathBuf::from("src/engine.h"),
            line,
            format!("Member variable 'v{line}' should use m_ prefix"),
        )
        .with_suggestion(format!("m_v{line}"))
    }

    fn create_test_report() -> StyleReport {
        let mut report = StyleReport::new();
        report.record_file_checked();
        report.record_file_checked();
        report.add_violation(
            Violation::new(
                "method_naming",
                Severity::Error,
                PathBuf::from("src/engine.cpp"),
                12,
                "Method 'DoThing' should use camelCase",
            )
            .with_context("void Engine::DoThing() {}")
            .with_suggestion("doThing"),
        );
        report.add_violation(warning(3));
        report
    }

    #[test]
    fn test_human_format() {
        let output = plain().format_report(&create_test_report(), OutputFormat::Human).unwrap();
        let banner = "=".repeat(70);

        assert!(output.starts_with(&format!("\n{banner}\nCoding Style Check Report\n{banner}\n")));
        assert!(output.contains("Files checked: 2\nErrors: 1\nWarnings: 1\n"));
        assert!(output.contains("❌ ERRORS (Must Fix):\n  src/engine.cpp:12: Method 'DoThing' should use camelCase\n"));
        assert!(output.contains("⚠️  WARNINGS (Should Fix):\n  src/engine.h:3: Member variable 'v3' should use m_ prefix\n"));
        assert!(!output.contains("All checks passed"));
        assert!(!output.contains("💡"));
    }

    #[test]
    fn test_warnings_are_truncated_for_display_only() {
        let mut report = StyleReport::new();
        for line in 1..=23 {
            report.add_violation(warning(line));
        }

        let output = plain().format_report(&report, OutputFormat::Human).unwrap();
        assert!(output.contains("Warnings: 23\n"));
        assert!(output.contains("src/engine.h:20:"));
        assert!(!output.contains("src/engine.h:21:"));
        assert!(output.contains("  ... and 3 more warnings\n"));
        assert_eq!(report.warning_count(), 23);
    }

    #[test]
    fn test_custom_display_limit_and_suggestions() {
        let formatter = ReportFormatter::new(ReportOptions {
            use_colors: false,
            warning_display_limit: 1,
            show_suggestions: true,
        });
        let mut report = create_test_report();
        report.add_violation(warning(4));

        let output = formatter.format_report(&report, OutputFormat::Human).unwrap();
        assert!(output.contains("    💡 doThing\n"));
        assert!(output.contains("    💡 m_v3\n"));
        assert!(!output.contains("m_v4"));
        assert!(output.contains("... and 1 more warnings"));
    }

    #[test]
    fn test_empty_report() {
        let output = plain().format_report(&StyleReport::new(), OutputFormat::Human).unwrap();
        assert!(output.contains("Errors: 0\n"));
        assert!(output.contains("✅ All checks passed! Code follows the naming conventions."));
        assert!(!output.contains("ERRORS"));
    }

    #[test]
    fn test_header() {
        let header = plain().format_header(Path::new("/work/src"));
        assert_eq!(header, format!("🔍 Checking coding style in: /work/src\n{}\n", "=".repeat(70)));
    }

    #[test]
    fn test_json_format() {
        let output = plain().format_report(&create_test_report(), OutputFormat::Json).unwrap();
        let json: JsonValue = serde_json::from_str(&output).unwrap();

        assert_eq!(json["violations"].as_array().unwrap().len(), 2);
        assert_eq!(json["violations"][0]["rule_id"], "method_naming");
        assert_eq!(json["violations"][0]["severity"], "error");
        assert_eq!(json["violations"][0]["suggested_fix"], "doThing");
        assert_eq!(json["summary"]["files_checked"], 2);
        assert_eq!(json["summary"]["violations_by_severity"]["warning"], 1);
    }

    #[test]
    fn test_github_format() {
        let output = plain().format_report(&create_test_report(), OutputFormat::GitHub).unwrap();
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(
            lines[0],
            "::error file=src/engine.cpp,line=12,title=method_naming::Method 'DoThing' should use camelCase"
        );
        assert!(lines[1].starts_with("::warning file=src/engine.h,line=3,title=member_prefix::"));
    }

    #[test]
    fn test_write_report_to_writer() {
        let mut buffer = Vec::new();
        plain()
            .write_report(&create_test_report(), OutputFormat::GitHub, &mut buffer)
            .unwrap();
        let written = String::from_utf8(buffer).unwrap();
        assert_eq!(written.lines().count(), 2);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("github"), Some(OutputFormat::GitHub));
        assert_eq!(OutputFormat::parse("sarif"), None);
        assert_eq!(OutputFormat::all_formats().len(), 3);
    }
}
