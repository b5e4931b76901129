//! C and C++ source analysis
//!
//! Architecture: Single Pass - every line goes through the same pipeline
//! - optional block comment blanking, then stripping and template folding
//! - scope tracking on the normalised line
//! - the rule engine, fed a scope snapshot from before the line's braces

use crate::analyzer::scope::ScopeTracker;
use crate::analyzer::FileAnalyzer;
use crate::config::{GuardConfig, NamingConventions};
use crate::domain::violations::{GuardResult, StyleReport};
use crate::patterns::lexical::{collapse_templates, strip_line, BlockCommentFilter};
use crate::patterns::path_filter::has_extension;
use crate::patterns::rules::LineContext;
use crate::patterns::{ExemptionSet, RuleEngine};
use std::borrow::Cow;
use std::path::Path;

/// One line of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based
    pub number: u32,
    pub text: &'a str,
}

/// Split file content into numbered lines. `\r\n` endings are handled.
pub fn source_lines(content: &str) -> impl Iterator<Item = SourceLine<'_>> {
    content.lines().enumerate().map(|(index, text)| SourceLine {
        number: u32::try_from(index + 1).unwrap_or(u32::MAX),
        text,
    })
}

/// Decode bytes as UTF-8, dropping invalid sequences.
///
/// The flag is true when anything had to be dropped.
pub fn decode_lenient(bytes: &[u8]) -> (String, bool) {
    let mut text = String::with_capacity(bytes.len());
    let mut lossy = false;

    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        if !chunk.invalid().is_empty() {
            lossy = true;
        }
    }

    (text, lossy)
}

/// Naming analysis for C and C++ files
#[derive(Debug)]
pub struct CppAnalyzer {
    engine: RuleEngine,
    exemptions: ExemptionSet,
    naming: NamingConventions,
    extensions: Vec<String>,
    track_block_comments: bool,
}

impl CppAnalyzer {
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            engine: RuleEngine::new(config),
            exemptions: ExemptionSet::new(&config.exemptions),
            naming: config.naming.clone(),
            extensions: config.paths.extensions.clone(),
            track_block_comments: config.analysis.track_block_comments,
        }
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }
}

impl FileAnalyzer for CppAnalyzer {
    fn analyze(&self, file_path: &Path, content: &str) -> GuardResult<StyleReport> {
        let exemptions = self.exemptions.for_file(content);
        let mut tracker = ScopeTracker::new();
        let mut comments = self.track_block_comments.then(BlockCommentFilter::new);
        let mut report = StyleReport::new();
        report.record_file_checked();

        for line in source_lines(content) {
            let text = match comments.as_mut() {
                Some(filter) => Cow::Owned(filter.filter(line.text)),
                None => Cow::Borrowed(line.text),
            };
            let stripped = strip_line(&text);
            let collapsed = collapse_templates(&stripped);
            let scope = tracker.advance(&stripped, &collapsed);

            if stripped.is_empty() {
                continue;
            }

            let ctx = LineContext {
                number: line.number,
                raw: line.text,
                stripped: &stripped,
                collapsed: &collapsed,
                scope,
                exemptions: &exemptions,
                naming: &self.naming,
            };
            for violation in self.engine.check_line(file_path, &ctx) {
                report.add_violation(violation);
            }
        }

        if tracker.depth() != 0 {
            tracing::debug!(
                "{}: {} unclosed brace(s) at end of file",
                file_path.display(),
                tracker.depth()
            );
        }

        Ok(report)
    }

    fn handles_file(&self, file_path: &Path) -> bool {
        self.extensions
            .iter()
            .any(|extension| has_extension(file_path, extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::domain::violations::Severity;

    fn analyze(source: &str) -> StyleReport {
        let analyzer = CppAnalyzer::new(&GuardConfig::default());
        analyzer.analyze(Path::new("src/engine.cpp"), source).unwrap()
    }

    fn rule_hits(report: &StyleReport) -> Vec<(u32, &str)> {
        report
            .violations
            .iter()
            .map(|v| (v.line_number, v.rule_id.as_str()))
            .collect()
    }

    #[test]
    fn test_decode_lenient_drops_invalid_bytes() {
        let (text, lossy) = decode_lenient(b"int32_t m_x;\xff\xfe\n");
        assert_eq!(text, "int32_t m_x;\n");
        assert!(lossy);

        let (text, lossy) = decode_lenient("auto s = \"h\u{e9}\";".as_bytes());
        assert_eq!(text, "auto s = \"h\u{e9}\";");
        assert!(!lossy);
    }

    #[test]
    fn test_source_lines_are_one_based() {
        let lines: Vec<_> = source_lines("a\r\nb\n").collect();
        assert_eq!(lines, [SourceLine { number: 1, text: "a" }, SourceLine { number: 2, text: "b" }]);
    }

    #[test]
    fn test_clean_file_has_no_violations() {
        let source = r#"#ifndef _ENGINE_H
#define _ENGINE_H
#define MAX_RETRIES 3

namespace app {

class Engine {
public:
    void doThing();
    int32_t getCount() const { return m_count; }

private:
    int32_t m_count;
    Node* p_head;
    std::unique_ptr<Worker> up_worker;
    std::vector<int32_t> m_values;
};

void Engine::doThing() {
    int32_t retry_count = 0;
    Node* p_node = p_head;
    if (p_node != nullptr) {
        retry_count++;
    }
}

}
#endif
"#;
        let report = analyze(source);
        assert!(report.violations.is_empty(), "{:#?}", report.violations);
        assert_eq!(report.summary.files_checked, 1);
    }

    #[test]
    fn test_mixed_violations_in_discovery_order() {
        let source = r#"#include <string>
using namespace std;

class Engine {
    int32_t count;
    Node* next;
    std::vector<int32_t> m_values;
};

void Engine::DoThing() {
    int total = NULL;
}
"#;
        let report = analyze(source);
        assert_eq!(
            rule_hits(&report),
            [
                (2, "using_namespace"),
                (5, "member_prefix"),
                (6, "member_prefix"),
                (10, "method_naming"),
                (11, "null_macro"),
                (11, "raw_integer"),
            ]
        );
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.warning_count(), 4);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_declarations_initialised_from_calls_are_checked() {
        let source = "\
void Engine::run() {
    Node* node = lookup(key);
    int32_t retryCount = compute(a);
    std::unique_ptr<Engine> engine = std::make_unique<Engine>();
    Node* p_ok = lookup(key);
}
class Holder {
    int32_t count = compute(1);
    Node* next = make(2);
};
";
        assert_eq!(
            rule_hits(&analyze(source)),
            [
                (2, "local_naming"),
                (3, "local_naming"),
                (4, "local_naming"),
                (8, "member_prefix"),
                (9, "member_prefix"),
            ]
        );
    }

    #[test]
    fn test_expressions_are_not_method_definitions() {
        let source = "void f() {\n    total * Engine::Factor(x);\n    mask & Flags::Read(bits);\n}\n";
        let report = analyze(source);
        assert!(report.violations.is_empty(), "{:#?}", report.violations);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_export_macro_class_body_is_checked() {
        let source = "class EXPORT_API Widget {\n    int32_t count;\n};\nclass Other {\n    int32_t total;\n};\n";
        assert_eq!(rule_hits(&analyze(source)), [(2, "member_prefix"), (5, "member_prefix")]);
    }

    #[test]
    fn test_comment_mentioning_argc_does_not_exempt_raw_integers() {
        let report = analyze("int x = 0; // argc\n");
        assert_eq!(rule_hits(&report), [(1, "raw_integer")]);
    }

    #[test]
    fn test_block_comments_are_checked_unless_tracking_is_enabled() {
        let source = "/*\nvoid Engine::DoThing() {}\n*/\n";

        assert_eq!(analyze(source).error_count(), 1);

        let config = ConfigBuilder::new().track_block_comments(true).build().unwrap();
        let analyzer = CppAnalyzer::new(&config);
        let report = analyzer.analyze(Path::new("a.cpp"), source).unwrap();
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_violation_carries_context_and_suggestion() {
        let report = analyze("class Engine {\n    int32_t count;\n};\n");
        let violation = &report.violations[0];

        assert_eq!(violation.severity, Severity::Warning);
        assert_eq!(violation.context.as_deref(), Some("int32_t count;"));
        assert_eq!(violation.suggested_fix.as_deref(), Some("m_count"));
        assert_eq!(violation.file_path, Path::new("src/engine.cpp"));
    }

    #[test]
    fn test_handles_configured_extensions_only() {
        let analyzer = CppAnalyzer::new(&GuardConfig::default());
        assert!(analyzer.handles_file(Path::new("a/engine.cpp")));
        assert!(analyzer.handles_file(Path::new("a/engine.h")));
        assert!(!analyzer.handles_file(Path::new("a/engine.hpp")));
        assert!(!analyzer.handles_file(Path::new("Makefile")));
    }
}
