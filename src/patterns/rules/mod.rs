//! Naming rules evaluated against one normalised line at a time
//!
//! Architectural Principle: Strategy Pattern - each rule is a small independent type
//! behind the `NamingRule` trait, evaluated by the `RuleEngine` in a fixed order

pub mod constructs;
pub mod naming;

use crate::analyzer::scope::ScopeSnapshot;
use crate::config::NamingConventions;
use crate::domain::violations::Severity;
use crate::patterns::exemptions::FileExemptions;

pub use constructs::{NullMacroRule, RawIntegerRule, UsingNamespaceRule};
pub use naming::{
    ClassNamingRule, LocalNamingRule, MacroCasingRule, MemberPrefixRule, MethodNamingRule,
};

/// Rule ids in evaluation order
pub const BUILTIN_RULE_IDS: [&str; 8] = [
    "method_naming",
    "member_prefix",
    "local_naming",
    "macro_casing",
    "class_naming",
    "using_namespace",
    "null_macro",
    "raw_integer",
];

/// Everything a rule may look at for one source line
#[derive(Debug)]
pub struct LineContext<'a> {
    /// 1-based line number
    pub number: u32,
    /// The line as read from the file
    pub raw: &'a str,
    /// Comments removed, literal bodies blanked
    pub stripped: &'a str,
    /// `stripped` with template arguments folded to `<>`
    pub collapsed: &'a str,
    /// Scope state before this line's braces
    pub scope: ScopeSnapshot,
    pub exemptions: &'a FileExemptions<'a>,
    pub naming: &'a NamingConventions,
}

/// A rule hit before it is attached to a file and severity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub message: String,
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// A single naming or construct check.
///
/// Implementations are stateless; all per-file state arrives through the
/// [`LineContext`].
pub trait NamingRule: Send + Sync {
    /// Stable snake_case identifier used in config and reports
    fn id(&self) -> &'static str;

    /// One-line summary for `rules`
    fn description(&self) -> &'static str;

    /// Longer explanation for `explain`
    fn explanation(&self) -> &'static str {
        self.description()
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, line: &LineContext<'_>) -> Vec<Finding>;
}

pub type RuleBox = Box<dyn NamingRule>;

/// All built-in rules in evaluation order
pub fn builtin_rules() -> Vec<RuleBox> {
    vec![
        Box::new(MethodNamingRule),
        Box::new(MemberPrefixRule),
        Box::new(LocalNamingRule),
        Box::new(MacroCasingRule),
        Box::new(ClassNamingRule),
        Box::new(UsingNamespaceRule),
        Box::new(NullMacroRule),
        Box::new(RawIntegerRule),
    ]
}

/// Look up a built-in rule by id
pub fn find_rule(id: &str) -> Option<RuleBox> {
    builtin_rules().into_iter().find(|rule| rule.id() == id)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::analyzer::scope::ScopeTracker;
    use crate::config::ExemptionConfig;
    use crate::patterns::exemptions::ExemptionSet;
    use crate::patterns::lexical::{collapse_templates, strip_line};

    /// Run one rule over `source` with real scope tracking and return
    /// `(line_number, message)` for every finding
    pub fn findings(rule: &dyn NamingRule, source: &str) -> Vec<(u32, String)> {
        let registry = ExemptionSet::new(&ExemptionConfig::default());
        let exemptions = registry.for_file(source);
        let naming = NamingConventions::default();
        let mut tracker = ScopeTracker::new();
        let mut out = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let stripped = strip_line(raw);
            let collapsed = collapse_templates(&stripped);
            let scope = tracker.advance(&stripped, &collapsed);
            let number = index as u32 + 1;
            let ctx = LineContext {
                number,
                raw,
                stripped: &stripped,
                collapsed: &collapsed,
                scope,
                exemptions: &exemptions,
                naming: &naming,
            };
            out.extend(rule.check(&ctx).into_iter().map(|f| (number, f.message)));
        }

        out
    }

    /// Findings for a single line placed directly inside a class body
    pub fn in_class(rule: &dyn NamingRule, line: &str) -> Vec<(u32, String)> {
        findings(rule, &format!("class Holder {{\n{line}\n}};\n"))
    }

    /// Findings for a single line placed inside a function body
    pub fn in_function(rule: &dyn NamingRule, line: &str) -> Vec<(u32, String)> {
        findings(rule, &format!("void run() {{\n{line}\n}}\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_match_id_order() {
        let ids: Vec<_> = builtin_rules().iter().map(|rule| rule.id()).collect();
        assert_eq!(ids, BUILTIN_RULE_IDS);
    }

    #[test]
    fn test_only_method_and_using_rules_are_blocking_by_default() {
        let blocking: Vec<_> = builtin_rules()
            .iter()
            .filter(|rule| rule.default_severity().is_blocking())
            .map(|rule| rule.id())
            .collect();
        assert_eq!(blocking, ["method_naming", "using_namespace"]);
    }

    #[test]
    fn test_find_rule() {
        assert_eq!(find_rule("null_macro").map(|r| r.id()), Some("null_macro"));
        assert!(find_rule("no_such_rule").is_none());
    }
}
