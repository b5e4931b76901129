//! Line normalisation, exemptions and the naming rule engine
//!
//! Architectural Principle: Service Layer - RuleEngine orchestrates the rule set
//! - Each rule implements the NamingRule trait for clean polymorphism
//! - Config switches and severity overrides are applied once, at construction
//! - Rule findings are translated to violations at the boundary

pub mod declaration;
pub mod exemptions;
pub mod lexical;
pub mod path_filter;
pub mod rules;

use crate::config::GuardConfig;
use crate::domain::violations::{Severity, Violation};
use rules::{builtin_rules, LineContext, RuleBox};
use std::fmt;
use std::path::Path;

pub use exemptions::{ExemptionSet, FileExemptions};
pub use path_filter::PathFilter;

/// A rule together with the severity it reports at
struct ActiveRule {
    rule: RuleBox,
    severity: Severity,
}

/// Ordered set of enabled rules
pub struct RuleEngine {
    rules: Vec<ActiveRule>,
}

impl RuleEngine {
    /// Build the engine from config: disabled rules are dropped, overrides applied
    pub fn new(config: &GuardConfig) -> Self {
        let rules = builtin_rules()
            .into_iter()
            .filter_map(|rule| {
                let settings = config.rule_settings(rule.id());
                if !settings.enabled {
                    tracing::debug!("Rule '{}' disabled by configuration", rule.id());
                    return None;
                }
                let severity = settings.severity.unwrap_or_else(|| rule.default_severity());
                Some(ActiveRule { rule, severity })
            })
            .collect();

        Self { rules }
    }

    /// Engine with every built-in rule at its default severity
    pub fn with_defaults() -> Self {
        Self::new(&GuardConfig::default())
    }

    /// Run every enabled rule on one line, in order
    pub fn check_line(&self, file_path: &Path, line: &LineContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for active in &self.rules {
            for finding in active.rule.check(line) {
                tracing::debug!(
                    "{}:{}: rule '{}' matched",
                    file_path.display(),
                    line.number,
                    active.rule.id()
                );

                let mut violation = Violation::new(
                    active.rule.id(),
                    active.severity,
                    file_path.to_path_buf(),
                    line.number,
                    finding.message,
                )
                .with_context(line.raw.trim());

                if let Some(suggestion) = finding.suggestion {
                    violation = violation.with_suggestion(suggestion);
                }
                violations.push(violation);
            }
        }

        violations
    }

    /// Enabled rules with their effective severity, in evaluation order
    pub fn enabled_rules(&self) -> impl Iterator<Item = (&'static str, Severity)> + '_ {
        self.rules.iter().map(|active| (active.rule.id(), active.severity))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.enabled_rules()).finish()
    }
}
