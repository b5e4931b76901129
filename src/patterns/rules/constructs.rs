//! Banned constructs and raw integer types

use super::{Finding, LineContext, NamingRule};
use crate::domain::violations::Severity;
use regex::Regex;
use std::sync::LazyLock;

static USING_NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\busing\s+namespace\b").expect("using namespace regex is valid"));

static NULL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bNULL\b").expect("NULL regex is valid"));

/// Checked in order; the first hit wins so `unsigned int` is not also reported as `int`
static RAW_INTEGERS: LazyLock<Vec<(Regex, &'static str, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bunsigned\s+long\s+long(?:\s+int)?\b", "unsigned long long", "uint64_t"),
        (r"\blong\s+long(?:\s+int)?\b", "long long", "int64_t"),
        (r"\bunsigned\s+int\b", "unsigned int", "uint32_t"),
        (r"\bunsigned\s+short(?:\s+int)?\b", "unsigned short", "uint16_t"),
        (r"\bshort(?:\s+int)?\b", "short", "int16_t"),
        (r"\bint\b", "int", "int32_t"),
    ]
    .into_iter()
    .map(|(pattern, found, preferred)| {
        (Regex::new(pattern).expect("integer type regex is valid"), found, preferred)
    })
    .collect()
});

static RAW_INTEGER_EXEMPT: LazyLock<Regex> = LazyLock::new(|| {
    // Matched on the stripped line, where `extern "C"` reads `extern ""`
    Regex::new(r#"\bmain\s*\(|\bargc\b|\bextern\s+"C?""#).expect("integer exemption regex is valid")
});

static MACRO_DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*define\s+(\w+)").expect("define regex is valid"));

pub struct UsingNamespaceRule;

impl NamingRule for UsingNamespaceRule {
    fn id(&self) -> &'static str {
        "using_namespace"
    }

    fn description(&self) -> &'static str {
        "`using namespace` directives are not allowed"
    }

    fn explanation(&self) -> &'static str {
        "Any `using namespace` directive is an error, in headers and sources, at any scope. \
         Qualify names explicitly or use a namespace alias (`namespace fs = std::filesystem;`)."
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, line: &LineContext<'_>) -> Vec<Finding> {
        if !USING_NAMESPACE.is_match(line.stripped) {
            return Vec::new();
        }
        vec![Finding::new("Avoid 'using namespace' directives; qualify names explicitly")]
    }
}

pub struct NullMacroRule;

impl NamingRule for NullMacroRule {
    fn id(&self) -> &'static str {
        "null_macro"
    }

    fn description(&self) -> &'static str {
        "Use nullptr instead of NULL"
    }

    fn check(&self, line: &LineContext<'_>) -> Vec<Finding> {
        if !NULL_TOKEN.is_match(line.stripped) {
            return Vec::new();
        }
        vec![Finding::new("Use 'nullptr' instead of 'NULL'").with_suggestion("nullptr")]
    }
}

pub struct RawIntegerRule;

impl RawIntegerRule {
    fn is_exempt(line: &LineContext<'_>) -> bool {
        if RAW_INTEGER_EXEMPT.is_match(line.stripped) {
            return true;
        }
        MACRO_DEFINE
            .captures(line.stripped)
            .is_some_and(|caps| line.exemptions.is_system_macro(&caps[1]))
    }
}

impl NamingRule for RawIntegerRule {
    fn id(&self) -> &'static str {
        "raw_integer"
    }

    fn description(&self) -> &'static str {
        "Prefer fixed-width integer types over int, short and long long"
    }

    fn explanation(&self) -> &'static str {
        "Bare `int`, `short`, `unsigned int`, `unsigned short`, `long long` and `unsigned long \
         long` are reported with their fixed-width replacement. Template arguments are folded \
         first, so `std::vector<int>` is not reported. Lines containing `main(`, `argc` or \
         `extern \"C\"`, and definitions of system macros, are exempt. At most one warning \
         is produced per line."
    }

    fn check(&self, line: &LineContext<'_>) -> Vec<Finding> {
        if Self::is_exempt(line) {
            return Vec::new();
        }

        RAW_INTEGERS
            .iter()
            .find(|(pattern, _, _)| pattern.is_match(line.collapsed))
            .map(|(_, found, preferred)| {
                Finding::new(format!("Use '{preferred}' instead of '{found}' for integer types"))
                    .with_suggestion(*preferred)
            })
            .into_iter()
            .collect()
    }
}
