//! Identifier naming rules: methods, members, locals, macros and classes

use super::{Finding, LineContext, NamingRule};
use crate::config::NamingConventions;
use crate::domain::violations::Severity;
use crate::patterns::declaration::{
    class_header, has_prefixed_snake_name, is_camel_case, is_pascal_case, is_snake_case,
    is_upper_snake_case, parse_declaration, to_camel_case, to_pascal_case, to_snake_case,
    Declaration, DeclarationKind, Ownership,
};
use regex::Regex;
use std::sync::LazyLock;

/// `[specifiers] ReturnType [Chain::]Owner::name(`
static METHOD_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:(?:static|inline|virtual|constexpr|explicit|extern|friend|const|unsigned|signed)\s+)*(?P<ret>[A-Za-z_][\w:]*(?:<>)?)(?:\s*[\*&]+\s*|\s+)(?:const\s*[\*&]*\s*)?(?P<chain>(?:\w+(?:<>)?::)*)(?P<owner>[A-Z]\w*)(?:<>)?::(?P<name>~?\w+|operator\b[^(]*)\s*\(",
    )
    .expect("method definition regex is valid")
});

static NAMESPACE_QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\w+)::").expect("namespace qualifier regex is valid"));

static MACRO_DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*define\s+(\w+)").expect("define regex is valid"));

/// Keywords that can precede `Owner::name(` without being a return type
const NON_RETURN_KEYWORDS: &[&str] = &[
    "return", "else", "new", "delete", "throw", "case", "goto", "co_return", "co_yield",
    "co_await", "using", "typedef", "namespace", "sizeof",
];

pub struct MethodNamingRule;

impl NamingRule for MethodNamingRule {
    fn id(&self) -> &'static str {
        "method_naming"
    }

    fn description(&self) -> &'static str {
        "Out-of-class method definitions must use camelCase names"
    }

    fn explanation(&self) -> &'static str {
        "A line shaped like `ReturnType Owner::name(` defines a method. The name must match \
         ^[a-z][A-Za-z0-9]*$. Constructors, destructors and operators are exempt, as is any \
         line that references an external namespace (for example std:: or v8::) or a \
         namespace alias declared in the same file."
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, line: &LineContext<'_>) -> Vec<Finding> {
        // A definition never ends in `;`; `a * Owner::Call(x);` is an expression
        if line.stripped.trim_end().ends_with(';') {
            return Vec::new();
        }

        let Some(caps) = METHOD_DEFINITION.captures(line.collapsed) else {
            return Vec::new();
        };

        if NON_RETURN_KEYWORDS.contains(&&caps["ret"]) {
            return Vec::new();
        }

        let name = &caps["name"];
        let owner = &caps["owner"];
        if name.starts_with('~') || name.starts_with("operator") || name == owner {
            return Vec::new();
        }

        let references_external = NAMESPACE_QUALIFIER
            .captures_iter(line.collapsed)
            .any(|qualifier| line.exemptions.is_external_namespace(&qualifier[1]));
        if references_external || is_camel_case(name) {
            return Vec::new();
        }

        vec![Finding::new(format!("Method '{name}' should use camelCase"))
            .with_suggestion(to_camel_case(name))]
    }
}

/// Strip any configured prefix so the suggestion does not stack them (`m_p_x`)
fn bare_name<'a>(name: &'a str, naming: &NamingConventions) -> &'a str {
    naming
        .all_prefixes()
        .into_iter()
        .find_map(|prefix| name.strip_prefix(prefix).filter(|rest| !rest.is_empty()))
        .unwrap_or(name)
}

fn smart_prefix(ownership: Ownership, naming: &NamingConventions) -> &str {
    match ownership {
        Ownership::Unique => &naming.unique_prefix,
        Ownership::Shared => &naming.shared_prefix,
        Ownership::Weak => &naming.weak_prefix,
    }
}

fn prefix_finding(label: &str, decl: &Declaration, prefix: &str, naming: &NamingConventions) -> Finding {
    let suggestion = format!("{prefix}{}", to_snake_case(bare_name(&decl.name, naming)));
    Finding::new(format!("{label} '{}' should use {prefix} prefix", decl.name))
        .with_suggestion(suggestion)
}

fn is_exempt_identifier(line: &LineContext<'_>, name: &str) -> bool {
    line.exemptions.is_ignored_identifier(name) || line.exemptions.is_platform_type(name)
}

pub struct MemberPrefixRule;

impl NamingRule for MemberPrefixRule {
    fn id(&self) -> &'static str {
        "member_prefix"
    }

    fn description(&self) -> &'static str {
        "Member variables carry an ownership prefix (m_, p_, up_, sp_, wp_)"
    }

    fn explanation(&self) -> &'static str {
        "Declarations directly inside a class or struct body are members. Smart pointers \
         take the unique/shared/weak prefix, raw pointers and references take the pointer \
         prefix, everything else takes the plain member prefix. The rest of the name must be \
         lowercase snake_case. Prefixes are configured under `naming:`."
    }

    fn check(&self, line: &LineContext<'_>) -> Vec<Finding> {
        if !line.scope.directly_in_class {
            return Vec::new();
        }
        let Some(decl) = parse_declaration(line.collapsed) else {
            return Vec::new();
        };
        if is_exempt_identifier(line, &decl.name) {
            return Vec::new();
        }

        let naming = line.naming;
        let (label, prefix) = match decl.kind {
            DeclarationKind::Smart(ownership) => {
                (format!("{} member", ownership.wrapper_name()), smart_prefix(ownership, naming))
            }
            DeclarationKind::Pointer | DeclarationKind::Reference => {
                ("Pointer member".to_string(), naming.pointer_prefix.as_str())
            }
            DeclarationKind::Plain => ("Member variable".to_string(), naming.member_prefix.as_str()),
        };

        if has_prefixed_snake_name(&decl.name, prefix) {
            return Vec::new();
        }
        vec![prefix_finding(&label, &decl, prefix, naming)]
    }
}

pub struct LocalNamingRule;

impl NamingRule for LocalNamingRule {
    fn id(&self) -> &'static str {
        "local_naming"
    }

    fn description(&self) -> &'static str {
        "Local variables use snake_case; pointer locals carry pointer prefixes"
    }

    fn explanation(&self) -> &'static str {
        "Declarations inside a function body, indented at least `naming.local_min_indent` \
         columns, are locals. Smart-pointer and raw-pointer locals follow the member prefix \
         rules. Plain locals must be snake_case or already carry one of the configured \
         prefixes."
    }

    fn check(&self, line: &LineContext<'_>) -> Vec<Finding> {
        let naming = line.naming;
        if !line.scope.in_function_body || line.scope.directly_in_class {
            return Vec::new();
        }
        let Some(decl) = parse_declaration(line.collapsed) else {
            return Vec::new();
        };
        if decl.indent < naming.local_min_indent || is_exempt_identifier(line, &decl.name) {
            return Vec::new();
        }

        match decl.kind {
            DeclarationKind::Smart(ownership) => {
                let prefix = smart_prefix(ownership, naming);
                if has_prefixed_snake_name(&decl.name, prefix) {
                    return Vec::new();
                }
                let label = format!("{} variable", ownership.wrapper_name());
                vec![prefix_finding(&label, &decl, prefix, naming)]
            }
            DeclarationKind::Pointer => {
                let prefix = naming.pointer_prefix.as_str();
                if has_prefixed_snake_name(&decl.name, prefix) {
                    return Vec::new();
                }
                vec![prefix_finding("Pointer variable", &decl, prefix, naming)]
            }
            DeclarationKind::Reference | DeclarationKind::Plain => {
                let prefixed = naming
                    .all_prefixes()
                    .into_iter()
                    .any(|prefix| has_prefixed_snake_name(&decl.name, prefix));
                if prefixed || is_snake_case(&decl.name) {
                    return Vec::new();
                }
                vec![Finding::new(format!(
                    "Local variable '{}' should use snake_case",
                    decl.name
                ))
                .with_suggestion(to_snake_case(&decl.name))]
            }
        }
    }
}

pub struct MacroCasingRule;

impl NamingRule for MacroCasingRule {
    fn id(&self) -> &'static str {
        "macro_casing"
    }

    fn description(&self) -> &'static str {
        "Macros use UPPER_SNAKE_CASE"
    }

    fn explanation(&self) -> &'static str {
        "`#define NAME` requires NAME to match ^[A-Z][A-Z0-9_]*$. Names starting with `_` \
         (include guards) and names in `exemptions.system_macros` are exempt."
    }

    fn check(&self, line: &LineContext<'_>) -> Vec<Finding> {
        let Some(caps) = MACRO_DEFINE.captures(line.stripped) else {
            return Vec::new();
        };
        let name = &caps[1];
        if name.starts_with('_') || line.exemptions.is_system_macro(name) || is_upper_snake_case(name) {
            return Vec::new();
        }

        vec![Finding::new(format!("Macro '{name}' should use UPPER_SNAKE_CASE"))
            .with_suggestion(name.to_ascii_uppercase())]
    }
}

pub struct ClassNamingRule;

impl NamingRule for ClassNamingRule {
    fn id(&self) -> &'static str {
        "class_naming"
    }

    fn description(&self) -> &'static str {
        "Class and struct names use PascalCase"
    }

    fn explanation(&self) -> &'static str {
        "The identifier after `class` or `struct` must match ^[A-Z][A-Za-z0-9]*$. System \
         structs (stat, timeval, ...), platform ABI types and names with an allowed prefix \
         (`_`, GLFW, SDL_ by default) are exempt."
    }

    fn check(&self, line: &LineContext<'_>) -> Vec<Finding> {
        let Some((keyword, name)) = class_header(line.collapsed) else {
            return Vec::new();
        };
        let exemptions = line.exemptions;
        if exemptions.is_system_struct(name)
            || exemptions.is_platform_type(name)
            || exemptions.has_allowed_class_prefix(name)
            || is_pascal_case(name)
        {
            return Vec::new();
        }

        let label = if keyword == "struct" { "Struct" } else { "Class" };
        vec![Finding::new(format!("{label} '{name}' should use PascalCase"))
            .with_suggestion(to_pascal_case(name))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::rules::test_support::{findings, in_class, in_function};
    use rstest::rstest;

    #[test]
    fn test_pascal_case_method_is_reported() {
        let hits = findings(&MethodNamingRule, "void Engine::DoThing() {}");
        assert_eq!(hits, [(1, "Method 'DoThing' should use camelCase".to_string())]);
    }

    #[rstest]
    #[case("void Engine::doThing() {}")]
    #[case("Engine::Engine() : m_count(0) {")]
    #[case("Engine::~Engine() {")]
    #[case("bool Engine::operator==(const Engine& other) const {")]
    #[case("Engine* Engine::Engine(int32_t x) {")]
    #[case("void v8::Isolate::Dispose() {")]
    #[case("void Engine::Attach(v8::Isolate* p_isolate) {")]
    #[case("std::string Engine::ToString() const {")]
    #[case("    return Engine::Create(options);")]
    #[case("    Logger::Write(message);")]
    #[case("    total * Engine::Factor(x);")]
    #[case("    mask & Flags::Read(bits);")]
    #[case("void Engine::DoThing();")]
    fn test_method_exemptions(#[case] line: &str) {
        assert!(findings(&MethodNamingRule, line).is_empty(), "{line:?}");
    }

    #[rstest]
    #[case("static uint32_t Engine::Count() {", "Count")]
    #[case("const Node* Tree::Find_Node(int32_t key) const {", "Find_Node")]
    #[case("Result<> app::Parser::Parse_All(Input<> input) {", "Parse_All")]
    fn test_method_violations(#[case] line: &str, #[case] name: &str) {
        let hits = findings(&MethodNamingRule, line);
        assert_eq!(hits.len(), 1, "{line:?}");
        assert!(hits[0].1.contains(&format!("'{name}'")));
    }

    #[test]
    fn test_namespace_alias_exempts_method() {
        let source = "namespace fs = std::filesystem;\nbool fs::Path::Exists() {\n}\n";
        assert!(findings(&MethodNamingRule, source).is_empty());

        let without_alias = "bool fs::Path::Exists() {\n}\n";
        assert_eq!(findings(&MethodNamingRule, without_alias).len(), 1);
    }

    #[rstest]
    #[case("    int32_t count;", Some("Member variable 'count' should use m_ prefix"))]
    #[case("    int32_t m_count;", None)]
    #[case("    Node* next;", Some("Pointer member 'next' should use p_ prefix"))]
    #[case("    Node* p_next;", None)]
    #[case("    Config& config;", Some("Pointer member 'config' should use p_ prefix"))]
    #[case("    std::unique_ptr<Engine> engine;", Some("unique_ptr member 'engine' should use up_ prefix"))]
    #[case("    std::shared_ptr<Cache> sp_cache;", None)]
    #[case("    std::weak_ptr<Owner> sp_owner;", Some("weak_ptr member 'sp_owner' should use wp_ prefix"))]
    #[case("    std::vector<int32_t> m_values;", None)]
    #[case("    std::map<std::string, std::vector<int>> m_index = {", None)]
    #[case("    int32_t m_Count;", Some("Member variable 'm_Count' should use m_ prefix"))]
    #[case("    DWORD m_flags;", None)]
    #[case("    int32_t count = compute(1);", Some("Member variable 'count' should use m_ prefix"))]
    #[case("    Node* next = make(2);", Some("Pointer member 'next' should use p_ prefix"))]
    #[case("    void doThing();", None)]
    #[case("    int32_t getCount() const { return m_count; }", None)]
    #[case("    Engine(const Engine&) = delete;", None)]
    #[case("    Engine& operator=(const Engine&) = delete;", None)]
    #[case("    using Callback = std::function<void()>;", None)]
    #[case("public:", None)]
    fn test_member_prefix(#[case] line: &str, #[case] expected: Option<&str>) {
        let hits = in_class(&MemberPrefixRule, line);
        let messages: Vec<_> = hits.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(messages, expected.into_iter().collect::<Vec<_>>(), "{line:?}");
    }

    #[test]
    fn test_member_rule_ignores_function_bodies_and_top_level() {
        assert!(in_function(&MemberPrefixRule, "    int32_t count = 0;").is_empty());
        assert!(findings(&MemberPrefixRule, "int32_t count;").is_empty());
    }

    #[test]
    fn test_member_suggestion_replaces_wrong_prefix() {
        let source = "class Holder {\n    Node* m_next;\n};\n";
        let registry = crate::patterns::exemptions::ExemptionSet::default();
        let exemptions = registry.for_file(source);
        let naming = NamingConventions::default();
        let ctx = LineContext {
            number: 2,
            raw: "    Node* m_next;",
            stripped: "    Node* m_next;",
            collapsed: "    Node* m_next;",
            scope: crate::analyzer::scope::ScopeSnapshot {
                in_class: true,
                directly_in_class: true,
                in_function_body: false,
                depth: 1,
            },
            exemptions: &exemptions,
            naming: &naming,
        };
        let hits = MemberPrefixRule.check(&ctx);
        assert_eq!(hits[0].suggestion.as_deref(), Some("p_next"));
    }

    #[rstest]
    #[case("    int32_t retry_count = 0;", None)]
    #[case("    int32_t retryCount = 0;", Some("Local variable 'retryCount' should use snake_case"))]
    #[case("    Node* node = m_head;", Some("Pointer variable 'node' should use p_ prefix"))]
    #[case("    Node* p_node = m_head;", None)]
    #[case("    std::unique_ptr<Engine> up_engine;", None)]
    #[case("    std::unique_ptr<Engine> engine;", Some("unique_ptr variable 'engine' should use up_ prefix"))]
    #[case("    Node* next = lookup(key);", Some("Pointer variable 'next' should use p_ prefix"))]
    #[case("    int32_t retryCount = compute(a);", Some("Local variable 'retryCount' should use snake_case"))]
    #[case("    std::unique_ptr<Engine> engine = std::make_unique<Engine>();", Some("unique_ptr variable 'engine' should use up_ prefix"))]
    #[case("    std::unique_ptr<Engine> up_engine = std::make_unique<Engine>(m_config);", None)]
    #[case("        int32_t retryCount);", None)]
    #[case("    std::shared_ptr<Cache> sp_cache = m_cache;", None)]
    #[case("    const Config& config = m_config;", None)]
    #[case("    int32_t m_copy = m_count;", None)]
    #[case("    auto it = items.begin();", None)]
    #[case("    return value;", None)]
    #[case("int32_t unindentedName = 0;", None)]
    fn test_local_naming(#[case] line: &str, #[case] expected: Option<&str>) {
        let hits = in_function(&LocalNamingRule, line);
        let messages: Vec<_> = hits.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(messages, expected.into_iter().collect::<Vec<_>>(), "{line:?}");
    }

    #[test]
    fn test_member_in_export_macro_class() {
        let source = "class EXPORT_API Widget {\n    int32_t count;\n};\n";
        assert_eq!(
            findings(&MemberPrefixRule, source),
            [(2, "Member variable 'count' should use m_ prefix".to_string())]
        );
    }

    #[test]
    fn test_local_rule_skips_class_bodies() {
        assert!(in_class(&LocalNamingRule, "    Node* next;").is_empty());
    }

    #[test]
    fn test_local_rule_applies_inside_inline_methods() {
        let source = "class Holder {\n    void run() {\n        int32_t retryCount = 0;\n    }\n};\n";
        assert_eq!(findings(&LocalNamingRule, source).len(), 1);
    }

    #[rstest]
    #[case("#define max_retries 3", Some("Macro 'max_retries' should use UPPER_SNAKE_CASE"))]
    #[case("#define MAX_RETRIES 3", None)]
    #[case("#define _INTERNAL_GUARD_H", None)]
    #[case("#  define isatty _isatty", None)]
    #[case("#define LOG(msg) write(msg)", None)]
    #[case("#include <max_retries.h>", None)]
    #[case("// #define lower_case 1", None)]
    fn test_macro_casing(#[case] line: &str, #[case] expected: Option<&str>) {
        let hits = findings(&MacroCasingRule, line);
        let messages: Vec<_> = hits.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(messages, expected.into_iter().collect::<Vec<_>>(), "{line:?}");
    }

    #[rstest]
    #[case("class my_widget {", Some("Class 'my_widget' should use PascalCase"))]
    #[case("struct point_3d;", Some("Struct 'point_3d' should use PascalCase"))]
    #[case("class Widget : public Base {", None)]
    #[case("class EXPORT_API my_widget {", Some("Class 'my_widget' should use PascalCase"))]
    #[case("struct timeval;", None)]
    #[case("struct _private_impl {", None)]
    #[case("struct GLFWwindow;", None)]
    #[case("struct SDL_Window;", None)]
    #[case("enum class color { red };", None)]
    fn test_class_naming(#[case] line: &str, #[case] expected: Option<&str>) {
        let hits = findings(&ClassNamingRule, line);
        let messages: Vec<_> = hits.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(messages, expected.into_iter().collect::<Vec<_>>(), "{line:?}");
    }
}
