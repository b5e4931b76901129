//! Declaration recognition and identifier casing helpers
//!
//! Everything here works on a single stripped, template-collapsed line. The
//! recogniser is a heuristic: one declaration per line, first identifier wins.

use regex::Regex;
use std::sync::LazyLock;

/// `(qualifiers)* type [*&]* name (= | ; | { | [ | end)`
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<indent>\s*)(?:(?:static|const|constexpr|constinit|mutable|inline|volatile|thread_local|extern|register|typename|unsigned|signed|long|short)\s+)*(?P<type>[A-Za-z_]\w*(?:<>)?(?:::\w+(?:<>)?)*)(?P<sep>\s+|(?:\s*(?:const\s*)?[\*&]+\s*)+)(?:const\s+)?(?P<name>[A-Za-z_]\w*)\s*(?:=|;|\{|\[|$)",
    )
    .expect("declaration regex is valid")
});

static CLASS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:template\s*<>\s*)?(?:typedef\s+)?(?P<kind>class|struct)\s+(?:alignas\s*\([^)]*\)\s*)?(?:[A-Z][A-Z0-9_]*\s+)?(?P<name>[A-Za-z_]\w*)(?:<>)?(?:\s+final)?\s*(?:[:{;]|$)",
    )
    .expect("class header regex is valid")
});

/// Statement keywords that can sit where a declaration's type would
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "delete", "throw", "goto", "case", "using", "typedef", "friend", "else", "new",
    "co_return", "co_yield", "co_await", "namespace", "template", "public", "private",
    "protected", "sizeof", "class", "struct", "enum", "union", "operator", "do", "break",
    "continue", "default", "virtual", "explicit",
];

/// Ownership expressed by a smart-pointer wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Unique,
    Shared,
    Weak,
}

impl Ownership {
    pub fn wrapper_name(self) -> &'static str {
        match self {
            Self::Unique => "unique_ptr",
            Self::Shared => "shared_ptr",
            Self::Weak => "weak_ptr",
        }
    }
}

/// How the declared name holds its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Smart(Ownership),
    Pointer,
    Reference,
    Plain,
}

/// A recognised `type name` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub type_name: String,
    pub name: String,
    pub kind: DeclarationKind,
    /// Leading indentation in columns, tab = 4
    pub indent: usize,
}

/// Recognise a variable declaration on a collapsed line.
///
/// Returns `None` for preprocessor lines, class headers, continuation lines
/// and keyword-led statements.
pub fn parse_declaration(collapsed: &str) -> Option<Declaration> {
    let trimmed = collapsed.trim();
    if trimmed.is_empty()
        || trimmed.starts_with('#')
        || is_continuation(trimmed)
        || CLASS_HEADER.is_match(collapsed)
    {
        return None;
    }

    let caps = DECLARATION.captures(collapsed)?;
    let type_name = &caps["type"];
    if STATEMENT_KEYWORDS.contains(&type_name) {
        return None;
    }

    let sep = &caps["sep"];
    let kind = if let Some(ownership) = smart_pointer_ownership(type_name) {
        DeclarationKind::Smart(ownership)
    } else if sep.contains('*') {
        DeclarationKind::Pointer
    } else if sep.contains('&') {
        DeclarationKind::Reference
    } else {
        DeclarationKind::Plain
    };

    Some(Declaration {
        type_name: type_name.to_string(),
        name: caps["name"].to_string(),
        kind,
        indent: indent_width(&caps["indent"]),
    })
}

/// The tail of a multi-line parameter or argument list: ends in `,`, or ends
/// in `);` while closing more parentheses than it opens
fn is_continuation(trimmed: &str) -> bool {
    if trimmed.ends_with(',') {
        return true;
    }
    trimmed.ends_with(");") && trimmed.matches(')').count() > trimmed.matches('(').count()
}

fn smart_pointer_ownership(type_name: &str) -> Option<Ownership> {
    let base = type_name.trim_end_matches("<>");
    let last = base.rsplit("::").next().unwrap_or(base);
    match last {
        "unique_ptr" => Some(Ownership::Unique),
        "shared_ptr" => Some(Ownership::Shared),
        "weak_ptr" => Some(Ownership::Weak),
        _ => None,
    }
}

/// Indentation width in columns, counting a tab as 4
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// The class header on this line, as `(keyword, name)`
pub fn class_header(collapsed: &str) -> Option<(&str, &str)> {
    let caps = CLASS_HEADER.captures(collapsed)?;
    let kind = caps.name("kind")?.as_str();
    let name = caps.name("name")?.as_str();
    Some((kind, name))
}

/// `doThing`, `run`, `toString2`
pub fn is_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// `Engine`, `HttpServer`
pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// `count`, `retry_limit`, `v2`
pub fn is_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// `MAX_RETRIES`, `V8_ENABLED`
pub fn is_upper_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// `name` starts with `prefix` and the rest is snake_case
pub fn has_prefixed_snake_name(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix).is_some_and(is_snake_case)
}

/// `retryLimit` -> `retry_limit`, `HTTPServer` -> `http_server`
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out.trim_start_matches('_').to_string()
}

/// `my_widget` -> `MyWidget`
pub fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `DoThing` -> `doThing`
pub fn to_camel_case(name: &str) -> String {
    let pascal = if name.contains('_') { to_pascal_case(name) } else { name.to_string() };
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
