//! Line normalisation applied before any rule sees a line
//!
//! Architectural Principle: Pure Functions - every transformation here is deterministic
//! and independent of the lines around it (the block comment filter is the single,
//! opt-in exception and keeps its state explicit)

use regex::Regex;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::LazyLock;

/// An innermost `<...>` group. A previously collapsed `<>` counts as plain content,
/// so nested arguments fold outward one level per pass.
static ANGLE_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:[^<>;{}]|<>)*>").expect("angle group regex is valid"));

const ARROW: &str = "->";
const ARROW_PLACEHOLDER: &str = "\u{2192}";

/// Remove the trailing `//` comment and blank out string and char literal bodies.
///
/// `"text"` becomes `""` and `'x'` becomes `''`. Escapes inside literals are honoured,
/// and an unterminated literal swallows the rest of the line. Trailing whitespace is
/// trimmed. Applying this twice yields the same result as applying it once.
pub fn strip_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => break,
            '"' | '\'' => {
                skip_literal(&mut chars, c);
                out.push(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out.truncate(out.trim_end().len());
    out
}

fn skip_literal(chars: &mut Peekable<Chars<'_>>, quote: char) {
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return;
        }
    }
}

/// Reduce every `<...>` group to `<>`, innermost first, until nothing changes.
///
/// `std::map<int, std::vector<int>>` becomes `std::map<>`. Member-access arrows are
/// protected so `p_node->next` never closes a bracket.
pub fn collapse_templates(line: &str) -> String {
    let mut current = line.replace(ARROW, ARROW_PLACEHOLDER);

    loop {
        let next = ANGLE_GROUP.replace_all(&current, "<>");
        if next == current {
            break;
        }
        current = next.into_owned();
    }

    current.replace(ARROW_PLACEHOLDER, ARROW)
}

/// Blanks out `/* ... */` comments, including ones spanning several lines.
///
/// Only used when `analysis.track_block_comments` is enabled.
#[derive(Debug, Default)]
pub struct BlockCommentFilter {
    in_comment: bool,
}

impl BlockCommentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the previous line left a comment open
    pub fn in_comment(&self) -> bool {
        self.in_comment
    }

    /// Return the line with block comment content replaced by a single space per comment
    pub fn filter(&mut self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if self.in_comment {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    self.in_comment = false;
                    out.push(' ');
                }
                continue;
            }

            match c {
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    self.in_comment = true;
                }
                '/' if chars.peek() == Some(&'/') => {
                    out.push(c);
                    out.extend(chars.by_ref());
                }
                '"' | '\'' => {
                    out.push(c);
                    while let Some(inner) = chars.next() {
                        out.push(inner);
                        if inner == '\\' {
                            if let Some(escaped) = chars.next() {
                                out.push(escaped);
                            }
                        } else if inner == c {
                            break;
                        }
                    }
                }
                _ => out.push(c),
            }
        }

        out
    }
}
