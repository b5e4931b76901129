//! Brace-depth scope tracking
//!
//! Architecture: State Machine - one `ScopeTracker` per file, advanced line by line
//! - A pending marker records what the next `{` opens (class body, function body)
//! - `{` pushes the pending frame or `Other`, `}` pops
//! - Rules see a snapshot taken before the line's own braces are consumed
//!
//! Limitation: one structurally significant brace construct per line.

use crate::patterns::declaration::class_header;
use regex::Regex;
use std::sync::LazyLock;

static FUNCTION_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:[A-Za-z_~][\w:]*(?:<>)?[\s\*&]+)*~?[A-Za-z_][\w:]*\s*\([^;{}]*\)\s*(?:const\s*)?(?:noexcept\s*)?(?:override\s*)?(?:final\s*)?(?::[^;{]*)?(?:\{.*)?$",
    )
    .expect("function signature regex is valid")
});

static CONTROL_FLOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:if|while|for|switch|return)\b").expect("control flow regex is valid")
});

/// One nested lexical context on the scope stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFrame {
    Class,
    Function,
    Other,
}

/// Scope state as seen by the rules for one line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeSnapshot {
    /// A Class frame anywhere on the stack
    pub in_class: bool,
    /// Top frame is Class
    pub directly_in_class: bool,
    /// Top frame is Function or Other
    pub in_function_body: bool,
    pub depth: usize,
}

/// Decide what a `{` on or after this line would open
pub fn classify_line(collapsed: &str) -> Option<ScopeFrame> {
    if class_header(collapsed).is_some() {
        Some(ScopeFrame::Class)
    } else if FUNCTION_SIGNATURE.is_match(collapsed) && !CONTROL_FLOW.is_match(collapsed) {
        Some(ScopeFrame::Function)
    } else {
        None
    }
}

#[derive(Debug, Default)]
pub struct ScopeTracker {
    frames: Vec<ScopeFrame>,
    pending: Option<ScopeFrame>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line and return the scope state from before its braces.
    ///
    /// `stripped` must have comments and literals removed so braces inside
    /// strings are ignored; `collapsed` is the same line with templates folded.
    pub fn advance(&mut self, stripped: &str, collapsed: &str) -> ScopeSnapshot {
        if let Some(marker) = classify_line(collapsed) {
            self.pending = Some(marker);
        }

        let snapshot = self.snapshot();

        for c in stripped.chars() {
            match c {
                '{' => {
                    let frame = self.pending.take().unwrap_or(ScopeFrame::Other);
                    self.frames.push(frame);
                }
                '}' => self.pop(),
                _ => {}
            }
        }

        // A statement ended before any brace used the marker: forward
        // declarations and prototypes
        if stripped.contains(';') {
            self.pending = None;
        }

        snapshot
    }

    fn pop(&mut self) {
        if self.frames.pop().is_none() {
            tracing::debug!("Ignoring unbalanced closing brace at depth 0");
        }
    }

    pub fn snapshot(&self) -> ScopeSnapshot {
        ScopeSnapshot {
            in_class: self.in_class(),
            directly_in_class: self.directly_in_class(),
            in_function_body: self.in_function_body(),
            depth: self.depth(),
        }
    }

    pub fn in_class(&self) -> bool {
        self.frames.contains(&ScopeFrame::Class)
    }

    pub fn directly_in_class(&self) -> bool {
        self.frames.last() == Some(&ScopeFrame::Class)
    }

    pub fn in_function_body(&self) -> bool {
        matches!(self.frames.last(), Some(ScopeFrame::Function | ScopeFrame::Other))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn pending(&self) -> Option<ScopeFrame> {
        self.pending
    }
}
