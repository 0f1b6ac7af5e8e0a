//! Thread-local context stack for nested diagnostics.
//!
//! Resolution code pushes a frame when it descends into a header, type or
//! property. Messages created while frames are active capture the whole chain,
//! so a failure deep inside a container's inner property still reports which
//! declaration it belonged to.

use std::cell::RefCell;

use crate::base::Name;

/// One level of "what the tool was doing".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextFrame {
    /// Processing a header file in a given step
    Header { path: Name, step: &'static str },
    /// Working on a named declaration
    Type { kind: &'static str, name: Name },
    /// Parsing a type expression
    TypeExpression(String),
    /// Free-form description
    Note(String),
}

impl ContextFrame {
    /// Human-readable description for messages
    pub fn description(&self) -> String {
        match self {
            ContextFrame::Header { path, step } => format!("while running '{step}' on '{path}'"),
            ContextFrame::Type { kind, name } => format!("in {kind} '{name}'"),
            ContextFrame::TypeExpression(expr) => format!("while parsing type '{expr}'"),
            ContextFrame::Note(note) => note.clone(),
        }
    }
}

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<ContextFrame>> = const { RefCell::new(Vec::new()) };
}

/// Pops its frame when dropped.
#[must_use = "the context frame is popped as soon as the guard is dropped"]
pub struct ContextGuard {
    depth: usize,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| stack.borrow_mut().truncate(self.depth));
    }
}

/// Push a frame on the current thread's stack.
pub fn push_context(frame: ContextFrame) -> ContextGuard {
    CONTEXT_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let depth = stack.len();
        stack.push(frame);
        ContextGuard { depth }
    })
}

/// Innermost-last descriptions of every active frame.
pub fn context_chain() -> Vec<String> {
    CONTEXT_STACK.with(|stack| stack.borrow().iter().map(ContextFrame::description).collect())
}
