//! Messages and run-wide counters.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::base::Name;

// ============================================================================
// MESSAGE TYPES
// ============================================================================

/// Kind of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Semantic violation; fails the run but sibling declarations keep going
    Error,
    /// Internal compiler error; indicates a bug in the tool
    Ice,
    /// Optional problem, promoted to an error when warnings are errors
    Warning,
    Info,
    Trace,
}

impl MessageKind {
    pub fn is_error(self) -> bool {
        matches!(self, MessageKind::Error | MessageKind::Ice)
    }

    fn label(self) -> &'static str {
        match self {
            MessageKind::Error => "Error: ",
            MessageKind::Ice => " Error: Internal Compiler Error - ",
            MessageKind::Warning => "Warning: ",
            MessageKind::Info => "Info: ",
            MessageKind::Trace => "Trace: ",
        }
    }
}

/// A diagnostic attached to a header file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    /// Header path, or `None` for session-level messages.
    pub file: Option<Name>,
    /// 1-based line, 0 when unknown.
    pub line: u32,
    pub text: String,
    /// Diagnostic code (e.g. "E0003").
    pub code: Option<&'static str>,
    /// Context chain captured when the message was created, outermost first.
    pub context: Vec<String>,
}

impl Message {
    pub fn new(kind: MessageKind, file: Option<Name>, line: u32, text: impl Into<String>) -> Self {
        Self {
            kind,
            file,
            line,
            text: text.into(),
            code: None,
            context: super::context_chain(),
        }
    }

    pub fn error(file: Option<Name>, line: u32, text: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, file, line, text)
    }

    pub fn warning(file: Option<Name>, line: u32, text: impl Into<String>) -> Self {
        Self::new(MessageKind::Warning, file, line, text)
    }

    pub fn ice(file: Option<Name>, line: u32, text: impl Into<String>) -> Self {
        Self::new(MessageKind::Ice, file, line, text)
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Single-line rendering without the context chain.
    pub fn headline(&self) -> String {
        let file = self.file.as_deref().unwrap_or("UnrealHeaderTool");
        format!("{}({}): {}{}", file, self.line, self.kind.label(), self.text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline())?;
        for frame in self.context.iter().rev() {
            write!(f, "\n    {frame}")?;
        }
        Ok(())
    }
}

// ============================================================================
// COUNTERS
// ============================================================================

/// Run-wide message counters.
///
/// Checked before each phase; once errors exist the remaining phases are skipped.
#[derive(Debug, Default)]
pub struct MessageCounters {
    errors: AtomicUsize,
    warnings: AtomicUsize,
}

impl MessageCounters {
    pub fn record(&self, kind: MessageKind) {
        match kind {
            MessageKind::Error | MessageKind::Ice => {
                self.errors.fetch_add(1, Ordering::Relaxed);
            }
            MessageKind::Warning => {
                self.warnings.fetch_add(1, Ordering::Relaxed);
            }
            MessageKind::Info | MessageKind::Trace => {}
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    pub fn has_errors(&self, warnings_as_errors: bool) -> bool {
        self.error_count() > 0 || (warnings_as_errors && self.warning_count() > 0)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes.
///
/// ## Code Ranges
///
/// - **E0001-E0049**: Name resolution and symbol table errors
/// - **E0050-E0099**: Property and declaration validation errors
/// - **W0001-W0099**: Warnings
pub mod codes {
    /// Referenced type could not be found
    pub const UNRESOLVED_TYPE: &str = "E0001";
    /// Reserved or duplicate engine name
    pub const DUPLICATE_NAME: &str = "E0002";
    /// Circular inheritance or header dependency
    pub const CIRCULAR: &str = "E0003";
    /// Malformed declaration rejected before resolution
    pub const INVALID_DECLARATION: &str = "E0004";

    /// Property used in a context its kind does not support
    pub const UNSUPPORTED_USAGE: &str = "E0050";
    /// Network replication rule violated
    pub const REPLICATION: &str = "E0051";
    /// Blueprint exposure rule violated
    pub const BLUEPRINT: &str = "E0052";
    /// Member hides a member of a parent type
    pub const SHADOWING: &str = "E0053";
    /// Deprecated type used by a non-deprecated property
    pub const DEPRECATED_USAGE: &str = "E0054";
    /// Default value literal could not be parsed
    pub const DEFAULT_VALUE: &str = "E0055";

    /// Metadata present but without effect
    pub const INEFFECTIVE_METADATA: &str = "W0001";
}
