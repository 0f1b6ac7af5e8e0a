//! Error type for failures that unwind to a header boundary.

use thiserror::Error;

/// Failures raised while processing a single header.
///
/// Recoverable problems are posted as messages and never become an `Err`; this
/// type covers the cases that abandon the current header's step.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Semantic violation at a known line
    #[error("{message}")]
    Semantic { line: u32, message: String },

    /// A tool invariant was violated
    #[error("Internal Compiler Error - {0}")]
    Internal(String),

    /// The symbol table was queried before population
    #[error("Symbol table has not been populated, don't call find_type until headers are parsed.")]
    NotPopulated,

    /// A lookup was issued with a malformed option set
    #[error("Invalid find options: {0}")]
    InvalidFindOptions(&'static str),

    /// Header references form a cycle
    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),
}

impl ResolveError {
    pub fn at(line: u32, message: impl Into<String>) -> Self {
        Self::Semantic {
            line,
            message: message.into(),
        }
    }

    pub fn ice(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Internal errors are reported as ICE messages.
    pub fn is_internal(&self) -> bool {
        !matches!(self, Self::Semantic { .. } | Self::DependencyCycle(_))
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Semantic { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;
