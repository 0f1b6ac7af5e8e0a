//! Diagnostics - message taxonomy, counters and the nesting context stack.
//!
//! Every other layer reports problems through this module:
//! - semantic violations tied to a file and line become [`MessageKind::Error`]
//! - broken tool invariants become [`MessageKind::Ice`]
//! - unexpected failures unwind as [`ResolveError`] to the owning header and are
//!   converted into messages there
//!
//! ## Key Types
//!
//! - [`Message`] - One diagnostic attached to a header
//! - [`MessageCounters`] - Run-wide error/warning counts gating later phases
//! - [`ContextFrame`] / [`push_context`] - Thread-local "while doing X" chain
//! - [`ResolveError`] - Error type for failures that unwind to a header boundary

mod context;
mod error;
mod message;

pub use context::{ContextFrame, ContextGuard, context_chain, push_context};
pub use error::{ResolveError, ResolveResult};
pub use message::{Message, MessageCounters, MessageKind, codes};
