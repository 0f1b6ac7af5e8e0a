//! # uht-base
//!
//! Core library for reflection header analysis: the property type model,
//! symbol tables and the multi-phase resolution engine.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! export     → Hand-off of finished headers to exporters
//!   ↓
//! references → Per-header reference sets, header dependency order
//!   ↓
//! resolve    → Session, declaration builders, phase pipeline
//!   ↓
//! registry   → Keyword-dispatched type expression parsing
//!   ↓
//! symbols    → Source/engine name tables, enum value table
//!   ↓
//! property   → Property kinds, flags, defaults, validation
//!   ↓
//! types      → Type arena, headers, packages, metadata
//!   ↓
//! diag       → Messages, counters, context stack, ResolveError
//!   ↓
//! base       → Primitives (TypeId, HeaderId, Outer, Name)
//! ```

// ============================================================================
// MODULES (dependency order: base → diag → types → ... → export)
// ============================================================================

/// Foundation types: TypeId, HeaderId, Outer, Name helpers
pub mod base;

/// Diagnostics: Message, MessageKind, context frames, ResolveError
pub mod diag;

/// Session options
pub mod config;

/// Type model: TypeArena, TypeNode, HeaderFile, MetaData
pub mod types;

/// Property model: Property, PropertyKind, PropertyFlags
pub mod property;

/// Symbol tables and lookup options
pub mod symbols;

/// Property type registry and type expression tokens
pub mod registry;

/// Resolution engine: Session and phase scheduling
pub mod resolve;

/// Reference collection and header ordering
pub mod references;

/// Export hand-off
pub mod export;

// Re-export the entry points
pub use base::{HeaderId, Name, Outer, PackageId, TypeId};
pub use config::SessionConfig;
pub use diag::{Message, MessageKind, ResolveError, ResolveResult};
pub use export::{Exporter, HeaderExport};
pub use resolve::{ClassDecl, EnumDecl, FunctionDecl, Session, StructDecl};
