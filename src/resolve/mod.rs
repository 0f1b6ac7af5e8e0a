//! Resolution engine - the session and its phase pipeline.
//!
//! A [`Session`] owns every declared type, header and package for one run.
//! Declarations are added through its builder methods (standing in for the
//! source parser), then [`Session::run`] drives the fixed phase sequence:
//!
//! ```text
//! populate -> Bases -> InvalidCheck -> Properties -> Final -> Validate -> CollectReferences -> sort
//! ```
//!
//! Each phase fans out one task per header and acts as a barrier: every header
//! finishes phase N before any header starts phase N+1. A phase is skipped
//! entirely once the session has errors.
//!
//! ## Key Types
//!
//! - [`Session`] - Owner of all run state; entry point for building and running
//! - [`ResolvePhase`] - The ordered phase list
//! - [`EnumDecl`], [`ClassDecl`], [`StructDecl`], [`FunctionDecl`] - Declaration requests

mod bases;
mod decl;
mod driver;
mod finalize;
mod invalid;
mod properties;
mod session;
mod validate;

pub use decl::{ClassDecl, EnumDecl, FunctionDecl, StructDecl};
pub use session::{NO_EXPORT_HEADER_NAME, Session};

/// Resolution phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResolvePhase {
    /// Resolve super types, enum backing types and interface twins
    Bases,
    /// Structural checks that do not need resolved property types
    InvalidCheck,
    /// Resolve property type references and derived sub-properties
    Properties,
    /// Placeholder swap, instanced-reference scan, dimensions and defaults
    Final,
    /// Usage rules for every property
    Validate,
    /// Build reference lists and header edges
    CollectReferences,
}

impl ResolvePhase {
    pub const ALL: [ResolvePhase; 6] = [
        ResolvePhase::Bases,
        ResolvePhase::InvalidCheck,
        ResolvePhase::Properties,
        ResolvePhase::Final,
        ResolvePhase::Validate,
        ResolvePhase::CollectReferences,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResolvePhase::Bases => "Bases",
            ResolvePhase::InvalidCheck => "InvalidCheck",
            ResolvePhase::Properties => "Properties",
            ResolvePhase::Final => "Final",
            ResolvePhase::Validate => "Validate",
            ResolvePhase::CollectReferences => "CollectReferences",
        }
    }
}
