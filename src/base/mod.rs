//! Foundation types for the header tool core.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TypeId`], [`HeaderId`], [`PackageId`] - Stable arena indices
//! - [`Outer`] - The "contained by" relation of a type
//! - [`Name`] - Cheaply clonable type names
//! - Name helpers (engine-name derivation, identifier checks)
//!
//! This module has NO dependencies on other uht modules.

mod ids;
mod names;

pub use ids::{HeaderId, Outer, PackageId, TypeId};
pub use names::{
    Name, caseless_eq, caseless_key, derive_engine_name, is_valid_identifier, EngineNameRule,
    DELEGATE_SIGNATURE_SUFFIX,
};
