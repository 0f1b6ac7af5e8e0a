//! Type model - arena-allocated declarations and the headers that own them.
//!
//! ## Key Types
//!
//! - [`TypeArena`] - Every declared type, addressed by stable [`TypeId`](crate::base::TypeId)
//! - [`TypeNode`] / [`TypeKind`] - One declaration and its kind-specific data
//! - [`HeaderFile`] / [`Package`] - Ownership of top-level declarations
//! - [`MetaData`] - Ordered key/value metadata
//!
//! Properties are a [`TypeKind`] variant; their model lives in [`crate::property`].

mod arena;
mod flags;
mod header;
pub mod metadata;
mod node;

pub use arena::TypeArena;
pub use flags::{ClassFlags, EnumCppForm, FunctionFlags, FunctionKind, StructFlags, UnderlyingType};
pub use header::{HeaderFile, Package};
pub use metadata::MetaData;
pub use node::{
    ClassData, EnumData, EnumValue, FunctionData, PlaceholderData, PlaceholderKind, StructData,
    TypeKind, TypeNode,
};
