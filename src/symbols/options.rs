use bitflags::bitflags;

use crate::diag::{ResolveError, ResolveResult};
use crate::types::{PlaceholderKind, TypeKind, TypeNode};

bitflags! {
    /// Options controlling a symbol table lookup.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FindOptions: u32 {
        const ENUM = 1 << 0;
        const SCRIPT_STRUCT = 1 << 1;
        const CLASS = 1 << 2;
        const DELEGATE_FUNCTION = 1 << 3;
        const FUNCTION = 1 << 4;
        const PROPERTY = 1 << 5;

        /// Search the source name table
        const SOURCE_NAME = 1 << 8;
        /// Search the engine name table
        const ENGINE_NAME = 1 << 9;
        /// Force a cased comparison
        const CASE_COMPARE = 1 << 10;
        /// Force a caseless comparison
        const CASELESS_COMPARE = 1 << 11;

        /// Start at the enclosing type instead of the starting type
        const EXCLUDE_SELF = 1 << 16;
        /// Do not search super chains
        const NO_PARENTS = 1 << 17;
        /// Do not walk outward through enclosing types
        const NO_OUTER = 1 << 18;
        /// Do not search included headers
        const NO_INCLUDES = 1 << 19;
        /// Do not fall back to every header's top-level types
        const NO_GLOBAL = 1 << 20;
        /// Only the starting type's own children
        const SELF_ONLY = 1 << 21;

        /// Every type kind a property can refer to.
        const TYPES = Self::ENUM.bits()
            | Self::SCRIPT_STRUCT.bits()
            | Self::CLASS.bits()
            | Self::DELEGATE_FUNCTION.bits();

        const KINDS = Self::TYPES.bits() | Self::FUNCTION.bits() | Self::PROPERTY.bits();
    }
}

impl FindOptions {
    /// Reject option sets no caller should ever build.
    pub fn validate(self) -> ResolveResult<()> {
        if !self.intersects(Self::KINDS) {
            return Err(ResolveError::InvalidFindOptions(
                "at least one type kind must be requested",
            ));
        }
        if self.contains(Self::SOURCE_NAME) == self.contains(Self::ENGINE_NAME) {
            return Err(ResolveError::InvalidFindOptions(
                "exactly one of SOURCE_NAME or ENGINE_NAME must be selected",
            ));
        }
        if self.contains(Self::CASE_COMPARE | Self::CASELESS_COMPARE) {
            return Err(ResolveError::InvalidFindOptions(
                "cased and caseless comparison are mutually exclusive",
            ));
        }
        Ok(())
    }

    /// The single kind bit a node is filed under.
    pub fn kind_of(node: &TypeNode) -> FindOptions {
        match &node.kind {
            TypeKind::Class(_) => Self::CLASS,
            TypeKind::Struct(_) => Self::SCRIPT_STRUCT,
            TypeKind::Enum(_) => Self::ENUM,
            TypeKind::Function(f) if f.kind.is_delegate() => Self::DELEGATE_FUNCTION,
            TypeKind::Function(_) => Self::FUNCTION,
            TypeKind::Property(_) => Self::PROPERTY,
            TypeKind::Placeholder(p) => match p.expected {
                PlaceholderKind::Class => Self::CLASS,
                PlaceholderKind::Struct => Self::SCRIPT_STRUCT,
                PlaceholderKind::Enum => Self::ENUM,
            },
        }
    }
}
