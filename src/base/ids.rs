//! Stable indices into the session's arenas.
//!
//! Every declared entity is addressed by index rather than by reference. An index
//! is assigned once when the entity is created and never changes, even if the
//! entity's content is later replaced.

use std::fmt;

macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Position of this entity in its arena.
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Index of a type (class, struct, enum, function, property) in the type arena.
    TypeId,
    "type"
);

arena_id!(
    /// Index of a header file in the session.
    HeaderId,
    "header"
);

arena_id!(
    /// Index of a package (module) in the session.
    PackageId,
    "package"
);

/// What a type is directly contained by.
///
/// Top-level declarations are owned by their header file; nested declarations
/// (members, parameters, nested delegates) are owned by another type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outer {
    Header(HeaderId),
    Type(TypeId),
}

impl Outer {
    pub fn as_type(self) -> Option<TypeId> {
        match self {
            Outer::Type(id) => Some(id),
            Outer::Header(_) => None,
        }
    }

    pub fn is_header(self) -> bool {
        matches!(self, Outer::Header(_))
    }
}
