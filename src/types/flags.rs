//! Flag sets carried by non-property types.

use bitflags::bitflags;

bitflags! {
    /// Class declaration flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassFlags: u32 {
        const ABSTRACT = 0x0000_0001;
        const NO_EXPORT = 0x0000_0002;
        const CONST = 0x0000_0004;
        const TRANSIENT = 0x0000_0008;
        const DEFAULT_TO_INSTANCED = 0x0000_0010;
        const DEPRECATED = 0x0000_0020;
        const INTERFACE = 0x0000_0040;
        /// The native `I`-prefixed twin of an interface class.
        const NATIVE_INTERFACE = 0x0000_0080;
        const MINIMAL_API = 0x0000_0100;
        const EDIT_INLINE_NEW = 0x0000_0200;
    }
}

bitflags! {
    /// Script struct flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StructFlags: u32 {
        const NO_EXPORT = 0x0000_0001;
        const ATOMIC = 0x0000_0002;
        const IMMUTABLE = 0x0000_0004;
        /// Set during Final when any member transitively holds an instanced reference.
        const HAS_INSTANCED_REFERENCE = 0x0000_0008;
        const DEPRECATED = 0x0000_0010;
    }
}

bitflags! {
    /// Function flags, bit-compatible with the engine's function flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionFlags: u32 {
        const FINAL = 0x0000_0001;
        const REQUIRED_API = 0x0000_0002;
        const BLUEPRINT_AUTHORITY_ONLY = 0x0000_0004;
        const BLUEPRINT_COSMETIC = 0x0000_0008;
        const NET = 0x0000_0040;
        const NET_RELIABLE = 0x0000_0080;
        const NET_REQUEST = 0x0000_0100;
        const EXEC = 0x0000_0200;
        const NATIVE = 0x0000_0400;
        const EVENT = 0x0000_0800;
        const NET_RESPONSE = 0x0000_1000;
        const STATIC = 0x0000_2000;
        const NET_MULTICAST = 0x0000_4000;
        const MULTICAST_DELEGATE = 0x0001_0000;
        const PUBLIC = 0x0002_0000;
        const PRIVATE = 0x0004_0000;
        const PROTECTED = 0x0008_0000;
        const DELEGATE = 0x0010_0000;
        const NET_SERVER = 0x0020_0000;
        const HAS_OUT_PARMS = 0x0040_0000;
        const HAS_DEFAULTS = 0x0080_0000;
        const NET_CLIENT = 0x0100_0000;
        const BLUEPRINT_CALLABLE = 0x0400_0000;
        const BLUEPRINT_EVENT = 0x0800_0000;
        const BLUEPRINT_PURE = 0x1000_0000;
        const EDITOR_ONLY = 0x2000_0000;
        const CONST = 0x4000_0000;
        const NET_VALIDATE = 0x8000_0000;
    }
}

/// How an enum was declared in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumCppForm {
    /// `enum EFoo { ... }`
    #[default]
    Regular,
    /// `namespace EFoo { enum Type { ... } }`
    Namespaced,
    /// `enum class EFoo : uint8 { ... }`
    EnumClass,
}

/// Backing integer declared for an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnderlyingType {
    #[default]
    Unspecified,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Int,
}

impl UnderlyingType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "int" => Self::Int,
            _ => return None,
        })
    }

    pub fn keyword(self) -> Option<&'static str> {
        Some(match self {
            Self::Unspecified => return None,
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Int => "int",
        })
    }
}

/// Flavor of a function declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FunctionKind {
    #[default]
    Function,
    /// Delegate signature with inline storage
    Delegate,
    /// Delegate signature stored sparsely on its owning object
    SparseDelegate,
}

impl FunctionKind {
    pub fn is_delegate(self) -> bool {
        !matches!(self, FunctionKind::Function)
    }
}
