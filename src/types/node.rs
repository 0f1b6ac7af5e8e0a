//! Type nodes stored in the arena.

use crate::base::{HeaderId, Name, Outer, TypeId};
use crate::property::Property;

use super::flags::{ClassFlags, EnumCppForm, FunctionFlags, FunctionKind, StructFlags, UnderlyingType};
use super::metadata::MetaData;

/// A declared entity: class, struct, enum, function, property or placeholder.
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub id: TypeId,
    pub source_name: Name,
    pub engine_name: Name,
    pub outer: Outer,
    pub header: HeaderId,
    pub line: u32,
    /// Only visible types enter the symbol table.
    pub visible: bool,
    /// Counterpart used in generated references (native interface twin).
    pub alternate: Option<TypeId>,
    /// Metadata for non-property types. Properties keep theirs on [`Property`].
    pub meta: MetaData,
    pub children: Vec<TypeId>,
    pub kind: TypeKind,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Class(ClassData),
    Struct(StructData),
    Enum(EnumData),
    Function(FunctionData),
    Property(Property),
    /// Declared before its definition was known; replaced during Final.
    Placeholder(PlaceholderData),
}

#[derive(Debug, Clone, Default)]
pub struct ClassData {
    pub super_name: Option<Name>,
    pub super_id: Option<TypeId>,
    pub flags: ClassFlags,
}

#[derive(Debug, Clone, Default)]
pub struct StructData {
    pub super_name: Option<Name>,
    pub super_id: Option<TypeId>,
    pub flags: StructFlags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Unqualified value name.
    pub name: Name,
    pub value: i64,
    pub hidden: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EnumData {
    pub cpp_form: EnumCppForm,
    /// Backing integer keyword as written, resolved during Bases.
    pub underlying_keyword: Option<Name>,
    pub underlying: UnderlyingType,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionData {
    pub kind: FunctionKind,
    pub flags: FunctionFlags,
}

/// What a placeholder stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Class,
    Struct,
    Enum,
}

#[derive(Debug, Clone)]
pub struct PlaceholderData {
    pub expected: PlaceholderKind,
}

impl TypeNode {
    /// Short kind label used in messages.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            TypeKind::Class(c) if c.flags.contains(ClassFlags::INTERFACE) => "interface",
            TypeKind::Class(_) => "class",
            TypeKind::Struct(_) => "struct",
            TypeKind::Enum(_) => "enum",
            TypeKind::Function(f) if f.kind != FunctionKind::Function => "delegate",
            TypeKind::Function(_) => "function",
            TypeKind::Property(_) => "property",
            TypeKind::Placeholder(_) => "placeholder",
        }
    }

    pub fn meta(&self) -> &MetaData {
        match &self.kind {
            TypeKind::Property(p) => &p.meta,
            _ => &self.meta,
        }
    }

    /// Class, struct and function nodes participate in super-chain lookups.
    pub fn is_struct_like(&self) -> bool {
        matches!(self.kind, TypeKind::Class(_) | TypeKind::Struct(_) | TypeKind::Function(_))
    }

    pub fn super_id(&self) -> Option<TypeId> {
        match &self.kind {
            TypeKind::Class(c) => c.super_id,
            TypeKind::Struct(s) => s.super_id,
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match &self.kind {
            TypeKind::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumData> {
        match &self.kind {
            TypeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassData> {
        match &self.kind {
            TypeKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructData> {
        match &self.kind {
            TypeKind::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionData> {
        match &self.kind {
            TypeKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn class_flags(&self) -> ClassFlags {
        self.as_class().map(|c| c.flags).unwrap_or_default()
    }

    pub fn is_deprecated(&self) -> bool {
        match &self.kind {
            TypeKind::Class(c) => c.flags.contains(ClassFlags::DEPRECATED),
            TypeKind::Struct(s) => s.flags.contains(StructFlags::DEPRECATED),
            TypeKind::Property(p) => p.flags.contains(crate::property::PropertyFlags::DEPRECATED),
            _ => false,
        }
    }
}

impl EnumData {
    /// Name the value is spelled with in source (`EColor::Red` for scoped enums).
    pub fn full_value_name(&self, enum_name: &str, value: &EnumValue) -> String {
        match self.cpp_form {
            EnumCppForm::Regular => value.name.to_string(),
            EnumCppForm::Namespaced | EnumCppForm::EnumClass => format!("{enum_name}::{}", value.name),
        }
    }

    pub fn find_value(&self, short_name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == short_name)
    }
}
