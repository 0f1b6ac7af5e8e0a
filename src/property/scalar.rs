//! Scalar kinds: booleans, numbers, names, strings and localized text.

use crate::base::TypeId;
use crate::types::TypeArena;

use super::caps::PropertyCaps;
use super::defaults::{
    format_float, parse_float, parse_integer_in, parse_string_literal, split_args, strip_call,
};
use super::enums::sanitize_enum_literal;
use super::settings::PropertyTextType;
use super::{PropertyBehavior, PropertyKind, TypeRef, TypeRefRole};

// ============================================================================
// BOOL
// ============================================================================

/// Storage backing a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoolStorage {
    /// `bool`
    #[default]
    Native,
    /// Flag-style bitfield in a sized integer (`uint8 bFoo : 1`)
    Uint8,
    Uint16,
    Uint32,
    Uint64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoolProperty {
    pub storage: BoolStorage,
}

impl BoolProperty {
    pub fn native() -> Self {
        Self::default()
    }

    pub fn sized(storage: BoolStorage) -> Self {
        Self { storage }
    }

    fn storage_keyword(&self) -> &'static str {
        match self.storage {
            BoolStorage::Native => "bool",
            BoolStorage::Uint8 => "uint8",
            BoolStorage::Uint16 => "uint16",
            BoolStorage::Uint32 => "uint32",
            BoolStorage::Uint64 => "uint64",
        }
    }
}

impl PropertyBehavior for BoolProperty {
    fn base_caps(&self) -> PropertyCaps {
        PropertyCaps::DEFAULT | PropertyCaps::BLUEPRINT_VALUE
    }

    fn append_text(&self, out: &mut String, _: &TypeArena, text_type: PropertyTextType, _: bool) {
        match text_type {
            PropertyTextType::ExportMember
            | PropertyTextType::Sparse
            | PropertyTextType::SparseShort
            | PropertyTextType::EventParameterMember => out.push_str(self.storage_keyword()),
            // `P_GET_UBOOL` takes no type argument.
            PropertyTextType::FunctionThunkParameterArgType => {}
            _ => out.push_str("bool"),
        }
    }

    fn thunk_macro(&self) -> &'static str {
        match self.storage {
            BoolStorage::Native => "UBOOL",
            BoolStorage::Uint8 => "UBOOL8",
            BoolStorage::Uint16 => "UBOOL16",
            BoolStorage::Uint32 => "UBOOL32",
            BoolStorage::Uint64 => "UBOOL64",
        }
    }

    fn null_constructor_arg(&self, _: &TypeArena) -> Option<String> {
        Some("false".to_string())
    }

    fn sanitize_default_value(&self, _: &TypeArena, literal: &str) -> Option<String> {
        let compact: String = literal.chars().filter(|c| !c.is_whitespace()).collect();
        matches!(compact.as_str(), "true" | "false").then_some(compact)
    }

    fn is_same_type(&self, other: &PropertyKind, _: &TypeArena) -> bool {
        matches!(other, PropertyKind::Bool(_))
    }
}

// ============================================================================
// NUMERIC
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Int8,
    Int16,
    Int32,
    Int64,
    /// `uint8`, also the storage of byte-backed enums
    Byte,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
}

impl NumericKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint8" => Self::Byte,
            "uint16" => Self::UInt16,
            "uint32" => Self::UInt32,
            "uint64" => Self::UInt64,
            "float" => Self::Float,
            "double" => Self::Double,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Byte => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Engine reflection class backing this kind.
    pub fn engine_class(self) -> &'static str {
        match self {
            Self::Int8 => "FInt8Property",
            Self::Int16 => "FInt16Property",
            Self::Int32 => "FIntProperty",
            Self::Int64 => "FInt64Property",
            Self::Byte => "FByteProperty",
            Self::UInt16 => "FUInt16Property",
            Self::UInt32 => "FUInt32Property",
            Self::UInt64 => "FUInt64Property",
            Self::Float => "FFloatProperty",
            Self::Double => "FDoubleProperty",
        }
    }

    pub fn is_floating(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    fn range(self) -> (i128, i128) {
        match self {
            Self::Int8 => (i8::MIN.into(), i8::MAX.into()),
            Self::Int16 => (i16::MIN.into(), i16::MAX.into()),
            Self::Int32 => (i32::MIN.into(), i32::MAX.into()),
            Self::Int64 => (i64::MIN.into(), i64::MAX.into()),
            Self::Byte => (0, u8::MAX.into()),
            Self::UInt16 => (0, u16::MAX.into()),
            Self::UInt32 => (0, u32::MAX.into()),
            Self::UInt64 => (0, u64::MAX.into()),
            Self::Float | Self::Double => (0, 0),
        }
    }

    fn is_blueprint_type(self) -> bool {
        matches!(
            self,
            Self::Byte | Self::Int32 | Self::Int64 | Self::Float | Self::Double
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericProperty {
    pub kind: NumericKind,
    /// Declared as `int` / `unsigned int` rather than a sized alias.
    pub unsized_int: bool,
    /// Enum stored in a byte (`TEnumAsByte<E>` or a non-scoped enum).
    pub byte_enum: Option<TypeRef>,
}

impl NumericProperty {
    pub fn new(kind: NumericKind) -> Self {
        Self {
            kind,
            unsized_int: false,
            byte_enum: None,
        }
    }

    pub fn unsized_int(kind: NumericKind) -> Self {
        Self {
            kind,
            unsized_int: matches!(kind, NumericKind::Int32 | NumericKind::UInt32),
            byte_enum: None,
        }
    }

    pub fn byte_enum(enum_ref: TypeRef) -> Self {
        Self {
            kind: NumericKind::Byte,
            unsized_int: false,
            byte_enum: Some(enum_ref),
        }
    }

    /// Enum this byte stores, once resolved.
    pub fn enum_id(&self) -> Option<TypeId> {
        self.byte_enum.as_ref().and_then(|r| r.id)
    }
}

impl PropertyBehavior for NumericProperty {
    fn base_caps(&self) -> PropertyCaps {
        if self.kind.is_blueprint_type() {
            PropertyCaps::DEFAULT | PropertyCaps::BLUEPRINT_VALUE
        } else {
            PropertyCaps::DEFAULT
        }
    }

    fn append_text(&self, out: &mut String, types: &TypeArena, text_type: PropertyTextType, _: bool) {
        if text_type == PropertyTextType::FunctionThunkParameterArgType {
            out.push_str(self.kind.engine_class());
            return;
        }
        if let Some(enum_ref) = &self.byte_enum {
            out.push_str("TEnumAsByte<");
            out.push_str(&enum_ref.display_name(types));
            out.push('>');
            return;
        }
        match (self.kind, self.unsized_int) {
            (NumericKind::Int32, true) => out.push_str("int"),
            (NumericKind::UInt32, true) => out.push_str("unsigned int"),
            (kind, _) => out.push_str(kind.keyword()),
        }
    }

    fn thunk_macro(&self) -> &'static str {
        "PROPERTY"
    }

    fn null_constructor_arg(&self, _: &TypeArena) -> Option<String> {
        Some(
            match self.kind {
                NumericKind::Float => "0.f",
                NumericKind::Double => "0.0",
                _ => "0",
            }
            .to_string(),
        )
    }

    fn sanitize_default_value(&self, types: &TypeArena, literal: &str) -> Option<String> {
        if let Some(enum_ref) = &self.byte_enum {
            return sanitize_enum_literal(types, enum_ref, literal);
        }
        if self.kind.is_floating() {
            let max = match self.kind {
                NumericKind::Float => f64::from(f32::MAX),
                _ => f64::MAX,
            };
            return parse_float(literal)
                .filter(|value| value.abs() <= max)
                .map(format_float);
        }
        let (min, max) = self.kind.range();
        parse_integer_in(literal, min, max)
    }

    fn is_same_type(&self, other: &PropertyKind, types: &TypeArena) -> bool {
        match other {
            PropertyKind::Numeric(o) => {
                self.kind == o.kind
                    && self.unsized_int == o.unsized_int
                    && match (&self.byte_enum, &o.byte_enum) {
                        (Some(a), Some(b)) => a.same_as(b, types),
                        (None, None) => true,
                        _ => false,
                    }
            }
            PropertyKind::Enum(e) => self
                .byte_enum
                .as_ref()
                .is_some_and(|r| r.same_as(&e.enum_ref, types)),
            _ => false,
        }
    }

    fn for_each_type_ref(&self, f: &mut dyn FnMut(&TypeRef, TypeRefRole)) {
        if let Some(r) = &self.byte_enum {
            f(r, TypeRefRole::Enum);
        }
    }

    fn for_each_type_ref_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef, TypeRefRole)) {
        if let Some(r) = &mut self.byte_enum {
            f(r, TypeRefRole::Enum);
        }
    }
}

// ============================================================================
// NAME / STRING / TEXT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    Name,
    String,
    /// Localized text
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringProperty {
    pub kind: StringKind,
}

impl StringProperty {
    pub fn new(kind: StringKind) -> Self {
        Self { kind }
    }
}

fn quoted(inner: &str) -> String {
    format!("\"{inner}\"")
}

fn sanitize_name(literal: &str) -> Option<String> {
    if literal == "NAME_None" {
        return Some(quoted("None"));
    }
    let inner = strip_call(literal, "FName").unwrap_or(literal);
    parse_string_literal(inner).map(quoted)
}

fn sanitize_string(literal: &str) -> Option<String> {
    match strip_call(literal, "FString") {
        Some("") => Some(quoted("")),
        Some(inner) => parse_string_literal(inner).map(quoted),
        None => parse_string_literal(literal).map(quoted),
    }
}

fn sanitize_text(literal: &str) -> Option<String> {
    const EMPTY: &str = "FText::GetEmpty()";
    if literal == EMPTY || strip_call(literal, "FText") == Some("") {
        return Some(EMPTY.to_string());
    }
    let invariant = strip_call(literal, "INVTEXT")
        .or_else(|| strip_call(literal, "FText::FromString"))
        .or_else(|| strip_call(literal, "FText::AsCultureInvariant"));
    if let Some(inner) = invariant {
        let source = strip_call(inner, "FString").unwrap_or(inner);
        return parse_string_literal(source).map(|s| format!("INVTEXT(\"{s}\")"));
    }
    if let Some(inner) = strip_call(literal, "NSLOCTEXT") {
        let args = split_args(inner);
        if args.len() != 3 {
            return None;
        }
        let parts = args
            .iter()
            .map(|a| parse_string_literal(a).map(quoted))
            .collect::<Option<Vec<_>>>()?;
        return Some(format!("NSLOCTEXT({})", parts.join(", ")));
    }
    // LOCTEXT depends on a namespace macro the header tool cannot see.
    None
}

impl PropertyBehavior for StringProperty {
    fn base_caps(&self) -> PropertyCaps {
        let caps = PropertyCaps::DEFAULT | PropertyCaps::BLUEPRINT_VALUE;
        match self.kind {
            StringKind::Name => caps,
            StringKind::String => caps | PropertyCaps::PASS_CPP_ARGS_BY_REF,
            StringKind::Text => (caps | PropertyCaps::PASS_CPP_ARGS_BY_REF) - PropertyCaps::CAN_BE_CONTAINER_KEY,
        }
    }

    fn append_text(&self, out: &mut String, _: &TypeArena, text_type: PropertyTextType, _: bool) {
        let text = match (self.kind, text_type == PropertyTextType::FunctionThunkParameterArgType) {
            (StringKind::Name, false) => "FName",
            (StringKind::String, false) => "FString",
            (StringKind::Text, false) => "FText",
            (StringKind::Name, true) => "FNameProperty",
            (StringKind::String, true) => "FStrProperty",
            (StringKind::Text, true) => "FTextProperty",
        };
        out.push_str(text);
    }

    fn thunk_macro(&self) -> &'static str {
        "PROPERTY"
    }

    fn null_constructor_arg(&self, _: &TypeArena) -> Option<String> {
        (self.kind == StringKind::Name).then(|| "NAME_None".to_string())
    }

    fn sanitize_default_value(&self, _: &TypeArena, literal: &str) -> Option<String> {
        match self.kind {
            StringKind::Name => sanitize_name(literal),
            StringKind::String => sanitize_string(literal),
            StringKind::Text => sanitize_text(literal),
        }
    }

    fn is_same_type(&self, other: &PropertyKind, _: &TypeArena) -> bool {
        matches!(other, PropertyKind::String(o) if o.kind == self.kind)
    }
}
