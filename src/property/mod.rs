//! Property model - the closed set of field/parameter/return kinds.
//!
//! A [`Property`] is one declared field, parameter or return value. Its
//! [`PropertyKind`] is a sum type over every supported kind; the per-kind
//! contract lives in [`PropertyBehavior`] and is dispatched by exhaustive match.
//!
//! ## Key Types
//!
//! - [`Property`] - Shared state: names, category, flags, capabilities, metadata
//! - [`PropertyKind`] - Kind tag plus kind-specific data
//! - [`PropertyCaps`] - What a kind supports (container key, blueprint, ...)
//! - [`PropertyFlags`] - What a declaration asked for (const, out, replicated, ...)
//! - [`TypeRef`] - Reference to another declared type, resolved by name
//!
//! Containers are built in two steps: construct the inner property, then hand
//! it to [`ContainerProperty::adopt`] which returns the finished container.

mod caps;
mod container;
mod defaults;
mod delegate;
mod enums;
mod flags;
mod object;
mod scalar;
mod settings;
mod structs;
mod text;
mod validate;

pub use caps::PropertyCaps;
pub use container::{ContainerKind, ContainerProperty};
pub use defaults::{StructDefaultParser, struct_default_parser};
pub use delegate::{DelegateKind, DelegateProperty};
pub use enums::EnumProperty;
pub use flags::PropertyFlags;
pub use object::{ObjectProperty, ObjectRefKind};
pub use scalar::{BoolProperty, BoolStorage, NumericKind, NumericProperty, StringKind, StringProperty};
pub use settings::{PropertyCategory, PropertySettings, PropertyTextType};
pub use structs::StructProperty;
pub use validate::{
    PropertyOwner, ValidationContext, ValidationEnv, is_supported_by_blueprint, validate_property,
};

pub(crate) use defaults::parse_integer;
pub(crate) use structs::struct_has_instanced_reference;

use crate::base::{Name, TypeId};
use crate::types::{MetaData, TypeArena};

// ============================================================================
// TYPE REFERENCES
// ============================================================================

/// A named reference from a property to another declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: Name,
    /// Filled in during the Properties phase.
    pub id: Option<TypeId>,
}

impl TypeRef {
    pub fn named(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    pub fn resolved(name: impl Into<Name>, id: TypeId) -> Self {
        Self {
            name: name.into(),
            id: Some(id),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.id.is_some()
    }

    /// Identity comparison that follows arena replacements.
    pub fn same_as(&self, other: &TypeRef, types: &TypeArena) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => types.same(a, b),
            (None, None) => self.name == other.name,
            _ => false,
        }
    }

    /// Source name of the referenced type, or the written name if unresolved.
    pub fn display_name(&self, types: &TypeArena) -> Name {
        match self.id {
            Some(id) => types.source_name(id),
            None => self.name.clone(),
        }
    }
}

/// What a [`TypeRef`] is expected to point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRefRole {
    Enum,
    Struct,
    /// Class referenced by an object pointer
    Class,
    /// Meta-class limiter of a class reference
    MetaClass,
    DelegateFunction,
}

// ============================================================================
// PER-KIND CONTRACT
// ============================================================================

/// Behavior every property kind implements.
pub trait PropertyBehavior {
    /// Capabilities of the kind before settings overrides are applied.
    fn base_caps(&self) -> PropertyCaps;

    /// Flags the kind always contributes.
    fn intrinsic_flags(&self) -> PropertyFlags {
        PropertyFlags::empty()
    }

    fn append_text(
        &self,
        out: &mut String,
        types: &TypeArena,
        text_type: PropertyTextType,
        is_template_argument: bool,
    );

    /// Stem of the `P_GET_*` macro used by function thunks.
    fn thunk_macro(&self) -> &'static str;

    /// Explicit constructor argument representing "null" for this kind.
    fn null_constructor_arg(&self, _types: &TypeArena) -> Option<String> {
        None
    }

    /// Canonical form of a default value literal, or `None` if it does not parse.
    fn sanitize_default_value(&self, _types: &TypeArena, _literal: &str) -> Option<String> {
        None
    }

    fn is_same_type(&self, other: &PropertyKind, types: &TypeArena) -> bool;

    /// Whether the value (transitively, when `deep`) holds an instanced reference.
    fn scan_for_instanced_referenced(
        &self,
        _types: &TypeArena,
        _deep: bool,
        _visited: &mut Vec<TypeId>,
    ) -> bool {
        false
    }

    fn for_each_type_ref(&self, _f: &mut dyn FnMut(&TypeRef, TypeRefRole)) {}

    fn for_each_type_ref_mut(&mut self, _f: &mut dyn FnMut(&mut TypeRef, TypeRefRole)) {}

    /// Kind-specific checks run during the Validate phase.
    fn validate(&self, _property: &Property, _cx: &ValidationContext<'_>) {}
}

// ============================================================================
// PROPERTY KINDS
// ============================================================================

/// `void`; only valid as a return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoidProperty;

/// A type expression that could not be resolved while parsing.
///
/// Re-parsed through the registry during the Properties phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredProperty {
    pub expression: String,
}

#[derive(Debug, Clone)]
pub enum PropertyKind {
    Bool(BoolProperty),
    Numeric(NumericProperty),
    String(StringProperty),
    Void(VoidProperty),
    Enum(EnumProperty),
    Struct(StructProperty),
    Object(ObjectProperty),
    Delegate(DelegateProperty),
    Container(ContainerProperty),
    Deferred(DeferredProperty),
}

impl PropertyKind {
    pub fn behavior(&self) -> &dyn PropertyBehavior {
        match self {
            PropertyKind::Bool(p) => p,
            PropertyKind::Numeric(p) => p,
            PropertyKind::String(p) => p,
            PropertyKind::Void(p) => p,
            PropertyKind::Enum(p) => p,
            PropertyKind::Struct(p) => p,
            PropertyKind::Object(p) => p,
            PropertyKind::Delegate(p) => p,
            PropertyKind::Container(p) => p,
            PropertyKind::Deferred(p) => p,
        }
    }

    pub fn behavior_mut(&mut self) -> &mut dyn PropertyBehavior {
        match self {
            PropertyKind::Bool(p) => p,
            PropertyKind::Numeric(p) => p,
            PropertyKind::String(p) => p,
            PropertyKind::Void(p) => p,
            PropertyKind::Enum(p) => p,
            PropertyKind::Struct(p) => p,
            PropertyKind::Object(p) => p,
            PropertyKind::Delegate(p) => p,
            PropertyKind::Container(p) => p,
            PropertyKind::Deferred(p) => p,
        }
    }

    /// Short label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            PropertyKind::Bool(_) => "bool",
            PropertyKind::Numeric(_) => "numeric",
            PropertyKind::String(_) => "string",
            PropertyKind::Void(_) => "void",
            PropertyKind::Enum(_) => "enum",
            PropertyKind::Struct(_) => "struct",
            PropertyKind::Object(_) => "object",
            PropertyKind::Delegate(_) => "delegate",
            PropertyKind::Container(c) => c.kind.label(),
            PropertyKind::Deferred(_) => "unresolved",
        }
    }
}

impl PropertyBehavior for VoidProperty {
    fn base_caps(&self) -> PropertyCaps {
        PropertyCaps::empty()
    }

    fn append_text(&self, out: &mut String, _: &TypeArena, _: PropertyTextType, _: bool) {
        out.push_str("void");
    }

    fn thunk_macro(&self) -> &'static str {
        "PROPERTY"
    }

    fn is_same_type(&self, other: &PropertyKind, _: &TypeArena) -> bool {
        matches!(other, PropertyKind::Void(_))
    }
}

impl PropertyBehavior for DeferredProperty {
    fn base_caps(&self) -> PropertyCaps {
        PropertyCaps::empty()
    }

    fn append_text(&self, out: &mut String, _: &TypeArena, _: PropertyTextType, _: bool) {
        out.push_str(&self.expression);
    }

    fn thunk_macro(&self) -> &'static str {
        "PROPERTY"
    }

    fn is_same_type(&self, other: &PropertyKind, _: &TypeArena) -> bool {
        matches!(other, PropertyKind::Deferred(d) if d.expression == self.expression)
    }
}

// ============================================================================
// PROPERTY
// ============================================================================

/// A declared field, parameter or return value.
#[derive(Debug, Clone)]
pub struct Property {
    pub source_name: Name,
    pub engine_name: Name,
    pub line: u32,
    pub category: PropertyCategory,
    pub flags: PropertyFlags,
    pub disallow_flags: PropertyFlags,
    pub meta: MetaData,
    pub caps: PropertyCaps,
    caps_add: PropertyCaps,
    caps_remove: PropertyCaps,
    pub array_dimensions: Option<String>,
    pub default_value: Option<String>,
    pub rep_notify: Option<Name>,
    pub is_bitfield: bool,
    pub kind: PropertyKind,
}

impl Property {
    /// Build a property of `kind` from a construction request.
    pub fn new(settings: PropertySettings, kind: PropertyKind) -> Self {
        let behavior = kind.behavior();
        let caps = (behavior.base_caps() | settings.caps_add) & !settings.caps_remove;
        let flags = (settings.flags | behavior.intrinsic_flags()) & !settings.disallow_flags;
        Self {
            source_name: settings.source_name,
            engine_name: settings.engine_name,
            line: settings.line,
            category: settings.category,
            flags,
            disallow_flags: settings.disallow_flags,
            meta: settings.meta,
            caps,
            caps_add: settings.caps_add,
            caps_remove: settings.caps_remove,
            array_dimensions: settings.array_dimensions,
            default_value: settings.default_value,
            rep_notify: settings.rep_notify,
            is_bitfield: settings.is_bitfield,
            kind,
        }
    }

    /// The construction request this property was built from.
    pub fn settings(&self) -> PropertySettings {
        PropertySettings {
            source_name: self.source_name.clone(),
            engine_name: self.engine_name.clone(),
            line: self.line,
            category: self.category,
            flags: self.flags,
            disallow_flags: self.disallow_flags,
            meta: self.meta.clone(),
            caps_add: self.caps_add,
            caps_remove: self.caps_remove,
            array_dimensions: self.array_dimensions.clone(),
            default_value: self.default_value.clone(),
            rep_notify: self.rep_notify.clone(),
            is_bitfield: self.is_bitfield,
        }
    }

    pub fn behavior(&self) -> &dyn PropertyBehavior {
        self.kind.behavior()
    }

    /// Swap the kind, re-deriving caps for the new one.
    pub(crate) fn set_kind(&mut self, kind: PropertyKind) {
        self.caps = (kind.behavior().base_caps() | self.caps_add) & !self.caps_remove;
        self.kind = kind;
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.kind, PropertyKind::Deferred(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, PropertyKind::Container(_))
    }

    pub fn is_static_array(&self) -> bool {
        self.array_dimensions.is_some()
    }

    pub fn as_container(&self) -> Option<&ContainerProperty> {
        match &self.kind {
            PropertyKind::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Render the type for the given usage context.
    pub fn append_text(&self, out: &mut String, types: &TypeArena, text_type: PropertyTextType) {
        self.behavior().append_text(out, types, text_type, false);
    }

    pub fn type_text(&self, types: &TypeArena, text_type: PropertyTextType) -> String {
        let mut out = String::new();
        self.append_text(&mut out, types, text_type);
        out
    }

    pub fn null_constructor_arg(&self, types: &TypeArena) -> Option<String> {
        self.behavior().null_constructor_arg(types)
    }

    /// Canonical form of `literal`; `None` leaves nothing behind on failure.
    pub fn sanitize_default_value(&self, types: &TypeArena, literal: &str) -> Option<String> {
        self.behavior().sanitize_default_value(types, literal.trim())
    }

    pub fn is_same_type(&self, other: &Property, types: &TypeArena) -> bool {
        self.behavior().is_same_type(&other.kind, types)
    }

    /// Signature matching: out-ness and const-out must agree before type equality.
    pub fn matches_type(&self, other: &Property, types: &TypeArena) -> bool {
        let out = PropertyFlags::OUT_PARM;
        if self.flags.contains(out) != other.flags.contains(out) {
            return false;
        }
        if self.flags.contains(out)
            && self.flags.contains(PropertyFlags::CONST_PARM) != other.flags.contains(PropertyFlags::CONST_PARM)
        {
            return false;
        }
        self.is_same_type(other, types)
    }

    pub fn scan_for_instanced_referenced(&self, types: &TypeArena, deep: bool) -> bool {
        let mut visited = Vec::new();
        self.scan_instanced_with(types, deep, &mut visited)
    }

    /// Flag check first, then the kind's own scan.
    pub(crate) fn scan_instanced_with(
        &self,
        types: &TypeArena,
        deep: bool,
        visited: &mut Vec<TypeId>,
    ) -> bool {
        self.flags.intersects(
            PropertyFlags::INSTANCED_REFERENCE | PropertyFlags::CONTAINS_INSTANCED_REFERENCE,
        ) || self
            .behavior()
            .scan_for_instanced_referenced(types, deep, visited)
    }

    /// Every type reference, including those of inner properties.
    pub fn type_refs(&self) -> Vec<(TypeRef, TypeRefRole)> {
        let mut refs = Vec::new();
        self.behavior()
            .for_each_type_ref(&mut |r, role| refs.push((r.clone(), role)));
        refs
    }

    pub fn for_each_type_ref_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef, TypeRefRole)) {
        self.kind.behavior_mut().for_each_type_ref_mut(f);
    }

    /// The property is blueprint-visible or blueprint-assignable.
    pub fn is_blueprint_exposed(&self) -> bool {
        self.flags
            .intersects(PropertyFlags::BLUEPRINT_VISIBLE | PropertyFlags::BLUEPRINT_ASSIGNABLE)
    }
}
