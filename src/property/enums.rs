//! Enum-valued properties.

use crate::base::TypeId;
use crate::diag::codes;
use crate::types::{EnumCppForm, TypeArena, UnderlyingType};

use super::caps::PropertyCaps;
use super::settings::PropertyTextType;
use super::validate::ValidationContext;
use super::{Property, PropertyBehavior, PropertyKind, TypeRef, TypeRefRole};

/// A property holding a value of a declared enum.
#[derive(Debug, Clone)]
pub struct EnumProperty {
    pub enum_ref: TypeRef,
    /// Synthesized numeric property for enums with a declared backing type.
    pub underlying: Option<Box<Property>>,
}

impl EnumProperty {
    pub fn new(enum_ref: TypeRef) -> Self {
        Self {
            enum_ref,
            underlying: None,
        }
    }

    pub fn enum_id(&self) -> Option<TypeId> {
        self.enum_ref.id
    }

    fn cpp_form(&self, types: &TypeArena) -> EnumCppForm {
        self.enum_ref
            .id
            .and_then(|id| types.read(id).as_enum().map(|e| e.cpp_form))
            .unwrap_or_default()
    }
}

/// Canonical spelling of an enum value literal, qualifiers ignored.
pub(crate) fn sanitize_enum_literal(types: &TypeArena, enum_ref: &TypeRef, literal: &str) -> Option<String> {
    let node = types.read(enum_ref.id?);
    let data = node.as_enum()?;
    let short = literal.rsplit("::").next()?.trim();
    let value = data.find_value(short).filter(|v| !v.hidden)?;
    Some(data.full_value_name(&node.source_name, value))
}

impl PropertyBehavior for EnumProperty {
    fn base_caps(&self) -> PropertyCaps {
        PropertyCaps::DEFAULT | PropertyCaps::BLUEPRINT_VALUE
    }

    fn append_text(
        &self,
        out: &mut String,
        types: &TypeArena,
        text_type: PropertyTextType,
        is_template_argument: bool,
    ) {
        let name = self.enum_ref.display_name(types);
        let wrap = text_type != PropertyTextType::FunctionThunkParameterArgType
            && (is_template_argument || text_type == PropertyTextType::FunctionThunkReturn)
            && self.cpp_form(types) != EnumCppForm::EnumClass;
        if wrap {
            out.push_str("TEnumAsByte<");
            out.push_str(&name);
            out.push('>');
        } else {
            out.push_str(&name);
        }
    }

    fn thunk_macro(&self) -> &'static str {
        "ENUM"
    }

    fn null_constructor_arg(&self, types: &TypeArena) -> Option<String> {
        Some(format!("({})0", self.enum_ref.display_name(types)))
    }

    fn sanitize_default_value(&self, types: &TypeArena, literal: &str) -> Option<String> {
        sanitize_enum_literal(types, &self.enum_ref, literal)
    }

    fn is_same_type(&self, other: &PropertyKind, types: &TypeArena) -> bool {
        match other {
            PropertyKind::Enum(o) => self.enum_ref.same_as(&o.enum_ref, types),
            PropertyKind::Numeric(n) => n
                .byte_enum
                .as_ref()
                .is_some_and(|r| r.same_as(&self.enum_ref, types)),
            _ => false,
        }
    }

    fn for_each_type_ref(&self, f: &mut dyn FnMut(&TypeRef, TypeRefRole)) {
        f(&self.enum_ref, TypeRefRole::Enum);
    }

    fn for_each_type_ref_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef, TypeRefRole)) {
        f(&mut self.enum_ref, TypeRefRole::Enum);
    }

    fn validate(&self, property: &Property, cx: &ValidationContext<'_>) {
        if !property.is_blueprint_exposed() && !cx.is_blueprint_function() {
            return;
        }
        let Some(id) = self.enum_ref.id else {
            return;
        };
        let underlying = cx
            .types()
            .read(id)
            .as_enum()
            .map(|e| e.underlying)
            .unwrap_or_default();
        if !matches!(underlying, UnderlyingType::Unspecified | UnderlyingType::Uint8) {
            cx.error(
                property.line,
                codes::BLUEPRINT,
                "Invalid enum param for Blueprints - currently only uint8 supported.",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::base::{HeaderId, Outer};
    use crate::property::{NumericProperty, PropertySettings};
    use crate::types::{EnumData, EnumValue, MetaData, TypeKind, TypeNode};

    struct Enums {
        types: TypeArena,
        regular: TypeId,
        scoped: TypeId,
    }

    fn declare(types: &mut TypeArena, name: &str, cpp_form: EnumCppForm) -> TypeId {
        types.alloc(|id| TypeNode {
            id,
            source_name: name.into(),
            engine_name: name.into(),
            outer: Outer::Header(HeaderId::new(0)),
            header: HeaderId::new(0),
            line: 1,
            visible: true,
            alternate: None,
            meta: MetaData::new(),
            children: Vec::new(),
            kind: TypeKind::Enum(EnumData {
                cpp_form,
                values: vec![EnumValue {
                    name: "First".into(),
                    value: 0,
                    hidden: false,
                }],
                ..Default::default()
            }),
        })
    }

    fn enums() -> Enums {
        let mut types = TypeArena::new();
        let regular = declare(&mut types, "ERegular", EnumCppForm::Regular);
        let scoped = declare(&mut types, "EScoped", EnumCppForm::EnumClass);
        Enums { types, regular, scoped }
    }

    fn enum_of(name: &str, id: TypeId) -> Property {
        Property::new(
            PropertySettings::member("Value"),
            PropertyKind::Enum(EnumProperty::new(TypeRef::resolved(name, id))),
        )
    }

    fn byte_of(name: &str, id: TypeId) -> Property {
        Property::new(
            PropertySettings::member("Value"),
            PropertyKind::Numeric(NumericProperty::byte_enum(TypeRef::resolved(name, id))),
        )
    }

    #[test]
    fn test_matches_legacy_byte_form_both_ways() {
        let cx = enums();
        let as_enum = enum_of("ERegular", cx.regular);
        let as_byte = byte_of("ERegular", cx.regular);
        assert!(as_enum.is_same_type(&as_byte, &cx.types));
        assert!(as_byte.is_same_type(&as_enum, &cx.types));

        let other = byte_of("EScoped", cx.scoped);
        assert!(!as_enum.is_same_type(&other, &cx.types));
        assert!(!other.is_same_type(&as_enum, &cx.types));

        let plain = Property::new(
            PropertySettings::member("Value"),
            PropertyKind::Numeric(NumericProperty::new(crate::property::NumericKind::Byte)),
        );
        assert!(!as_enum.is_same_type(&plain, &cx.types));
        assert!(!plain.is_same_type(&as_enum, &cx.types));
    }

    #[rstest]
    #[case(false, PropertyTextType::UserFacing, false, "ERegular")]
    #[case(false, PropertyTextType::UserFacing, true, "TEnumAsByte<ERegular>")]
    #[case(false, PropertyTextType::FunctionThunkReturn, false, "TEnumAsByte<ERegular>")]
    #[case(false, PropertyTextType::FunctionThunkParameterArgType, true, "ERegular")]
    #[case(false, PropertyTextType::ExportMember, false, "ERegular")]
    #[case(true, PropertyTextType::UserFacing, true, "EScoped")]
    #[case(true, PropertyTextType::FunctionThunkReturn, false, "EScoped")]
    fn test_rendering_depends_on_context(
        #[case] scoped: bool,
        #[case] text_type: PropertyTextType,
        #[case] is_template_argument: bool,
        #[case] expected: &str,
    ) {
        let cx = enums();
        let property = if scoped {
            EnumProperty::new(TypeRef::resolved("EScoped", cx.scoped))
        } else {
            EnumProperty::new(TypeRef::resolved("ERegular", cx.regular))
        };
        let mut out = String::new();
        property.append_text(&mut out, &cx.types, text_type, is_template_argument);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_default_values_use_full_value_names() {
        let cx = enums();
        let regular = EnumProperty::new(TypeRef::resolved("ERegular", cx.regular));
        let scoped = EnumProperty::new(TypeRef::resolved("EScoped", cx.scoped));
        assert_eq!(regular.sanitize_default_value(&cx.types, "First").as_deref(), Some("First"));
        assert_eq!(
            scoped.sanitize_default_value(&cx.types, "EScoped::First").as_deref(),
            Some("EScoped::First")
        );
        assert_eq!(scoped.sanitize_default_value(&cx.types, "Second"), None);
        assert_eq!(scoped.null_constructor_arg(&cx.types).as_deref(), Some("(EScoped)0"));
    }
}
