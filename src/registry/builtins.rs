//! Built-in keyword parsers.

use crate::base::Name;
use crate::diag::ResolveResult;
use crate::property::{
    BoolProperty, BoolStorage, ContainerKind, ContainerProperty, DelegateKind, DelegateProperty,
    EnumProperty, NumericKind, NumericProperty, ObjectProperty, ObjectRefKind, Property, PropertyKind,
    PropertySettings, StringKind, StringProperty, StructProperty, TypeRef, VoidProperty,
};
use crate::symbols::FindOptions;
use crate::types::{EnumCppForm, FunctionFlags, FunctionKind, PlaceholderKind, TypeKind};

use super::tokens::{TokenStream, TypeToken};
use super::{PropertyParseContext, PropertyTypeOptions, PropertyTypeParser};

const SCALAR: PropertyTypeOptions = PropertyTypeOptions::SIMPLE.union(PropertyTypeOptions::IMMEDIATE);
const TEMPLATE: PropertyTypeOptions = PropertyTypeOptions::empty();

pub(super) static BUILTINS: &[(&str, PropertyTypeParser, PropertyTypeOptions)] = &[
    ("bool", parse_bool, SCALAR),
    ("int8", parse_numeric, SCALAR),
    ("int16", parse_numeric, SCALAR),
    ("int32", parse_numeric, SCALAR),
    ("int64", parse_numeric, SCALAR),
    ("uint8", parse_numeric, SCALAR),
    ("uint16", parse_numeric, SCALAR),
    ("uint32", parse_numeric, SCALAR),
    ("uint64", parse_numeric, SCALAR),
    ("float", parse_numeric, SCALAR),
    ("double", parse_numeric, SCALAR),
    ("int", parse_int, SCALAR),
    ("unsigned", parse_unsigned, SCALAR),
    ("FName", parse_string, SCALAR),
    ("FString", parse_string, SCALAR),
    ("FText", parse_string, SCALAR),
    ("void", parse_void, SCALAR),
    ("TArray", parse_array, TEMPLATE),
    ("TSet", parse_set, TEMPLATE),
    ("TMap", parse_map, TEMPLATE),
    ("TObjectPtr", parse_object_ptr, TEMPLATE),
    ("TWeakObjectPtr", parse_weak_object_ptr, TEMPLATE),
    ("TAutoWeakObjectPtr", parse_auto_weak_object_ptr, TEMPLATE),
    ("TLazyObjectPtr", parse_lazy_object_ptr, TEMPLATE),
    ("TSoftObjectPtr", parse_soft_object_ptr, TEMPLATE),
    ("TSoftClassPtr", parse_soft_class_ptr, TEMPLATE),
    ("TSubclassOf", parse_subclass_of, TEMPLATE),
    ("TScriptInterface", parse_script_interface, TEMPLATE),
    ("TEnumAsByte", parse_enum_as_byte, TEMPLATE),
];

fn done(settings: PropertySettings, kind: PropertyKind) -> ResolveResult<Option<Property>> {
    Ok(Some(Property::new(settings, kind)))
}

/// Settings for a property nested inside another declaration's type.
fn inner_settings(outer: &PropertySettings) -> PropertySettings {
    PropertySettings {
        source_name: outer.source_name.clone(),
        engine_name: outer.engine_name.clone(),
        line: outer.line,
        category: outer.category,
        ..PropertySettings::default()
    }
}

// ============================================================================
// SCALARS
// ============================================================================

fn parse_bool(_: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    s.expect_identifier()?;
    done(settings, PropertyKind::Bool(BoolProperty::native()))
}

fn parse_numeric(_: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    let keyword = s.expect_identifier()?;
    if settings.is_bitfield {
        let storage = match keyword {
            "uint8" => Some(BoolStorage::Uint8),
            "uint16" => Some(BoolStorage::Uint16),
            "uint32" => Some(BoolStorage::Uint32),
            "uint64" => Some(BoolStorage::Uint64),
            _ => None,
        };
        return match storage {
            Some(storage) => done(settings, PropertyKind::Bool(BoolProperty::sized(storage))),
            None => Err(s.error(format!("Bool bitfields must use an unsigned integer, not '{keyword}'"))),
        };
    }
    let kind = NumericKind::from_keyword(keyword).ok_or_else(|| s.error(format!("Unknown numeric type '{keyword}'")))?;
    done(settings, PropertyKind::Numeric(NumericProperty::new(kind)))
}

fn parse_int(_: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    s.expect_identifier()?;
    done(settings, PropertyKind::Numeric(NumericProperty::unsized_int(NumericKind::Int32)))
}

fn parse_unsigned(_: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    s.expect_identifier()?;
    s.eat_ident("int");
    done(settings, PropertyKind::Numeric(NumericProperty::unsized_int(NumericKind::UInt32)))
}

fn parse_string(_: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    let kind = match s.expect_identifier()? {
        "FName" => StringKind::Name,
        "FString" => StringKind::String,
        _ => StringKind::Text,
    };
    done(settings, PropertyKind::String(StringProperty::new(kind)))
}

fn parse_void(_: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    s.expect_identifier()?;
    done(settings, PropertyKind::Void(VoidProperty))
}

// ============================================================================
// CONTAINERS
// ============================================================================

fn parse_inner(cx: &PropertyParseContext<'_>, outer: &PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    cx.registry.parse_type(cx, inner_settings(outer), s)
}

fn parse_container(
    cx: &PropertyParseContext<'_>,
    settings: PropertySettings,
    s: &mut TokenStream<'_>,
    kind: ContainerKind,
) -> ResolveResult<Option<Property>> {
    s.expect_identifier()?;
    s.expect(TypeToken::Lt, "'<'")?;
    let key = if kind == ContainerKind::Map {
        let key = parse_inner(cx, &settings, s)?;
        s.expect(TypeToken::Comma, "','")?;
        match key {
            Some(key) => Some(key),
            None => return Ok(None),
        }
    } else {
        None
    };
    let Some(value) = parse_inner(cx, &settings, s)? else {
        return Ok(None);
    };
    s.expect(TypeToken::Gt, "'>'")?;
    Ok(Some(ContainerProperty::adopt(settings, kind, key, value)))
}

fn parse_array(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    parse_container(cx, settings, s, ContainerKind::Array)
}

fn parse_set(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    parse_container(cx, settings, s, ContainerKind::Set)
}

fn parse_map(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    parse_container(cx, settings, s, ContainerKind::Map)
}

// ============================================================================
// OBJECT REFERENCES
// ============================================================================

/// `<Name>` after a template keyword.
fn template_argument(s: &mut TokenStream<'_>) -> ResolveResult<String> {
    s.expect_identifier()?;
    s.expect(TypeToken::Lt, "'<'")?;
    let name = s.expect_path()?;
    s.expect(TypeToken::Gt, "'>'")?;
    Ok(name)
}

fn find_class(cx: &PropertyParseContext<'_>, s: &TokenStream<'_>, name: &str) -> ResolveResult<TypeRef> {
    match cx.find(FindOptions::CLASS, name, s.line())? {
        Some(id) => Ok(TypeRef::resolved(cx.types().source_name(id), id)),
        None => Err(s.error(format!("Unable to find class '{name}'"))),
    }
}

fn parse_object_template(
    cx: &PropertyParseContext<'_>,
    settings: PropertySettings,
    s: &mut TokenStream<'_>,
    kind: ObjectRefKind,
) -> ResolveResult<Option<Property>> {
    let name = template_argument(s)?;
    let class = find_class(cx, s, &name)?;
    done(settings, PropertyKind::Object(ObjectProperty::new(kind, class)))
}

fn parse_object_ptr(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    parse_object_template(cx, settings, s, ObjectRefKind::Tracked)
}

fn parse_weak_object_ptr(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    parse_object_template(cx, settings, s, ObjectRefKind::Weak)
}

fn parse_auto_weak_object_ptr(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    parse_object_template(cx, settings, s, ObjectRefKind::AutoWeak)
}

fn parse_lazy_object_ptr(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    parse_object_template(cx, settings, s, ObjectRefKind::Lazy)
}

fn parse_soft_object_ptr(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    parse_object_template(cx, settings, s, ObjectRefKind::Soft)
}

fn parse_class_template(
    cx: &PropertyParseContext<'_>,
    settings: PropertySettings,
    s: &mut TokenStream<'_>,
    kind: ObjectRefKind,
) -> ResolveResult<Option<Property>> {
    let name = template_argument(s)?;
    let meta_class = find_class(cx, s, &name)?;
    let class = find_class(cx, s, "UClass")?;
    done(
        settings,
        PropertyKind::Object(ObjectProperty::with_meta_class(kind, class, meta_class)),
    )
}

fn parse_soft_class_ptr(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    parse_class_template(cx, settings, s, ObjectRefKind::SoftClass)
}

fn parse_subclass_of(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    parse_class_template(cx, settings, s, ObjectRefKind::Class)
}

/// `TScriptInterface<IFoo>` refers to the `UFoo` interface class.
fn parse_script_interface(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    let name = template_argument(s)?;
    let interface_class = name.strip_prefix('I').map(|rest| format!("U{rest}"));
    let class = match interface_class {
        Some(u_name) => match cx.find(FindOptions::CLASS, &u_name, s.line())? {
            Some(id) => TypeRef::resolved(cx.types().source_name(id), id),
            None => find_class(cx, s, &name)?,
        },
        None => find_class(cx, s, &name)?,
    };
    done(
        settings,
        PropertyKind::Object(ObjectProperty::new(ObjectRefKind::Interface, class)),
    )
}

fn parse_enum_as_byte(cx: &PropertyParseContext<'_>, settings: PropertySettings, s: &mut TokenStream<'_>) -> ResolveResult<Option<Property>> {
    let name = template_argument(s)?;
    let Some(id) = cx.find(FindOptions::ENUM, &name, s.line())? else {
        return Err(s.error(format!("Unable to find enum '{name}'")));
    };
    let enum_ref = TypeRef::resolved(cx.types().source_name(id), id);
    done(settings, PropertyKind::Numeric(NumericProperty::byte_enum(enum_ref)))
}

// ============================================================================
// DECLARED TYPES
// ============================================================================

/// What a resolved identifier turned out to be.
enum Found {
    Enum(EnumCppForm),
    Struct,
    Class,
    Delegate(DelegateKind),
    Other(&'static str),
}

/// Parser for identifiers that are not keywords: enums, structs, classes
/// (by pointer), delegates and placeholders for any of them.
pub(super) fn parse_identifier(
    cx: &PropertyParseContext<'_>,
    settings: PropertySettings,
    s: &mut TokenStream<'_>,
) -> ResolveResult<Option<Property>> {
    let path = s.expect_path()?;
    let Some(id) = cx.find(FindOptions::TYPES, &path, s.line())? else {
        return Err(s.error(format!(
            "Unable to find 'class', 'delegate', 'enum', or 'struct' with name '{path}'"
        )));
    };

    let (name, found): (Name, Found) = {
        let node = cx.types().read(id);
        let found = match &node.kind {
            TypeKind::Enum(e) => Found::Enum(e.cpp_form),
            TypeKind::Struct(_) => Found::Struct,
            TypeKind::Class(_) => Found::Class,
            TypeKind::Function(f) => match f.kind {
                FunctionKind::SparseDelegate => Found::Delegate(DelegateKind::MulticastSparse),
                FunctionKind::Delegate if f.flags.contains(FunctionFlags::MULTICAST_DELEGATE) => {
                    Found::Delegate(DelegateKind::MulticastInline)
                }
                FunctionKind::Delegate => Found::Delegate(DelegateKind::Single),
                FunctionKind::Function => Found::Other(node.kind_name()),
            },
            TypeKind::Placeholder(p) => match p.expected {
                PlaceholderKind::Class => Found::Class,
                PlaceholderKind::Struct => Found::Struct,
                PlaceholderKind::Enum => Found::Enum(EnumCppForm::EnumClass),
            },
            TypeKind::Property(_) => Found::Other(node.kind_name()),
        };
        (node.source_name.clone(), found)
    };
    let type_ref = TypeRef::resolved(name.clone(), id);

    match found {
        Found::Enum(EnumCppForm::EnumClass) => done(settings, PropertyKind::Enum(EnumProperty::new(type_ref))),
        Found::Enum(_) => done(settings, PropertyKind::Numeric(NumericProperty::byte_enum(type_ref))),
        Found::Struct => done(settings, PropertyKind::Struct(StructProperty::new(type_ref))),
        Found::Delegate(kind) => done(settings, PropertyKind::Delegate(DelegateProperty::new(kind, type_ref))),
        Found::Class => {
            if !s.eat(TypeToken::Star) {
                return Err(s.error(format!(
                    "Class variables cannot be stored by value, use '{name}*' instead"
                )));
            }
            let object = if name == "UClass" {
                ObjectProperty::new(ObjectRefKind::Class, type_ref)
            } else {
                ObjectProperty::new(ObjectRefKind::Raw, type_ref)
            };
            done(settings, PropertyKind::Object(object))
        }
        Found::Other(kind) => Err(s.error(format!("'{path}' is a {kind} and cannot be used as a type"))),
    }
}
