//! Properties phase: type references, derived sub-properties and flag lifting.

use crate::base::{HeaderId, Name, Outer, TypeId};
use crate::diag::{ContextFrame, MessageKind, ResolveError, ResolveResult, codes, push_context};
use crate::property::{
    NumericKind, NumericProperty, ObjectRefKind, Property, PropertyFlags, PropertyKind,
    PropertySettings, TypeRefRole,
};
use crate::registry::{PropertyParseContext, PropertyResolvePhase};
use crate::symbols::FindOptions;
use crate::types::{ClassFlags, EnumCppForm, HeaderFile, TypeArena, TypeKind, UnderlyingType, metadata::keys};

use super::invalid::check_container;
use super::session::Session;

pub(super) fn resolve_header(session: &Session, header: &HeaderFile) -> ResolveResult<()> {
    for id in session.header_types(header) {
        let (outer, property) = {
            let node = session.types.read(id);
            match &node.kind {
                TypeKind::Property(property) => (node.outer, property.clone()),
                _ => continue,
            }
        };
        let _frame = push_context(ContextFrame::Type {
            kind: "property",
            name: property.source_name.clone(),
        });
        if let Some(resolved) = resolve_property(session, header.id, outer, property)? {
            if let TypeKind::Property(slot) = &mut session.types.write(id).kind {
                *slot = resolved;
            }
        }
    }
    Ok(())
}

/// Resolve one property. `None` means it was reported and left unchanged.
fn resolve_property(
    session: &Session,
    header: HeaderId,
    scope: Outer,
    mut property: Property,
) -> ResolveResult<Option<Property>> {
    if let PropertyKind::Deferred(deferred) = &property.kind {
        let expression = deferred.expression.clone();
        let _frame = push_context(ContextFrame::TypeExpression(expression.clone()));
        let cx = PropertyParseContext {
            lookup: session,
            registry: &session.registry,
            phase: PropertyResolvePhase::Resolving,
            scope,
        };
        match session
            .registry
            .parse_expression(&cx, property.settings(), &expression)
        {
            Ok(Some(parsed)) => property = parsed,
            Ok(None) => {
                return Err(ResolveError::ice(format!(
                    "Type expression '{expression}' was deferred again while resolving"
                )));
            }
            Err(ResolveError::Semantic { line, message }) => {
                session.post(header, MessageKind::Error, line, Some(codes::UNRESOLVED_TYPE), message);
                return Ok(None);
            }
            Err(err) => return Err(err),
        }
        check_container(session, header, &property);
    }

    if !resolve_type_refs(session, header, scope, &mut property)? {
        return Ok(None);
    }

    let types = &session.types;
    synthesize_underlying(types, &mut property);
    apply_default_to_instanced(types, &mut property);
    property.refresh_container();
    Ok(Some(property))
}

/// Fill in every unresolved type reference. Returns `false` if any is missing.
fn resolve_type_refs(
    session: &Session,
    header: HeaderId,
    scope: Outer,
    property: &mut Property,
) -> ResolveResult<bool> {
    let line = property.line;
    let mut missing: Vec<(Name, TypeRefRole)> = Vec::new();
    let mut failure: Option<ResolveError> = None;
    property.for_each_type_ref_mut(&mut |type_ref, role| {
        if type_ref.is_resolved() || failure.is_some() {
            return;
        }
        let options = role_find_options(role) | FindOptions::SOURCE_NAME;
        match session.find_type(scope, options, &type_ref.name, line) {
            Ok(Some(id)) => type_ref.id = Some(id),
            Ok(None) => missing.push((type_ref.name.clone(), role)),
            Err(err) => failure = Some(err),
        }
    });
    match failure {
        Some(ResolveError::Semantic { line, message }) => {
            session.post(header, MessageKind::Error, line, Some(codes::UNRESOLVED_TYPE), message);
            return Ok(false);
        }
        Some(err) => return Err(err),
        None => {}
    }
    for (name, role) in &missing {
        session.post(
            header,
            MessageKind::Error,
            line,
            Some(codes::UNRESOLVED_TYPE),
            format!("Unable to find {} with name '{name}'", role_noun(*role)),
        );
    }
    Ok(missing.is_empty())
}

fn role_find_options(role: TypeRefRole) -> FindOptions {
    match role {
        TypeRefRole::Enum => FindOptions::ENUM,
        TypeRefRole::Struct => FindOptions::SCRIPT_STRUCT,
        TypeRefRole::Class | TypeRefRole::MetaClass => FindOptions::CLASS,
        TypeRefRole::DelegateFunction => FindOptions::DELEGATE_FUNCTION,
    }
}

fn role_noun(role: TypeRefRole) -> &'static str {
    match role {
        TypeRefRole::Enum => "enum",
        TypeRefRole::Struct => "struct",
        TypeRefRole::Class | TypeRefRole::MetaClass => "class",
        TypeRefRole::DelegateFunction => "delegate",
    }
}

/// Redo the derivations that read referenced types, once placeholders are swapped.
pub(super) fn rederive_after_replacement(types: &TypeArena, property: &mut Property) {
    rekind_replaced_enums(types, property);
    synthesize_underlying(types, property);
    apply_default_to_instanced(types, property);
}

/// An enum reached through a placeholder was assumed to be an enum class.
/// Legacy enums are stored as bytes instead.
fn rekind_replaced_enums(types: &TypeArena, property: &mut Property) {
    if let PropertyKind::Container(container) = &mut property.kind {
        for inner in container.inners_mut() {
            rekind_replaced_enums(types, inner);
        }
        return;
    }
    let PropertyKind::Enum(enum_property) = &property.kind else {
        return;
    };
    let Some(id) = enum_property.enum_id().filter(|&id| types.is_replaced(id)) else {
        return;
    };
    let is_legacy = types
        .read(id)
        .as_enum()
        .is_some_and(|e| e.cpp_form != EnumCppForm::EnumClass);
    if is_legacy {
        let enum_ref = enum_property.enum_ref.clone();
        property.set_kind(PropertyKind::Numeric(NumericProperty::byte_enum(enum_ref)));
    }
}

/// Attach the backing numeric property to enum kinds with a declared base.
fn synthesize_underlying(types: &TypeArena, property: &mut Property) {
    let line = property.line;
    match &mut property.kind {
        PropertyKind::Enum(enum_property) => {
            let Some(id) = enum_property.enum_id() else {
                return;
            };
            let underlying = types
                .read(id)
                .as_enum()
                .map(|e| e.underlying)
                .unwrap_or_default();
            enum_property.underlying = underlying_numeric(underlying).map(|numeric| {
                Box::new(Property::new(
                    PropertySettings::member("UnderlyingType").with_line(line),
                    PropertyKind::Numeric(numeric),
                ))
            });
        }
        PropertyKind::Container(container) => {
            for inner in container.inners_mut() {
                synthesize_underlying(types, inner);
            }
        }
        _ => {}
    }
}

fn underlying_numeric(underlying: UnderlyingType) -> Option<NumericProperty> {
    let kind = match underlying {
        UnderlyingType::Unspecified => return None,
        UnderlyingType::Int => return Some(NumericProperty::unsized_int(NumericKind::Int32)),
        UnderlyingType::Uint8 => NumericKind::Byte,
        UnderlyingType::Uint16 => NumericKind::UInt16,
        UnderlyingType::Uint32 => NumericKind::UInt32,
        UnderlyingType::Uint64 => NumericKind::UInt64,
        UnderlyingType::Int8 => NumericKind::Int8,
        UnderlyingType::Int16 => NumericKind::Int16,
        UnderlyingType::Int32 => NumericKind::Int32,
        UnderlyingType::Int64 => NumericKind::Int64,
    };
    Some(NumericProperty::new(kind))
}

/// Object references to `DefaultToInstanced` classes are instanced and edited inline.
fn apply_default_to_instanced(types: &TypeArena, property: &mut Property) {
    let mut instanced = false;
    mark_instanced_objects(types, property, &mut instanced);
    if instanced {
        property.meta.insert(keys::EDIT_INLINE, "true");
    }
}

fn mark_instanced_objects(types: &TypeArena, property: &mut Property, found: &mut bool) {
    match &mut property.kind {
        PropertyKind::Object(object)
            if matches!(object.kind, ObjectRefKind::Raw | ObjectRefKind::Tracked) =>
        {
            if object
                .class_id()
                .is_some_and(|id| class_chain_has(types, id, ClassFlags::DEFAULT_TO_INSTANCED))
            {
                property.flags |= PropertyFlags::INSTANCED_REFERENCE | PropertyFlags::EXPORT_OBJECT;
                *found = true;
            }
        }
        PropertyKind::Container(container) => {
            for inner in container.inners_mut() {
                mark_instanced_objects(types, inner, found);
            }
        }
        _ => {}
    }
}

/// Whether `id` or any of its parents carries `flag`.
pub(super) fn class_chain_has(types: &TypeArena, id: TypeId, flag: ClassFlags) -> bool {
    let mut visited = Vec::new();
    let mut current = Some(id);
    while let Some(next) = current.map(|c| types.canonical(c)) {
        if visited.contains(&next) {
            return false;
        }
        visited.push(next);
        let node = types.read(next);
        if node.class_flags().contains(flag) {
            return true;
        }
        current = node.super_id();
    }
    false
}
