//! Validate phase: per-property rules plus shadowing across scopes.

use crate::base::{Name, Outer, TypeId};
use crate::diag::{ContextFrame, MessageKind, ResolveResult, codes, push_context};
use crate::property::{Property, PropertyCategory, PropertyFlags, PropertyOwner, ValidationContext, validate_property};
use crate::symbols::FindOptions;
use crate::types::{HeaderFile, TypeKind};

use super::session::{HeaderEnv, Session};

pub(super) fn validate_header(session: &Session, header: &HeaderFile) -> ResolveResult<()> {
    let env = HeaderEnv { session, header };
    for id in session.header_types(header) {
        let (outer, property) = {
            let node = session.types.read(id);
            match &node.kind {
                TypeKind::Property(property) => (node.outer, property.clone()),
                _ => continue,
            }
        };
        let Outer::Type(owner_id) = outer else {
            continue;
        };
        let Some(owner) = property_owner(session, owner_id) else {
            continue;
        };
        let _frame = push_context(ContextFrame::Type {
            kind: "property",
            name: property.source_name.clone(),
        });

        let cx = ValidationContext::new(&env, owner);
        validate_property(&property, &cx);

        match property.category {
            PropertyCategory::Member => check_member_shadowing(session, header, owner_id, &property),
            PropertyCategory::RegularParameter | PropertyCategory::ReplicatedParameter => {
                check_parameter_shadowing(session, header, owner_id, &property)
            }
            PropertyCategory::Return => {}
        }
    }
    Ok(())
}

fn property_owner(session: &Session, id: TypeId) -> Option<PropertyOwner> {
    let node = session.types.read(id);
    let name = node.source_name.clone();
    match &node.kind {
        TypeKind::Class(_) => Some(PropertyOwner::Class { name }),
        TypeKind::Struct(_) => Some(PropertyOwner::ScriptStruct { name }),
        TypeKind::Function(function) => Some(PropertyOwner::Function {
            name,
            flags: function.flags,
        }),
        _ => None,
    }
}

/// First ancestor of `start` (inclusive when `include_self`) declaring a property `name`.
fn find_in_chain(session: &Session, start: TypeId, include_self: bool, name: &str) -> Option<(TypeId, TypeId)> {
    let types = &session.types;
    let mut visited = Vec::new();
    let mut current = if include_self {
        Some(start)
    } else {
        types.read(start).super_id()
    };
    while let Some(scope) = current.map(|c| types.canonical(c)) {
        if visited.contains(&scope) {
            return None;
        }
        visited.push(scope);
        let found = session.source_symbols.find_in_owner(
            Outer::Type(scope),
            name,
            FindOptions::PROPERTY | FindOptions::SOURCE_NAME,
        );
        if let Some(found) = found {
            return Some((scope, found));
        }
        current = types.read(scope).super_id();
    }
    None
}

fn is_deprecated_property(session: &Session, id: TypeId) -> bool {
    session
        .types
        .read(id)
        .as_property()
        .is_some_and(|p| p.flags.contains(PropertyFlags::DEPRECATED))
}

fn check_member_shadowing(session: &Session, header: &HeaderFile, owner: TypeId, property: &Property) {
    if property.flags.contains(PropertyFlags::DEPRECATED) {
        return;
    }
    let Some((scope, existing)) = find_in_chain(session, owner, false, &property.source_name) else {
        return;
    };
    if is_deprecated_property(session, existing) {
        return;
    }
    report_shadowing(session, header, "Member variable declaration", owner, scope, property);
}

/// Parameters of class functions may not reuse a member name of the class.
fn check_parameter_shadowing(session: &Session, header: &HeaderFile, function: TypeId, property: &Property) {
    let Outer::Type(class) = session.types.read(function).outer else {
        return;
    };
    if !matches!(session.types.read(class).kind, TypeKind::Class(_)) {
        return;
    }
    let Some((scope, existing)) = find_in_chain(session, class, true, &property.source_name) else {
        return;
    };
    if is_deprecated_property(session, existing) {
        return;
    }
    report_shadowing(session, header, "Function parameter", function, scope, property);
}

fn report_shadowing(
    session: &Session,
    header: &HeaderFile,
    what: &str,
    defined_in: TypeId,
    scope: TypeId,
    property: &Property,
) {
    let defined_in: Name = session.types.source_name(defined_in);
    let scope: Name = session.types.source_name(scope);
    session.post(
        header.id,
        MessageKind::Error,
        property.line,
        Some(codes::SHADOWING),
        format!(
            "{what}: '{}' cannot be defined in '{defined_in}' as it is already defined in scope '{scope}' (shadowing is not allowed)",
            property.source_name
        ),
    );
}
