//! Bases phase: super types, enum backing types and interface twins.

use crate::base::{Outer, TypeId};
use crate::diag::{MessageKind, ResolveResult, codes};
use crate::symbols::FindOptions;
use crate::types::{ClassFlags, EnumCppForm, HeaderFile, TypeKind, UnderlyingType};

use super::session::Session;

pub(super) fn resolve_header(session: &Session, header: &HeaderFile) -> ResolveResult<()> {
    for id in session.header_types(header) {
        let node = session.types.snapshot(id);
        match &node.kind {
            TypeKind::Class(class) => {
                if let Some(super_name) = &class.super_name {
                    let found = find_parent(session, id, FindOptions::CLASS, super_name, node.line)?;
                    match found {
                        Some(super_id) => set_super(session, id, super_id),
                        None => session.post(
                            header.id,
                            MessageKind::Error,
                            node.line,
                            Some(codes::UNRESOLVED_TYPE),
                            format!("Unable to find parent class '{super_name}'"),
                        ),
                    }
                }
                if class.flags.contains(ClassFlags::NATIVE_INTERFACE) {
                    link_native_interface(session, header, id, &node.source_name, node.line)?;
                }
            }
            TypeKind::Struct(data) => {
                if let Some(super_name) = &data.super_name {
                    let found =
                        find_parent(session, id, FindOptions::SCRIPT_STRUCT, super_name, node.line)?;
                    match found {
                        Some(super_id) => set_super(session, id, super_id),
                        None => session.post(
                            header.id,
                            MessageKind::Error,
                            node.line,
                            Some(codes::UNRESOLVED_TYPE),
                            format!("Unable to find parent struct '{super_name}'"),
                        ),
                    }
                }
            }
            TypeKind::Enum(data) => {
                let underlying = match &data.underlying_keyword {
                    Some(keyword) => match UnderlyingType::from_keyword(keyword) {
                        Some(underlying) => underlying,
                        None => {
                            session.post(
                                header.id,
                                MessageKind::Error,
                                node.line,
                                Some(codes::INVALID_DECLARATION),
                                format!(
                                    "Unsupported enum base type '{keyword}' for '{}'",
                                    node.source_name
                                ),
                            );
                            continue;
                        }
                    },
                    None if data.cpp_form == EnumCppForm::EnumClass => {
                        session.post(
                            header.id,
                            MessageKind::Error,
                            node.line,
                            Some(codes::INVALID_DECLARATION),
                            format!(
                                "Missing base specifier for enum class '{}' - did you mean ': uint8'?",
                                node.source_name
                            ),
                        );
                        continue;
                    }
                    None => UnderlyingType::Unspecified,
                };
                if let TypeKind::Enum(data) = &mut session.types.write(id).kind {
                    data.underlying = underlying;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn find_parent(
    session: &Session,
    id: TypeId,
    kind: FindOptions,
    name: &str,
    line: u32,
) -> ResolveResult<Option<TypeId>> {
    session.find_type(
        Outer::Type(id),
        kind | FindOptions::SOURCE_NAME | FindOptions::EXCLUDE_SELF,
        name,
        line,
    )
}

fn set_super(session: &Session, id: TypeId, super_id: TypeId) {
    match &mut session.types.write(id).kind {
        TypeKind::Class(class) => class.super_id = Some(super_id),
        TypeKind::Struct(data) => data.super_id = Some(super_id),
        _ => {}
    }
}

/// `IFoo` stands in for `UFoo` in generated references.
fn link_native_interface(
    session: &Session,
    header: &HeaderFile,
    id: TypeId,
    name: &str,
    line: u32,
) -> ResolveResult<()> {
    let Some(stem) = name.strip_prefix('I') else {
        session.post(
            header.id,
            MessageKind::Error,
            line,
            Some(codes::INVALID_DECLARATION),
            format!("Native interface '{name}' must begin with 'I'"),
        );
        return Ok(());
    };
    let interface_name = format!("U{stem}");
    let found = session.find_type(
        Outer::Header(header.id),
        FindOptions::CLASS | FindOptions::SOURCE_NAME,
        &interface_name,
        line,
    )?;
    match found {
        Some(interface) => session.types.write(id).alternate = Some(interface),
        None => session.post(
            header.id,
            MessageKind::Error,
            line,
            Some(codes::UNRESOLVED_TYPE),
            format!("Native interface '{name}' has no matching interface class '{interface_name}'"),
        ),
    }
    Ok(())
}
