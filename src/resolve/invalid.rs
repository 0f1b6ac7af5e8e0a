//! InvalidCheck phase: structural problems caught before property resolution.

use crate::base::{HeaderId, TypeId, is_valid_identifier};
use crate::diag::{MessageKind, ResolveResult, codes};
use crate::property::{ContainerKind, Property, PropertyCaps, PropertyCategory, PropertyKind, PropertyTextType};
use crate::types::{ClassFlags, HeaderFile, TypeKind};

use super::session::Session;

pub(super) fn check_header(session: &Session, header: &HeaderFile) -> ResolveResult<()> {
    for id in session.header_types(header) {
        let node = session.types.snapshot(id);
        if !is_valid_identifier(&node.source_name) {
            session.post(
                header.id,
                MessageKind::Error,
                node.line,
                Some(codes::INVALID_DECLARATION),
                format!("'{}' is not a valid identifier", node.source_name),
            );
        }
        match &node.kind {
            TypeKind::Property(property) => {
                check_void(session, header.id, property);
                check_container(session, header.id, property);
            }
            TypeKind::Class(class) => {
                if check_inheritance_cycle(session, header.id, id) {
                    continue;
                }
                if let Some(super_id) = class.super_id {
                    check_interface_parent(session, header.id, &node.source_name, class.flags, super_id, node.line);
                }
            }
            TypeKind::Struct(_) => {
                check_inheritance_cycle(session, header.id, id);
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_void(session: &Session, header: HeaderId, property: &Property) {
    if matches!(property.kind, PropertyKind::Void(_)) && property.category != PropertyCategory::Return {
        session.post(
            header,
            MessageKind::Error,
            property.line,
            Some(codes::UNSUPPORTED_USAGE),
            format!(
                "{}: '{}' cannot be of type 'void'",
                property.category.hint_text(),
                property.source_name
            ),
        );
    }
}

/// Reject keys and values a container cannot hold. Shared with the
/// Properties phase, which checks containers once they are parsed.
pub(super) fn check_container(session: &Session, header: HeaderId, property: &Property) {
    let Some(container) = property.as_container() else {
        return;
    };
    let types = &session.types;
    let report = |text: String| {
        session.post(
            header,
            MessageKind::Error,
            property.line,
            Some(codes::UNSUPPORTED_USAGE),
            text,
        )
    };

    if container.inners().any(Property::is_container) {
        report("Nested containers are not supported.".to_string());
        return;
    }

    let template = container.kind.template();
    if let Some(key) = &container.key {
        if !key.caps.contains(PropertyCaps::CAN_BE_CONTAINER_KEY) {
            report(format!(
                "The type '{}' can not be used as a key in a {template}",
                key.type_text(types, PropertyTextType::UserFacing)
            ));
        }
    }
    let value = &container.value;
    let (required, role) = match container.kind {
        ContainerKind::Set => (PropertyCaps::CAN_BE_CONTAINER_KEY, "an element"),
        ContainerKind::Array | ContainerKind::Map => (PropertyCaps::CAN_BE_CONTAINER_VALUE, "a value"),
    };
    if !value.caps.contains(required) {
        report(format!(
            "The type '{}' can not be used as {role} in a {template}",
            value.type_text(types, PropertyTextType::UserFacing)
        ));
    }
}

/// Report and break a super chain that loops back to `id`.
fn check_inheritance_cycle(session: &Session, header: HeaderId, id: TypeId) -> bool {
    let types = &session.types;
    let mut seen = vec![id];
    let mut current = types.read(id).super_id();
    while let Some(next) = current.map(|s| types.canonical(s)) {
        if next == id {
            let node = types.snapshot(id);
            session.post(
                header,
                MessageKind::Error,
                node.line,
                Some(codes::CIRCULAR),
                format!(
                    "'{}' inherits from itself through its parent chain",
                    node.source_name
                ),
            );
            match &mut types.write(id).kind {
                TypeKind::Class(class) => class.super_id = None,
                TypeKind::Struct(data) => data.super_id = None,
                _ => {}
            }
            return true;
        }
        if seen.contains(&next) {
            // A loop further up the chain; its own members report it.
            return false;
        }
        seen.push(next);
        current = types.read(next).super_id();
    }
    false
}

fn check_interface_parent(
    session: &Session,
    header: HeaderId,
    name: &str,
    flags: ClassFlags,
    super_id: TypeId,
    line: u32,
) {
    let parent = session.types.snapshot(super_id);
    let parent_is_interface = parent.class_flags().contains(ClassFlags::INTERFACE);
    let message = if flags.contains(ClassFlags::INTERFACE) && !parent_is_interface {
        format!(
            "Interface '{name}' cannot inherit from non-interface class '{}'",
            parent.source_name
        )
    } else if !flags.contains(ClassFlags::INTERFACE) && parent_is_interface {
        format!(
            "Class '{name}' cannot inherit from interface '{}'; implement it instead",
            parent.source_name
        )
    } else {
        return;
    };
    session.post(
        header,
        MessageKind::Error,
        line,
        Some(codes::INVALID_DECLARATION),
        message,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Outer;
    use crate::config::SessionConfig;
    use crate::property::{
        NumericKind, NumericProperty, PropertySettings, StringKind, StringProperty, VoidProperty,
    };
    use crate::resolve::{ClassDecl, StructDecl};

    fn session() -> (Session, HeaderId) {
        let mut session = Session::new(SessionConfig::default().with_go_wide(false));
        let package = session.add_package("Game");
        let header = session.add_header(package, "Game.h");
        (session, header)
    }

    fn texts(session: &Session) -> Vec<String> {
        session.messages().into_iter().map(|m| m.text).collect()
    }

    #[test]
    fn test_void_member_rejected() {
        let (mut session, header) = session();
        let owner = session.add_struct(Outer::Header(header), StructDecl::new("FOwner"));
        session.add_property(
            Outer::Type(owner),
            Property::new(PropertySettings::member("Nothing"), PropertyKind::Void(VoidProperty)),
        );
        check_header(&session, session.header(header)).unwrap();
        assert_eq!(
            texts(&session),
            vec!["Member variable declaration: 'Nothing' cannot be of type 'void'"]
        );
    }

    #[test]
    fn test_container_value_caps() {
        let (session, header) = session();
        let text = Property::new(
            PropertySettings::member("Value"),
            PropertyKind::String(StringProperty::new(StringKind::Text)),
        );
        let count = Property::new(
            PropertySettings::member("Count"),
            PropertyKind::Numeric(NumericProperty::new(NumericKind::Int32)),
        );
        let map = Property::map(PropertySettings::member("Lookup"), text.clone(), count);
        check_container(&session, header, &map);
        let set = Property::set(PropertySettings::member("Labels"), text);
        check_container(&session, header, &set);
        assert_eq!(
            texts(&session),
            vec![
                "The type 'FText' can not be used as a key in a TMap",
                "The type 'FText' can not be used as an element in a TSet",
            ]
        );
    }

    #[test]
    fn test_nested_container_rejected() {
        let (session, header) = session();
        let inner = Property::array(
            PropertySettings::member("Inner"),
            Property::new(
                PropertySettings::member("Inner"),
                PropertyKind::Numeric(NumericProperty::new(NumericKind::Int32)),
            ),
        );
        let nested = Property::array(PropertySettings::member("Grid"), inner);
        check_container(&session, header, &nested);
        assert_eq!(texts(&session), vec!["Nested containers are not supported."]);
    }

    #[test]
    fn test_inheritance_cycle_broken() {
        let (mut session, header) = session();
        let a = session.add_struct(Outer::Header(header), StructDecl::new("FA").derives("FB"));
        let b = session.add_struct(Outer::Header(header), StructDecl::new("FB").derives("FA"));
        session.populate();
        super::super::bases::resolve_header(&session, session.header(header)).unwrap();
        check_header(&session, session.header(header)).unwrap();
        assert!(session.has_errors());
        assert!(session.types.read(a).super_id().is_none() || session.types.read(b).super_id().is_none());
    }

    #[test]
    fn test_interface_parentage() {
        let (mut session, header) = session();
        session.add_class(
            Outer::Header(header),
            ClassDecl::new("UInterface").with_flags(ClassFlags::INTERFACE),
        );
        session.add_class(Outer::Header(header), ClassDecl::new("UObject"));
        session.add_class(
            Outer::Header(header),
            ClassDecl::new("UClickable").derives("UInterface").with_flags(ClassFlags::INTERFACE),
        );
        session.add_class(Outer::Header(header), ClassDecl::new("UWrong").derives("UClickable"));
        session.populate();
        super::super::bases::resolve_header(&session, session.header(header)).unwrap();
        check_header(&session, session.header(header)).unwrap();
        assert_eq!(
            texts(&session),
            vec!["Class 'UWrong' cannot inherit from interface 'UClickable'; implement it instead"]
        );
    }
}
