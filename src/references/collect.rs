//! CollectReferences step for one header.

use crate::base::TypeId;
use crate::diag::ResolveResult;
use crate::property::{Property, PropertyFlags, TypeRefRole};
use crate::resolve::Session;
use crate::types::{EnumCppForm, HeaderFile, TypeArena, TypeKind};

use super::HeaderReferences;

pub(crate) fn collect_header(session: &Session, header: &HeaderFile) -> ResolveResult<()> {
    let types = session.types();
    let mut refs = HeaderReferences::default();

    for id in session.header_types(header) {
        let node = types.snapshot(id);
        match &node.kind {
            TypeKind::Class(_) | TypeKind::Struct(_) | TypeKind::Enum(_) => {
                define(&mut refs, types, id);
                if let Some(super_id) = node.super_id() {
                    refer(&mut refs, types, header, super_id, true);
                }
            }
            TypeKind::Function(function) if function.kind.is_delegate() => define(&mut refs, types, id),
            TypeKind::Property(property) => collect_property(&mut refs, types, header, property),
            TypeKind::Function(_) | TypeKind::Placeholder(_) => {}
        }
    }

    if let Some(no_export) = session.no_export_header() {
        header.add_referenced_header(no_export);
    }

    tracing::trace!(
        "[REFS] {}: {} defined, {} referenced, {} forward declarations",
        header.path,
        refs.export_types.len(),
        refs.cross_module.len(),
        refs.forward_declarations.len()
    );
    header.set_references(refs);
    Ok(())
}

fn define(refs: &mut HeaderReferences, types: &TypeArena, id: TypeId) {
    refs.export_types.push(id);
    refs.declaration.add(types, id, true);
    refs.singletons.add(types, id, true);
}

/// Record a reference to a type declared in another header.
///
/// Registered references also make this header depend on the declaring one.
fn refer(refs: &mut HeaderReferences, types: &TypeArena, header: &HeaderFile, id: TypeId, registered: bool) {
    let declared_in = types.read(types.canonical(id)).header;
    if declared_in == header.id {
        return;
    }
    refs.cross_module.add(types, id, registered);
    if registered {
        header.add_referenced_header(declared_in);
    }
}

fn collect_property(refs: &mut HeaderReferences, types: &TypeArena, header: &HeaderFile, property: &Property) {
    let is_parameter = property.flags.contains(PropertyFlags::PARM);
    for (type_ref, role) in property.type_refs() {
        let Some(id) = type_ref.id else {
            continue;
        };
        // Object pointers only need the class object, never its header.
        let registered = !matches!(role, TypeRefRole::Class | TypeRefRole::MetaClass);
        refer(refs, types, header, id, registered);
        if is_parameter {
            if let Some(declaration) = forward_declaration(types, id) {
                refs.forward_declarations.insert(declaration);
            }
        }
    }
}

fn forward_declaration(types: &TypeArena, id: TypeId) -> Option<String> {
    let node = types.read(types.canonical(id));
    let name = &node.source_name;
    match &node.kind {
        TypeKind::Class(_) => Some(format!("class {name};")),
        TypeKind::Struct(_) => Some(format!("struct {name};")),
        TypeKind::Enum(data) if data.cpp_form == EnumCppForm::EnumClass => {
            let keyword = data.underlying.keyword()?;
            Some(format!("enum class {name} : {keyword};"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Outer;
    use crate::config::SessionConfig;
    use crate::references::singleton_name;
    use crate::resolve::{ClassDecl, EnumDecl, FunctionDecl, StructDecl};
    use crate::property::PropertySettings;
    use crate::types::ClassFlags;

    #[test]
    fn test_collects_definitions_references_and_forward_declarations() {
        let mut session = Session::new(SessionConfig::default().with_go_wide(false));
        let package = session.add_package("Game");
        let core = session.add_header(package, "Core.h");
        let game = session.add_header(package, "Game.h");
        session.add_include(game, core);

        session.add_class(Outer::Header(core), ClassDecl::new("UObject"));
        session.add_enum(Outer::Header(core), EnumDecl::new("EMood").enum_class("uint8").value("Calm"));
        session.add_struct(Outer::Header(core), StructDecl::new("FStats"));
        session.add_class(Outer::Header(core), ClassDecl::new("UItem").derives("UObject"));

        let hero = session.add_class(Outer::Header(game), ClassDecl::new("AHero").derives("UObject"));
        session
            .add_property_expression(Outer::Type(hero), PropertySettings::member("Stats"), "FStats")
            .unwrap();
        session
            .add_property_expression(Outer::Type(hero), PropertySettings::member("Held"), "UItem*")
            .unwrap();
        let equip = session.add_function(Outer::Type(hero), FunctionDecl::new("SetMood"));
        session
            .add_property_expression(Outer::Type(equip), PropertySettings::parameter("Mood"), "EMood")
            .unwrap();
        assert!(session.run(), "{:?}", session.messages());

        let types = session.types();
        let file = session.header(game);
        let cross = file.with_references(|refs| {
            assert_eq!(refs.export_types, vec![hero]);
            assert_eq!(
                refs.forward_declarations.iter().cloned().collect::<Vec<_>>(),
                vec!["enum class EMood : uint8;".to_string()]
            );
            refs.cross_module.sorted(|id, registered| singleton_name(types, id, registered))
        });
        assert_eq!(
            cross,
            vec![
                "Z_Construct_UClass_UItem_NoRegister()",
                "Z_Construct_UClass_UObject()",
                "Z_Construct_UEnum_EMood()",
                "Z_Construct_UScriptStruct_FStats()",
            ]
        );
        assert_eq!(file.referenced_headers(), vec![core]);
        assert_eq!(session.sorted_headers(), &[core, game]);
    }

    #[test]
    fn test_native_interface_reference_uses_interface_class() {
        let mut session = Session::new(SessionConfig::default().with_go_wide(false));
        let package = session.add_package("Game");
        let core = session.add_header(package, "Core.h");
        let game = session.add_header(package, "Game.h");
        session.add_class(Outer::Header(core), ClassDecl::new("UInterface").with_flags(ClassFlags::INTERFACE));
        session.add_class(
            Outer::Header(core),
            ClassDecl::new("UUsable").derives("UInterface").with_flags(ClassFlags::INTERFACE),
        );
        let native = session.add_class(
            Outer::Header(core),
            ClassDecl::new("IUsable").with_flags(ClassFlags::NATIVE_INTERFACE),
        );
        session.add_class(Outer::Header(game), ClassDecl::new("UObject"));
        assert!(session.run(), "{:?}", session.messages());

        let types = session.types();
        let mut set = crate::references::ReferenceSet::new();
        set.add(types, native, true);
        assert_eq!(
            set.sorted(|id, registered| singleton_name(types, id, registered)),
            vec!["Z_Construct_UClass_UUsable()"]
        );
    }
}
