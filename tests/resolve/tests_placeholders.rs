//! Forward-declared types replaced by their definitions.

use uht::property::{
    NumericKind, NumericProperty, Property, PropertyFlags, PropertyKind, PropertySettings, StructProperty, TypeRef,
    TypeRefRole,
};
use uht::types::metadata::keys;
use uht::types::{ClassFlags, PlaceholderKind};
use uht::{ClassDecl, EnumDecl, Outer, StructDecl};

use crate::helpers::message_assertions::{assert_no_errors, headlines};
use crate::helpers::session_fixtures::{Fixture, property};

#[test]
fn test_holders_see_the_definition() {
    let mut fx = Fixture::new();
    let forward = fx.header("Forward.h");
    let user = fx.header("User.h");
    let defs = fx.header("Defs.h");

    let later = fx.session.add_placeholder(forward, "FLater", PlaceholderKind::Struct);
    let pending = fx.session.add_placeholder(forward, "UPending", PlaceholderKind::Class);
    let owner = fx.session.add_struct(Outer::Header(user), StructDecl::new("FOwner"));
    let held = fx.session.add_property(
        Outer::Type(owner),
        Property::new(
            PropertySettings::member("Later"),
            PropertyKind::Struct(StructProperty::new(TypeRef::resolved("FLater", later))),
        ),
    );
    let pointer = fx.member(owner, "Pending", "TArray<UPending*>");

    fx.session.add_class(Outer::Header(defs), ClassDecl::new("UObject"));
    let later_def = fx.session.add_struct(Outer::Header(defs), StructDecl::new("FLater"));
    let pending_def = fx
        .session
        .add_class(Outer::Header(defs), ClassDecl::new("UPending").derives("UObject"));

    let session = fx.run();
    assert_no_errors(&session);
    let types = session.types();

    assert!(types.is_replaced(later));
    assert!(types.is_replaced(pending));
    assert_eq!(types.canonical(later), later_def);

    let PropertyKind::Struct(held) = property(&session, held).kind else {
        panic!("expected a struct property");
    };
    assert!(types.same(held.struct_id().unwrap(), later_def));

    let class_refs: Vec<_> = property(&session, pointer)
        .type_refs()
        .into_iter()
        .filter(|(_, role)| *role == TypeRefRole::Class)
        .filter_map(|(r, _)| r.id)
        .collect();
    assert_eq!(class_refs.len(), 1);
    assert!(types.same(class_refs[0], pending_def));

    // References land on the defining header, never the forward one.
    assert_eq!(session.header(user).referenced_headers(), vec![defs]);
    let order = session.sorted_headers();
    let position = |h| order.iter().position(|x| *x == h).unwrap();
    assert!(position(defs) < position(user));
}

#[test]
fn test_derived_data_follows_the_definition() {
    let mut fx = Fixture::new();
    let forward = fx.header("Forward.h");
    let defs = fx.header("Defs.h");
    let user = fx.header("User.h");
    fx.session.add_include(user, forward);

    fx.session.add_placeholder(forward, "EMode", PlaceholderKind::Enum);
    fx.session.add_placeholder(forward, "ELegacy", PlaceholderKind::Enum);
    fx.session.add_placeholder(forward, "UBrain", PlaceholderKind::Class);

    fx.session.add_class(Outer::Header(defs), ClassDecl::new("UObject"));
    let mode = fx
        .session
        .add_enum(Outer::Header(defs), EnumDecl::new("EMode").enum_class("uint8").value("Idle"));
    let legacy = fx.session.add_enum(Outer::Header(defs), EnumDecl::new("ELegacy").value("First"));
    fx.session.add_class(
        Outer::Header(defs),
        ClassDecl::new("UBrain")
            .derives("UObject")
            .with_flags(ClassFlags::DEFAULT_TO_INSTANCED),
    );
    let reference = fx.session.add_struct(Outer::Header(defs), StructDecl::new("FReference"));
    let direct_mode = fx.member(reference, "Mode", "EMode");

    let owner = fx.session.add_struct(Outer::Header(user), StructDecl::new("FOwner"));
    let modes = fx.member(owner, "Modes", "TArray<EMode>");
    let old = fx.member(owner, "Old", "ELegacy");
    let brain = fx.member(owner, "Brain", "UBrain*");

    let session = fx.run();
    assert_no_errors(&session);
    let types = session.types();

    let direct = property(&session, direct_mode);
    let modes = property(&session, modes);
    let inner = &modes.as_container().unwrap().value;
    let PropertyKind::Enum(through_placeholder) = &inner.kind else {
        panic!("expected an enum inner, got {:?}", inner.kind);
    };
    assert!(types.is_replaced(through_placeholder.enum_id().unwrap()));
    assert!(types.same(through_placeholder.enum_id().unwrap(), mode));
    let underlying = through_placeholder.underlying.as_deref().expect("underlying property");
    assert!(matches!(
        underlying.kind,
        PropertyKind::Numeric(NumericProperty { kind: NumericKind::Byte, .. })
    ));
    assert!(inner.is_same_type(&direct, types));

    let old = property(&session, old);
    let PropertyKind::Numeric(byte) = &old.kind else {
        panic!("expected a byte enum, got {:?}", old.kind);
    };
    assert!(types.same(byte.enum_id().unwrap(), legacy));
    assert_eq!(old.type_text(types, uht::property::PropertyTextType::UserFacing), "TEnumAsByte<ELegacy>");

    let brain = property(&session, brain);
    assert!(brain.flags.contains(PropertyFlags::INSTANCED_REFERENCE));
    assert_eq!(brain.meta.get(keys::EDIT_INLINE), Some("true"));
}

#[test]
fn test_undefined_placeholder_is_an_error() {
    let mut fx = Fixture::new();
    let forward = fx.header("Forward.h");
    fx.session.add_placeholder(forward, "UNever", PlaceholderKind::Class);
    fx.session.add_placeholder(forward, "FAlsoNever", PlaceholderKind::Struct);

    let session = fx.run();
    assert!(session.has_errors());
    assert_eq!(
        headlines(&session),
        vec![
            "Forward.h(0): Error: 'UNever' was declared but never defined",
            "Forward.h(0): Error: 'FAlsoNever' was declared but never defined",
        ]
    );
}

#[test]
fn test_placeholder_kind_must_match() {
    let mut fx = Fixture::new();
    let forward = fx.header("Forward.h");
    let defs = fx.header("Defs.h");
    fx.session.add_placeholder(forward, "FShape", PlaceholderKind::Class);
    fx.session.add_struct(Outer::Header(defs), StructDecl::new("FShape"));

    let session = fx.run();
    assert_eq!(
        crate::helpers::message_assertions::errors(&session),
        vec!["'FShape' was declared but never defined"]
    );
}
