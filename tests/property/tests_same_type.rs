//! Structural equality and signature matching.

use uht::property::{
    ObjectProperty, ObjectRefKind, Property, PropertyFlags, PropertyKind, PropertySettings, TypeRef,
};
use uht::{ClassDecl, Outer, Session, TypeId};

use crate::helpers::session_fixtures::Fixture;

struct Classes {
    session: Session,
    object: TypeId,
    weapon: TypeId,
    class: TypeId,
}

fn classes() -> Classes {
    let mut fx = Fixture::new();
    let header = fx.header("Classes.h");
    let object = fx.session.add_class(Outer::Header(header), ClassDecl::new("UObject"));
    let weapon = fx
        .session
        .add_class(Outer::Header(header), ClassDecl::new("UWeapon").derives("UObject"));
    let class = fx
        .session
        .add_class(Outer::Header(header), ClassDecl::new("UClass").derives("UObject"));
    let session = fx.run();
    Classes {
        session,
        object,
        weapon,
        class,
    }
}

fn pointer(settings: PropertySettings, class: TypeRef) -> Property {
    Property::new(settings, PropertyKind::Object(ObjectProperty::new(ObjectRefKind::Raw, class)))
}

fn subclass_of(cx: &Classes, limiter: TypeId, name: &str) -> Property {
    Property::new(
        PropertySettings::member("Type"),
        PropertyKind::Object(ObjectProperty::with_meta_class(
            ObjectRefKind::Class,
            TypeRef::resolved("UClass", cx.class),
            TypeRef::resolved(name, limiter),
        )),
    )
}

#[test]
fn test_same_type_is_reflexive() {
    let cx = classes();
    let types = cx.session.types();
    let weapon = pointer(PropertySettings::member("Held"), TypeRef::resolved("UWeapon", cx.weapon));
    assert!(weapon.is_same_type(&weapon, types));
    let limited = subclass_of(&cx, cx.weapon, "UWeapon");
    assert!(limited.is_same_type(&limited, types));
}

#[test]
fn test_object_identity_decides_equality() {
    let cx = classes();
    let types = cx.session.types();
    let a = pointer(PropertySettings::member("A"), TypeRef::resolved("UWeapon", cx.weapon));
    let b = pointer(PropertySettings::member("B"), TypeRef::resolved("UWeapon", cx.weapon));
    let other = pointer(PropertySettings::member("C"), TypeRef::resolved("UObject", cx.object));
    assert!(a.is_same_type(&b, types));
    assert!(!a.is_same_type(&other, types));

    // Same class, different meta class limiter.
    let weapons = subclass_of(&cx, cx.weapon, "UWeapon");
    let objects = subclass_of(&cx, cx.object, "UObject");
    assert!(!weapons.is_same_type(&objects, types));
    assert!(weapons.is_same_type(&subclass_of(&cx, cx.weapon, "UWeapon"), types));
}

#[test]
fn test_signature_matching_checks_out_params() {
    let cx = classes();
    let types = cx.session.types();
    let class = || TypeRef::resolved("UWeapon", cx.weapon);
    let by_value = pointer(PropertySettings::parameter("W"), class());
    let out = pointer(PropertySettings::parameter("W").with_flags(PropertyFlags::OUT_PARM), class());
    let const_out = pointer(
        PropertySettings::parameter("W").with_flags(PropertyFlags::OUT_PARM | PropertyFlags::CONST_PARM),
        class(),
    );

    assert!(by_value.matches_type(&by_value, types));
    assert!(!by_value.matches_type(&out, types));
    assert!(!out.matches_type(&const_out, types));
    assert!(const_out.matches_type(&const_out, types));
}
