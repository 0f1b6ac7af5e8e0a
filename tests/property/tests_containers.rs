//! Container construction through `adopt`.

use rstest::rstest;
use uht::property::{
    ContainerKind, NumericKind, NumericProperty, ObjectProperty, ObjectRefKind, Property, PropertyCaps,
    PropertyFlags, PropertyKind, PropertySettings, StringKind, StringProperty, TypeRef,
};

fn int32() -> Property {
    Property::new(
        PropertySettings::member("Inner"),
        PropertyKind::Numeric(NumericProperty::new(NumericKind::Int32)),
    )
}

fn text() -> Property {
    Property::new(
        PropertySettings::member("Inner"),
        PropertyKind::String(StringProperty::new(StringKind::Text)),
    )
}

fn object(flags: PropertyFlags) -> Property {
    Property::new(
        PropertySettings::member("Inner").with_flags(flags),
        PropertyKind::Object(ObjectProperty::new(ObjectRefKind::Raw, TypeRef::named("UPatrol"))),
    )
}

fn build(kind: ContainerKind, settings: PropertySettings, inner_flags: PropertyFlags) -> Property {
    match kind {
        ContainerKind::Array => Property::array(settings, object(inner_flags)),
        ContainerKind::Set => Property::set(settings, object(inner_flags)),
        ContainerKind::Map => Property::map(settings, int32(), object(inner_flags)),
    }
}

#[rstest]
#[case(ContainerKind::Array, PropertyFlags::empty(), PropertyFlags::empty())]
#[case(ContainerKind::Array, PropertyFlags::EDIT, PropertyFlags::INSTANCED_REFERENCE)]
#[case(ContainerKind::Set, PropertyFlags::INSTANCED_REFERENCE, PropertyFlags::empty())]
#[case(ContainerKind::Map, PropertyFlags::DEPRECATED | PropertyFlags::EDIT, PropertyFlags::EXPORT_OBJECT)]
#[case(
    ContainerKind::Map,
    PropertyFlags::INSTANCED_REFERENCE | PropertyFlags::PERSISTENT_INSTANCE,
    PropertyFlags::CONTAINS_INSTANCED_REFERENCE
)]
fn test_construction_is_deterministic(
    #[case] kind: ContainerKind,
    #[case] outer_flags: PropertyFlags,
    #[case] inner_flags: PropertyFlags,
) {
    let settings = PropertySettings::member("Items").with_flags(outer_flags);
    let first = build(kind, settings.clone(), inner_flags);
    let second = build(kind, settings, inner_flags);
    assert_eq!(first.caps, second.caps);
    assert_eq!(first.flags, second.flags);

    let (first_inners, second_inners) = (first.as_container().unwrap(), second.as_container().unwrap());
    for (a, b) in first_inners.inners().zip(second_inners.inners()) {
        assert_eq!(a.caps, b.caps);
        assert_eq!(a.flags, b.flags);
    }
}

#[rstest]
#[case(PropertyFlags::empty(), PropertyFlags::INSTANCED_REFERENCE)]
#[case(PropertyFlags::INSTANCED_REFERENCE, PropertyFlags::empty())]
#[case(PropertyFlags::empty(), PropertyFlags::CONTAINS_INSTANCED_REFERENCE)]
fn test_instanced_inner_lifts_to_contains(#[case] outer_flags: PropertyFlags, #[case] inner_flags: PropertyFlags) {
    let array = build(
        ContainerKind::Array,
        PropertySettings::member("Items").with_flags(outer_flags),
        inner_flags,
    );
    assert!(array.flags.contains(PropertyFlags::CONTAINS_INSTANCED_REFERENCE));
    assert!(!array.flags.contains(PropertyFlags::INSTANCED_REFERENCE));
    assert!(!array.flags.contains(PropertyFlags::PERSISTENT_INSTANCE));
}

#[test]
fn test_map_key_never_deprecated() {
    let settings = PropertySettings::member("Lookup").with_flags(PropertyFlags::DEPRECATED | PropertyFlags::EDIT);
    let map = Property::map(settings, int32(), int32());
    let container = map.as_container().unwrap();
    let key = container.key.as_deref().unwrap();

    assert!(key.flags.contains(PropertyFlags::EDIT));
    assert!(!key.flags.contains(PropertyFlags::DEPRECATED));
    assert!(container.value.flags.contains(PropertyFlags::EDIT | PropertyFlags::DEPRECATED));
    assert!(map.flags.contains(PropertyFlags::DEPRECATED));
}

#[test]
fn test_inners_take_the_outer_name() {
    let map = Property::map(PropertySettings::member("Lookup").with_line(12), int32(), text());
    for inner in map.as_container().unwrap().inners() {
        assert_eq!(inner.source_name, "Lookup");
        assert_eq!(inner.line, 12);
        assert!(inner.meta.is_empty());
    }
}

#[test]
fn test_container_caps_follow_inners() {
    let ints = Property::array(PropertySettings::member("Ints"), int32());
    assert!(!ints.caps.contains(PropertyCaps::CAN_BE_CONTAINER_KEY));
    assert!(ints.caps.contains(PropertyCaps::PASS_CPP_ARGS_BY_REF));
    assert!(ints.caps.contains(PropertyCaps::SUPPORTED_BY_BLUEPRINT));

    let texts = Property::set(PropertySettings::member("Texts"), text());
    let element = &texts.as_container().unwrap().value;
    assert!(!element.caps.contains(PropertyCaps::CAN_BE_CONTAINER_KEY));
}
