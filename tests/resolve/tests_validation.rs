//! Diagnostics produced by full runs.

use uht::property::{PropertyFlags, PropertySettings};
use uht::{ClassDecl, FunctionDecl, MessageKind, Outer, SessionConfig, StructDecl};

use crate::helpers::message_assertions::{assert_message_contains, errors, headlines};
use crate::helpers::session_fixtures::Fixture;

// ============================================================================
// SHADOWING
// ============================================================================

#[test]
fn test_member_shadowing_across_headers() {
    let mut fx = Fixture::new();
    let pawn_h = fx.header("Pawn.h");
    let hero_h = fx.header("Hero.h");
    fx.session.add_include(hero_h, pawn_h);
    let pawn = fx.session.add_class(Outer::Header(pawn_h), ClassDecl::new("APawn"));
    fx.member(pawn, "Health", "int32");
    let hero = fx.session.add_class(Outer::Header(hero_h), ClassDecl::new("AHero").derives("APawn"));
    fx.member_with(hero, PropertySettings::member("Health").with_line(14), "float");

    let session = fx.run();
    assert_eq!(
        headlines(&session),
        vec![
            "Hero.h(14): Error: Member variable declaration: 'Health' cannot be defined in 'AHero' as it is already defined in scope 'APawn' (shadowing is not allowed)"
        ]
    );
}

#[test]
fn test_parameter_shadowing_class_member() {
    let mut fx = Fixture::new();
    let header = fx.header("Door.h");
    let door = fx.session.add_class(Outer::Header(header), ClassDecl::new("ADoor"));
    fx.member(door, "Angle", "float");
    let open = fx.session.add_function(Outer::Type(door), FunctionDecl::new("Open"));
    fx.parameter(open, "Angle", "float");

    let session = fx.run();
    assert_message_contains(
        &session,
        "Function parameter: 'Angle' cannot be defined in 'Open' as it is already defined in scope 'ADoor'",
    );
}

#[test]
fn test_deprecated_members_may_shadow() {
    let mut fx = Fixture::new();
    let header = fx.header("Pawn.h");
    let pawn = fx.session.add_struct(Outer::Header(header), StructDecl::new("FPawnState"));
    fx.member_with(
        pawn,
        PropertySettings::member("Speed").with_flags(PropertyFlags::DEPRECATED),
        "float",
    );
    let hero = fx
        .session
        .add_struct(Outer::Header(header), StructDecl::new("FHeroState").derives("FPawnState"));
    fx.member(hero, "Speed", "float");

    let session = fx.run();
    assert!(!session.has_errors(), "{:?}", headlines(&session));
}

// ============================================================================
// DECLARATION RULES
// ============================================================================

#[test]
fn test_bool_static_array_rejected() {
    let mut fx = Fixture::new();
    let header = fx.header("Flags.h");
    let owner = fx.session.add_struct(Outer::Header(header), StructDecl::new("FFlags"));
    fx.member_with(
        owner,
        PropertySettings::member("Bits").with_array_dimensions("4").with_line(6),
        "bool",
    );

    let session = fx.run();
    assert_eq!(headlines(&session), vec!["Flags.h(6): Error: Bool arrays are not allowed"]);
}

#[test]
fn test_engine_package_requires_category() {
    let mut fx = Fixture::with_config(SessionConfig::default().with_engine_package("Game"));
    let header = fx.header("Actor.h");
    let actor = fx.session.add_class(Outer::Header(header), ClassDecl::new("AActor"));
    fx.member_with(
        actor,
        PropertySettings::member("Speed").with_flags(PropertyFlags::EDIT),
        "float",
    );
    fx.member_with(
        actor,
        PropertySettings::member("Mass")
            .with_flags(PropertyFlags::EDIT)
            .with_meta("Category", "Physics"),
        "float",
    );

    let session = fx.run();
    assert_eq!(
        errors(&session),
        vec![
            "An explicit Category specifier is required for any property exposed to the editor or Blueprints in an Engine module."
        ]
    );
}

#[test]
fn test_warnings_as_errors_fails_run() {
    let build = |warnings_as_errors: bool| {
        let mut fx = Fixture::with_config(SessionConfig::default().with_warnings_as_errors(warnings_as_errors));
        let header = fx.header("Actor.h");
        let actor = fx.session.add_class(Outer::Header(header), ClassDecl::new("AActor"));
        fx.member_with(
            actor,
            PropertySettings::member("Hidden").with_meta("Category", "Misc"),
            "int32",
        );
        fx.run()
    };

    let lenient = build(false);
    assert!(!lenient.has_errors());
    assert_eq!(lenient.messages()[0].kind, MessageKind::Warning);
    assert_eq!(lenient.sorted_headers().len(), 1);

    let strict = build(true);
    assert!(strict.has_errors());
    assert!(strict.sorted_headers().is_empty());
}

// ============================================================================
// SYMBOL POPULATION
// ============================================================================

#[test]
fn test_reserved_type_name() {
    let mut fx = Fixture::new();
    let header = fx.header("Odd.h");
    fx.session
        .add_struct(Outer::Header(header), StructDecl::new("FNone").with_line(2));

    let session = fx.run();
    assert_eq!(
        headlines(&session),
        vec!["Odd.h(2): Error: Struct 'None' uses a reserved type name."]
    );
}

#[test]
fn test_engine_name_collision() {
    let mut fx = Fixture::new();
    let first = fx.header("First.h");
    let second = fx.header("Second.h");
    fx.session
        .add_class(Outer::Header(first), ClassDecl::new("UWidget").with_line(4));
    fx.session
        .add_struct(Outer::Header(second), StructDecl::new("FWidget").with_line(9));

    let session = fx.run();
    assert_eq!(
        errors(&session),
        vec!["Struct 'FWidget' shares engine name 'Widget' with class 'UWidget' in First.h(4)"]
    );
}
