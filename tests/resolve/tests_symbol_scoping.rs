//! Scoped symbol lookup through a populated session.

use rstest::rstest;
use uht::symbols::FindOptions;
use uht::{ClassDecl, FunctionDecl, Outer, StructDecl};

use crate::helpers::message_assertions::assert_no_errors;
use crate::helpers::session_fixtures::Fixture;

const MEMBER: FindOptions = FindOptions::PROPERTY.union(FindOptions::SOURCE_NAME);

#[rstest]
#[case(FindOptions::empty(), true)]
#[case(FindOptions::NO_PARENTS, false)]
#[case(FindOptions::NO_OUTER, true)]
#[case(FindOptions::NO_GLOBAL, true)]
fn test_member_found_through_super_chain(#[case] extra: FindOptions, #[case] found: bool) {
    let mut fx = Fixture::new();
    let header = fx.header("Pawn.h");
    let pawn = fx.session.add_class(Outer::Header(header), ClassDecl::new("APawn"));
    let health = fx.member(pawn, "Health", "int32");
    let hero = fx.session.add_class(Outer::Header(header), ClassDecl::new("AHero").derives("APawn"));

    let session = fx.run();
    assert_no_errors(&session);
    let result = session
        .find_type(Outer::Type(hero), MEMBER | extra, "Health", 0)
        .unwrap();
    assert_eq!(result, found.then_some(health));
}

#[test]
fn test_nested_delegate_found_from_inner_scope() {
    let mut fx = Fixture::new();
    let header = fx.header("Door.h");
    let door = fx.session.add_class(Outer::Header(header), ClassDecl::new("ADoor"));
    let opened = fx
        .session
        .add_function(Outer::Type(door), FunctionDecl::multicast_delegate("FOnOpened"));
    let open = fx.session.add_function(Outer::Type(door), FunctionDecl::new("Open"));

    let session = fx.run();
    assert_no_errors(&session);
    let options = FindOptions::DELEGATE_FUNCTION | FindOptions::SOURCE_NAME;
    assert_eq!(
        session.find_type(Outer::Type(open), options, "FOnOpened", 0).unwrap(),
        Some(opened)
    );
    assert_eq!(
        session.find_type(Outer::Type(open), options | FindOptions::NO_OUTER, "FOnOpened", 0).unwrap(),
        None
    );
    // Qualified from anywhere.
    assert_eq!(
        session.find_type(Outer::Header(header), options, "ADoor::FOnOpened", 0).unwrap(),
        Some(opened)
    );
}

#[test]
fn test_include_scoping() {
    let mut fx = Fixture::new();
    let shared = fx.header("Shared.h");
    let user = fx.header("User.h");
    let other = fx.header("Other.h");
    fx.session.add_include(user, shared);
    let stats = fx.session.add_struct(Outer::Header(shared), StructDecl::new("FStats"));

    let session = fx.run();
    let local = FindOptions::SCRIPT_STRUCT | FindOptions::SOURCE_NAME | FindOptions::NO_GLOBAL;
    assert_eq!(session.find_type(Outer::Header(user), local, "FStats", 0).unwrap(), Some(stats));
    assert_eq!(session.find_type(Outer::Header(other), local, "FStats", 0).unwrap(), None);
    assert_eq!(
        session
            .find_type(Outer::Header(user), local | FindOptions::NO_INCLUDES, "FStats", 0)
            .unwrap(),
        None
    );
}

#[test]
fn test_name_table_comparison() {
    let mut fx = Fixture::new();
    let header = fx.header("Items.h");
    let item = fx.session.add_struct(Outer::Header(header), StructDecl::new("FItem"));
    let session = fx.run();
    let scope = Outer::Header(header);

    // Source names compare cased unless told otherwise.
    let source = FindOptions::SCRIPT_STRUCT | FindOptions::SOURCE_NAME;
    assert_eq!(session.find_type(scope, source, "fitem", 0).unwrap(), None);
    assert_eq!(
        session
            .find_type(scope, source | FindOptions::CASELESS_COMPARE, "fitem", 0)
            .unwrap(),
        Some(item)
    );

    // Engine names compare caseless unless told otherwise.
    let engine = FindOptions::SCRIPT_STRUCT | FindOptions::ENGINE_NAME;
    assert_eq!(session.find_type(scope, engine, "item", 0).unwrap(), Some(item));
    assert_eq!(
        session
            .find_type(scope, engine | FindOptions::CASE_COMPARE, "item", 0)
            .unwrap(),
        None
    );
}

#[test]
fn test_invalid_options_rejected() {
    let mut fx = Fixture::new();
    let header = fx.header("Empty.h");
    let session = fx.run();
    let both = FindOptions::CLASS
        | FindOptions::SOURCE_NAME
        | FindOptions::CASE_COMPARE
        | FindOptions::CASELESS_COMPARE;
    assert!(session.find_type(Outer::Header(header), both, "UThing", 0).is_err());
    assert!(
        session
            .find_type(Outer::Header(header), FindOptions::SOURCE_NAME, "UThing", 0)
            .is_err()
    );
}

#[test]
fn test_too_many_qualifiers() {
    let mut fx = Fixture::new();
    let header = fx.header("Deep.h");
    let session = fx.run();
    let err = session
        .find_type(Outer::Header(header), FindOptions::TYPES | FindOptions::SOURCE_NAME, "A::B::C", 7)
        .unwrap_err();
    assert_eq!(err.to_string(), "Too many '::' qualifiers in type name 'A::B::C'");
}
