//! Full runs across several headers.

use uht::property::{PropertyCaps, PropertyKind, TypeRefRole};
use uht::{ClassDecl, EnumDecl, Outer, SessionConfig, StructDecl};

use crate::helpers::message_assertions::{assert_no_errors, message_texts};
use crate::helpers::session_fixtures::{Fixture, property};

// ============================================================================
// A.h <- B.h <- C.h
// ============================================================================

#[test]
fn test_three_header_chain_resolves() {
    for go_wide in [false, true] {
        let mut fx = Fixture::with_config(SessionConfig::default().with_go_wide(go_wide));
        let a = fx.header("A.h");
        let b = fx.header("B.h");
        let c = fx.header("C.h");
        fx.session.add_include(b, a);
        fx.session.add_include(c, b);

        let color = fx.session.add_enum(
            Outer::Header(a),
            EnumDecl::new("EColor").value("Red").value("Green").value("Blue"),
        );
        let widget = fx.session.add_struct(Outer::Header(b), StructDecl::new("SWidget"));
        let colors = fx.member(widget, "Colors", "TArray<EColor>");
        let panel = fx.session.add_struct(Outer::Header(c), StructDecl::new("SPanel"));
        let widgets = fx.member(panel, "Widgets", "TMap<FName, SWidget>");

        let session = fx.run();
        assert_no_errors(&session);
        let types = session.types();

        let colors = property(&session, colors);
        assert!(colors.is_container());
        assert!(!colors.caps.contains(PropertyCaps::CAN_BE_CONTAINER_KEY));

        let widgets = property(&session, widgets);
        let map = widgets.as_container().expect("map property");
        let PropertyKind::Struct(value) = &map.value.kind else {
            panic!("map value should be a struct property, got {}", map.value.kind.label());
        };
        let value_struct = value.struct_id().expect("map value resolved");
        assert!(types.same(value_struct, widget));

        // Follow the map value into its struct and down to the array's enum.
        let member = types.read(value_struct).children[0];
        let enum_ids: Vec<_> = property(&session, member)
            .type_refs()
            .into_iter()
            .filter(|(_, role)| *role == TypeRefRole::Enum)
            .filter_map(|(type_ref, _)| type_ref.id)
            .collect();
        assert_eq!(enum_ids.len(), 1);
        assert!(types.same(enum_ids[0], color));
        assert_eq!(types.read(enum_ids[0]).header, a);

        assert_eq!(session.sorted_headers(), &[a, b, c]);
    }
}

#[test]
fn test_header_order_ignores_declaration_order() {
    let mut fx = Fixture::new();
    let game = fx.header("Game.h");
    let core = fx.header("Core.h");
    fx.session.add_include(game, core);

    fx.session.add_class(Outer::Header(core), ClassDecl::new("UObject"));
    let stats = fx.session.add_struct(Outer::Header(core), StructDecl::new("FStats"));
    let hero = fx.session.add_class(Outer::Header(game), ClassDecl::new("AHero").derives("UObject"));
    fx.member(hero, "Stats", "FStats");

    let session = fx.run();
    assert_no_errors(&session);
    assert_eq!(session.sorted_headers(), &[core, game]);
    assert_eq!(session.find_definition("FStats"), Some(stats));
}

#[test]
fn test_error_stops_later_phases() {
    let mut fx = Fixture::new();
    let header = fx.header("Broken.h");
    let owner = fx.session.add_struct(Outer::Header(header), StructDecl::new("FOwner").with_line(3));
    fx.member(owner, "Missing", "FNowhere");
    fx.member(owner, "AlsoMissing", "FNowhereElse");

    let session = fx.run();
    assert!(session.has_errors());
    // Both members fail independently within the same phase.
    assert_eq!(
        message_texts(&session),
        vec![
            "Unable to find 'class', 'delegate', 'enum', or 'struct' with name 'FNowhere'",
            "Unable to find 'class', 'delegate', 'enum', or 'struct' with name 'FNowhereElse'",
        ]
    );
    assert!(session.sorted_headers().is_empty());
}

#[test]
fn test_runs_are_deterministic() {
    let build = |go_wide: bool| {
        let mut fx = Fixture::with_config(SessionConfig::default().with_go_wide(go_wide));
        let headers: Vec<_> = (0..6).map(|i| fx.header(&format!("H{i}.h"))).collect();
        for (i, &header) in headers.iter().enumerate() {
            let id = fx.session.add_struct(Outer::Header(header), StructDecl::new(format!("F{i}")));
            if i > 0 {
                fx.member(id, "Prev", &format!("TArray<F{}>", i - 1));
            }
        }
        let session = fx.run();
        assert_no_errors(&session);
        session
            .header_exports()
            .into_iter()
            .map(|e| (e.path.to_string(), e.cross_module, e.declaration))
            .collect::<Vec<_>>()
    };

    let sequential = build(false);
    assert_eq!(sequential[0].0, "H0.h");
    assert_eq!(sequential[5].1, vec!["Z_Construct_UScriptStruct_F4()"]);
    for _ in 0..4 {
        assert_eq!(build(true), sequential);
    }
}
