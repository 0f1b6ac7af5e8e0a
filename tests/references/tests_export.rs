//! Export hand-off after a full run.

use parking_lot::Mutex;
use rstest::rstest;
use uht::property::PropertySettings;
use uht::resolve::NO_EXPORT_HEADER_NAME;
use uht::{
    ClassDecl, EnumDecl, Exporter, FunctionDecl, HeaderExport, Outer, ResolveError, ResolveResult, Session,
    SessionConfig, StructDecl,
};

use crate::helpers::message_assertions::{assert_no_errors, headlines};
use crate::helpers::session_fixtures::Fixture;

#[derive(Default)]
struct Collecting {
    exports: Mutex<Vec<HeaderExport>>,
}

impl Exporter for Collecting {
    fn name(&self) -> &str {
        "collecting"
    }

    fn export(&self, _: &Session, header: &HeaderExport) -> ResolveResult<()> {
        self.exports.lock().push(header.clone());
        Ok(())
    }
}

struct Rejecting(&'static str);

impl Exporter for Rejecting {
    fn name(&self) -> &str {
        "rejecting"
    }

    fn export(&self, _: &Session, header: &HeaderExport) -> ResolveResult<()> {
        if header.path == self.0 {
            return Err(ResolveError::at(1, format!("cannot write '{}'", header.path)));
        }
        Ok(())
    }
}

fn game_session(config: SessionConfig) -> Session {
    let mut fx = Fixture::with_config(config);
    let no_export = fx.session.add_no_export_header(fx.package);
    let core = fx.header("Core.h");
    let game = fx.header("Game.h");
    fx.session.add_include(game, core);

    fx.session.add_class(Outer::Header(no_export), ClassDecl::new("UObject"));
    fx.session
        .add_enum(Outer::Header(core), EnumDecl::new("EMood").enum_class("uint8").value("Calm"));
    fx.session.add_struct(Outer::Header(core), StructDecl::new("FStats"));
    fx.session
        .add_class(Outer::Header(core), ClassDecl::new("UItem").derives("UObject"));

    let hero = fx
        .session
        .add_class(Outer::Header(game), ClassDecl::new("AHero").derives("UObject"));
    fx.member(hero, "Stats", "FStats");
    fx.member(hero, "Held", "UItem*");
    fx.member_with(hero, PropertySettings::member("Bag").with_line(20), "TArray<FStats>");
    let set_mood = fx.session.add_function(Outer::Type(hero), FunctionDecl::new("SetMood"));
    fx.parameter(set_mood, "Mood", "EMood");
    fx.parameter(set_mood, "NewStats", "const FStats&");

    let session = fx.run();
    assert_no_errors(&session);
    session
}

#[test]
fn test_exports_follow_header_order() {
    let session = game_session(SessionConfig::default());
    let exports = session.header_exports();
    let paths: Vec<&str> = exports.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec![NO_EXPORT_HEADER_NAME, "Core.h", "Game.h"]);

    let game = &exports[2];
    assert_eq!(
        game.cross_module,
        vec![
            "Z_Construct_UClass_UItem_NoRegister()",
            "Z_Construct_UClass_UObject()",
            "Z_Construct_UEnum_EMood()",
            "Z_Construct_UScriptStruct_FStats()",
        ]
    );
    assert_eq!(game.declaration, vec!["Z_Construct_UClass_AHero()"]);
    assert_eq!(
        game.forward_declarations,
        vec!["enum class EMood : uint8;", "struct FStats;"]
    );

    let core = &exports[1];
    assert_eq!(
        core.declaration,
        vec![
            "Z_Construct_UClass_UItem()",
            "Z_Construct_UEnum_EMood()",
            "Z_Construct_UScriptStruct_FStats()",
        ]
    );
    assert_eq!(core.export_types.len(), 3);
}

#[rstest]
#[case(false, 1)]
#[case(true, 1)]
#[case(true, 4)]
fn test_every_header_reaches_every_exporter(#[case] go_wide: bool, #[case] width: usize) {
    let config = SessionConfig::default()
        .with_go_wide(go_wide)
        .with_export_concurrency(width);
    let session = game_session(config);
    let first = Collecting::default();
    let second = Collecting::default();
    assert!(session.run_exporters(&[&first, &second]));

    for exporter in [&first, &second] {
        let mut paths: Vec<String> = exporter.exports.lock().iter().map(|e| e.path.to_string()).collect();
        paths.sort();
        assert_eq!(paths, vec!["Core.h", "Game.h", NO_EXPORT_HEADER_NAME]);
    }
}

#[test]
fn test_exporter_failure_marks_run_failed() {
    let session = game_session(SessionConfig::default());
    let collecting = Collecting::default();
    assert!(!session.run_exporters(&[&Rejecting("Game.h"), &collecting]));
    assert_eq!(headlines(&session), vec!["Game.h(1): Error: cannot write 'Game.h'"]);
    // The other exporter still saw every header.
    assert_eq!(collecting.exports.lock().len(), 3);

    // Nothing is exported once the session has errors.
    let late = Collecting::default();
    assert!(!session.run_exporters(&[&late]));
    assert!(late.exports.lock().is_empty());
}
