//! Session builders for integration tests.

use uht::property::{Property, PropertySettings};
use uht::{HeaderId, Outer, PackageId, Session, SessionConfig, TypeId};

/// A session with one package, built up header by header.
pub struct Fixture {
    pub session: Session,
    pub package: PackageId,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let mut session = Session::new(config);
        let package = session.add_package("Game");
        Self { session, package }
    }

    pub fn header(&mut self, path: &str) -> HeaderId {
        self.session.add_header(self.package, path)
    }

    /// Add a member property written as a type expression.
    pub fn member(&mut self, owner: TypeId, name: &str, expression: &str) -> TypeId {
        self.member_with(owner, PropertySettings::member(name), expression)
    }

    pub fn member_with(&mut self, owner: TypeId, settings: PropertySettings, expression: &str) -> TypeId {
        self.session
            .add_property_expression(Outer::Type(owner), settings, expression)
            .unwrap_or_else(|err| panic!("failed to add '{expression}': {err}"))
    }

    pub fn parameter(&mut self, function: TypeId, name: &str, expression: &str) -> TypeId {
        self.member_with(function, PropertySettings::parameter(name), expression)
    }

    /// Run every phase and hand back the session.
    pub fn run(mut self) -> Session {
        self.session.run();
        self.session
    }
}

/// Snapshot of the property stored at `id`.
pub fn property(session: &Session, id: TypeId) -> Property {
    session
        .types()
        .read(id)
        .as_property()
        .cloned()
        .unwrap_or_else(|| panic!("{id:?} is not a property"))
}

pub fn header_named(session: &Session, path: &str) -> HeaderId {
    session
        .headers()
        .iter()
        .find(|h| h.path == path)
        .map(|h| h.id)
        .unwrap_or_else(|| panic!("no header named '{path}'"))
}
