//! Session state, the declaration builder and symbol table population.

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::{
    EngineNameRule, HeaderId, Name, Outer, PackageId, TypeId, caseless_key, derive_engine_name,
};
use crate::config::SessionConfig;
use crate::diag::{
    ContextFrame, Message, MessageCounters, MessageKind, ResolveError, ResolveResult, codes,
    push_context,
};
use crate::property::{
    ContainerKind, DeferredProperty, Property, PropertyFlags, PropertyKind, PropertySettings,
    ValidationEnv,
};
use crate::registry::{PropertyParseContext, PropertyResolvePhase, PropertyTypeRegistry, TypeLookup};
use crate::symbols::{EnumValueTable, FindOptions, LookupScope, SymbolTable, SymbolTableKind};
use crate::types::{
    ClassData, ClassFlags, EnumData, FunctionData, HeaderFile, MetaData, Package, PlaceholderData,
    PlaceholderKind, StructData, TypeArena, TypeKind, TypeNode,
};

use super::decl::{ClassDecl, EnumDecl, FunctionDecl, StructDecl};

/// Header name used for types that have no header of their own.
pub const NO_EXPORT_HEADER_NAME: &str = "NoExportTypes.h";

/// All state for one header tool run.
///
/// Built single-threaded through the `add_*` methods, then resolved by
/// [`Session::run`]. Every phase borrows the session immutably; shared state
/// that phases update is behind per-slot or per-header locks.
pub struct Session {
    pub(super) config: SessionConfig,
    pub(super) registry: PropertyTypeRegistry,
    pub(super) packages: Vec<Package>,
    pub(super) headers: Vec<HeaderFile>,
    pub(super) types: TypeArena,
    pub(super) source_symbols: SymbolTable,
    pub(super) engine_symbols: SymbolTable,
    pub(super) enum_values: EnumValueTable,
    pub(super) counters: MessageCounters,
    /// Structs already found valid for replication. Invalid ones are rechecked
    /// so every referencing property reports.
    net_valid_structs: Mutex<FxHashSet<TypeId>>,
    pub(super) sorted_headers: Vec<HeaderId>,
    pub(super) no_export_header: Option<HeaderId>,
    /// Placeholders and the header that declared them.
    pub(super) placeholders: Vec<(TypeId, HeaderId)>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_registry(config, PropertyTypeRegistry::with_defaults())
    }

    /// Session using a caller-populated keyword registry.
    pub fn with_registry(config: SessionConfig, registry: PropertyTypeRegistry) -> Self {
        Self {
            config,
            registry,
            packages: Vec::new(),
            headers: Vec::new(),
            types: TypeArena::new(),
            source_symbols: SymbolTable::new(SymbolTableKind::SourceName),
            engine_symbols: SymbolTable::new(SymbolTableKind::EngineName),
            enum_values: EnumValueTable::new(),
            counters: MessageCounters::default(),
            net_valid_structs: Mutex::new(FxHashSet::default()),
            sorted_headers: Vec::new(),
            no_export_header: None,
            placeholders: Vec::new(),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &PropertyTypeRegistry {
        &self.registry
    }

    pub fn types(&self) -> &TypeArena {
        &self.types
    }

    pub fn headers(&self) -> &[HeaderFile] {
        &self.headers
    }

    pub fn header(&self, id: HeaderId) -> &HeaderFile {
        &self.headers[id.index()]
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn source_symbols(&self) -> &SymbolTable {
        &self.source_symbols
    }

    pub fn engine_symbols(&self) -> &SymbolTable {
        &self.engine_symbols
    }

    pub fn enum_values(&self) -> &EnumValueTable {
        &self.enum_values
    }

    /// Headers in dependency order; empty until a run sorts them.
    pub fn sorted_headers(&self) -> &[HeaderId] {
        &self.sorted_headers
    }

    pub fn no_export_header(&self) -> Option<HeaderId> {
        self.no_export_header
    }

    pub fn counters(&self) -> &MessageCounters {
        &self.counters
    }

    pub fn has_errors(&self) -> bool {
        self.counters.has_errors(self.config.warnings_as_errors)
    }

    /// Every message of every header, ordered by file then line.
    pub fn messages(&self) -> Vec<Message> {
        let mut messages: Vec<Message> = self.headers.iter().flat_map(HeaderFile::messages).collect();
        messages.sort_by(|a, b| (&a.file, a.line).cmp(&(&b.file, b.line)));
        messages
    }

    /// Top-level definition named `name` (source name), placeholders excluded.
    pub fn find_definition(&self, name: &str) -> Option<TypeId> {
        self.source_symbols
            .find_definition(&self.types, name, FindOptions::TYPES)
    }

    // ========================================================================
    // BUILDER
    // ========================================================================

    pub fn add_package(&mut self, name: impl Into<Name>) -> PackageId {
        let id = PackageId::new(self.packages.len() as u32);
        self.packages.push(Package {
            id,
            name: name.into(),
            headers: Vec::new(),
        });
        id
    }

    pub fn add_header(&mut self, package: PackageId, path: impl Into<Name>) -> HeaderId {
        let id = HeaderId::new(self.headers.len() as u32);
        self.headers.push(HeaderFile::new(id, path, package));
        self.packages[package.index()].headers.push(id);
        id
    }

    /// Record `#include "included"` in `header`.
    pub fn add_include(&mut self, header: HeaderId, included: HeaderId) {
        let includes = &mut self.headers[header.index()].includes;
        if !includes.contains(&included) {
            includes.push(included);
        }
    }

    /// The synthetic header every other header depends on.
    pub fn add_no_export_header(&mut self, package: PackageId) -> HeaderId {
        let id = self.add_header(package, NO_EXPORT_HEADER_NAME);
        self.no_export_header = Some(id);
        id
    }

    pub fn add_enum(&mut self, outer: Outer, decl: EnumDecl) -> TypeId {
        let engine_name = derive_engine_name(&decl.name, EngineNameRule::Verbatim);
        let kind = TypeKind::Enum(EnumData {
            cpp_form: decl.cpp_form,
            underlying_keyword: decl.underlying,
            values: decl.values,
            ..EnumData::default()
        });
        self.alloc_node(outer, decl.name, engine_name, decl.line, decl.meta, kind)
    }

    pub fn add_class(&mut self, outer: Outer, decl: ClassDecl) -> TypeId {
        let engine_name = derive_engine_name(&decl.name, EngineNameRule::StripPrefix);
        let kind = TypeKind::Class(ClassData {
            super_name: decl.super_name,
            super_id: None,
            flags: decl.flags,
        });
        self.alloc_node(outer, decl.name, engine_name, decl.line, decl.meta, kind)
    }

    pub fn add_struct(&mut self, outer: Outer, decl: StructDecl) -> TypeId {
        let engine_name = derive_engine_name(&decl.name, EngineNameRule::StripPrefix);
        let kind = TypeKind::Struct(StructData {
            super_name: decl.super_name,
            super_id: None,
            flags: decl.flags,
        });
        self.alloc_node(outer, decl.name, engine_name, decl.line, decl.meta, kind)
    }

    /// Add a function or delegate signature. Parameters are added to the returned id.
    pub fn add_function(&mut self, outer: Outer, decl: FunctionDecl) -> TypeId {
        let rule = if decl.kind.is_delegate() {
            EngineNameRule::DelegateSignature
        } else {
            EngineNameRule::Verbatim
        };
        let engine_name = derive_engine_name(&decl.name, rule);
        let kind = TypeKind::Function(FunctionData {
            kind: decl.kind,
            flags: decl.flags,
        });
        self.alloc_node(outer, decl.name, engine_name, decl.line, decl.meta, kind)
    }

    /// Add an already constructed property.
    pub fn add_property(&mut self, outer: Outer, property: Property) -> TypeId {
        let source_name = property.source_name.clone();
        let engine_name = property.engine_name.clone();
        let line = property.line;
        self.alloc_node(
            outer,
            source_name,
            engine_name,
            line,
            MetaData::new(),
            TypeKind::Property(property),
        )
    }

    /// Add a property declared as a type expression.
    ///
    /// Keywords that resolve immediately are built now; everything else is
    /// stored unresolved and re-parsed during the Properties phase.
    pub fn add_property_expression(
        &mut self,
        outer: Outer,
        settings: PropertySettings,
        expression: &str,
    ) -> ResolveResult<TypeId> {
        let parsed = {
            let _frame = push_context(ContextFrame::TypeExpression(expression.to_string()));
            let cx = PropertyParseContext {
                lookup: &*self,
                registry: &self.registry,
                phase: PropertyResolvePhase::Parsing,
                scope: outer,
            };
            self.registry
                .parse_expression(&cx, settings.clone(), expression)?
        };
        let property = parsed.unwrap_or_else(|| {
            Property::new(
                settings,
                PropertyKind::Deferred(DeferredProperty {
                    expression: expression.to_string(),
                }),
            )
        });
        Ok(self.add_property(outer, property))
    }

    /// Declare `name` in `header` before its definition is known.
    ///
    /// Placeholders are not children of their header; the Final phase swaps
    /// each one for the definition of the same name.
    pub fn add_placeholder(
        &mut self,
        header: HeaderId,
        name: impl Into<Name>,
        expected: PlaceholderKind,
    ) -> TypeId {
        let name = name.into();
        let engine_name = derive_engine_name(&name, EngineNameRule::StripPrefix);
        let id = self.types.alloc(|id| TypeNode {
            id,
            source_name: name,
            engine_name,
            outer: Outer::Header(header),
            header,
            line: 0,
            visible: true,
            alternate: None,
            meta: MetaData::new(),
            children: Vec::new(),
            kind: TypeKind::Placeholder(PlaceholderData { expected }),
        });
        self.placeholders.push((id, header));
        id
    }

    fn alloc_node(
        &mut self,
        outer: Outer,
        source_name: Name,
        engine_name: Name,
        line: u32,
        meta: MetaData,
        kind: TypeKind,
    ) -> TypeId {
        let header = match outer {
            Outer::Header(h) => h,
            Outer::Type(t) => self.types.get_mut(t).header,
        };
        let id = self.types.alloc(|id| TypeNode {
            id,
            source_name,
            engine_name,
            outer,
            header,
            line,
            visible: true,
            alternate: None,
            meta,
            children: Vec::new(),
            kind,
        });
        match outer {
            Outer::Header(h) => self.headers[h.index()].children.push(id),
            Outer::Type(t) => self.types.get_mut(t).children.push(id),
        }
        id
    }

    /// Every type declared in `header`, outer before inner, in source order.
    pub(crate) fn header_types(&self, header: &HeaderFile) -> Vec<TypeId> {
        let mut out = Vec::new();
        let mut stack: Vec<TypeId> = header.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.types.read(id).children.iter().rev().copied());
        }
        out
    }

    // ========================================================================
    // SYMBOL TABLE POPULATION
    // ========================================================================

    /// File every visible type into both symbol tables.
    ///
    /// Runs once, after every declaration has been added.
    pub(super) fn populate(&mut self) {
        let mut pending: Vec<TypeId> = self
            .headers
            .iter()
            .flat_map(|header| self.header_types(header))
            .collect();
        pending.extend(self.placeholders.iter().map(|(id, _)| *id));

        let mut unique: FxHashMap<String, TypeId> = FxHashMap::default();
        for id in pending {
            let node = self.types.snapshot(id);
            let kind = FindOptions::kind_of(&node);
            let is_placeholder = matches!(node.kind, TypeKind::Placeholder(_));
            let is_native_interface = node.class_flags().contains(ClassFlags::NATIVE_INTERFACE);
            let is_engine_type = kind.intersects(FindOptions::TYPES) && !is_placeholder;

            if is_engine_type && caseless_key(&node.engine_name) == "none" {
                self.post(
                    node.header,
                    MessageKind::Error,
                    node.line,
                    Some(codes::DUPLICATE_NAME),
                    format!(
                        "{} '{}' uses a reserved type name.",
                        capitalized(node.kind_name()),
                        node.engine_name
                    ),
                );
            }

            if is_engine_type && node.outer.is_header() && !is_native_interface {
                match unique.get(&caseless_key(&node.engine_name)) {
                    Some(&existing) => {
                        let other = self.types.read(existing);
                        self.post(
                            node.header,
                            MessageKind::Error,
                            node.line,
                            Some(codes::DUPLICATE_NAME),
                            format!(
                                "{} '{}' shares engine name '{}' with {} '{}' in {}({})",
                                capitalized(node.kind_name()),
                                node.source_name,
                                node.engine_name,
                                other.kind_name(),
                                other.source_name,
                                self.headers[other.header.index()].path,
                                other.line
                            ),
                        );
                    }
                    None => {
                        unique.insert(caseless_key(&node.engine_name), id);
                    }
                }
            }

            if let Some(data) = node.as_enum() {
                self.enum_values.add_enum(id, &node.source_name, data);
            }

            if !node.visible {
                continue;
            }
            self.source_symbols
                .add(node.outer, id, kind, node.source_name.clone());
            if !is_placeholder && !is_native_interface {
                self.engine_symbols
                    .add(node.outer, id, kind, node.engine_name.clone());
            }
        }

        self.source_symbols.mark_populated();
        self.engine_symbols.mark_populated();
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// Scoped lookup of `name` from `scope`.
    ///
    /// `Outer::Name` resolves to the enum `Outer` when it declares a value
    /// `Name`, otherwise to the type `Name` nested in `Outer`.
    pub fn find_type(
        &self,
        scope: Outer,
        options: FindOptions,
        name: &str,
        line: u32,
    ) -> ResolveResult<Option<TypeId>> {
        let table = if options.contains(FindOptions::ENGINE_NAME) {
            &self.engine_symbols
        } else {
            &self.source_symbols
        };
        let lookup = LookupScope {
            types: &self.types,
            headers: &self.headers,
        };

        let parts: Vec<&str> = name.split("::").collect();
        match parts.as_slice() {
            [single] => table.find_type(lookup, scope, options, single),
            [outer_name, inner] => {
                let outer_options = (options - FindOptions::KINDS - FindOptions::SELF_ONLY)
                    | FindOptions::CLASS
                    | FindOptions::SCRIPT_STRUCT
                    | FindOptions::ENUM;
                let Some(outer_id) = table.find_type(lookup, scope, outer_options, outer_name)? else {
                    return Ok(None);
                };
                let declares_value = self
                    .types
                    .read(outer_id)
                    .as_enum()
                    .is_some_and(|e| e.find_value(inner).is_some());
                if declares_value && options.contains(FindOptions::ENUM) {
                    return Ok(Some(outer_id));
                }
                Ok(table.find_in_owner(Outer::Type(outer_id), inner, options))
            }
            _ => Err(ResolveError::at(
                line,
                format!("Too many '::' qualifiers in type name '{name}'"),
            )),
        }
    }

    // ========================================================================
    // MESSAGES
    // ========================================================================

    /// Attach a message to `header`, count it and mirror it to the log.
    pub(crate) fn post(
        &self,
        header: HeaderId,
        kind: MessageKind,
        line: u32,
        code: Option<&'static str>,
        text: impl Into<String>,
    ) {
        let file = &self.headers[header.index()];
        let mut message = Message::new(kind, Some(file.path.clone()), line, text);
        if let Some(code) = code {
            message = message.with_code(code);
        }
        self.counters.record(kind);
        match kind {
            MessageKind::Error | MessageKind::Ice => tracing::error!("{}", message.headline()),
            MessageKind::Warning => tracing::warn!("{}", message.headline()),
            MessageKind::Info => tracing::info!("{}", message.headline()),
            MessageKind::Trace => tracing::trace!("{}", message.headline()),
        }
        file.push_message(message);
    }

    /// Convert a failure that unwound to the header boundary into a message.
    pub(crate) fn post_failure(&self, header: HeaderId, error: &ResolveError) {
        match error {
            ResolveError::Semantic { line, message } => {
                self.post(header, MessageKind::Error, *line, None, message.clone());
            }
            ResolveError::DependencyCycle(_) => {
                self.post(header, MessageKind::Error, 0, Some(codes::CIRCULAR), error.to_string());
            }
            ResolveError::Internal(message) => {
                self.post(header, MessageKind::Ice, 0, None, message.clone());
            }
            ResolveError::NotPopulated | ResolveError::InvalidFindOptions(_) => {
                self.post(header, MessageKind::Ice, 0, None, error.to_string());
            }
        }
    }

    // ========================================================================
    // REPLICATION HELPERS
    // ========================================================================

    /// Whether a struct, its parents and its members can all be replicated.
    pub fn is_struct_valid_for_net(&self, id: TypeId) -> bool {
        let mut visiting = Vec::new();
        self.struct_valid_for_net(id, &mut visiting)
    }

    fn struct_valid_for_net(&self, id: TypeId, visiting: &mut Vec<TypeId>) -> bool {
        let id = self.types.canonical(id);
        if self.net_valid_structs.lock().contains(&id) || visiting.contains(&id) {
            return true;
        }
        visiting.push(id);

        let (super_id, members) = {
            let node = self.types.read(id);
            let members: Vec<Property> = node
                .children
                .iter()
                .filter_map(|child| self.types.read(*child).as_property().cloned())
                .collect();
            (node.super_id(), members)
        };

        let valid = super_id.is_none_or(|s| self.struct_valid_for_net(s, visiting))
            && members.iter().all(|m| self.member_valid_for_net(m, visiting));
        if valid {
            self.net_valid_structs.lock().insert(id);
        }
        valid
    }

    fn member_valid_for_net(&self, member: &Property, visiting: &mut Vec<TypeId>) -> bool {
        if member.flags.contains(PropertyFlags::REP_SKIP) {
            return true;
        }
        match &member.kind {
            PropertyKind::Container(c) if c.kind != ContainerKind::Array => false,
            PropertyKind::Container(c) => c.inners().all(|inner| self.member_valid_for_net(inner, visiting)),
            PropertyKind::Struct(s) => s
                .struct_id()
                .is_none_or(|sid| self.struct_valid_for_net(sid, visiting)),
            _ => true,
        }
    }
}

impl TypeLookup for Session {
    fn types(&self) -> &TypeArena {
        &self.types
    }

    fn find_type(
        &self,
        scope: Outer,
        options: FindOptions,
        name: &str,
        line: u32,
    ) -> ResolveResult<Option<TypeId>> {
        Session::find_type(self, scope, options, name, line)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("headers", &self.headers.len())
            .field("types", &self.types.len())
            .field("errors", &self.counters.error_count())
            .finish_non_exhaustive()
    }
}

/// Validation services scoped to one header.
pub(super) struct HeaderEnv<'a> {
    pub session: &'a Session,
    pub header: &'a HeaderFile,
}

impl ValidationEnv for HeaderEnv<'_> {
    fn types(&self) -> &TypeArena {
        &self.session.types
    }

    fn config(&self) -> &SessionConfig {
        &self.session.config
    }

    fn is_engine_package(&self) -> bool {
        let package = &self.session.packages[self.header.package.index()];
        self.session.config.is_engine_package(&package.name)
    }

    fn error(&self, line: u32, code: &'static str, message: String) {
        self.session
            .post(self.header.id, MessageKind::Error, line, Some(code), message);
    }

    fn warning(&self, line: u32, code: &'static str, message: String) {
        self.session
            .post(self.header.id, MessageKind::Warning, line, Some(code), message);
    }

    fn is_struct_valid_for_net(&self, id: TypeId) -> bool {
        self.session.is_struct_valid_for_net(id)
    }
}

fn capitalized(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
