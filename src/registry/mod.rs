//! Property type registry - keyword to parser dispatch.
//!
//! A type expression such as `TMap<FName, TArray<int32>>` is turned into a
//! [`Property`] by the parser registered for its leading keyword. Identifiers
//! with no registered keyword go to the default parser, which resolves them
//! through the symbol table.
//!
//! ## Key Types
//!
//! - [`PropertyTypeRegistry`] - Keyword table plus the default parser
//! - [`PropertyTypeEntry`] - One registered parser and its options
//! - [`PropertyParseContext`] - What a parser may consult while building
//! - [`TypeLookup`] - Symbol lookup seam implemented by the session
//! - [`TokenStream`] - Lexed type expression handed to parsers
//!
//! Registration happens once, before any header is processed, via
//! [`PropertyTypeRegistry::register_defaults`] and [`PropertyTypeRegistry::register`].

mod builtins;
mod tokens;

pub use tokens::{TokenStream, TypeToken};

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::base::{Name, Outer, TypeId};
use crate::diag::{ResolveError, ResolveResult};
use crate::property::{Property, PropertyFlags, PropertySettings};
use crate::symbols::FindOptions;
use crate::types::TypeArena;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyTypeOptions: u8 {
        /// Keyword is a single token with no template arguments
        const SIMPLE = 1 << 0;
        /// Resolvable while parsing, before the symbol table exists
        const IMMEDIATE = 1 << 1;
    }
}

/// When a parser runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyResolvePhase {
    /// Declarations are still being read; only immediate keywords resolve.
    Parsing,
    /// Properties phase; every type is known.
    Resolving,
}

/// Symbol lookups available to parsers.
pub trait TypeLookup: Sync {
    fn types(&self) -> &TypeArena;

    /// Scoped source-name lookup of `name` (optionally `Outer::Name`) from `scope`.
    fn find_type(&self, scope: Outer, options: FindOptions, name: &str, line: u32) -> ResolveResult<Option<TypeId>>;
}

pub struct PropertyParseContext<'a> {
    pub lookup: &'a dyn TypeLookup,
    pub registry: &'a PropertyTypeRegistry,
    pub phase: PropertyResolvePhase,
    /// Type (or header) the declaration appears in.
    pub scope: Outer,
}

impl PropertyParseContext<'_> {
    pub fn types(&self) -> &TypeArena {
        self.lookup.types()
    }

    /// Resolve `name` as one of `kinds`, searching source names.
    pub fn find(&self, kinds: FindOptions, name: &str, line: u32) -> ResolveResult<Option<TypeId>> {
        self.lookup
            .find_type(self.scope, kinds | FindOptions::SOURCE_NAME, name, line)
    }
}

/// Parser for one keyword. Returns `Ok(None)` to defer resolution.
///
/// The stream is positioned at the keyword itself.
pub type PropertyTypeParser = fn(
    &PropertyParseContext<'_>,
    PropertySettings,
    &mut TokenStream<'_>,
) -> ResolveResult<Option<Property>>;

#[derive(Clone, Copy)]
pub struct PropertyTypeEntry {
    pub parser: PropertyTypeParser,
    pub options: PropertyTypeOptions,
}

impl std::fmt::Debug for PropertyTypeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyTypeEntry")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct PropertyTypeRegistry {
    keywords: FxHashMap<Name, PropertyTypeEntry>,
    default_parser: Option<PropertyTypeEntry>,
}

impl PropertyTypeRegistry {
    /// Registry with no keywords at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in keyword.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Register the built-in scalar, container and reference keywords.
    pub fn register_defaults(&mut self) {
        for &(keyword, parser, options) in builtins::BUILTINS {
            self.keywords
                .insert(Name::new_static(keyword), PropertyTypeEntry { parser, options });
        }
        self.default_parser = Some(PropertyTypeEntry {
            parser: builtins::parse_identifier,
            options: PropertyTypeOptions::empty(),
        });
    }

    /// Add a keyword; registering the same keyword twice is an internal error.
    pub fn register(
        &mut self,
        keyword: impl Into<Name>,
        parser: PropertyTypeParser,
        options: PropertyTypeOptions,
    ) -> ResolveResult<()> {
        let keyword = keyword.into();
        if self.keywords.contains_key(&keyword) {
            return Err(ResolveError::ice(format!(
                "The property type keyword '{keyword}' is already registered"
            )));
        }
        self.keywords
            .insert(keyword, PropertyTypeEntry { parser, options });
        Ok(())
    }

    /// Replace the parser used for identifiers that are not keywords.
    pub fn set_default_parser(&mut self, parser: PropertyTypeParser) {
        self.default_parser = Some(PropertyTypeEntry {
            parser,
            options: PropertyTypeOptions::empty(),
        });
    }

    pub fn entry(&self, keyword: &str) -> Option<&PropertyTypeEntry> {
        self.keywords.get(keyword)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Parse a full declaration type, including `const` and a trailing `&`.
    pub fn parse_expression(
        &self,
        cx: &PropertyParseContext<'_>,
        mut settings: PropertySettings,
        expression: &str,
    ) -> ResolveResult<Option<Property>> {
        let mut stream = TokenStream::new(expression, settings.line)?;

        let mut is_const = stream.eat_ident("const");
        let is_ref = stream.pop_trailing(TypeToken::Amp);
        if stream.pop_trailing_ident("const") {
            is_const = true;
        }

        if is_const && settings.category.is_parameter() {
            settings.flags |= PropertyFlags::CONST_PARM;
        }
        if is_ref {
            if !settings.category.is_parameter() {
                return Err(stream.error("Reference member variables are not allowed"));
            }
            if !is_const {
                settings.flags |= PropertyFlags::OUT_PARM | PropertyFlags::REFERENCE_PARM;
            }
        }

        let property = self.parse_type(cx, settings, &mut stream)?;
        if property.is_some() {
            stream.expect_end()?;
        }
        Ok(property)
    }

    /// Dispatch on the keyword at the stream's cursor.
    pub fn parse_type(
        &self,
        cx: &PropertyParseContext<'_>,
        settings: PropertySettings,
        stream: &mut TokenStream<'_>,
    ) -> ResolveResult<Option<Property>> {
        let keyword = match stream.peek() {
            Some((TypeToken::Identifier, text)) => text,
            Some((_, text)) => return Err(stream.error(format!("Expected a type name but found '{text}'"))),
            None => return Err(stream.error("Missing type")),
        };

        let entry = match self.keywords.get(keyword) {
            Some(entry) => *entry,
            None => match self.default_parser {
                Some(entry) => entry,
                None => return Err(stream.error(format!("Unknown type '{keyword}'"))),
            },
        };

        if cx.phase == PropertyResolvePhase::Parsing && !entry.options.contains(PropertyTypeOptions::IMMEDIATE) {
            return Ok(None);
        }
        (entry.parser)(cx, settings, stream)
    }
}
