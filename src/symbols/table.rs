//! Symbol table storage and the scoped lookup walk.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::{HeaderId, Name, Outer, TypeId, caseless_key};
use crate::diag::{ResolveError, ResolveResult};
use crate::types::{HeaderFile, TypeArena, TypeKind};

use super::options::FindOptions;

const END: u32 = u32::MAX;

/// Which name a table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolTableKind {
    SourceName,
    /// Engine names compare caselessly unless told otherwise.
    EngineName,
}

#[derive(Debug)]
struct SymbolEntry {
    /// Rewritten in place when a placeholder is swapped for its definition.
    type_id: AtomicU32,
    owner: Outer,
    kind: FindOptions,
    next_cased: u32,
    next_caseless: u32,
}

impl SymbolEntry {
    fn type_id(&self) -> TypeId {
        TypeId::new(self.type_id.load(Ordering::Acquire))
    }
}

/// Everything a lookup walks through besides the table itself.
#[derive(Clone, Copy)]
pub struct LookupScope<'a> {
    pub types: &'a TypeArena,
    pub headers: &'a [HeaderFile],
}

/// Name index over every declared type.
///
/// Entries sharing a name are chained, newest first, once for the exact name
/// and once for its caseless key.
#[derive(Debug)]
pub struct SymbolTable {
    kind: SymbolTableKind,
    entries: Vec<SymbolEntry>,
    cased: FxHashMap<Name, u32>,
    caseless: FxHashMap<String, u32>,
    by_type: FxHashMap<TypeId, u32>,
    populated: bool,
}

impl SymbolTable {
    pub fn new(kind: SymbolTableKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            cased: FxHashMap::default(),
            caseless: FxHashMap::default(),
            by_type: FxHashMap::default(),
            populated: false,
        }
    }

    pub fn kind(&self) -> SymbolTableKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// File `id` under `name` as a child of `owner`.
    pub fn add(&mut self, owner: Outer, id: TypeId, kind: FindOptions, name: impl Into<Name>) {
        let name = name.into();
        let index = self.entries.len() as u32;
        let key = caseless_key(&name);
        let next_cased = self.cased.insert(name, index).unwrap_or(END);
        let next_caseless = self.caseless.insert(key, index).unwrap_or(END);
        self.entries.push(SymbolEntry {
            type_id: AtomicU32::new(id.raw()),
            owner,
            kind,
            next_cased,
            next_caseless,
        });
        self.by_type.insert(id, index);
    }

    /// Open the table for queries.
    pub fn mark_populated(&mut self) {
        self.populated = true;
        tracing::trace!(
            "[SYMBOLS] {:?} table populated with {} entries",
            self.kind,
            self.entries.len()
        );
    }

    fn is_caseless(&self, options: FindOptions) -> bool {
        if options.contains(FindOptions::CASE_COMPARE) {
            false
        } else if options.contains(FindOptions::CASELESS_COMPARE) {
            true
        } else {
            self.kind == SymbolTableKind::EngineName
        }
    }

    fn chain(&self, name: &str, caseless: bool) -> impl Iterator<Item = &SymbolEntry> {
        let head = if caseless {
            self.caseless.get(&caseless_key(name)).copied()
        } else {
            self.cased.get(name).copied()
        };
        let mut next = head.unwrap_or(END);
        std::iter::from_fn(move || {
            let entry = self.entries.get(next as usize)?;
            next = if caseless { entry.next_caseless } else { entry.next_cased };
            Some(entry)
        })
    }

    /// Direct child of `owner` named `name` of an accepted kind.
    pub fn find_in_owner(&self, owner: Outer, name: &str, options: FindOptions) -> Option<TypeId> {
        self.chain(name, self.is_caseless(options))
            .find(|e| e.owner == owner && e.kind.intersects(options))
            .map(SymbolEntry::type_id)
    }

    /// Any header's top-level type named `name`.
    pub fn find_global(&self, name: &str, options: FindOptions) -> Option<TypeId> {
        self.chain(name, self.is_caseless(options))
            .find(|e| e.owner.is_header() && e.kind.intersects(options))
            .map(SymbolEntry::type_id)
    }

    /// Top-level definition named `name`, skipping placeholders.
    pub fn find_definition(&self, types: &TypeArena, name: &str, options: FindOptions) -> Option<TypeId> {
        self.chain(name, self.is_caseless(options))
            .filter(|e| e.owner.is_header() && e.kind.intersects(options))
            .map(SymbolEntry::type_id)
            .find(|id| !matches!(types.read(*id).kind, TypeKind::Placeholder(_)))
    }

    /// Point the entry of `old` at `new`.
    pub fn replace(&self, old: TypeId, new: TypeId) -> bool {
        match self.by_type.get(&old) {
            Some(&index) => {
                self.entries[index as usize]
                    .type_id
                    .store(new.raw(), Ordering::Release);
                true
            }
            None => false,
        }
    }

    /// Scoped lookup starting at `start`.
    pub fn find_type(
        &self,
        scope: LookupScope<'_>,
        start: Outer,
        options: FindOptions,
        name: &str,
    ) -> ResolveResult<Option<TypeId>> {
        options.validate()?;
        if !self.populated {
            return Err(ResolveError::NotPopulated);
        }
        let types = scope.types;

        let header = match start {
            Outer::Header(h) => h,
            Outer::Type(t) => types.read(t).header,
        };
        let mut current = start.as_type();
        if options.contains(FindOptions::EXCLUDE_SELF) {
            current = current.and_then(|t| types.read(t).outer.as_type());
        }

        if options.contains(FindOptions::SELF_ONLY) {
            let owner = current.map_or(Outer::Header(header), Outer::Type);
            return Ok(self.find_in_owner(owner, name, options));
        }

        while let Some(id) = current {
            if let Some(found) = self.find_in_struct(types, id, name, options) {
                return Ok(Some(found));
            }
            if options.contains(FindOptions::NO_OUTER) {
                break;
            }
            current = types.read(id).outer.as_type();
        }

        if let Some(found) = self.find_in_owner(Outer::Header(header), name, options) {
            return Ok(Some(found));
        }

        if !options.contains(FindOptions::NO_INCLUDES) {
            if let Some(found) = self.find_in_includes(scope.headers, header, name, options) {
                return Ok(Some(found));
            }
        }

        if options.contains(FindOptions::NO_GLOBAL) {
            return Ok(None);
        }
        Ok(self.find_global(name, options))
    }

    /// Search a type and, unless `NO_PARENTS`, its super chain.
    fn find_in_struct(&self, types: &TypeArena, id: TypeId, name: &str, options: FindOptions) -> Option<TypeId> {
        if let Some(found) = self.find_in_owner(Outer::Type(id), name, options) {
            return Some(found);
        }
        if options.contains(FindOptions::NO_PARENTS) {
            return None;
        }
        let mut visited = FxHashSet::default();
        let mut parent = types.read(id).super_id();
        while let Some(p) = parent.map(|p| types.canonical(p)) {
            if !visited.insert(p) {
                break;
            }
            if let Some(found) = self.find_in_owner(Outer::Type(p), name, options) {
                return Some(found);
            }
            parent = types.read(p).super_id();
        }
        None
    }

    /// Breadth-first over transitive includes of `header`.
    fn find_in_includes(
        &self,
        headers: &[HeaderFile],
        header: HeaderId,
        name: &str,
        options: FindOptions,
    ) -> Option<TypeId> {
        let mut visited = FxHashSet::default();
        visited.insert(header);
        let mut queue: VecDeque<HeaderId> = headers
            .get(header.index())
            .map(|h| h.includes.iter().copied().collect())
            .unwrap_or_default();
        while let Some(next) = queue.pop_front() {
            if !visited.insert(next) {
                continue;
            }
            if let Some(found) = self.find_in_owner(Outer::Header(next), name, options) {
                return Some(found);
            }
            if let Some(file) = headers.get(next.index()) {
                queue.extend(file.includes.iter().copied());
            }
        }
        None
    }
}
