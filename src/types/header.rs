//! Header files and packages.

use indexmap::IndexSet;
use parking_lot::Mutex;

use crate::base::{HeaderId, Name, PackageId, TypeId};
use crate::diag::Message;
use crate::references::HeaderReferences;

/// A parsed header and everything the core accumulates for it.
///
/// The declaration lists are fixed before resolution starts. The referenced
/// header set, the message list and the collected references are each behind
/// their own lock; a header's worker only ever writes to its own header.
pub struct HeaderFile {
    pub id: HeaderId,
    /// Path as given, used in messages and for sorting.
    pub path: Name,
    pub package: PackageId,
    /// Top-level declarations in source order.
    pub children: Vec<TypeId>,
    /// Headers named by `#include`.
    pub includes: Vec<HeaderId>,
    referenced: Mutex<IndexSet<HeaderId>>,
    messages: Mutex<Vec<Message>>,
    references: Mutex<HeaderReferences>,
}

impl HeaderFile {
    pub fn new(id: HeaderId, path: impl Into<Name>, package: PackageId) -> Self {
        Self {
            id,
            path: path.into(),
            package,
            children: Vec::new(),
            includes: Vec::new(),
            referenced: Mutex::new(IndexSet::new()),
            messages: Mutex::new(Vec::new()),
            references: Mutex::new(HeaderReferences::default()),
        }
    }

    /// File name without directories.
    pub fn file_name(&self) -> &str {
        self.path.rsplit(['/', '\\']).next().unwrap_or(self.path.as_str())
    }

    /// Record that this header refers to a type declared in `other`.
    pub fn add_referenced_header(&self, other: HeaderId) {
        if other != self.id {
            self.referenced.lock().insert(other);
        }
    }

    pub fn referenced_headers(&self) -> Vec<HeaderId> {
        self.referenced.lock().iter().copied().collect()
    }

    pub fn push_message(&self, message: Message) {
        self.messages.lock().push(message);
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    pub fn set_references(&self, references: HeaderReferences) {
        *self.references.lock() = references;
    }

    /// Run `f` against the collected references.
    pub fn with_references<R>(&self, f: impl FnOnce(&HeaderReferences) -> R) -> R {
        f(&self.references.lock())
    }
}

impl std::fmt::Debug for HeaderFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderFile")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("children", &self.children.len())
            .finish()
    }
}

/// A module: a named group of headers.
#[derive(Debug, Clone)]
pub struct Package {
    pub id: PackageId,
    pub name: Name,
    pub headers: Vec<HeaderId>,
}
