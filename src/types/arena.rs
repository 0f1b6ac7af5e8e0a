//! Arena of type nodes addressed by stable index.

use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::base::{Name, TypeId};

use super::node::TypeNode;

const NO_FORWARD: u32 = u32::MAX;

struct Slot {
    node: RwLock<TypeNode>,
    /// Index this slot was replaced by, or `NO_FORWARD`.
    forward: AtomicU32,
}

/// Every declared type, indexed by [`TypeId`].
///
/// Nodes are allocated while declarations are being added (`&mut self`) and
/// are only read or updated in place through per-slot locks afterwards.
/// Replacing a slot makes every holder of the old index observe the new node.
#[derive(Default)]
pub struct TypeArena {
    slots: Vec<Slot>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next index and store the node built for it.
    pub fn alloc(&mut self, build: impl FnOnce(TypeId) -> TypeNode) -> TypeId {
        let id = TypeId::new(self.slots.len() as u32);
        self.slots.push(Slot {
            node: RwLock::new(build(id)),
            forward: AtomicU32::new(NO_FORWARD),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: TypeId) -> bool {
        id.index() < self.slots.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = TypeId> + use<> {
        (0..self.slots.len() as u32).map(TypeId::new)
    }

    /// Follow replacements to the index currently holding the content.
    pub fn canonical(&self, id: TypeId) -> TypeId {
        let mut current = id;
        // A forward chain can never be longer than the arena.
        for _ in 0..self.slots.len() {
            let next = self.slots[current.index()].forward.load(Ordering::Acquire);
            if next == NO_FORWARD {
                break;
            }
            current = TypeId::new(next);
        }
        current
    }

    /// Two indices denote the same type after following replacements.
    pub fn same(&self, a: TypeId, b: TypeId) -> bool {
        self.canonical(a) == self.canonical(b)
    }

    pub fn read(&self, id: TypeId) -> RwLockReadGuard<'_, TypeNode> {
        self.slots[self.canonical(id).index()].node.read()
    }

    pub fn write(&self, id: TypeId) -> RwLockWriteGuard<'_, TypeNode> {
        self.slots[self.canonical(id).index()].node.write()
    }

    /// Exclusive access while declarations are still being added.
    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeNode {
        let id = self.canonical(id);
        self.slots[id.index()].node.get_mut()
    }

    /// Clone of the node, taken under a short read lock.
    pub fn snapshot(&self, id: TypeId) -> TypeNode {
        self.read(id).clone()
    }

    pub fn source_name(&self, id: TypeId) -> Name {
        self.read(id).source_name.clone()
    }

    pub fn engine_name(&self, id: TypeId) -> Name {
        self.read(id).engine_name.clone()
    }

    /// Redirect `old` to `new`. Holders of `old` see `new` from now on.
    ///
    /// Returns `false` if the redirect would point a slot at itself.
    pub fn replace(&self, old: TypeId, new: TypeId) -> bool {
        let target = self.canonical(new);
        if target == self.canonical(old) {
            return false;
        }
        self.slots[old.index()].forward.store(target.raw(), Ordering::Release);
        true
    }

    pub fn is_replaced(&self, id: TypeId) -> bool {
        self.slots[id.index()].forward.load(Ordering::Acquire) != NO_FORWARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{HeaderId, Outer};
    use crate::types::{MetaData, PlaceholderData, PlaceholderKind, StructData, TypeKind};

    fn node(id: TypeId, name: &str, kind: TypeKind) -> TypeNode {
        TypeNode {
            id,
            source_name: name.into(),
            engine_name: name.into(),
            outer: Outer::Header(HeaderId::new(0)),
            header: HeaderId::new(0),
            line: 1,
            visible: true,
            alternate: None,
            meta: MetaData::new(),
            children: Vec::new(),
            kind,
        }
    }

    #[test]
    fn test_indices_are_monotonic() {
        let mut arena = TypeArena::new();
        let a = arena.alloc(|id| node(id, "A", TypeKind::Struct(StructData::default())));
        let b = arena.alloc(|id| node(id, "B", TypeKind::Struct(StructData::default())));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(arena.read(b).id, b);
    }

    #[test]
    fn test_replace_redirects_holders() {
        let mut arena = TypeArena::new();
        let placeholder = arena.alloc(|id| {
            node(
                id,
                "FThing",
                TypeKind::Placeholder(PlaceholderData {
                    expected: PlaceholderKind::Struct,
                }),
            )
        });
        let real = arena.alloc(|id| node(id, "FThing", TypeKind::Struct(StructData::default())));

        assert!(arena.replace(placeholder, real));
        assert!(arena.is_replaced(placeholder));
        assert_eq!(arena.canonical(placeholder), real);
        assert!(arena.same(placeholder, real));
        assert!(matches!(arena.read(placeholder).kind, TypeKind::Struct(_)));
        assert!(!arena.replace(real, placeholder));
    }
}
