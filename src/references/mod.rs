//! Reference collection - what each header needs from the rest of the session.
//!
//! After resolution, every header is walked once to gather the types it
//! defines and the types it refers to. The results feed the exporter and the
//! header dependency graph.
//!
//! ## Key Types
//!
//! - [`ReferenceSet`] - Deduplicated type references, keyed by `(index << 1) | registered`
//! - [`HeaderReferences`] - Everything collected for one header
//! - [`DependencyCycle`] - A cycle found while ordering headers

mod collect;
mod graph;

pub(crate) use collect::collect_header;
pub use graph::{DependencyCycle, topological_sort};

use indexmap::IndexSet;

use crate::base::TypeId;
use crate::types::{FunctionKind, TypeArena, TypeKind};

// ============================================================================
// REFERENCE SET
// ============================================================================

/// Insertion-ordered set of type references.
///
/// A type with an alternate (a native interface and its interface class) is
/// stored under the alternate, so both spellings collapse to one entry.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    keys: IndexSet<u64>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference; `registered` selects the registering form.
    pub fn add(&mut self, types: &TypeArena, id: TypeId, registered: bool) -> bool {
        let target = types.read(types.canonical(id)).alternate.unwrap_or(id);
        let target = types.canonical(target);
        self.keys
            .insert(((target.raw() as u64) << 1) | registered as u64)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Decoded entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, bool)> + '_ {
        self.keys
            .iter()
            .map(|key| (TypeId::new((key >> 1) as u32), key & 1 == 1))
    }

    /// Format every entry, sort caselessly and drop adjacent duplicates.
    pub fn sorted(&self, mut format: impl FnMut(TypeId, bool) -> String) -> Vec<String> {
        let mut out: Vec<String> = self.iter().map(|(id, registered)| format(id, registered)).collect();
        // Exact order breaks caseless ties so equal strings always end up adjacent.
        out.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        out.dedup();
        out
    }
}

// ============================================================================
// PER-HEADER RESULT
// ============================================================================

/// References gathered for one header during CollectReferences.
#[derive(Debug, Clone, Default)]
pub struct HeaderReferences {
    /// Types defined elsewhere that this header's code refers to
    pub cross_module: ReferenceSet,
    /// Types this header defines
    pub declaration: ReferenceSet,
    /// Forward declarations needed by generated function signatures
    pub forward_declarations: IndexSet<String>,
    /// Construction functions this header exports
    pub singletons: ReferenceSet,
    /// Types exported from this header, in declaration order
    pub export_types: Vec<TypeId>,
}

/// Name of the construction function for a type.
///
/// The unregistered form of a class reference only needs the class object,
/// not its registration.
pub fn singleton_name(types: &TypeArena, id: TypeId, registered: bool) -> String {
    let node = types.read(types.canonical(id));
    let name = &node.source_name;
    match &node.kind {
        TypeKind::Class(_) if registered => format!("Z_Construct_UClass_{name}()"),
        TypeKind::Class(_) => format!("Z_Construct_UClass_{name}_NoRegister()"),
        TypeKind::Struct(_) => format!("Z_Construct_UScriptStruct_{name}()"),
        TypeKind::Enum(_) => format!("Z_Construct_UEnum_{name}()"),
        TypeKind::Function(f) if f.kind != FunctionKind::Function => {
            format!("Z_Construct_UDelegateFunction_{}()", node.engine_name)
        }
        TypeKind::Function(_) => format!("Z_Construct_UFunction_{name}()"),
        _ => format!("{name}()"),
    }
}
