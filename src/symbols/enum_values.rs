//! Enum value name lookup.

use rustc_hash::FxHashMap;

use crate::base::TypeId;
use crate::types::{EnumCppForm, EnumData};

/// Maps enum value names to the enum declaring them.
///
/// Every value is filed under its full name (`EColor::Red` for scoped enums,
/// `Red` otherwise). Scoped enums also file the short name; the first enum
/// to claim a short name keeps it.
#[derive(Debug, Default)]
pub struct EnumValueTable {
    full: FxHashMap<String, TypeId>,
    short: FxHashMap<String, TypeId>,
}

impl EnumValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_enum(&mut self, id: TypeId, enum_name: &str, data: &EnumData) {
        for value in &data.values {
            self.full.insert(data.full_value_name(enum_name, value), id);
            if data.cpp_form != EnumCppForm::Regular {
                self.short.entry(value.name.to_string()).or_insert(id);
            }
        }
    }

    /// Enum declaring `name`, full names first.
    pub fn find(&self, name: &str) -> Option<TypeId> {
        self.full.get(name).or_else(|| self.short.get(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }
}
