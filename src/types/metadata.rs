//! Ordered key/value metadata attached to declarations.

use indexmap::IndexMap;

use crate::base::Name;

/// Well-known metadata keys.
pub mod keys {
    pub const BLUEPRINT_TYPE: &str = "BlueprintType";
    pub const NOT_BLUEPRINT_TYPE: &str = "NotBlueprintType";
    pub const CATEGORY: &str = "Category";
    pub const EDIT_INLINE: &str = "EditInline";
    pub const EXPOSE_ON_SPAWN: &str = "ExposeOnSpawn";
    pub const ARRAY_SIZE_ENUM: &str = "ArraySizeEnum";
    pub const DEPRECATED_PROPERTY: &str = "DeprecatedProperty";
    pub const ALLOW_PRIVATE_ACCESS: &str = "AllowPrivateAccess";
}

/// Insertion-ordered metadata map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaData {
    entries: IndexMap<Name, String>,
}

impl MetaData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<Name>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<Name>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// `true` unless the value is present and equals "false" (caseless).
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.eq_ignore_ascii_case("false"))
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Move every entry out, leaving this map empty.
    pub fn take(&mut self) -> MetaData {
        std::mem::take(self)
    }
}
