//! Declaration requests accepted by the session builder.

use crate::base::Name;
use crate::types::{ClassFlags, EnumCppForm, EnumValue, FunctionFlags, FunctionKind, MetaData, StructFlags};

#[derive(Debug, Clone, Default)]
pub struct EnumDecl {
    pub name: Name,
    pub line: u32,
    pub cpp_form: EnumCppForm,
    /// Backing integer keyword as written (`uint8`).
    pub underlying: Option<Name>,
    pub values: Vec<EnumValue>,
    pub meta: MetaData,
}

impl EnumDecl {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// `enum class Name : underlying`
    pub fn enum_class(mut self, underlying: impl Into<Name>) -> Self {
        self.cpp_form = EnumCppForm::EnumClass;
        self.underlying = Some(underlying.into());
        self
    }

    pub fn with_form(mut self, cpp_form: EnumCppForm) -> Self {
        self.cpp_form = cpp_form;
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    /// Add a value numbered after the previous one.
    pub fn value(mut self, name: impl Into<Name>) -> Self {
        let value = self.values.last().map_or(0, |v| v.value + 1);
        self.values.push(EnumValue {
            name: name.into(),
            value,
            hidden: false,
        });
        self
    }

    /// Add a value excluded from lookups of default values (`UMETA(Hidden)`).
    pub fn hidden_value(mut self, name: impl Into<Name>) -> Self {
        self = self.value(name);
        if let Some(last) = self.values.last_mut() {
            last.hidden = true;
        }
        self
    }

    pub fn with_meta(mut self, key: impl Into<Name>, value: impl Into<String>) -> Self {
        self.meta.insert(key, value);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassDecl {
    pub name: Name,
    pub line: u32,
    pub super_name: Option<Name>,
    pub flags: ClassFlags,
    pub meta: MetaData,
}

impl ClassDecl {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn derives(mut self, super_name: impl Into<Name>) -> Self {
        self.super_name = Some(super_name.into());
        self
    }

    pub fn with_flags(mut self, flags: ClassFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn with_meta(mut self, key: impl Into<Name>, value: impl Into<String>) -> Self {
        self.meta.insert(key, value);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct StructDecl {
    pub name: Name,
    pub line: u32,
    pub super_name: Option<Name>,
    pub flags: StructFlags,
    pub meta: MetaData,
}

impl StructDecl {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn derives(mut self, super_name: impl Into<Name>) -> Self {
        self.super_name = Some(super_name.into());
        self
    }

    pub fn with_flags(mut self, flags: StructFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn with_meta(mut self, key: impl Into<Name>, value: impl Into<String>) -> Self {
        self.meta.insert(key, value);
        self
    }
}

/// A function or delegate signature.
#[derive(Debug, Clone, Default)]
pub struct FunctionDecl {
    pub name: Name,
    pub line: u32,
    pub kind: FunctionKind,
    pub flags: FunctionFlags,
    pub meta: MetaData,
}

impl FunctionDecl {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Single-cast delegate signature.
    pub fn delegate(name: impl Into<Name>) -> Self {
        Self {
            kind: FunctionKind::Delegate,
            flags: FunctionFlags::DELEGATE,
            ..Self::new(name)
        }
    }

    /// Multicast delegate signature with inline storage.
    pub fn multicast_delegate(name: impl Into<Name>) -> Self {
        Self {
            kind: FunctionKind::Delegate,
            flags: FunctionFlags::DELEGATE | FunctionFlags::MULTICAST_DELEGATE,
            ..Self::new(name)
        }
    }

    /// Multicast delegate signature stored sparsely on its owner.
    pub fn sparse_delegate(name: impl Into<Name>) -> Self {
        Self {
            kind: FunctionKind::SparseDelegate,
            flags: FunctionFlags::DELEGATE | FunctionFlags::MULTICAST_DELEGATE,
            ..Self::new(name)
        }
    }

    pub fn with_flags(mut self, flags: FunctionFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn with_meta(mut self, key: impl Into<Name>, value: impl Into<String>) -> Self {
        self.meta.insert(key, value);
        self
    }
}
