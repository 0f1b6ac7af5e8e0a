//! Construction requests and usage contexts for properties.

use crate::base::Name;
use crate::types::MetaData;

use super::caps::PropertyCaps;
use super::flags::PropertyFlags;

/// Where a property is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PropertyCategory {
    RegularParameter,
    ReplicatedParameter,
    Return,
    #[default]
    Member,
}

impl PropertyCategory {
    /// Description used in messages.
    pub fn hint_text(self) -> &'static str {
        match self {
            PropertyCategory::RegularParameter | PropertyCategory::ReplicatedParameter => {
                "Function parameter"
            }
            PropertyCategory::Return => "Function return type",
            PropertyCategory::Member => "Member variable declaration",
        }
    }

    pub fn is_parameter(self) -> bool {
        matches!(
            self,
            PropertyCategory::RegularParameter | PropertyCategory::ReplicatedParameter
        )
    }
}

/// Usage context a property is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyTextType {
    /// Shown to users in messages
    UserFacing,
    /// Sparse delegate declaration
    Sparse,
    SparseShort,
    /// Parameter of a native class function
    ClassFunction,
    /// Parameter of a script event
    EventFunction,
    /// Parameter of an interface function
    InterfaceFunction,
    /// Member of a generated struct or class
    ExportMember,
    /// Member of the generated parameter struct for an event
    EventParameterMember,
    EventParameterFunctionMember,
    /// Value in a construction expression
    Construction,
    /// Element type of a static array thunk parameter
    FunctionThunkParameterArrayType,
    /// Type argument of a `P_GET_*` thunk macro
    FunctionThunkParameterArgType,
    /// Declared return type in a thunk
    FunctionThunkReturn,
    /// Argument of a generated getter/setter
    GetterSetterArg,
}

impl PropertyTextType {
    /// Rendered as part of a function signature.
    pub fn is_parameter(self) -> bool {
        matches!(
            self,
            PropertyTextType::ClassFunction
                | PropertyTextType::EventFunction
                | PropertyTextType::InterfaceFunction
        )
    }
}

/// A construction request for one declared property.
///
/// Produced by the declaration front end and consumed by the property
/// constructors; containers receive the request together with their already
/// constructed inner properties.
#[derive(Debug, Clone, Default)]
pub struct PropertySettings {
    pub source_name: Name,
    pub engine_name: Name,
    pub line: u32,
    pub category: PropertyCategory,
    pub flags: PropertyFlags,
    /// Flags the declaration context forbids; stripped after construction.
    pub disallow_flags: PropertyFlags,
    pub meta: MetaData,
    /// Capability overrides applied on top of the kind's own capabilities.
    pub caps_add: PropertyCaps,
    pub caps_remove: PropertyCaps,
    /// Static array dimension expression, e.g. `4` or `(int32)EWeapon::Max`.
    pub array_dimensions: Option<String>,
    /// Default value literal as written in source.
    pub default_value: Option<String>,
    pub rep_notify: Option<Name>,
    /// Declared as a `: 1` bitfield.
    pub is_bitfield: bool,
}

impl PropertySettings {
    pub fn new(name: impl Into<Name>, category: PropertyCategory) -> Self {
        let name = name.into();
        let flags = match category {
            PropertyCategory::Member => PropertyFlags::empty(),
            PropertyCategory::Return => PropertyFlags::PARM | PropertyFlags::OUT_PARM | PropertyFlags::RETURN_PARM,
            _ => PropertyFlags::PARM,
        };
        Self {
            engine_name: name.clone(),
            source_name: name,
            category,
            flags,
            ..Self::default()
        }
    }

    pub fn member(name: impl Into<Name>) -> Self {
        Self::new(name, PropertyCategory::Member)
    }

    pub fn parameter(name: impl Into<Name>) -> Self {
        Self::new(name, PropertyCategory::RegularParameter)
    }

    pub fn return_value() -> Self {
        Self::new("ReturnValue", PropertyCategory::Return)
    }

    pub fn with_flags(mut self, flags: PropertyFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_meta(mut self, key: impl Into<Name>, value: impl Into<String>) -> Self {
        self.meta.insert(key, value);
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn with_array_dimensions(mut self, dims: impl Into<String>) -> Self {
        self.array_dimensions = Some(dims.into());
        self
    }

    pub fn with_default_value(mut self, literal: impl Into<String>) -> Self {
        self.default_value = Some(literal.into());
        self
    }

    pub fn with_caps(mut self, add: PropertyCaps, remove: PropertyCaps) -> Self {
        self.caps_add |= add;
        self.caps_remove |= remove;
        self
    }

    pub fn with_category(mut self, category: PropertyCategory) -> Self {
        self.category = category;
        self
    }

    pub fn bitfield(mut self) -> Self {
        self.is_bitfield = true;
        self
    }
}
