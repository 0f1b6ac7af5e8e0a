//! Delegate-valued properties.

use crate::base::TypeId;
use crate::types::TypeArena;

use super::caps::PropertyCaps;
use super::flags::PropertyFlags;
use super::settings::PropertyTextType;
use super::{PropertyBehavior, PropertyKind, TypeRef, TypeRefRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelegateKind {
    Single,
    MulticastInline,
    MulticastSparse,
}

impl DelegateKind {
    pub fn is_multicast(self) -> bool {
        !matches!(self, DelegateKind::Single)
    }
}

/// A property holding a delegate; `function` is the delegate's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateProperty {
    pub kind: DelegateKind,
    pub function: TypeRef,
}

impl DelegateProperty {
    pub fn new(kind: DelegateKind, function: TypeRef) -> Self {
        Self { kind, function }
    }

    pub fn function_id(&self) -> Option<TypeId> {
        self.function.id
    }
}

impl PropertyBehavior for DelegateProperty {
    fn base_caps(&self) -> PropertyCaps {
        match self.kind {
            DelegateKind::Single => {
                (PropertyCaps::DEFAULT - PropertyCaps::CAN_BE_CONTAINER_KEY)
                    | PropertyCaps::PASS_CPP_ARGS_BY_REF
                    | PropertyCaps::SUPPORTED_BY_BLUEPRINT
            }
            DelegateKind::MulticastInline | DelegateKind::MulticastSparse => {
                (PropertyCaps::DEFAULT
                    - PropertyCaps::CAN_BE_CONTAINER_KEY
                    - PropertyCaps::CAN_BE_CONTAINER_VALUE)
                    | PropertyCaps::PASS_CPP_ARGS_BY_REF
                    | PropertyCaps::CAN_BE_BLUEPRINT_ASSIGNABLE
                    | PropertyCaps::CAN_BE_BLUEPRINT_CALLABLE
                    | PropertyCaps::CAN_BE_BLUEPRINT_AUTHORITY_ONLY
                    | PropertyCaps::IS_MEMBER_SUPPORTED_BY_BLUEPRINT
            }
        }
    }

    fn intrinsic_flags(&self) -> PropertyFlags {
        PropertyFlags::INSTANCED_REFERENCE
    }

    fn append_text(&self, out: &mut String, types: &TypeArena, _: PropertyTextType, _: bool) {
        out.push_str(&self.function.display_name(types));
    }

    fn thunk_macro(&self) -> &'static str {
        match self.kind {
            DelegateKind::Single => "PROPERTY",
            DelegateKind::MulticastInline | DelegateKind::MulticastSparse => "PROPERTY_REF",
        }
    }

    fn is_same_type(&self, other: &PropertyKind, types: &TypeArena) -> bool {
        matches!(other, PropertyKind::Delegate(o) if o.kind == self.kind && self.function.same_as(&o.function, types))
    }

    fn scan_for_instanced_referenced(&self, _: &TypeArena, _: bool, _: &mut Vec<TypeId>) -> bool {
        true
    }

    fn for_each_type_ref(&self, f: &mut dyn FnMut(&TypeRef, TypeRefRole)) {
        f(&self.function, TypeRefRole::DelegateFunction);
    }

    fn for_each_type_ref_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef, TypeRefRole)) {
        f(&mut self.function, TypeRefRole::DelegateFunction);
    }
}
