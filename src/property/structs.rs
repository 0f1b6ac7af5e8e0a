//! Struct-valued properties.

use crate::base::TypeId;
use crate::diag::codes;
use crate::types::{StructFlags, TypeArena, TypeKind};

use super::caps::PropertyCaps;
use super::defaults::{parse_empty_construction, struct_default_parser};
use super::settings::PropertyTextType;
use super::validate::ValidationContext;
use super::{Property, PropertyBehavior, PropertyKind, TypeRef, TypeRefRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructProperty {
    pub struct_ref: TypeRef,
}

impl StructProperty {
    pub fn new(struct_ref: TypeRef) -> Self {
        Self { struct_ref }
    }

    pub fn struct_id(&self) -> Option<TypeId> {
        self.struct_ref.id
    }
}

/// Whether a struct, its members or its parents hold an instanced reference.
pub(crate) fn struct_has_instanced_reference(
    types: &TypeArena,
    id: TypeId,
    visited: &mut Vec<TypeId>,
) -> bool {
    let id = types.canonical(id);
    if visited.contains(&id) {
        return false;
    }
    visited.push(id);

    // Copy out what is needed so no lock is held while recursing.
    let (flags, members, super_id) = {
        let node = types.read(id);
        let TypeKind::Struct(data) = &node.kind else {
            return false;
        };
        let members: Vec<Property> = node
            .children
            .iter()
            .filter_map(|child| types.read(*child).as_property().cloned())
            .collect();
        (data.flags, members, data.super_id)
    };

    if flags.contains(StructFlags::HAS_INSTANCED_REFERENCE) {
        return true;
    }
    if members
        .iter()
        .any(|m| m.scan_instanced_with(types, true, visited))
    {
        return true;
    }
    super_id.is_some_and(|s| struct_has_instanced_reference(types, s, visited))
}

impl PropertyBehavior for StructProperty {
    fn base_caps(&self) -> PropertyCaps {
        PropertyCaps::DEFAULT | PropertyCaps::PASS_CPP_ARGS_BY_REF | PropertyCaps::BLUEPRINT_VALUE
    }

    fn append_text(&self, out: &mut String, types: &TypeArena, _: PropertyTextType, _: bool) {
        out.push_str(&self.struct_ref.display_name(types));
    }

    fn thunk_macro(&self) -> &'static str {
        "STRUCT"
    }

    fn sanitize_default_value(&self, types: &TypeArena, literal: &str) -> Option<String> {
        let name = self.struct_ref.display_name(types);
        match struct_default_parser(&name) {
            Some(parse) => parse(literal),
            None => parse_empty_construction(literal, &name),
        }
    }

    fn is_same_type(&self, other: &PropertyKind, types: &TypeArena) -> bool {
        matches!(other, PropertyKind::Struct(o) if self.struct_ref.same_as(&o.struct_ref, types))
    }

    fn scan_for_instanced_referenced(&self, types: &TypeArena, deep: bool, visited: &mut Vec<TypeId>) -> bool {
        deep && self
            .struct_ref
            .id
            .is_some_and(|id| struct_has_instanced_reference(types, id, visited))
    }

    fn for_each_type_ref(&self, f: &mut dyn FnMut(&TypeRef, TypeRefRole)) {
        f(&self.struct_ref, TypeRefRole::Struct);
    }

    fn for_each_type_ref_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef, TypeRefRole)) {
        f(&mut self.struct_ref, TypeRefRole::Struct);
    }

    fn validate(&self, property: &Property, cx: &ValidationContext<'_>) {
        if !(cx.is_net_function() && property.category.is_parameter()) {
            return;
        }
        let Some(id) = self.struct_ref.id else {
            return;
        };
        if !cx.env.is_struct_valid_for_net(id) {
            cx.error(
                property.line,
                codes::REPLICATION,
                format!(
                    "Struct '{}' contains members that cannot be replicated and cannot be used as a replicated parameter",
                    self.struct_ref.display_name(cx.types())
                ),
            );
        }
    }
}
