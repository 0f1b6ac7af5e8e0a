//! Array, set and map properties.
//!
//! A container is built from finished inner properties by [`ContainerProperty::adopt`].
//! Adoption forwards a masked subset of the container's flags into each inner,
//! moves metadata to the container and derives the container's capabilities
//! from the inners alone.

use crate::base::TypeId;
use crate::diag::codes;
use crate::types::{MetaData, TypeArena};

use super::caps::PropertyCaps;
use super::flags::PropertyFlags;
use super::settings::{PropertySettings, PropertyTextType};
use super::validate::ValidationContext;
use super::{Property, PropertyBehavior, PropertyKind, TypeRef, TypeRefRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Array,
    Set,
    Map,
}

impl ContainerKind {
    pub fn label(self) -> &'static str {
        match self {
            ContainerKind::Array => "array",
            ContainerKind::Set => "set",
            ContainerKind::Map => "map",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            ContainerKind::Array => "TArray",
            ContainerKind::Set => "TSet",
            ContainerKind::Map => "TMap",
        }
    }

    /// Flags forwarded from the container into its value.
    pub fn value_mask(self) -> PropertyFlags {
        match self {
            ContainerKind::Array => PropertyFlags::PROPAGATE_TO_ARRAY_INNER,
            ContainerKind::Set => PropertyFlags::PROPAGATE_TO_SET_ELEMENT,
            ContainerKind::Map => PropertyFlags::PROPAGATE_TO_MAP_VALUE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContainerProperty {
    pub kind: ContainerKind,
    /// Map key; `None` for arrays and sets.
    pub key: Option<Box<Property>>,
    /// Array/set element or map value.
    pub value: Box<Property>,
}

fn adopt_inner(outer: &PropertySettings, inner: Property, mask: PropertyFlags) -> Property {
    Property {
        source_name: outer.source_name.clone(),
        engine_name: outer.engine_name.clone(),
        line: outer.line,
        category: outer.category,
        flags: inner.flags | (outer.flags & mask),
        meta: MetaData::new(),
        array_dimensions: None,
        default_value: None,
        rep_notify: None,
        ..inner
    }
}

/// Container flags after looking at what the inners hold.
fn lift_instanced_flags(flags: PropertyFlags, inners: &[&Property]) -> PropertyFlags {
    let instanced = PropertyFlags::INSTANCED_REFERENCE | PropertyFlags::CONTAINS_INSTANCED_REFERENCE;
    if inners.iter().any(|inner| inner.flags.intersects(instanced)) {
        (flags | PropertyFlags::CONTAINS_INSTANCED_REFERENCE)
            - PropertyFlags::INSTANCED_REFERENCE
            - PropertyFlags::PERSISTENT_INSTANCE
    } else {
        flags
    }
}

impl ContainerProperty {
    /// Build a finished container property from its inner value(s).
    ///
    /// Pure: the same settings and inners always give bit-identical caps and flags.
    pub fn adopt(
        settings: PropertySettings,
        kind: ContainerKind,
        key: Option<Property>,
        value: Property,
    ) -> Property {
        let key = key.map(|k| {
            let mut key = adopt_inner(&settings, k, PropertyFlags::PROPAGATE_TO_MAP_KEY);
            // Keys never inherit deprecation, even when the value does.
            key.flags -= PropertyFlags::DEPRECATED;
            Box::new(key)
        });
        let value = Box::new(adopt_inner(&settings, value, kind.value_mask()));
        let container = ContainerProperty { kind, key, value };
        let mut property = Property::new(settings, PropertyKind::Container(container));
        property.refresh_container();
        property
    }

    pub fn inners(&self) -> impl Iterator<Item = &Property> {
        self.key.as_deref().into_iter().chain(std::iter::once(&*self.value))
    }

    pub fn inners_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.key
            .as_deref_mut()
            .into_iter()
            .chain(std::iter::once(&mut *self.value))
    }

    fn render_inners(&self, out: &mut String, types: &TypeArena, text_type: PropertyTextType) {
        if let Some(key) = &self.key {
            key.behavior().append_text(out, types, text_type, true);
            out.push(',');
        }
        self.value.behavior().append_text(out, types, text_type, true);
    }
}

impl Property {
    /// An array of `inner`.
    pub fn array(settings: PropertySettings, inner: Property) -> Property {
        ContainerProperty::adopt(settings, ContainerKind::Array, None, inner)
    }

    /// A set of `inner`.
    pub fn set(settings: PropertySettings, inner: Property) -> Property {
        ContainerProperty::adopt(settings, ContainerKind::Set, None, inner)
    }

    /// A map from `key` to `value`.
    pub fn map(settings: PropertySettings, key: Property, value: Property) -> Property {
        ContainerProperty::adopt(settings, ContainerKind::Map, Some(key), value)
    }

    /// Re-derive container caps and instanced flags from the current inners.
    ///
    /// Run after inner properties change during resolution; no-op for other kinds.
    pub(crate) fn refresh_container(&mut self) {
        let PropertyKind::Container(container) = &mut self.kind else {
            return;
        };
        for inner in container.inners_mut() {
            inner.refresh_container();
        }
        let inners: Vec<&Property> = container.inners().collect();
        self.flags = lift_instanced_flags(self.flags, &inners);
        self.caps = (container.base_caps() | self.caps_add) & !self.caps_remove;
    }
}

impl PropertyBehavior for ContainerProperty {
    fn base_caps(&self) -> PropertyCaps {
        let mut caps = PropertyCaps::PASS_CPP_ARGS_BY_REF;
        for cap in [
            PropertyCaps::CAN_HAVE_CONFIG,
            PropertyCaps::CAN_BE_INSTANCED,
            PropertyCaps::CAN_EXPOSE_ON_SPAWN,
        ] {
            if self.inners().all(|inner| inner.caps.contains(cap)) {
                caps |= cap;
            }
        }
        if self
            .inners()
            .all(|inner| inner.caps.contains(PropertyCaps::IS_PARAMETER_SUPPORTED_BY_BLUEPRINT))
        {
            caps |= PropertyCaps::SUPPORTED_BY_BLUEPRINT;
        }
        caps
    }

    fn append_text(
        &self,
        out: &mut String,
        types: &TypeArena,
        text_type: PropertyTextType,
        _: bool,
    ) {
        if text_type == PropertyTextType::FunctionThunkParameterArgType {
            self.render_inners(out, types, PropertyTextType::FunctionThunkParameterArrayType);
            return;
        }
        out.push_str(self.kind.template());
        out.push('<');
        self.render_inners(out, types, text_type);
        out.push('>');
    }

    fn thunk_macro(&self) -> &'static str {
        match self.kind {
            ContainerKind::Array => "TARRAY",
            ContainerKind::Set => "TSET",
            ContainerKind::Map => "TMAP",
        }
    }

    fn is_same_type(&self, other: &PropertyKind, types: &TypeArena) -> bool {
        let PropertyKind::Container(o) = other else {
            return false;
        };
        if self.kind != o.kind || !self.value.is_same_type(&o.value, types) {
            return false;
        }
        match (&self.key, &o.key) {
            (Some(a), Some(b)) => a.is_same_type(b, types),
            (None, None) => true,
            _ => false,
        }
    }

    fn scan_for_instanced_referenced(&self, types: &TypeArena, deep: bool, visited: &mut Vec<TypeId>) -> bool {
        self.inners()
            .any(|inner| inner.scan_instanced_with(types, deep, visited))
    }

    fn for_each_type_ref(&self, f: &mut dyn FnMut(&TypeRef, TypeRefRole)) {
        for inner in self.inners() {
            inner.behavior().for_each_type_ref(f);
        }
    }

    fn for_each_type_ref_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef, TypeRefRole)) {
        for inner in self.inners_mut() {
            inner.kind.behavior_mut().for_each_type_ref_mut(f);
        }
    }

    fn validate(&self, property: &Property, cx: &ValidationContext<'_>) {
        let noun = match self.kind {
            ContainerKind::Array => None,
            ContainerKind::Set => Some(("Sets", "sets")),
            ContainerKind::Map => Some(("Maps", "maps")),
        };
        if let Some((plural, lower)) = noun {
            if cx.is_net_function() && property.category.is_parameter() {
                cx.error(
                    property.line,
                    codes::REPLICATION,
                    format!("{plural} are not supported in an RPC."),
                );
            } else if property.flags.contains(PropertyFlags::NET) {
                cx.error(
                    property.line,
                    codes::REPLICATION,
                    format!("Replicated {lower} are not supported."),
                );
            }
        }
        for inner in self.inners() {
            inner.behavior().validate(inner, cx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{DelegateKind, DelegateProperty, NumericKind, NumericProperty, StringKind, StringProperty};

    fn int32() -> Property {
        Property::new(
            PropertySettings::member("Inner"),
            PropertyKind::Numeric(NumericProperty::new(NumericKind::Int32)),
        )
    }

    fn name() -> Property {
        Property::new(
            PropertySettings::member("Inner"),
            PropertyKind::String(StringProperty::new(StringKind::Name)),
        )
    }

    #[test]
    fn test_array_caps_narrowed() {
        let array = Property::array(PropertySettings::member("Values"), int32());
        assert!(!array.caps.contains(PropertyCaps::CAN_BE_CONTAINER_KEY));
        assert!(!array.caps.contains(PropertyCaps::CAN_BE_CONTAINER_VALUE));
        assert!(array.caps.contains(PropertyCaps::PASS_CPP_ARGS_BY_REF));
        assert!(array.caps.contains(PropertyCaps::IS_PARAMETER_SUPPORTED_BY_BLUEPRINT));
    }

    #[test]
    fn test_inner_takes_outer_identity() {
        let settings = PropertySettings::member("Values")
            .with_line(40)
            .with_meta("Category", "Stats")
            .with_flags(PropertyFlags::EDIT | PropertyFlags::CONFIG);
        let array = Property::array(settings, int32());
        let inner = &array.as_container().unwrap().value;
        assert_eq!(inner.source_name, "Values");
        assert_eq!(inner.line, 40);
        assert!(inner.meta.is_empty());
        assert!(inner.flags.contains(PropertyFlags::CONFIG));
        // Arrays do not forward EDIT; sets and maps do.
        assert!(!inner.flags.contains(PropertyFlags::EDIT));
        assert_eq!(array.meta.get("Category"), Some("Stats"));
    }

    #[test]
    fn test_map_key_never_deprecated() {
        let settings = PropertySettings::member("Lookup").with_flags(PropertyFlags::DEPRECATED);
        let map = Property::map(settings, name(), int32());
        let container = map.as_container().unwrap();
        assert!(container.value.flags.contains(PropertyFlags::DEPRECATED));
        assert!(!container.key.as_ref().unwrap().flags.contains(PropertyFlags::DEPRECATED));
    }

    #[test]
    fn test_instanced_inner_lifts_to_contains() {
        let delegate = Property::new(
            PropertySettings::member("Inner"),
            PropertyKind::Delegate(DelegateProperty::new(DelegateKind::Single, TypeRef::named("FOnDone"))),
        );
        let array = Property::array(
            PropertySettings::member("Handlers").with_flags(PropertyFlags::PERSISTENT_INSTANCE),
            delegate,
        );
        assert!(array.flags.contains(PropertyFlags::CONTAINS_INSTANCED_REFERENCE));
        assert!(!array.flags.contains(PropertyFlags::INSTANCED_REFERENCE));
        assert!(!array.flags.contains(PropertyFlags::PERSISTENT_INSTANCE));
    }

    #[test]
    fn test_container_text() {
        let types = TypeArena::new();
        let map = Property::map(PropertySettings::member("Lookup"), name(), int32());
        assert_eq!(map.type_text(&types, PropertyTextType::ExportMember), "TMap<FName,int32>");
        assert_eq!(
            map.type_text(&types, PropertyTextType::FunctionThunkParameterArgType),
            "FName,int32"
        );
        let set = Property::set(PropertySettings::member("Tags"), name());
        assert_eq!(set.type_text(&types, PropertyTextType::UserFacing), "TSet<FName>");
    }

    #[test]
    fn test_adopt_is_deterministic() {
        let settings = PropertySettings::member("Values").with_flags(PropertyFlags::EDIT | PropertyFlags::DEPRECATED);
        let a = Property::map(settings.clone(), name(), int32());
        let b = Property::map(settings, name(), int32());
        assert_eq!(a.caps, b.caps);
        assert_eq!(a.flags, b.flags);
        let (ca, cb) = (a.as_container().unwrap(), b.as_container().unwrap());
        assert_eq!(ca.value.flags, cb.value.flags);
        assert_eq!(ca.key.as_ref().unwrap().flags, cb.key.as_ref().unwrap().flags);
    }
}
