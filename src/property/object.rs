//! Reference-to-object kinds.

use crate::base::{Name, TypeId};
use crate::diag::codes;
use crate::types::{ClassFlags, TypeArena};

use super::caps::PropertyCaps;
use super::flags::PropertyFlags;
use super::settings::PropertyTextType;
use super::validate::ValidationContext;
use super::{Property, PropertyBehavior, PropertyKind, TypeRef, TypeRefRole};

/// How an object is referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRefKind {
    /// `UFoo*`
    Raw,
    /// `TObjectPtr<UFoo>`
    Tracked,
    /// `TWeakObjectPtr<UFoo>`
    Weak,
    /// `TAutoWeakObjectPtr<UFoo>`
    AutoWeak,
    /// `TLazyObjectPtr<UFoo>`
    Lazy,
    /// `TSoftObjectPtr<UFoo>`
    Soft,
    /// `TSoftClassPtr<UFoo>`
    SoftClass,
    /// `UClass*` or `TSubclassOf<UFoo>`
    Class,
    /// `TScriptInterface<IFoo>`
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectProperty {
    pub kind: ObjectRefKind,
    /// Referenced class; `UClass` (or a subclass) for class references.
    pub class: TypeRef,
    /// Limiter of class references (`TSubclassOf<UFoo>` -> `UFoo`).
    pub meta_class: Option<TypeRef>,
}

impl ObjectProperty {
    pub fn new(kind: ObjectRefKind, class: TypeRef) -> Self {
        Self {
            kind,
            class,
            meta_class: None,
        }
    }

    pub fn with_meta_class(kind: ObjectRefKind, class: TypeRef, meta_class: TypeRef) -> Self {
        Self {
            kind,
            class,
            meta_class: Some(meta_class),
        }
    }

    pub fn class_id(&self) -> Option<TypeId> {
        self.class.id
    }

    fn is_class_reference(&self) -> bool {
        matches!(self.kind, ObjectRefKind::Class | ObjectRefKind::SoftClass)
    }

    fn meta_class_name(&self, types: &TypeArena) -> Name {
        self.meta_class
            .as_ref()
            .map(|m| m.display_name(types))
            .unwrap_or_else(|| Name::new_static("UObject"))
    }

    /// `UFoo` -> `IFoo` for interface references.
    fn native_interface_name(&self, types: &TypeArena) -> String {
        let name = self.class.display_name(types);
        match name.strip_prefix('U') {
            Some(rest) => format!("I{rest}"),
            None => name.to_string(),
        }
    }
}

impl PropertyBehavior for ObjectProperty {
    fn base_caps(&self) -> PropertyCaps {
        let object = PropertyCaps::DEFAULT - PropertyCaps::CAN_HAVE_CONFIG;
        match self.kind {
            ObjectRefKind::Raw | ObjectRefKind::Tracked => {
                object
                    | PropertyCaps::CAN_BE_INSTANCED
                    | PropertyCaps::REQUIRES_NULL_CONSTRUCTOR_ARG
                    | PropertyCaps::BLUEPRINT_VALUE
            }
            ObjectRefKind::Class => {
                object | PropertyCaps::REQUIRES_NULL_CONSTRUCTOR_ARG | PropertyCaps::BLUEPRINT_VALUE
            }
            ObjectRefKind::Weak | ObjectRefKind::AutoWeak => {
                object | PropertyCaps::PASS_CPP_ARGS_BY_REF | PropertyCaps::IS_MEMBER_SUPPORTED_BY_BLUEPRINT
            }
            ObjectRefKind::Lazy => object | PropertyCaps::PASS_CPP_ARGS_BY_REF,
            ObjectRefKind::Soft => {
                PropertyCaps::DEFAULT | PropertyCaps::PASS_CPP_ARGS_BY_REF | PropertyCaps::BLUEPRINT_VALUE
            }
            ObjectRefKind::SoftClass => PropertyCaps::DEFAULT | PropertyCaps::PASS_CPP_ARGS_BY_REF,
            ObjectRefKind::Interface => {
                object | PropertyCaps::PASS_CPP_ARGS_BY_REF | PropertyCaps::BLUEPRINT_VALUE
            }
        }
    }

    fn intrinsic_flags(&self) -> PropertyFlags {
        match self.kind {
            ObjectRefKind::AutoWeak => PropertyFlags::AUTO_WEAK,
            ObjectRefKind::Interface => PropertyFlags::UOBJECT_WRAPPER,
            ObjectRefKind::Class if self.meta_class.is_some() => PropertyFlags::UOBJECT_WRAPPER,
            _ => PropertyFlags::empty(),
        }
    }

    fn append_text(&self, out: &mut String, types: &TypeArena, text_type: PropertyTextType, _: bool) {
        let class = self.class.display_name(types);
        let thunk_arg = text_type == PropertyTextType::FunctionThunkParameterArgType;
        let text = match self.kind {
            ObjectRefKind::Raw if thunk_arg => class.to_string(),
            ObjectRefKind::Raw => format!("{class}*"),
            ObjectRefKind::Tracked if thunk_arg => class.to_string(),
            ObjectRefKind::Tracked
                if text_type.is_parameter()
                    || matches!(
                        text_type,
                        PropertyTextType::FunctionThunkReturn | PropertyTextType::GetterSetterArg
                    ) =>
            {
                format!("{class}*")
            }
            ObjectRefKind::Tracked => format!("TObjectPtr<{class}>"),
            ObjectRefKind::Weak => format!("TWeakObjectPtr<{class}>"),
            ObjectRefKind::AutoWeak => format!("TAutoWeakObjectPtr<{class}>"),
            ObjectRefKind::Lazy => format!("TLazyObjectPtr<{class}>"),
            ObjectRefKind::Soft => format!("TSoftObjectPtr<{class}>"),
            ObjectRefKind::SoftClass => format!("TSoftClassPtr<{}>", self.meta_class_name(types)),
            ObjectRefKind::Class if thunk_arg => class.to_string(),
            ObjectRefKind::Class => match &self.meta_class {
                Some(meta) => format!("TSubclassOf<{}>", meta.display_name(types)),
                None => format!("{class}*"),
            },
            ObjectRefKind::Interface if thunk_arg => self.native_interface_name(types),
            ObjectRefKind::Interface => {
                format!("TScriptInterface<{}>", self.native_interface_name(types))
            }
        };
        out.push_str(&text);
    }

    fn thunk_macro(&self) -> &'static str {
        match self.kind {
            ObjectRefKind::Raw | ObjectRefKind::Tracked | ObjectRefKind::Class => "OBJECT",
            ObjectRefKind::Weak | ObjectRefKind::AutoWeak => "WEAKOBJECT",
            ObjectRefKind::Lazy => "LAZYOBJECT",
            ObjectRefKind::Soft => "SOFTOBJECT",
            ObjectRefKind::SoftClass => "SOFTCLASS",
            ObjectRefKind::Interface => "TINTERFACE",
        }
    }

    fn null_constructor_arg(&self, types: &TypeArena) -> Option<String> {
        let class = self.class.display_name(types);
        Some(match self.kind {
            ObjectRefKind::Raw | ObjectRefKind::Class => "NULL".to_string(),
            ObjectRefKind::Tracked => "nullptr".to_string(),
            ObjectRefKind::Weak => format!("TWeakObjectPtr<{class}>()"),
            ObjectRefKind::AutoWeak => format!("TAutoWeakObjectPtr<{class}>()"),
            ObjectRefKind::Lazy => "FLazyObjectPtr()".to_string(),
            ObjectRefKind::Soft | ObjectRefKind::SoftClass => "FSoftObjectPtr()".to_string(),
            ObjectRefKind::Interface => {
                format!("TScriptInterface<{}>()", self.native_interface_name(types))
            }
        })
    }

    fn sanitize_default_value(&self, _: &TypeArena, literal: &str) -> Option<String> {
        matches!(literal, "NULL" | "nullptr" | "0" | "None").then(|| "None".to_string())
    }

    fn is_same_type(&self, other: &PropertyKind, types: &TypeArena) -> bool {
        let PropertyKind::Object(o) = other else {
            return false;
        };
        self.kind == o.kind
            && self.class.same_as(&o.class, types)
            && match (&self.meta_class, &o.meta_class) {
                (Some(a), Some(b)) => a.same_as(b, types),
                (None, None) => true,
                _ => false,
            }
    }

    fn scan_for_instanced_referenced(&self, types: &TypeArena, _deep: bool, _: &mut Vec<TypeId>) -> bool {
        matches!(self.kind, ObjectRefKind::Raw | ObjectRefKind::Tracked)
            && self.class.id.is_some_and(|id| {
                types
                    .read(id)
                    .class_flags()
                    .contains(ClassFlags::DEFAULT_TO_INSTANCED)
            })
    }

    fn for_each_type_ref(&self, f: &mut dyn FnMut(&TypeRef, TypeRefRole)) {
        f(&self.class, TypeRefRole::Class);
        if let Some(meta) = &self.meta_class {
            f(meta, TypeRefRole::MetaClass);
        }
    }

    fn for_each_type_ref_mut(&mut self, f: &mut dyn FnMut(&mut TypeRef, TypeRefRole)) {
        f(&mut self.class, TypeRefRole::Class);
        if let Some(meta) = &mut self.meta_class {
            f(meta, TypeRefRole::MetaClass);
        }
    }

    fn validate(&self, property: &Property, cx: &ValidationContext<'_>) {
        let types = cx.types();
        if !property.flags.contains(PropertyFlags::DEPRECATED) {
            let limiter = if self.is_class_reference() {
                self.meta_class.as_ref()
            } else {
                Some(&self.class)
            };
            if let Some(id) = limiter.and_then(|r| r.id) {
                let node = types.read(id);
                if node.class_flags().contains(ClassFlags::DEPRECATED) {
                    cx.error(
                        property.line,
                        codes::DEPRECATED_USAGE,
                        format!(
                            "Property is using a deprecated class: {}.  Property should be marked deprecated as well.",
                            node.source_name
                        ),
                    );
                }
            }
        }

        if self.kind == ObjectRefKind::Interface {
            if let Some(id) = self.class.id {
                let node = types.read(id);
                if !node.class_flags().contains(ClassFlags::INTERFACE) {
                    cx.error(
                        property.line,
                        codes::UNSUPPORTED_USAGE,
                        format!("'{}' is not an interface class", node.source_name),
                    );
                }
            }
        }
    }
}
