//! Validation of declared properties.
//!
//! [`validate_property`] runs the rules shared by every kind and then the
//! kind's own [`PropertyBehavior::validate`] hook. Findings are posted through
//! a [`ValidationEnv`], which knows the header being validated.

use crate::base::{Name, TypeId, caseless_eq};
use crate::config::SessionConfig;
use crate::diag::codes;
use crate::types::{FunctionFlags, TypeArena, metadata::keys};

use super::caps::PropertyCaps;
use super::flags::PropertyFlags;
use super::settings::{PropertyCategory, PropertyTextType};
use super::{Property, PropertyKind};

/// Services a validation pass needs from its surroundings.
pub trait ValidationEnv: Sync {
    fn types(&self) -> &TypeArena;

    fn config(&self) -> &SessionConfig;

    /// Whether the header being validated belongs to an engine package.
    fn is_engine_package(&self) -> bool;

    fn error(&self, line: u32, code: &'static str, message: String);

    fn warning(&self, line: u32, code: &'static str, message: String);

    /// Whether every member of the struct (and its parents) can be replicated.
    fn is_struct_valid_for_net(&self, id: TypeId) -> bool;
}

/// Declaration that owns the property being validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyOwner {
    Class { name: Name },
    ScriptStruct { name: Name },
    Function { name: Name, flags: FunctionFlags },
}

impl PropertyOwner {
    pub fn name(&self) -> &Name {
        match self {
            PropertyOwner::Class { name }
            | PropertyOwner::ScriptStruct { name }
            | PropertyOwner::Function { name, .. } => name,
        }
    }

    fn function_flags(&self) -> FunctionFlags {
        match self {
            PropertyOwner::Function { flags, .. } => *flags,
            _ => FunctionFlags::empty(),
        }
    }
}

pub struct ValidationContext<'a> {
    pub env: &'a dyn ValidationEnv,
    pub owner: PropertyOwner,
}

impl<'a> ValidationContext<'a> {
    pub fn new(env: &'a dyn ValidationEnv, owner: PropertyOwner) -> Self {
        Self { env, owner }
    }

    pub fn types(&self) -> &TypeArena {
        self.env.types()
    }

    pub fn error(&self, line: u32, code: &'static str, message: impl Into<String>) {
        self.env.error(line, code, message.into());
    }

    pub fn warning(&self, line: u32, code: &'static str, message: impl Into<String>) {
        self.env.warning(line, code, message.into());
    }

    pub fn is_net_function(&self) -> bool {
        self.owner.function_flags().contains(FunctionFlags::NET)
    }

    pub fn is_service_request(&self) -> bool {
        self.owner.function_flags().contains(FunctionFlags::NET_REQUEST)
    }

    pub fn is_blueprint_function(&self) -> bool {
        self.owner
            .function_flags()
            .intersects(FunctionFlags::BLUEPRINT_CALLABLE | FunctionFlags::BLUEPRINT_EVENT)
    }

    fn is_class_member(&self, property: &Property) -> bool {
        property.category == PropertyCategory::Member && matches!(self.owner, PropertyOwner::Class { .. })
    }
}

/// Whether blueprints can use `property` as a member (`member`) or as a parameter.
pub fn is_supported_by_blueprint(property: &Property, types: &TypeArena, member: bool) -> bool {
    let required = if member {
        PropertyCaps::IS_MEMBER_SUPPORTED_BY_BLUEPRINT
    } else {
        PropertyCaps::IS_PARAMETER_SUPPORTED_BY_BLUEPRINT
    };
    if !property.caps.contains(required) {
        return false;
    }
    match &property.kind {
        PropertyKind::Struct(s) => s.struct_id().is_some_and(|id| is_blueprint_struct(types, id)),
        PropertyKind::Container(c) => c.inners().all(|inner| is_supported_by_blueprint(inner, types, false)),
        _ => true,
    }
}

/// Walk the super chain for `BlueprintType` / `NotBlueprintType` metadata.
fn is_blueprint_struct(types: &TypeArena, id: TypeId) -> bool {
    let mut current = Some(types.canonical(id));
    let mut depth = 0;
    while let Some(id) = current {
        let node = types.read(id);
        if node.meta.contains(keys::NOT_BLUEPRINT_TYPE) {
            return false;
        }
        if node.meta.get_bool(keys::BLUEPRINT_TYPE) {
            return true;
        }
        current = node.super_id().map(|s| types.canonical(s));
        depth += 1;
        if depth > types.len() {
            return false;
        }
    }
    false
}

const EXPOSED_FLAGS: PropertyFlags = PropertyFlags::EDIT
    .union(PropertyFlags::BLUEPRINT_VISIBLE)
    .union(PropertyFlags::BLUEPRINT_ASSIGNABLE)
    .union(PropertyFlags::BLUEPRINT_CALLABLE);

/// Run every generic rule and then the kind-specific hook.
pub fn validate_property(property: &Property, cx: &ValidationContext<'_>) {
    let line = property.line;
    let types = cx.types();

    if property.is_static_array() {
        match property.category {
            PropertyCategory::Return => {
                cx.error(line, codes::INVALID_DECLARATION, "Arrays aren't allowed as return types");
            }
            PropertyCategory::RegularParameter | PropertyCategory::ReplicatedParameter => {
                cx.error(line, codes::INVALID_DECLARATION, "Arrays aren't allowed as function parameters");
            }
            PropertyCategory::Member => {}
        }
        if property.is_container() {
            cx.error(line, codes::INVALID_DECLARATION, "Static arrays of containers are not allowed");
        }
        if matches!(property.kind, PropertyKind::Bool(_)) {
            cx.error(line, codes::INVALID_DECLARATION, "Bool arrays are not allowed");
        }
    }

    if property.flags.contains(PropertyFlags::PERSISTENT_INSTANCE)
        && !property.caps.contains(PropertyCaps::CAN_BE_INSTANCED)
    {
        cx.error(
            line,
            codes::UNSUPPORTED_USAGE,
            "'Instanced' is only allowed on an object property, an array of objects, a set of objects, or a map with an object value type.",
        );
    }

    if property.flags.contains(PropertyFlags::CONFIG) && !property.caps.contains(PropertyCaps::CAN_HAVE_CONFIG) {
        cx.error(line, codes::UNSUPPORTED_USAGE, "Not allowed to use 'config' with object variables");
    }

    for (flag, cap, specifier) in [
        (
            PropertyFlags::BLUEPRINT_ASSIGNABLE,
            PropertyCaps::CAN_BE_BLUEPRINT_ASSIGNABLE,
            "BlueprintAssignable",
        ),
        (
            PropertyFlags::BLUEPRINT_CALLABLE,
            PropertyCaps::CAN_BE_BLUEPRINT_CALLABLE,
            "BlueprintCallable",
        ),
        (
            PropertyFlags::BLUEPRINT_AUTHORITY_ONLY,
            PropertyCaps::CAN_BE_BLUEPRINT_AUTHORITY_ONLY,
            "BlueprintAuthorityOnly",
        ),
    ] {
        if property.flags.contains(flag) && !property.caps.contains(cap) {
            cx.error(
                line,
                codes::UNSUPPORTED_USAGE,
                format!("'{specifier}' is only allowed on multicast delegate properties"),
            );
        }
    }

    let duplicate_transient = PropertyFlags::DUPLICATE_TRANSIENT | PropertyFlags::NON_PIE_DUPLICATE_TRANSIENT;
    if (property.category.is_parameter() && property.flags.intersects(PropertyFlags::TRANSIENT_FLAGS))
        || (!cx.is_class_member(property) && property.flags.intersects(duplicate_transient))
    {
        cx.error(line, codes::UNSUPPORTED_USAGE, "Transient flags are only allowed on class members");
    }

    if property.category.is_parameter() {
        validate_parameter(property, cx);
    } else if property.category == PropertyCategory::Member {
        validate_member(property, cx);
    }

    if cx.is_blueprint_function()
        && property.category != PropertyCategory::Member
        && !matches!(property.kind, PropertyKind::Void(_))
        && !is_supported_by_blueprint(property, types, false)
    {
        cx.error(
            line,
            codes::BLUEPRINT,
            format!(
                "Type '{}' is not supported by blueprint. Function: {} Parameter {}",
                property.type_text(types, PropertyTextType::UserFacing),
                cx.owner.name(),
                property.source_name
            ),
        );
    }

    property.behavior().validate(property, cx);
}

fn validate_parameter(property: &Property, cx: &ValidationContext<'_>) {
    let line = property.line;
    let flags = property.flags;

    if cx.is_net_function() {
        if flags.contains(PropertyFlags::OUT_PARM) && !cx.is_service_request() {
            cx.error(line, codes::REPLICATION, "Replicated functions cannot contain out parameters");
        } else if flags.contains(PropertyFlags::REFERENCE_PARM) && !flags.contains(PropertyFlags::CONST_PARM) {
            cx.error(
                line,
                codes::REPLICATION,
                "Replicated parameters cannot be passed by non-const reference",
            );
        }
        if flags.contains(PropertyFlags::REP_SKIP) && !cx.is_service_request() {
            cx.error(
                line,
                codes::REPLICATION,
                "Only service request functions can contain NotReplicated parameters",
            );
        }
    }

    if cx.is_blueprint_function() && caseless_eq(&property.source_name, "self") {
        cx.error(
            line,
            codes::INVALID_DECLARATION,
            "Parameter name 'self' is reserved and may not be used in a BlueprintCallable or BlueprintEvent function",
        );
    }
}

fn validate_member(property: &Property, cx: &ValidationContext<'_>) {
    let line = property.line;
    let flags = property.flags;
    let types = cx.types();
    let exposed = flags.intersects(EXPOSED_FLAGS);

    if property.meta.contains(keys::CATEGORY) {
        if !exposed {
            cx.warning(
                line,
                codes::INEFFECTIVE_METADATA,
                "Property has a Category set but is not exposed to the editor or Blueprints with EditAnywhere, BlueprintReadWrite, VisibleAnywhere, BlueprintReadOnly, BlueprintAssignable, BlueprintCallable keywords.",
            );
        }
    } else if exposed && cx.env.is_engine_package() {
        cx.error(
            line,
            codes::INVALID_DECLARATION,
            "An explicit Category specifier is required for any property exposed to the editor or Blueprints in an Engine module.",
        );
    }

    if flags.intersects(PropertyFlags::DISABLE_EDIT_ON_INSTANCE | PropertyFlags::DISABLE_EDIT_ON_TEMPLATE)
        && !flags.contains(PropertyFlags::EDIT)
    {
        cx.error(
            line,
            codes::INVALID_DECLARATION,
            "Property cannot have 'DisableEditOnInstance' or 'DisableEditOnTemplate' without being editable",
        );
    }

    if (flags.contains(PropertyFlags::EXPOSE_ON_SPAWN) || property.meta.contains(keys::EXPOSE_ON_SPAWN))
        && !property.caps.contains(PropertyCaps::CAN_EXPOSE_ON_SPAWN)
    {
        cx.error(line, codes::UNSUPPORTED_USAGE, "ExposeOnSpawn - Property cannot be exposed");
    }

    if flags.contains(PropertyFlags::BLUEPRINT_VISIBLE) && !is_supported_by_blueprint(property, types, true) {
        cx.error(
            line,
            codes::BLUEPRINT,
            format!(
                "Type '{}' is not supported by blueprint. Property: {}",
                property.type_text(types, PropertyTextType::UserFacing),
                property.source_name
            ),
        );
    }
}
