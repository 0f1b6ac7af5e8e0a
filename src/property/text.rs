//! Declarations and function-thunk snippets assembled from property text.

use std::fmt::Write;

use crate::types::{ClassFlags, TypeArena};

use super::caps::PropertyCaps;
use super::flags::PropertyFlags;
use super::object::ObjectRefKind;
use super::settings::PropertyTextType;
use super::{Property, PropertyKind};

impl Property {
    fn is_on_const_class(&self, types: &TypeArena) -> bool {
        let PropertyKind::Object(object) = &self.kind else {
            return false;
        };
        object
            .class_id()
            .is_some_and(|id| types.read(id).class_flags().contains(ClassFlags::CONST))
    }

    /// Append `[const ]Type[ const][&] Name[[Dim]]` for the given context.
    ///
    /// Parameters whose kind passes by reference render as `const Type& Name`
    /// unless they are out or return parameters.
    pub fn append_full_decl(
        &self,
        out: &mut String,
        types: &TypeArena,
        text_type: PropertyTextType,
        skip_parameter_name: bool,
    ) {
        let is_parameter = text_type.is_parameter();
        let is_interface = matches!(&self.kind, PropertyKind::Object(o) if o.kind == ObjectRefKind::Interface);
        let is_out = self.flags.contains(PropertyFlags::OUT_PARM);
        let passes_by_ref = is_parameter
            && !is_out
            && !self.flags.contains(PropertyFlags::RETURN_PARM)
            && self.caps.contains(PropertyCaps::PASS_CPP_ARGS_BY_REF);

        let is_const_param = is_parameter
            && (self.flags.contains(PropertyFlags::CONST_PARM) || (is_interface && !is_out) || passes_by_ref);
        let should_have_ref = is_parameter
            && (self.flags.intersects(PropertyFlags::OUT_PARM | PropertyFlags::REFERENCE_PARM) || passes_by_ref);
        let const_at_beginning =
            self.is_on_const_class(types) || (is_const_param && (!should_have_ref || passes_by_ref));

        if const_at_beginning {
            out.push_str("const ");
        }
        self.append_text(out, types, text_type);
        if !const_at_beginning && is_const_param {
            out.push_str(" const");
        }
        if should_have_ref {
            out.push('&');
        }
        if !skip_parameter_name {
            out.push(' ');
            out.push_str(&self.source_name);
        }
        if let Some(dims) = &self.array_dimensions {
            let _ = write!(out, "[{dims}]");
        }
    }

    pub fn full_decl(&self, types: &TypeArena, text_type: PropertyTextType) -> String {
        let mut out = String::new();
        self.append_full_decl(&mut out, types, text_type, false);
        out
    }

    /// Local variable name used for this parameter inside a function thunk.
    pub fn thunk_parameter_name(&self) -> String {
        if self.flags.contains(PropertyFlags::OUT_PARM) {
            format!("Z_Param_Out_{}", self.engine_name)
        } else {
            format!("Z_Param_{}", self.engine_name)
        }
    }

    /// Append the `P_GET_*` line fetching this parameter in a function thunk.
    pub fn append_function_thunk_parameter_get(&self, out: &mut String, types: &TypeArena) {
        let name = self.thunk_parameter_name();
        let by_ref = self.flags.contains(PropertyFlags::OUT_PARM);

        if self.is_static_array() {
            let element = self.type_text(types, PropertyTextType::FunctionThunkParameterArrayType);
            let suffix = if by_ref { "_REF" } else { "" };
            let _ = write!(out, "P_GET_ARRAY{suffix}({element},{name})");
            return;
        }

        let suffix = match (by_ref, &self.kind) {
            (false, _) => "",
            // Object references are fetched by pointer-to-reference.
            (true, PropertyKind::Object(o)) if matches!(o.kind, ObjectRefKind::Raw | ObjectRefKind::Tracked) => {
                "_REF_NO_PTR"
            }
            (true, _) => "_REF",
        };
        let macro_stem = self.behavior().thunk_macro();
        let arg = self.type_text(types, PropertyTextType::FunctionThunkParameterArgType);
        if arg.is_empty() {
            let _ = write!(out, "P_GET_{macro_stem}{suffix}({name})");
        } else {
            let _ = write!(out, "P_GET_{macro_stem}{suffix}({arg},{name})");
        }
    }
}
