//! Final phase: placeholder replacement and last propagation pass.

use crate::diag::{ContextFrame, MessageKind, ResolveResult, codes, push_context};
use crate::property::{PropertyFlags, PropertyTextType, parse_integer, struct_has_instanced_reference};
use crate::symbols::FindOptions;
use crate::types::{HeaderFile, PlaceholderKind, StructFlags, TypeKind, metadata::keys};

use super::properties::rederive_after_replacement;
use super::session::Session;

/// Swap every placeholder declared in `header` for its definition.
///
/// Runs as its own barrier step so no header finalizes through a stale slot.
pub(super) fn replace_placeholders(session: &Session, header: &HeaderFile) -> ResolveResult<()> {
    for &(id, _) in session.placeholders.iter().filter(|(_, h)| *h == header.id) {
        let (name, expected) = {
            let node = session.types.read(id);
            match &node.kind {
                TypeKind::Placeholder(data) => (node.source_name.clone(), data.expected),
                _ => continue,
            }
        };
        let kind = match expected {
            PlaceholderKind::Class => FindOptions::CLASS,
            PlaceholderKind::Struct => FindOptions::SCRIPT_STRUCT,
            PlaceholderKind::Enum => FindOptions::ENUM,
        };
        let Some(definition) = session
            .source_symbols
            .find_definition(&session.types, &name, kind)
        else {
            session.post(
                header.id,
                MessageKind::Error,
                0,
                Some(codes::UNRESOLVED_TYPE),
                format!("'{name}' was declared but never defined"),
            );
            continue;
        };
        session.types.replace(id, definition);
        session.source_symbols.replace(id, definition);
        session.engine_symbols.replace(id, definition);
        tracing::trace!("[FINAL] {name}: placeholder {id:?} -> {definition:?}");
    }
    Ok(())
}

pub(super) fn finalize_header(session: &Session, header: &HeaderFile) -> ResolveResult<()> {
    let types = &session.types;
    for id in session.header_types(header) {
        let is_struct = matches!(types.read(id).kind, TypeKind::Struct(_));
        if is_struct {
            let mut visited = Vec::new();
            if struct_has_instanced_reference(types, id, &mut visited) {
                if let TypeKind::Struct(data) = &mut types.write(id).kind {
                    data.flags |= StructFlags::HAS_INSTANCED_REFERENCE;
                }
            }
            continue;
        }

        let Some(mut property) = types.read(id).as_property().cloned() else {
            continue;
        };
        let _frame = push_context(ContextFrame::Type {
            kind: "property",
            name: property.source_name.clone(),
        });

        rederive_after_replacement(types, &mut property);
        let instanced = PropertyFlags::INSTANCED_REFERENCE | PropertyFlags::CONTAINS_INSTANCED_REFERENCE;
        if !property.flags.intersects(instanced) && property.scan_for_instanced_referenced(types, true) {
            property.flags |= PropertyFlags::CONTAINS_INSTANCED_REFERENCE;
        }
        property.refresh_container();

        if let Some(dims) = property.array_dimensions.take() {
            let dims = strip_dimension(&dims).to_string();
            if parse_integer(&dims).is_none() {
                match session.enum_values.find(&dims) {
                    Some(enum_id) => property
                        .meta
                        .insert(keys::ARRAY_SIZE_ENUM, types.source_name(enum_id).to_string()),
                    None => tracing::trace!("[FINAL] array dimension '{dims}' is not an enum value"),
                }
            }
            property.array_dimensions = Some(dims);
        }

        if let Some(literal) = property.default_value.take() {
            match property.sanitize_default_value(types, &literal) {
                Some(canonical) => property.default_value = Some(canonical),
                None => session.post(
                    header.id,
                    MessageKind::Error,
                    property.line,
                    Some(codes::DEFAULT_VALUE),
                    format!(
                        "Unable to parse default value '{literal}' for '{}' of type '{}'",
                        property.source_name,
                        property.type_text(types, PropertyTextType::UserFacing)
                    ),
                ),
            }
        }

        if let TypeKind::Property(slot) = &mut types.write(id).kind {
            *slot = property;
        }
    }
    Ok(())
}

/// `(int32)(EFoo::Max)` -> `EFoo::Max`.
fn strip_dimension(mut dims: &str) -> &str {
    loop {
        let trimmed = dims.trim();
        let next = if let Some(inner) = trimmed.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            if balanced(inner) { inner } else { strip_c_cast(trimmed) }
        } else if let Some(rest) = trimmed.strip_prefix("static_cast<") {
            rest.split_once(">(")
                .and_then(|(_, arg)| arg.strip_suffix(')'))
                .unwrap_or(trimmed)
        } else {
            strip_c_cast(trimmed)
        };
        if next.len() == dims.len() {
            return trimmed;
        }
        dims = next;
    }
}

/// `(int32)X` -> `X`.
fn strip_c_cast(text: &str) -> &str {
    text.strip_prefix('(')
        .and_then(|rest| rest.split_once(')'))
        .filter(|(cast, rest)| {
            rest.trim_start()
                .starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '(')
                && !cast.is_empty()
                && cast.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && parse_integer(cast).is_none()
        })
        .map_or(text, |(_, rest)| rest)
}

fn balanced(text: &str) -> bool {
    let mut depth = 0i32;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}
