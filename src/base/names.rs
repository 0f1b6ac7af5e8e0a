//! Names and name derivation.

use smol_str::SmolStr;

/// Type names are shared across worker threads and cloned freely.
pub type Name = SmolStr;

/// Suffix the engine appends to delegate signature functions.
pub const DELEGATE_SIGNATURE_SUFFIX: &str = "__DelegateSignature";

/// How the engine-facing name of a declaration is derived from its source name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineNameRule {
    /// Engine name equals the source name (enums, properties, plain functions).
    Verbatim,
    /// Strip the one-letter class/struct prefix (`UObject` -> `Object`).
    StripPrefix,
    /// Strip the `F` prefix and append the delegate signature suffix.
    DelegateSignature,
}

const TYPE_PREFIXES: &[char] = &['U', 'A', 'I', 'F', 'S', 'T'];

/// Derive the engine-facing name for a declaration.
pub fn derive_engine_name(source_name: &str, rule: EngineNameRule) -> Name {
    match rule {
        EngineNameRule::Verbatim => Name::new(source_name),
        EngineNameRule::StripPrefix => Name::new(strip_type_prefix(source_name)),
        EngineNameRule::DelegateSignature => {
            let base = source_name.strip_prefix('F').unwrap_or(source_name);
            Name::new(format!("{base}{DELEGATE_SIGNATURE_SUFFIX}"))
        }
    }
}

fn strip_type_prefix(name: &str) -> &str {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if TYPE_PREFIXES.contains(&first) && second.is_ascii_uppercase() => {
            &name[first.len_utf8()..]
        }
        _ => name,
    }
}

/// Key used by caseless indices.
pub fn caseless_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

pub fn caseless_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Check that `name` is a well-formed identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}
