//! Default value literal parsing.
//!
//! Every sanitizer either returns the complete canonical text or `None`; no
//! partial output is ever produced.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// Parses the default value of one specific struct type.
pub type StructDefaultParser = fn(&str) -> Option<String>;

static STRUCT_DEFAULTS: LazyLock<FxHashMap<&'static str, StructDefaultParser>> = LazyLock::new(|| {
    let mut table: FxHashMap<&'static str, StructDefaultParser> = FxHashMap::default();
    table.insert("FVector", parse_vector);
    table.insert("FVector3f", parse_vector);
    table.insert("FVector3d", parse_vector);
    table.insert("FRotator", parse_rotator);
    table.insert("FVector2D", parse_vector2d);
    table.insert("FLinearColor", parse_linear_color);
    table.insert("FColor", parse_color);
    table
});

/// Literal parser registered for `struct_name`, if any.
pub fn struct_default_parser(struct_name: &str) -> Option<StructDefaultParser> {
    STRUCT_DEFAULTS.get(struct_name).copied()
}

// ============================================================================
// SCALAR LITERALS
// ============================================================================

/// Parse a C++ integer literal (decimal or hex, optional sign and suffix).
pub(crate) fn parse_integer(literal: &str) -> Option<i128> {
    let text: String = literal.chars().filter(|c| !c.is_whitespace()).collect();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(&text)),
    };
    let body = body.trim_end_matches(['u', 'U', 'l', 'L']);
    let value = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        i128::from_str_radix(hex, 16).ok()?
    } else {
        if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        body.parse::<i128>().ok()?
    };
    Some(if negative { -value } else { value })
}

/// Parse an integer literal and check it against an inclusive range.
pub(crate) fn parse_integer_in(literal: &str, min: i128, max: i128) -> Option<String> {
    let value = parse_integer(literal)?;
    (min..=max).contains(&value).then(|| value.to_string())
}

/// Parse a C++ floating point literal (`1`, `1.5`, `-2.f`, `1e3`).
///
/// Literals that overflow to infinity are rejected.
pub(crate) fn parse_float(literal: &str) -> Option<f64> {
    let text: String = literal.chars().filter(|c| !c.is_whitespace()).collect();
    let body = text.strip_suffix(['f', 'F']).unwrap_or(&text);
    let body = body.strip_suffix('.').unwrap_or(body);
    if body.is_empty()
        || !body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        || !body.chars().any(|c| c.is_ascii_digit())
    {
        return None;
    }
    body.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// `%f` formatting.
pub(crate) fn format_float(value: f64) -> String {
    format!("{value:.6}")
}

/// Contents of `"..."`, `TEXT("...")` or `L"..."`; escapes are kept verbatim.
pub(crate) fn parse_string_literal(literal: &str) -> Option<&str> {
    let literal = literal.trim();
    if let Some(inner) = strip_call(literal, "TEXT") {
        return parse_string_literal(inner);
    }
    let literal = literal.strip_prefix('L').unwrap_or(literal);
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    // An unescaped quote inside means this was more than one literal.
    let mut escaped = false;
    for c in inner.chars() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return None,
            _ => escaped = false,
        }
    }
    if escaped { None } else { Some(inner) }
}

/// Arguments of `name(...)`, or `None` if `literal` is not that call.
pub(crate) fn strip_call<'a>(literal: &'a str, name: &str) -> Option<&'a str> {
    let rest = literal.trim().strip_prefix(name)?.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.trim())
}

/// Split at top-level commas; string literals and nested parentheses stay intact.
pub(crate) fn split_args(inner: &str) -> Vec<&str> {
    let inner = inner.trim();
    if inner.is_empty() {
        return Vec::new();
    }
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        if in_string {
            match c {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => in_string = false,
                _ => escaped = false,
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(inner[start..].trim());
    args
}

fn parse_floats(args: &[&str]) -> Option<Vec<f64>> {
    args.iter().map(|a| parse_float(a)).collect()
}

fn is_force_init(inner: &str) -> bool {
    matches!(
        inner,
        "ForceInit" | "EForceInit::ForceInit" | "ForceInitToZero" | "EForceInit::ForceInitToZero"
    )
}

/// `(X=1,Y=2)` style named fields, in the given order.
fn parse_named_fields<'a>(literal: &'a str, names: &[&str]) -> Option<Vec<&'a str>> {
    let inner = literal.trim().strip_prefix('(')?.strip_suffix(')')?;
    let args = split_args(inner);
    if args.len() != names.len() {
        return None;
    }
    args.iter()
        .zip(names)
        .map(|(arg, name)| {
            let (key, value) = arg.split_once('=')?;
            (key.trim() == *name).then(|| value.trim())
        })
        .collect()
}

fn join_floats(values: &[f64]) -> String {
    values.iter().map(|v| format_float(*v)).collect::<Vec<_>>().join(",")
}

// ============================================================================
// STRUCT LITERALS
// ============================================================================

fn parse_triple(literal: &str, type_name: &str, constants: &[(&str, [f64; 3])]) -> Option<String> {
    let literal = literal.trim();
    if let Some(name) = literal
        .strip_prefix(type_name)
        .and_then(|rest| rest.strip_prefix("::"))
    {
        let (_, values) = constants.iter().find(|(n, _)| *n == name)?;
        return Some(join_floats(values));
    }
    if let Some(inner) = strip_call(literal, type_name) {
        if is_force_init(inner) {
            return Some(join_floats(&[0.0; 3]));
        }
        let values = parse_floats(&split_args(inner))?;
        return match values.as_slice() {
            [v] => Some(join_floats(&[*v; 3])),
            [_, _, _] => Some(join_floats(&values)),
            _ => None,
        };
    }
    // Canonical form: three bare components.
    let values = parse_floats(&split_args(literal))?;
    (values.len() == 3).then(|| join_floats(&values))
}

fn parse_vector(literal: &str) -> Option<String> {
    const CONSTANTS: &[(&str, [f64; 3])] = &[
        ("ZeroVector", [0.0, 0.0, 0.0]),
        ("OneVector", [1.0, 1.0, 1.0]),
        ("UpVector", [0.0, 0.0, 1.0]),
        ("ForwardVector", [1.0, 0.0, 0.0]),
        ("RightVector", [0.0, 1.0, 0.0]),
    ];
    parse_triple(literal, "FVector", CONSTANTS)
}

fn parse_rotator(literal: &str) -> Option<String> {
    const CONSTANTS: &[(&str, [f64; 3])] = &[("ZeroRotator", [0.0, 0.0, 0.0])];
    parse_triple(literal, "FRotator", CONSTANTS)
}

fn format_vector2d(x: f64, y: f64) -> String {
    format!("(X={x:3.3},Y={y:3.3})")
}

fn parse_vector2d(literal: &str) -> Option<String> {
    let literal = literal.trim();
    match literal {
        "FVector2D::ZeroVector" => return Some(format_vector2d(0.0, 0.0)),
        "FVector2D::UnitVector" => return Some(format_vector2d(1.0, 1.0)),
        _ => {}
    }
    if let Some(inner) = strip_call(literal, "FVector2D") {
        if is_force_init(inner) {
            return Some(format_vector2d(0.0, 0.0));
        }
        return match parse_floats(&split_args(inner))?.as_slice() {
            [v] => Some(format_vector2d(*v, *v)),
            [x, y] => Some(format_vector2d(*x, *y)),
            _ => None,
        };
    }
    let fields = parse_named_fields(literal, &["X", "Y"])?;
    let values = parse_floats(&fields)?;
    Some(format_vector2d(values[0], values[1]))
}

fn format_linear_color(c: [f64; 4]) -> String {
    format!(
        "(R={},G={},B={},A={})",
        format_float(c[0]),
        format_float(c[1]),
        format_float(c[2]),
        format_float(c[3])
    )
}

fn parse_linear_color(literal: &str) -> Option<String> {
    const CONSTANTS: &[(&str, [f64; 4])] = &[
        ("White", [1.0, 1.0, 1.0, 1.0]),
        ("Gray", [0.5, 0.5, 0.5, 1.0]),
        ("Black", [0.0, 0.0, 0.0, 1.0]),
        ("Transparent", [0.0, 0.0, 0.0, 0.0]),
        ("Red", [1.0, 0.0, 0.0, 1.0]),
        ("Green", [0.0, 1.0, 0.0, 1.0]),
        ("Blue", [0.0, 0.0, 1.0, 1.0]),
        ("Yellow", [1.0, 1.0, 0.0, 1.0]),
    ];
    let literal = literal.trim();
    if let Some(name) = literal.strip_prefix("FLinearColor::") {
        let (_, values) = CONSTANTS.iter().find(|(n, _)| *n == name)?;
        return Some(format_linear_color(*values));
    }
    if let Some(inner) = strip_call(literal, "FLinearColor") {
        if is_force_init(inner) {
            return Some(format_linear_color([0.0; 4]));
        }
        return match parse_floats(&split_args(inner))?.as_slice() {
            [r, g, b] => Some(format_linear_color([*r, *g, *b, 1.0])),
            [r, g, b, a] => Some(format_linear_color([*r, *g, *b, *a])),
            _ => None,
        };
    }
    let fields = parse_named_fields(literal, &["R", "G", "B", "A"])?;
    let v = parse_floats(&fields)?;
    Some(format_linear_color([v[0], v[1], v[2], v[3]]))
}

fn format_color(c: [i128; 4]) -> String {
    format!("(R={},G={},B={},A={})", c[0], c[1], c[2], c[3])
}

fn parse_color_channels(args: &[&str]) -> Option<Vec<i128>> {
    args.iter()
        .map(|a| parse_integer(a).filter(|v| (0..=255).contains(v)))
        .collect()
}

fn parse_color(literal: &str) -> Option<String> {
    const CONSTANTS: &[(&str, [i128; 4])] = &[
        ("White", [255, 255, 255, 255]),
        ("Black", [0, 0, 0, 255]),
        ("Transparent", [0, 0, 0, 0]),
        ("Red", [255, 0, 0, 255]),
        ("Green", [0, 255, 0, 255]),
        ("Blue", [0, 0, 255, 255]),
        ("Yellow", [255, 255, 0, 255]),
        ("Cyan", [0, 255, 255, 255]),
        ("Magenta", [255, 0, 255, 255]),
    ];
    let literal = literal.trim();
    if let Some(name) = literal.strip_prefix("FColor::") {
        let (_, values) = CONSTANTS.iter().find(|(n, _)| *n == name)?;
        return Some(format_color(*values));
    }
    if let Some(inner) = strip_call(literal, "FColor") {
        return match parse_color_channels(&split_args(inner))?.as_slice() {
            [r, g, b] => Some(format_color([*r, *g, *b, 255])),
            [r, g, b, a] => Some(format_color([*r, *g, *b, *a])),
            _ => None,
        };
    }
    let fields = parse_named_fields(literal, &["R", "G", "B", "A"])?;
    let v = parse_color_channels(&fields)?;
    Some(format_color([v[0], v[1], v[2], v[3]]))
}

/// Fallback for structs without a registered parser: `FName()` or `()`.
pub(crate) fn parse_empty_construction(literal: &str, struct_name: &str) -> Option<String> {
    let literal = literal.trim();
    if literal == "()" {
        return Some("()".to_string());
    }
    strip_call(literal, struct_name)
        .filter(|inner| inner.is_empty())
        .map(|_| "()".to_string())
}
