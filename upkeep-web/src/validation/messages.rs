//! Human messages for validation and decode failures

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::Violation;

pub const REQUIRED: &str = "This field is required";

fn param(error: &ValidationError, name: &str) -> Option<String> {
    error.params.get(name).map(|v| match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Message for one rule failure, keyed on the rule code
///
/// A message attached by the rule itself wins over the table.
pub fn message_for(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    match error.code.as_ref() {
        "required" => REQUIRED.to_string(),
        "email" => "Invalid email format".to_string(),
        "numericstring" => "Should be a numeric string".to_string(),
        "length" | "range" | "min" | "max" => bound_message(error),
        "ascii" => "Should contain only ASCII characters".to_string(),
        "gt" => comparison(error, "gt", "0", "Should be a positive number", "Should be greater than"),
        "gte" => comparison(
            error,
            "gte",
            "1",
            "Should be a positive number or zero",
            "Should be greater than or equal to",
        ),
        "lt" => comparison(error, "lt", "0", "Should be a negative number", "Should be less than"),
        "lte" => comparison(
            error,
            "lte",
            "-1",
            "Should be a negative number or zero",
            "Should be less than or equal to",
        ),
        code => format!("Failed validation: {}", code),
    }
}

/// `special` when the bound equals `pivot`, otherwise `"{phrase} {bound}"`
fn comparison(
    error: &ValidationError,
    name: &str,
    pivot: &str,
    special: &str,
    phrase: &str,
) -> String {
    match param(error, name) {
        Some(bound) if bound == pivot => special.to_string(),
        Some(bound) => format!("{} {}", phrase, bound),
        None => format!("Failed validation: {}", error.code),
    }
}

fn bound_message(error: &ValidationError) -> String {
    let min = param(error, "min");
    let max = param(error, "max");

    match (min, max) {
        (Some(min), None) => format!("Should be at least {}", min),
        (None, Some(max)) => format!("Should be at most {}", max),
        (Some(min), Some(max)) => format!("Should be between {} and {}", min, max),
        (None, None) => format!("Failed validation: {}", error.code),
    }
}

/// Flattens `validator` output into named violations
///
/// Nested structs are named `parent.field` and list items `field[i]`. Only
/// the first failure of each field is reported, and fields come out in name
/// order so responses are stable.
pub fn collect_violations(errors: &ValidationErrors) -> Vec<Violation> {
    let mut out = Vec::new();
    flatten(errors, "", &mut out);
    out
}

fn flatten(errors: &ValidationErrors, prefix: &str, out: &mut Vec<Violation>) {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in entries {
        let name = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    out.push(Violation::new(name, message_for(first)));
                }
            }
            ValidationErrorsKind::Struct(nested) => flatten(nested, &name, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten(nested, &format!("{}[{}]", name, index), out);
                }
            }
        }
    }
}

/// `Expected type <T>` or `Expected type <T>, but got <V>`
pub fn expected_type_message(expected: &str, got: Option<&str>) -> String {
    match got {
        Some(got) => format!("Expected type <{}>, but got <{}>", expected, got),
        None => format!("Expected type <{}>", expected),
    }
}

/// Normalizes a Rust type or serde "expected" phrase into a plain type name
pub fn type_name(expected: &str) -> String {
    let expected = expected.trim();
    let expected = expected
        .strip_prefix("a ")
        .or_else(|| expected.strip_prefix("an "))
        .unwrap_or(expected);

    match expected {
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "integer" => "integer",
        "u8" | "u16" | "u32" | "u64" | "u128" | "usize" => "unsigned integer",
        "f32" | "f64" | "floating point" => "float",
        "bool" | "boolean" => "boolean",
        "str" | "string" | "alloc::string::String" | "char" => "string",
        "map" => "object",
        "sequence" => "array",
        other if other.starts_with("struct ") => "object",
        other if other.contains("::") => other.rsplit("::").next().unwrap_or(other),
        other => other,
    }
    .to_string()
}

/// Describes the "unexpected" half of a serde error (`string "abc"` -> `string`)
fn got_name(unexpected: &str) -> String {
    let kind = unexpected.split(['`', '"']).next().unwrap_or_default().trim();

    match kind {
        "unit value" | "unit" => "null".to_string(),
        "floating point" => "float".to_string(),
        other => type_name(other),
    }
}

/// Field named by a "missing field" error, which serde reports at the
/// level of the enclosing struct rather than the field itself
pub fn missing_field(raw: &str) -> Option<&str> {
    raw.strip_prefix("missing field `")?.split('`').next()
}

/// Turns a serde decode error into a user-facing message
///
/// ```text
/// missing field `title`                           -> This field is required
/// invalid type: string "x", expected integer      -> Expected type <integer>, but got <string>
/// invalid value: string "x", expected i64         -> Expected type <integer>, but got <string>
/// ```
pub fn describe_decode_error(raw: &str) -> String {
    if raw.starts_with("missing field") {
        return REQUIRED.to_string();
    }
    for prefix in ["invalid type: ", "invalid value: "] {
        if let Some(rest) = raw.strip_prefix(prefix) {
            if let Some((got, expected)) = rest.split_once(", expected ") {
                return expected_type_message(&type_name(expected), Some(&got_name(got)));
            }
        }
    }
    raw.to_string()
}
