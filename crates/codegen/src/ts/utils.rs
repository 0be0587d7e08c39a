//! Common utilities for TypeScript code generation.
//!
//! This module provides shared helper functions used across schema validation,
//! type mapping and printing.

use std::collections::HashSet;
use std::sync::LazyLock;

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
    ]
    .into_iter()
    .collect()
});

/// Type names that would shadow the built-ins the contract itself refers to.
const BUILTIN_TYPE_NAMES: [&str; 10] = [
    "any", "bigint", "boolean", "never", "number", "object", "string", "symbol", "undefined",
    "unknown",
];

/// Names the generated module itself imports or refers to.
pub const CONTRACT_NAMES: [&str; 2] = ["initTRPC", "Record"];

/// Check if an identifier needs bracket notation (or quoting) for property/key access.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Whether `name` can be used verbatim as a declared TypeScript type or binding name.
pub fn is_valid_identifier(name: &str) -> bool {
    !needs_bracket_notation(name)
        && !TS_RESERVED_WORDS.contains(name)
        && !BUILTIN_TYPE_NAMES.contains(&name)
}

/// Whether `name` can be declared as a type in the generated module without
/// colliding with what the module imports or refers to.
pub fn is_declarable_type_name(name: &str) -> bool {
    is_valid_identifier(name) && !CONTRACT_NAMES.contains(&name)
}

/// Escape a string for use in JavaScript/TypeScript string literals.
/// Escapes backslashes, double quotes and line breaks.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Quote a string if needed for use as a property key.
/// Returns the name quoted with escaped special characters if needed,
/// or the original name if it's a valid identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}
