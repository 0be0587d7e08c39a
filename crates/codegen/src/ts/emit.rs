//! TypeScript code emission via the Emit trait.
//!
//! This module provides a trait-based approach to converting TypeScript AST nodes
//! to string representations. Each AST type implements `Emit` for clean, composable
//! code generation. Output is a pure function of the AST: no maps with random
//! iteration order are involved, so equal trees always print identically.

use super::types::{
    TsExpr, TsImport, TsLiteral, TsModule, TsParam, TsPrimitive, TsProp, TsStmt, TsType,
    TsTypeDef,
};
use super::utils::{escape_js_string, quote_if_needed};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Void => "void".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Wrap complex types in parentheses
                if matches!(**inner, TsType::Union(_)) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            TsType::Union(types) => types.iter().map(Emit::emit).collect::<Vec<_>>().join(" | "),
            TsType::Object(props) => {
                if props.is_empty() {
                    "Record<string, never>".to_string()
                } else {
                    let parts: Vec<_> = props.iter().map(Emit::emit).collect();
                    format!("{{ {} }}", parts.join("; "))
                }
            }
            TsType::Literal(lit) => lit.emit(),
            TsType::Ref(name) => name.clone(),
            TsType::TypeOf(name) => format!("typeof {name}"),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        format!("{}: {}", quote_if_needed(&self.name), self.ty.emit())
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        format!("export type {} = {};\n", self.name, self.ty.emit())
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for TsExpr {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl TsExpr {
    /// Emit an expression that starts on a line indented `indent` levels.
    /// Only object literals care about the level.
    pub fn emit_indented(&self, indent: usize) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.emit(),
            TsExpr::Call { callee, args } => {
                let args_str = args
                    .iter()
                    .map(|a| a.emit_indented(indent))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", callee.emit_indented(indent), args_str)
            }
            TsExpr::Arrow {
                params,
                return_type,
                body,
            } => {
                let params_str = params.iter().map(Emit::emit).collect::<Vec<_>>().join(", ");
                // Arrow bodies stay on one line: `{ stmt; stmt }`
                let stmts: Vec<_> = body.iter().map(TsStmt::emit_inline).collect();
                format!(
                    "({params_str}): {} => {{ {} }}",
                    return_type.emit(),
                    stmts.join("; ")
                )
            }
            TsExpr::Object(props) => {
                if props.is_empty() {
                    return "{}".to_string();
                }
                let inner = "  ".repeat(indent + 1);
                let mut output = String::from("{\n");
                for (key, value) in props {
                    output.push_str(&format!(
                        "{inner}{}: {},\n",
                        quote_if_needed(key),
                        value.emit_indented(indent + 1)
                    ));
                }
                output.push_str(&"  ".repeat(indent));
                output.push('}');
                output
            }
            TsExpr::Member { object, prop } => {
                format!("{}.{}", object.emit_indented(indent), prop)
            }
            TsExpr::New { callee, args } => {
                let args_str = args
                    .iter()
                    .map(|a| a.emit_indented(indent))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("new {}({})", callee.emit_indented(indent), args_str)
            }
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        self.name.clone()
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for TsStmt {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl TsStmt {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        format!("{prefix}{};\n", self.emit_body(indent))
    }

    /// Emit without indentation or trailing terminator, for one-line arrow bodies.
    fn emit_inline(&self) -> String {
        self.emit_body(0)
    }

    fn emit_body(&self, indent: usize) -> String {
        match self {
            TsStmt::VarDecl { name, init } => {
                format!("const {name} = {}", init.emit_indented(indent))
            }
            TsStmt::Throw(expr) => format!("throw {}", expr.emit_indented(indent)),
        }
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Emit for TsImport {
    fn emit(&self) -> String {
        let items_str = self.items.join(", ");
        format!(
            "import {{ {items_str} }} from \"{}\";\n",
            escape_js_string(&self.from)
        )
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut output = String::new();

        // Emit imports
        for import in &self.imports {
            output.push_str(&import.emit());
        }

        if !self.imports.is_empty() {
            output.push('\n');
        }

        // Emit type definitions
        for type_def in &self.types {
            output.push_str(&type_def.emit());
            output.push('\n');
        }

        // Emit statements as one block
        for stmt in &self.body {
            output.push_str(&stmt.emit());
        }

        if !self.body.is_empty() && !self.exports.is_empty() {
            output.push('\n');
        }

        // Emit exports
        for (i, export) in self.exports.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&export.emit());
        }

        output
    }
}

// =============================================================================
// Tests
// =============================================================================
