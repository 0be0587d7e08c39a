//! TypeScript IR types for code generation.
//!
//! This module defines the subset of the TypeScript language the contract needs:
//! - TsType: Types (primitives, arrays, unions, object literals, references)
//! - TsExpr: Expressions (identifiers, calls, member access, arrow stubs)
//! - TsStmt / TsTypeDef / TsModule: Module-level items

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, void
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Object type: { foo: string; bar: number }
    Object(Vec<TsProp>),
    /// Literal type: "foo"
    Literal(TsLiteral),
    /// Named type reference: User
    Ref(String),
    /// Type query: typeof appRouter
    TypeOf(String),
}

impl TsType {
    /// Shorthand for a primitive type.
    pub fn primitive(p: TsPrimitive) -> Self {
        TsType::Primitive(p)
    }

    /// Whether this type already admits `null`.
    pub fn is_nullable(&self) -> bool {
        match self {
            TsType::Primitive(TsPrimitive::Null) => true,
            TsType::Union(types) => types.iter().any(TsType::is_nullable),
            _ => false,
        }
    }

    /// Build `T | null`. Flattens unions and never repeats the `null` member.
    pub fn nullable(inner: TsType) -> Self {
        if inner.is_nullable() {
            return inner;
        }
        match inner {
            TsType::Union(mut types) => {
                types.push(TsType::Primitive(TsPrimitive::Null));
                TsType::Union(types)
            }
            other => TsType::Union(vec![other, TsType::Primitive(TsPrimitive::Null)]),
        }
    }
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Void,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Literal value: "bar"
    Literal(TsLiteral),
    /// Function call: foo(a, b)
    Call {
        callee: Box<TsExpr>,
        args: Vec<TsExpr>,
    },
    /// Arrow function with an annotated return type and a block body:
    /// (value): T => { ... }
    Arrow {
        params: Vec<TsParam>,
        return_type: TsType,
        body: Vec<TsStmt>,
    },
    /// Object literal, one property per line:
    /// {
    ///   a: 1,
    /// }
    Object(Vec<(String, TsExpr)>),
    /// Member access: foo.bar
    Member { object: Box<TsExpr>, prop: String },
    /// new Error(...)
    New {
        callee: Box<TsExpr>,
        args: Vec<TsExpr>,
    },
}

impl TsExpr {
    /// Identifier expression.
    pub fn ident(name: impl Into<String>) -> Self {
        TsExpr::Ident(name.into())
    }

    /// `self.prop`
    pub fn member(self, prop: impl Into<String>) -> Self {
        TsExpr::Member {
            object: Box::new(self),
            prop: prop.into(),
        }
    }

    /// `self(args...)`
    pub fn call(self, args: Vec<TsExpr>) -> Self {
        TsExpr::Call {
            callee: Box::new(self),
            args,
        }
    }

    /// `self.method(args...)`
    pub fn method(self, method: impl Into<String>, args: Vec<TsExpr>) -> Self {
        self.member(method).call(args)
    }
}

/// Function parameter. Always unannotated: its type is inferred from context.
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    pub name: String,
}

impl TsParam {
    pub fn inferred(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// =============================================================================
// Module-Level IR (for printer)
// =============================================================================

/// Import statement
#[derive(Debug, Clone, PartialEq)]
pub struct TsImport {
    /// Items to import
    pub items: Vec<String>,
    /// Module path
    pub from: String,
}

/// Type definition: `export type Foo = ...;`
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    pub name: String,
    pub ty: TsType,
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum TsStmt {
    /// const declaration
    VarDecl { name: String, init: TsExpr },
    /// Throw statement
    Throw(TsExpr),
}

/// Complete TypeScript module
///
/// Items are printed in field order: imports, type definitions, statements,
/// then the trailing exports that reference the statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TsModule {
    pub imports: Vec<TsImport>,
    pub types: Vec<TsTypeDef>,
    pub body: Vec<TsStmt>,
    pub exports: Vec<TsTypeDef>,
}
