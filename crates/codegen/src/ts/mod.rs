//! TypeScript AST and printer shared by the type mapper, the router emitter and
//! the emission writer.
//!
//! ## Module Structure
//!
//! - `types`: TypeScript AST IR (TsType, TsExpr, TsStmt, TsTypeDef, TsModule)
//! - `emit`: TypeScript AST -> code strings (via Emit trait)
//! - `utils`: Identifier checks and string escaping

mod emit;
mod types;
pub mod utils;

pub use emit::Emit;
pub use types::{
    TsExpr, TsImport, TsLiteral, TsModule, TsParam, TsPrimitive, TsProp, TsStmt, TsType,
    TsTypeDef,
};
