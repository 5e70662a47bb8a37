// Quarry Core - Rust-powered tree-sitter structural analysis
//
// Extracts structural and relational facts (functions, classes, fields,
// imports, variables, string literals, calls, inheritance) from source files
// and resolves cross-references across one or many files, without semantic
// information. The hosting transport (MCP server, CLI rendering) lives in
// the host process and consumes the report records.

pub mod analyzer;
pub mod error;
pub mod language;
pub mod project;
pub mod report;

pub use analyzer::entities::{
    CallInfo, CallerSite, CalleeSite, ClassInfo, FieldInfo, FunctionInfo, ImportInfo, Location,
    StringLiteral, SymbolRef, VariableInfo, MODULE_SCOPE,
};
pub use analyzer::FileAnalyzer;
pub use error::{AnalyzeError, Result};
pub use language::Language;
pub use project::{detect_path_kind, find_files, PathKind, ProjectAnalyzer};
pub use report::Reply;
