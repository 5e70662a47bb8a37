// Extracted entity types
//
// All data structures produced by single-file extraction. Entities are
// immutable value snapshots of a parsed tree: once built they are never
// mutated, and re-running an accessor rebuilds them from scratch.

use serde::{Deserialize, Serialize};

/// Caller name recorded for call sites that sit outside any function.
pub const MODULE_SCOPE: &str = "<module>";

/// Source position of an entity (1-based lines, inclusive on both ends).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// File the entity was extracted from; entities never span files.
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
}

/// A function or method definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionInfo {
    pub name: String,
    #[serde(flatten)]
    pub location: Location,
    /// Verbatim source slice of the defining node. Cleared by list-shaped
    /// reports to keep payloads small.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub body: String,
    /// True iff an enclosing class-like node was found.
    pub is_method: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// A class, struct, or interface definition with its computed members.
///
/// `methods`, `fields`, and `super_classes` preserve first-seen source order
/// and may contain duplicates if the source does; dedup happens only in
/// derived caller/callee summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassInfo {
    pub name: String,
    #[serde(flatten)]
    pub location: Location,
    pub methods: Vec<String>,
    pub fields: Vec<String>,
    pub super_classes: Vec<String>,
}

/// One concrete field declaration inside a class body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    #[serde(flatten)]
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    pub class_name: String,
}

/// One call expression.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallInfo {
    pub callee: String,
    #[serde(flatten)]
    pub location: Location,
    /// Enclosing function name, or [`MODULE_SCOPE`] for module-level code.
    pub caller: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    pub is_method_call: bool,
}

/// One import statement, with surrounding quote characters stripped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportInfo {
    pub module: String,
    #[serde(flatten)]
    pub location: Location,
}

/// One variable declaration or assignment target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableInfo {
    pub name: String,
    #[serde(flatten)]
    pub location: Location,
    /// Enclosing function name; absent for module scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// One string literal, verbatim as written in source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    #[serde(flatten)]
    pub location: Location,
}

/// One named tree node matching a free-text symbol search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolRef {
    /// Grammar node type of the match.
    #[serde(rename = "type")]
    pub kind: String,
    pub location: Location,
    /// Verbatim text of the immediate parent node.
    pub context: String,
}

/// One deduplicated caller of a function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallerSite {
    pub caller: String,
    /// Class of the calling function, when it could be resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(flatten)]
    pub location: Location,
}

/// One deduplicated callee of a function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalleeSite {
    /// Callee name, `object.method` qualified when the call had a receiver.
    pub callee: String,
    /// Class of the function the call sits in, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(flatten)]
    pub location: Location,
}
