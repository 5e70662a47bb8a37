//! Language Support - Shared tree-sitter language configuration
//!
//! This module is the single source of truth for the supported language set:
//! extension detection, grammar acquisition, and the per-language extraction
//! patterns. All language-specific tree-sitter configuration goes here to
//! avoid duplication across the engine.

use serde::Serialize;
use tree_sitter::Parser;

use crate::error::{AnalyzeError, Result};

/// The closed set of supported languages.
///
/// Every per-language table in the crate is a `match` over this enum, so
/// adding a language is a compile-time-enforced checklist: the compiler
/// points at every table that needs a new row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Java,
    Go,
}

/// One declarative extraction pattern per kind, written against the concrete
/// grammar of a single language.
///
/// The capture-name convention is the contract with the extraction engine:
/// each pattern tags `@name` (or `@callee`/`@method`/`@object`/`@module`)
/// plus an outer capture for the whole defining construct. A pattern that
/// omits an expected capture yields zero entities for that kind, not an
/// error.
#[derive(Debug, Clone, Copy)]
pub struct LanguageQueries {
    pub function: &'static str,
    pub class: &'static str,
    pub call: &'static str,
    pub import: &'static str,
    pub variable: &'static str,
    pub string: &'static str,
    pub field: &'static str,
}

const PYTHON_QUERIES: LanguageQueries = LanguageQueries {
    function: "(function_definition name: (identifier) @name) @function",
    class: "(class_definition name: (identifier) @name) @class",
    call: "[(call function: (identifier) @callee) (call function: (attribute object: (_) @object attribute: (identifier) @method))] @call",
    import: "[(import_statement name: (dotted_name) @module) (import_from_statement module_name: (dotted_name) @module) (import_from_statement module_name: (relative_import) @module)] @import",
    variable: "(assignment left: (identifier) @name) @assignment",
    string: "(string) @string",
    field: "(class_definition body: (block (expression_statement (assignment left: (identifier) @name type: (type)? @type)))) @class",
};

const JAVASCRIPT_QUERIES: LanguageQueries = LanguageQueries {
    function: "[(function_declaration name: (identifier) @name) (method_definition name: (property_identifier) @name) (function_expression name: (identifier) @name)] @function",
    class: "(class_declaration name: (identifier) @name) @class",
    call: "[(call_expression function: (identifier) @callee) (call_expression function: (member_expression object: (_) @object property: (property_identifier) @method))] @call",
    import: "(import_statement source: (string) @module) @import",
    variable: "[(variable_declarator name: (identifier) @name) (assignment_expression left: (identifier) @name)] @declaration",
    string: "[(string) (template_string)] @string",
    field: "(class_body (field_definition property: (property_identifier) @name)) @field",
};

const TYPESCRIPT_QUERIES: LanguageQueries = LanguageQueries {
    function: "[(function_declaration name: (identifier) @name) (method_definition name: (property_identifier) @name) (function_expression name: (identifier) @name)] @function",
    class: "[(class_declaration name: (type_identifier) @name) (interface_declaration name: (type_identifier) @name)] @class",
    call: "[(call_expression function: (identifier) @callee) (call_expression function: (member_expression object: (_) @object property: (property_identifier) @method))] @call",
    import: "(import_statement source: (string) @module) @import",
    variable: "[(variable_declarator name: (identifier) @name) (assignment_expression left: (identifier) @name)] @declaration",
    string: "[(string) (template_string)] @string",
    field: "(class_body (public_field_definition name: (property_identifier) @name type: (type_annotation)? @type)) @field",
};

const JAVA_QUERIES: LanguageQueries = LanguageQueries {
    function: "[(method_declaration name: (identifier) @name) (constructor_declaration name: (identifier) @name)] @function",
    class: "[(class_declaration name: (identifier) @name) (interface_declaration name: (identifier) @name)] @class",
    call: "[(method_invocation name: (identifier) @callee) (object_creation_expression type: (_) @callee)] @call",
    import: "(import_declaration (scoped_identifier) @module) @import",
    variable: "(variable_declarator name: (identifier) @name) @declaration",
    string: "(string_literal) @string",
    field: "(field_declaration type: (_) @type declarator: (variable_declarator name: (identifier) @name)) @field",
};

const GO_QUERIES: LanguageQueries = LanguageQueries {
    function: "[(function_declaration name: (identifier) @name) (method_declaration name: (field_identifier) @name)] @function",
    class: "(type_declaration (type_spec name: (type_identifier) @name type: [(struct_type) (interface_type)])) @class",
    call: "[(call_expression function: (identifier) @callee) (call_expression function: (selector_expression operand: (_) @object field: (field_identifier) @method))] @call",
    import: "(import_spec path: (interpreted_string_literal) @module) @import",
    variable: "[(short_var_declaration left: (expression_list (identifier) @name)) (var_spec name: (identifier) @name)] @declaration",
    string: "[(interpreted_string_literal) (raw_string_literal)] @string",
    field: "(field_declaration_list (field_declaration name: (field_identifier) @name type: (_) @type)) @field",
};

impl Language {
    /// All supported languages, in registry order.
    pub fn all() -> &'static [Language] {
        &[
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Tsx,
            Language::Java,
            Language::Go,
        ]
    }

    /// Detect language from a file path's extension.
    ///
    /// Returns `None` for unknown extensions; higher layers treat that as
    /// "skip this file", not as an error.
    pub fn from_path(path: &std::path::Path) -> Option<Language> {
        let extension = path.extension().and_then(|ext| ext.to_str())?;
        Language::from_extension(&extension.to_ascii_lowercase())
    }

    /// Detect language from a bare extension (no leading dot).
    pub fn from_extension(extension: &str) -> Option<Language> {
        match extension {
            "py" | "pyw" | "pyi" => Some(Language::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Language::JavaScript),
            "ts" => Some(Language::TypeScript),
            "tsx" => Some(Language::Tsx),
            "java" => Some(Language::Java),
            "go" => Some(Language::Go),
            _ => None,
        }
    }

    /// File extensions handled by this language.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py", "pyw", "pyi"],
            Language::JavaScript => &["js", "mjs", "cjs", "jsx"],
            Language::TypeScript => &["ts"],
            Language::Tsx => &["tsx"],
            Language::Java => &["java"],
            Language::Go => &["go"],
        }
    }

    /// Lowercase registry name, as reported to hosts.
    pub fn name(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Java => "java",
            Language::Go => "go",
        }
    }

    /// The tree-sitter grammar for this language.
    pub fn grammar(self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Java => tree_sitter_java::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Build a parser configured for this language.
    pub fn parser(self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar())
            .map_err(|e| AnalyzeError::Parse(format!("parser rejected {} grammar: {e}", self.name())))?;
        Ok(parser)
    }

    /// The extraction patterns for this language.
    pub fn queries(self) -> &'static LanguageQueries {
        match self {
            Language::Python => &PYTHON_QUERIES,
            Language::JavaScript => &JAVASCRIPT_QUERIES,
            Language::TypeScript | Language::Tsx => &TYPESCRIPT_QUERIES,
            Language::Java => &JAVA_QUERIES,
            Language::Go => &GO_QUERIES,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// All file extensions the registry recognizes.
pub fn supported_extensions() -> Vec<&'static str> {
    Language::all()
        .iter()
        .flat_map(|lang| lang.extensions().iter().copied())
        .collect()
}
