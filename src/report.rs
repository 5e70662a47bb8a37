//! Transport-neutral result records
//!
//! One function per analysis operation, mirroring the tool surface the host
//! exposes. Every entry point classifies the path specification, routes to a
//! single-file engine (hard error when the file's language cannot be
//! determined) or a project aggregator (per-file failures swallowed), and
//! returns a serializable reply: a success record with the kind-specific
//! list plus `count` and scope fields, or a failure record carrying one
//! human-readable message under `error`. No error value crosses this
//! boundary in any other shape.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analyzer::entities::{
    CallInfo, CallerSite, CalleeSite, ClassInfo, FieldInfo, FunctionInfo, ImportInfo,
    StringLiteral, SymbolRef, VariableInfo,
};
use crate::analyzer::FileAnalyzer;
use crate::error::Result;
use crate::language::Language;
use crate::project::{detect_path_kind, PathKind, ProjectAnalyzer};

/// Success-or-failure duality of every entry point.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Success(T),
    Failure { error: String },
}

impl<T> Reply<T> {
    fn failure(message: impl std::fmt::Display) -> Self {
        Reply::Failure {
            error: message.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success(_))
    }
}

/// Scope fields shared by every success record: the queried path and its
/// classification, plus the language tag for single files or the count of
/// successfully-parsed files for multi-file scans.
#[derive(Debug, Serialize)]
pub struct Scope {
    pub path: String,
    pub path_type: PathKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_searched: Option<usize>,
}

impl Scope {
    fn file(path: &str, language: Language) -> Self {
        Scope {
            path: path.to_string(),
            path_type: PathKind::File,
            language: Some(language),
            files_searched: None,
        }
    }

    fn project(project: &ProjectAnalyzer) -> Self {
        Scope {
            path: project.path().to_string(),
            path_type: project.kind(),
            language: None,
            files_searched: Some(project.files_searched()),
        }
    }
}

enum Target {
    File(Box<FileAnalyzer>),
    Project(Box<ProjectAnalyzer>),
}

fn resolve(path: &str) -> Result<Target> {
    match detect_path_kind(path) {
        PathKind::File => Ok(Target::File(Box::new(FileAnalyzer::from_path(path)?))),
        _ => Ok(Target::Project(Box::new(ProjectAnalyzer::new(path)?))),
    }
}

/// Drop bodies from list-shaped function results.
fn without_bodies(mut functions: Vec<FunctionInfo>) -> Vec<FunctionInfo> {
    for function in &mut functions {
        function.body = String::new();
    }
    functions
}

macro_rules! listing_reply {
    ($name:ident, $field:ident, $item:ty) => {
        #[derive(Debug, Serialize)]
        pub struct $name {
            #[serde(flatten)]
            pub scope: Scope,
            pub count: usize,
            pub $field: Vec<$item>,
        }

        impl $name {
            fn new(scope: Scope, $field: Vec<$item>) -> Self {
                $name {
                    scope,
                    count: $field.len(),
                    $field,
                }
            }
        }
    };
}

listing_reply!(FunctionsReply, functions, FunctionInfo);
listing_reply!(ClassesReply, classes, ClassInfo);
listing_reply!(FieldsReply, fields, FieldInfo);
listing_reply!(CallsReply, calls, CallInfo);
listing_reply!(ImportsReply, imports, ImportInfo);
listing_reply!(VariablesReply, variables, VariableInfo);
listing_reply!(StringsReply, strings, StringLiteral);

/// Extract all function/method definitions (bodies omitted).
pub fn functions(path: &str) -> Reply<FunctionsReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => {
            let items = without_bodies(analyzer.functions());
            Reply::Success(FunctionsReply::new(
                Scope::file(path, analyzer.language()),
                items,
            ))
        }
        Ok(Target::Project(mut project)) => {
            let items = without_bodies(project.functions());
            Reply::Success(FunctionsReply::new(Scope::project(&project), items))
        }
        Err(e) => Reply::failure(e),
    }
}

/// Extract all class/struct/interface definitions.
pub fn classes(path: &str) -> Reply<ClassesReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => Reply::Success(ClassesReply::new(
            Scope::file(path, analyzer.language()),
            analyzer.classes(),
        )),
        Ok(Target::Project(mut project)) => {
            let items = project.classes();
            Reply::Success(ClassesReply::new(Scope::project(&project), items))
        }
        Err(e) => Reply::failure(e),
    }
}

/// Extract field declarations, optionally restricted to one class.
pub fn fields(path: &str, class_name: Option<&str>) -> Reply<FieldsReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => Reply::Success(FieldsReply::new(
            Scope::file(path, analyzer.language()),
            analyzer.fields(class_name),
        )),
        Ok(Target::Project(mut project)) => {
            let items = project.fields(class_name);
            Reply::Success(FieldsReply::new(Scope::project(&project), items))
        }
        Err(e) => Reply::failure(e),
    }
}

/// Extract all function/method calls.
pub fn calls(path: &str) -> Reply<CallsReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => Reply::Success(CallsReply::new(
            Scope::file(path, analyzer.language()),
            analyzer.calls(),
        )),
        Ok(Target::Project(mut project)) => {
            let items = project.calls();
            Reply::Success(CallsReply::new(Scope::project(&project), items))
        }
        Err(e) => Reply::failure(e),
    }
}

/// Extract all import statements.
pub fn imports(path: &str) -> Reply<ImportsReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => Reply::Success(ImportsReply::new(
            Scope::file(path, analyzer.language()),
            analyzer.imports(),
        )),
        Ok(Target::Project(mut project)) => {
            let items = project.imports();
            Reply::Success(ImportsReply::new(Scope::project(&project), items))
        }
        Err(e) => Reply::failure(e),
    }
}

/// Extract all variable declarations.
pub fn variables(path: &str) -> Reply<VariablesReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => Reply::Success(VariablesReply::new(
            Scope::file(path, analyzer.language()),
            analyzer.variables(),
        )),
        Ok(Target::Project(mut project)) => {
            let items = project.variables();
            Reply::Success(VariablesReply::new(Scope::project(&project), items))
        }
        Err(e) => Reply::failure(e),
    }
}

/// Extract all string literals.
pub fn strings(path: &str) -> Reply<StringsReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => Reply::Success(StringsReply::new(
            Scope::file(path, analyzer.language()),
            analyzer.strings(),
        )),
        Ok(Target::Project(mut project)) => {
            let items = project.strings();
            Reply::Success(StringsReply::new(Scope::project(&project), items))
        }
        Err(e) => Reply::failure(e),
    }
}

#[derive(Debug, Serialize)]
pub struct CallGraphReply {
    #[serde(flatten)]
    pub scope: Scope,
    pub call_graph: BTreeMap<String, Vec<CalleeSite>>,
}

/// Call graph: which functions call which other functions.
pub fn call_graph(path: &str) -> Reply<CallGraphReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => Reply::Success(CallGraphReply {
            scope: Scope::file(path, analyzer.language()),
            call_graph: analyzer.call_graph(),
        }),
        Ok(Target::Project(mut project)) => {
            let graph = project.call_graph();
            Reply::Success(CallGraphReply {
                scope: Scope::project(&project),
                call_graph: graph,
            })
        }
        Err(e) => Reply::failure(e),
    }
}

#[derive(Debug, Serialize)]
pub struct CallersReply {
    #[serde(flatten)]
    pub scope: Scope,
    pub function: String,
    pub count: usize,
    pub callers: Vec<CallerSite>,
}

/// Find all functions that call a specific function.
pub fn callers(path: &str, function: &str, class_name: Option<&str>) -> Reply<CallersReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => {
            let callers = analyzer.function_callers(function, class_name);
            Reply::Success(CallersReply {
                scope: Scope::file(path, analyzer.language()),
                function: function.to_string(),
                count: callers.len(),
                callers,
            })
        }
        Ok(Target::Project(mut project)) => {
            let callers = project.callers(function, class_name);
            Reply::Success(CallersReply {
                scope: Scope::project(&project),
                function: function.to_string(),
                count: callers.len(),
                callers,
            })
        }
        Err(e) => Reply::failure(e),
    }
}

#[derive(Debug, Serialize)]
pub struct CalleesReply {
    #[serde(flatten)]
    pub scope: Scope,
    pub function: String,
    pub count: usize,
    pub callees: Vec<CalleeSite>,
}

/// Find all functions called by a specific function.
pub fn callees(path: &str, function: &str, class_name: Option<&str>) -> Reply<CalleesReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => {
            let callees = analyzer.function_callees(function, class_name);
            Reply::Success(CalleesReply {
                scope: Scope::file(path, analyzer.language()),
                function: function.to_string(),
                count: callees.len(),
                callees,
            })
        }
        Ok(Target::Project(mut project)) => {
            let callees = project.callees(function, class_name);
            Reply::Success(CalleesReply {
                scope: Scope::project(&project),
                function: function.to_string(),
                count: callees.len(),
                callees,
            })
        }
        Err(e) => Reply::failure(e),
    }
}

#[derive(Debug, Serialize)]
pub struct ReferencesReply {
    #[serde(flatten)]
    pub scope: Scope,
    pub name: String,
    pub count: usize,
    pub references: Vec<SymbolRef>,
}

/// Find all references to a specific identifier.
pub fn references(path: &str, name: &str) -> Reply<ReferencesReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => {
            let references = analyzer.find_symbols(name);
            Reply::Success(ReferencesReply {
                scope: Scope::file(path, analyzer.language()),
                name: name.to_string(),
                count: references.len(),
                references,
            })
        }
        Ok(Target::Project(mut project)) => {
            let references = project.find_symbols(name);
            Reply::Success(ReferencesReply {
                scope: Scope::project(&project),
                name: name.to_string(),
                count: references.len(),
                references,
            })
        }
        Err(e) => Reply::failure(e),
    }
}

/// Get the complete definition (with source body) of a specific function.
pub fn function_definition(
    path: &str,
    function: &str,
    class_name: Option<&str>,
) -> Reply<FunctionsReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => {
            let matches = analyzer.functions_by_name(function, class_name);
            if matches.is_empty() {
                return Reply::failure(format!("Function '{function}' not found"));
            }
            Reply::Success(FunctionsReply::new(
                Scope::file(path, analyzer.language()),
                matches,
            ))
        }
        Ok(Target::Project(mut project)) => {
            let matches = project.functions_by_name(function, class_name);
            if matches.is_empty() {
                return Reply::failure(format!("Function '{function}' not found"));
            }
            Reply::Success(FunctionsReply::new(Scope::project(&project), matches))
        }
        Err(e) => Reply::failure(e),
    }
}

#[derive(Debug, Serialize)]
pub struct FunctionVariablesReply {
    #[serde(flatten)]
    pub scope: Scope,
    pub function: String,
    pub count: usize,
    pub variables: Vec<VariableInfo>,
}

/// Get all variables declared within a specific function.
pub fn function_variables(
    path: &str,
    function: &str,
    class_name: Option<&str>,
) -> Reply<FunctionVariablesReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => {
            let variables = analyzer.function_variables(function, class_name);
            Reply::Success(FunctionVariablesReply {
                scope: Scope::file(path, analyzer.language()),
                function: function.to_string(),
                count: variables.len(),
                variables,
            })
        }
        Ok(Target::Project(mut project)) => {
            let variables = project.function_variables(function, class_name);
            Reply::Success(FunctionVariablesReply {
                scope: Scope::project(&project),
                function: function.to_string(),
                count: variables.len(),
                variables,
            })
        }
        Err(e) => Reply::failure(e),
    }
}

#[derive(Debug, Serialize)]
pub struct FunctionStringsReply {
    #[serde(flatten)]
    pub scope: Scope,
    pub function: String,
    pub count: usize,
    pub strings: Vec<StringLiteral>,
}

/// Get all string literals within a specific function.
pub fn function_strings(
    path: &str,
    function: &str,
    class_name: Option<&str>,
) -> Reply<FunctionStringsReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => {
            let strings = analyzer.function_strings(function, class_name);
            Reply::Success(FunctionStringsReply {
                scope: Scope::file(path, analyzer.language()),
                function: function.to_string(),
                count: strings.len(),
                strings,
            })
        }
        Ok(Target::Project(mut project)) => {
            let strings = project.function_strings(function, class_name);
            Reply::Success(FunctionStringsReply {
                scope: Scope::project(&project),
                function: function.to_string(),
                count: strings.len(),
                strings,
            })
        }
        Err(e) => Reply::failure(e),
    }
}

#[derive(Debug, Serialize)]
pub struct ClassRelativesReply {
    #[serde(flatten)]
    pub scope: Scope,
    pub class: String,
    pub count: usize,
    pub classes: Vec<ClassInfo>,
}

/// Get the direct superclasses of a class, resolved within the scan scope.
pub fn super_classes(path: &str, class: &str) -> Reply<ClassRelativesReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => match analyzer.super_classes_of(class) {
            Some(classes) => Reply::Success(ClassRelativesReply {
                scope: Scope::file(path, analyzer.language()),
                class: class.to_string(),
                count: classes.len(),
                classes,
            }),
            None => Reply::failure(format!("Class '{class}' not found")),
        },
        Ok(Target::Project(mut project)) => match project.super_classes(class) {
            Some(classes) => Reply::Success(ClassRelativesReply {
                scope: Scope::project(&project),
                class: class.to_string(),
                count: classes.len(),
                classes,
            }),
            None => Reply::failure(format!("Class '{class}' not found")),
        },
        Err(e) => Reply::failure(e),
    }
}

/// Get the classes that inherit from a class, within the scan scope.
pub fn sub_classes(path: &str, class: &str) -> Reply<ClassRelativesReply> {
    match resolve(path) {
        Ok(Target::File(analyzer)) => {
            let classes = analyzer.sub_classes_of(class);
            Reply::Success(ClassRelativesReply {
                scope: Scope::file(path, analyzer.language()),
                class: class.to_string(),
                count: classes.len(),
                classes,
            })
        }
        Ok(Target::Project(mut project)) => {
            let classes = project.sub_classes(class);
            Reply::Success(ClassRelativesReply {
                scope: Scope::project(&project),
                class: class.to_string(),
                count: classes.len(),
                classes,
            })
        }
        Err(e) => Reply::failure(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn single_file_reply_carries_the_language_tag() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "def run():\n    pass\n");
        let file = dir.path().join("app.py");

        let reply = functions(file.to_str().unwrap());
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["path_type"], "file");
        assert_eq!(value["language"], "python");
        assert_eq!(value["count"], 1);
        assert!(value.get("files_searched").is_none());
        // list-shaped results omit bodies
        assert!(value["functions"][0].get("body").is_none());
    }

    #[test]
    fn directory_reply_counts_parsed_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", "def one():\n    pass\n");
        write(dir.path(), "b.py", "def two():\n    pass\n");

        let reply = functions(dir.path().to_str().unwrap());
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["path_type"], "directory");
        assert_eq!(value["files_searched"], 2);
        assert_eq!(value["count"], 2);
        assert!(value.get("language").is_none());
    }

    #[test]
    fn missing_file_becomes_an_error_record() {
        let reply = functions("/no/such/place/app.py");
        assert!(!reply.is_success());
        let value = serde_json::to_value(&reply).unwrap();
        assert!(value["error"]
            .as_str()
            .unwrap()
            .contains("File not found"));
    }

    #[test]
    fn unsupported_single_file_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes.txt", "hello");
        let file = dir.path().join("notes.txt");

        let reply = functions(file.to_str().unwrap());
        let value = serde_json::to_value(&reply).unwrap();
        assert!(value["error"]
            .as_str()
            .unwrap()
            .contains("Unsupported language"));
    }

    #[test]
    fn unknown_function_definition_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "def run():\n    pass\n");

        let reply = function_definition(dir.path().to_str().unwrap(), "missing", None);
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["error"], "Function 'missing' not found");
    }

    #[test]
    fn function_definition_keeps_the_body() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "def run():\n    return 1\n");
        let file = dir.path().join("app.py");

        let reply = function_definition(file.to_str().unwrap(), "run", None);
        let value = serde_json::to_value(&reply).unwrap();
        assert!(value["functions"][0]["body"]
            .as_str()
            .unwrap()
            .starts_with("def run"));
    }

    #[test]
    fn inheritance_replies_cover_both_directions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "animal.py", "class Animal:\n    def speak(self):\n        pass\n");
        write(dir.path(), "dog.py", "class Dog(Animal):\n    def speak(self):\n        bark()\n");
        let spec = dir.path().to_str().unwrap();

        let supers = serde_json::to_value(super_classes(spec, "Dog")).unwrap();
        assert_eq!(supers["classes"][0]["name"], "Animal");

        let subs = serde_json::to_value(sub_classes(spec, "Animal")).unwrap();
        assert_eq!(subs["count"], 1);
        assert_eq!(subs["classes"][0]["name"], "Dog");

        let missing = serde_json::to_value(super_classes(spec, "Ghost")).unwrap();
        assert_eq!(missing["error"], "Class 'Ghost' not found");
    }

    #[test]
    fn qualified_callees_reply_matches_scenario() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "animal.py", "class Animal:\n    def speak(self):\n        pass\n");
        write(dir.path(), "dog.py", "class Dog(Animal):\n    def speak(self):\n        bark()\n");

        let reply = callees(dir.path().to_str().unwrap(), "speak", Some("Dog"));
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["callees"][0]["callee"], "bark");
        assert_eq!(value["callees"][0]["class_name"], "Dog");
    }

    #[test]
    fn glob_specification_routes_to_a_project() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "one.py", "x = \"alpha\"\n");
        write(dir.path(), "two.py", "y = \"beta\"\n");

        let pattern = format!("{}/*.py", dir.path().display());
        let reply = strings(&pattern);
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["path_type"], "glob");
        assert_eq!(value["count"], 2);
    }
}
