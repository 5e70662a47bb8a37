//! Single-file extraction engine
//!
//! Owns the parsed tree and raw source for one file and derives typed
//! entities from it on demand. Accessors re-run their pattern on every call
//! (freshness over speed); the engine itself is what gets cached, one per
//! file, by the project aggregator.

pub mod entities;

mod captures;
mod members;
mod relations;
mod scope;

use std::path::Path;

use tree_sitter::{Node, Tree};

use crate::error::{AnalyzeError, Result};
use crate::language::Language;
use captures::{node_text, CaptureTable, SpanIndex};
use entities::{
    CallInfo, ClassInfo, FieldInfo, FunctionInfo, ImportInfo, Location, StringLiteral, SymbolRef,
    VariableInfo, MODULE_SCOPE,
};

/// Analyzes one source file via its syntax tree.
pub struct FileAnalyzer {
    path: String,
    language: Language,
    source: String,
    tree: Tree,
}

impl FileAnalyzer {
    /// Load and parse a file from disk.
    ///
    /// Fails for a missing path, an extension outside the registry, an
    /// unreadable (or non-UTF-8) file, or a parser that yields no tree.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AnalyzeError::FileNotFound(path.display().to_string()));
        }
        let language = Language::from_path(path)
            .ok_or_else(|| AnalyzeError::UnsupportedLanguage(path.display().to_string()))?;
        let source = std::fs::read_to_string(path)?;
        Self::from_source(path.display().to_string(), language, source)
    }

    /// Parse an in-memory buffer under an explicit language.
    pub fn from_source(path: String, language: Language, source: String) -> Result<Self> {
        let mut parser = language.parser()?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| AnalyzeError::Parse(path.clone()))?;
        Ok(FileAnalyzer {
            path,
            language,
            source,
            tree,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    fn text(&self, node: &Node) -> String {
        node_text(node, self.bytes())
    }

    fn location(&self, node: &Node) -> Location {
        Location {
            file: self.path.clone(),
            start_line: node.start_position().row as u32 + 1,
            end_line: node.end_position().row as u32 + 1,
        }
    }

    fn run_pattern(&self, pattern: &str) -> CaptureTable<'_> {
        CaptureTable::run(
            &self.language.grammar(),
            pattern,
            self.tree.root_node(),
            self.bytes(),
        )
    }

    /// All function and method definitions.
    pub fn functions(&self) -> Vec<FunctionInfo> {
        let table = self.run_pattern(self.language.queries().function);
        let names = SpanIndex::new(table.group("name"));

        let mut functions = Vec::new();
        for outer in table.group("function") {
            let Some(name_node) = names.first_within(outer.start_byte(), outer.end_byte()) else {
                continue;
            };
            let name = self.text(&name_node);
            if name.is_empty() {
                continue;
            }
            let class_name = scope::enclosing_class_name(*outer, self.bytes());
            functions.push(FunctionInfo {
                name,
                location: self.location(outer),
                body: self.text(outer),
                is_method: class_name.is_some(),
                class_name,
            });
        }
        tracing::debug!(file = %self.path, count = functions.len(), "extracted functions");
        functions
    }

    /// All class, struct, and interface definitions with computed members.
    pub fn classes(&self) -> Vec<ClassInfo> {
        let table = self.run_pattern(self.language.queries().class);
        let names = SpanIndex::new(table.group("name"));

        let mut classes = Vec::new();
        for outer in table.group("class") {
            let Some(name_node) = names.first_within(outer.start_byte(), outer.end_byte()) else {
                continue;
            };
            let name = self.text(&name_node);
            if name.is_empty() {
                continue;
            }
            let members = members::class_members(*outer, self.language, self.bytes());
            classes.push(ClassInfo {
                name,
                location: self.location(outer),
                methods: members.methods,
                fields: members.fields,
                super_classes: members.super_classes,
            });
        }
        tracing::debug!(file = %self.path, count = classes.len(), "extracted classes");
        classes
    }

    /// Concrete field declarations, optionally restricted to one class.
    pub fn fields(&self, class_filter: Option<&str>) -> Vec<FieldInfo> {
        let table = self.run_pattern(self.language.queries().field);
        let mut names: Vec<Node> = table.group("name").to_vec();
        names.sort_by_key(|n| n.start_byte());
        let types = SpanIndex::new(table.group("type"));
        let outers = SpanIndex::new(table.group("field"));

        let mut fields = Vec::new();
        for (i, name_node) in names.iter().enumerate() {
            let Some(class_name) = scope::enclosing_class_name(*name_node, self.bytes()) else {
                continue;
            };
            if let Some(filter) = class_filter {
                if class_name != filter {
                    continue;
                }
            }
            // Pair the type annotation with its name: inside the same
            // per-declaration outer capture when the pattern has one,
            // otherwise the next annotation before the following name.
            let type_node = match outers.enclosing(name_node.start_byte(), name_node.end_byte()) {
                Some(outer) => types.first_within(outer.start_byte(), outer.end_byte()),
                None => {
                    let limit = names
                        .get(i + 1)
                        .map(|next| next.start_byte())
                        .unwrap_or(usize::MAX);
                    types.first_within(name_node.end_byte(), limit)
                }
            };
            fields.push(FieldInfo {
                name: self.text(name_node),
                location: self.location(name_node),
                field_type: type_node.map(|n| normalize_type(&self.text(&n))),
                class_name,
            });
        }
        fields
    }

    /// All call expressions.
    ///
    /// A construct with a method capture is classified as a method call and
    /// its callee text comes from that capture; otherwise the bare callee
    /// capture is used; a call with neither is dropped.
    pub fn calls(&self) -> Vec<CallInfo> {
        let table = self.run_pattern(self.language.queries().call);
        let callees = SpanIndex::new(table.group("callee"));
        let methods = SpanIndex::new(table.group("method"));
        let objects = SpanIndex::new(table.group("object"));

        let mut calls = Vec::new();
        for call_node in table.group("call") {
            let (start, end) = (call_node.start_byte(), call_node.end_byte());
            let caller = scope::enclosing_function_name(*call_node, self.bytes())
                .unwrap_or_else(|| MODULE_SCOPE.to_string());

            let mut callee = callees.first_within(start, end).map(|n| self.text(&n));
            let mut is_method_call = false;
            if let Some(method) = methods.first_within(start, end) {
                callee = Some(self.text(&method));
                is_method_call = true;
            }
            let object_name = objects.first_within(start, end).map(|n| self.text(&n));

            match callee {
                Some(callee) if !callee.is_empty() => calls.push(CallInfo {
                    callee,
                    location: self.location(call_node),
                    caller,
                    object_name,
                    is_method_call,
                }),
                _ => {}
            }
        }
        tracing::debug!(file = %self.path, count = calls.len(), "extracted calls");
        calls
    }

    /// All import statements.
    pub fn imports(&self) -> Vec<ImportInfo> {
        let table = self.run_pattern(self.language.queries().import);
        let modules = table.group("module");

        if !modules.is_empty() {
            return modules
                .iter()
                .map(|node| ImportInfo {
                    module: self
                        .text(node)
                        .trim_matches(|c| c == '"' || c == '\'')
                        .to_string(),
                    location: self.location(node),
                })
                .collect();
        }
        // no module capture for this pattern: fall back to the whole construct
        table
            .group("import")
            .iter()
            .map(|node| ImportInfo {
                module: self.text(node),
                location: self.location(node),
            })
            .collect()
    }

    /// All variable declarations, tagged with their enclosing function.
    pub fn variables(&self) -> Vec<VariableInfo> {
        let table = self.run_pattern(self.language.queries().variable);
        table
            .group("name")
            .iter()
            .map(|node| VariableInfo {
                name: self.text(node),
                location: self.location(node),
                scope: scope::enclosing_function_name(*node, self.bytes()),
            })
            .collect()
    }

    /// All string literals, verbatim.
    pub fn strings(&self) -> Vec<StringLiteral> {
        let table = self.run_pattern(self.language.queries().string);
        table
            .group("string")
            .iter()
            .map(|node| StringLiteral {
                value: self.text(node),
                location: self.location(node),
            })
            .collect()
    }

    /// Every named tree node whose verbatim text equals `name`.
    pub fn find_symbols(&self, name: &str) -> Vec<SymbolRef> {
        let mut refs = Vec::new();
        self.collect_symbols(self.tree.root_node(), name, &mut refs);
        refs
    }

    fn collect_symbols(&self, node: Node, name: &str, refs: &mut Vec<SymbolRef>) {
        if node.is_named() && self.text(&node) == name {
            refs.push(SymbolRef {
                kind: node.kind().to_string(),
                location: self.location(&node),
                context: node.parent().map(|p| self.text(&p)).unwrap_or_default(),
            });
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_symbols(child, name, refs);
        }
    }
}

/// Strip annotation punctuation from a captured type (`: number` → `number`).
fn normalize_type(text: &str) -> String {
    text.trim_start_matches(':').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer(language: Language, source: &str) -> FileAnalyzer {
        FileAnalyzer::from_source("test.src".to_string(), language, source.to_string()).unwrap()
    }

    const PY_SAMPLE: &str = "\
import os
from collections import OrderedDict

greeting = \"hello\"

def shout(word):
    loud = word.upper()
    return loud

class Animal:
    kind: str = \"beast\"

    def speak(self):
        sound = \"...\"
        return format(sound)

shout(greeting)
";

    #[test]
    fn python_functions_distinguish_methods() {
        let analyzer = analyzer(Language::Python, PY_SAMPLE);
        let functions = analyzer.functions();
        let names: Vec<_> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["shout", "speak"]);

        let shout = &functions[0];
        assert!(!shout.is_method);
        assert_eq!(shout.class_name, None);
        assert!(shout.body.starts_with("def shout"));

        let speak = &functions[1];
        assert!(speak.is_method);
        assert_eq!(speak.class_name.as_deref(), Some("Animal"));
    }

    #[test]
    fn python_calls_carry_scope_and_receiver() {
        let analyzer = analyzer(Language::Python, PY_SAMPLE);
        let calls = analyzer.calls();

        let upper = calls.iter().find(|c| c.callee == "upper").unwrap();
        assert!(upper.is_method_call);
        assert_eq!(upper.object_name.as_deref(), Some("word"));
        assert_eq!(upper.caller, "shout");

        let format_call = calls.iter().find(|c| c.callee == "format").unwrap();
        assert!(!format_call.is_method_call);
        assert_eq!(format_call.caller, "speak");

        // module-level call sites use the sentinel, never an absent caller
        let top = calls.iter().find(|c| c.callee == "shout").unwrap();
        assert_eq!(top.caller, MODULE_SCOPE);
    }

    #[test]
    fn python_imports_strip_nothing_from_dotted_names() {
        let analyzer = analyzer(Language::Python, PY_SAMPLE);
        let imports = analyzer.imports();
        let modules: Vec<_> = imports.iter().map(|i| i.module.as_str()).collect();
        assert_eq!(modules, vec!["os", "collections"]);
    }

    #[test]
    fn python_variables_are_scope_tagged() {
        let analyzer = analyzer(Language::Python, PY_SAMPLE);
        let variables = analyzer.variables();

        let greeting = variables.iter().find(|v| v.name == "greeting").unwrap();
        assert_eq!(greeting.scope, None);

        let loud = variables.iter().find(|v| v.name == "loud").unwrap();
        assert_eq!(loud.scope.as_deref(), Some("shout"));
    }

    #[test]
    fn python_strings_are_verbatim() {
        let analyzer = analyzer(Language::Python, PY_SAMPLE);
        let strings = analyzer.strings();
        assert!(strings.iter().any(|s| s.value == "\"hello\""));
    }

    #[test]
    fn python_fields_carry_class_and_type() {
        let analyzer = analyzer(Language::Python, PY_SAMPLE);
        let fields = analyzer.fields(None);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "kind");
        assert_eq!(fields[0].class_name, "Animal");
        assert_eq!(fields[0].field_type.as_deref(), Some("str"));
        assert!(analyzer.fields(Some("Unknown")).is_empty());
    }

    #[test]
    fn entity_locations_point_at_the_analyzed_file() {
        let analyzer = analyzer(Language::Python, PY_SAMPLE);
        for f in analyzer.functions() {
            assert_eq!(f.location.file, "test.src");
            assert!(f.location.start_line <= f.location.end_line);
        }
        for c in analyzer.calls() {
            assert_eq!(c.location.file, "test.src");
        }
    }

    #[test]
    fn repeated_extraction_is_idempotent() {
        let analyzer = analyzer(Language::Python, PY_SAMPLE);
        assert_eq!(analyzer.functions(), analyzer.functions());
        assert_eq!(analyzer.calls(), analyzer.calls());
        assert_eq!(analyzer.classes(), analyzer.classes());
    }

    #[test]
    fn javascript_extraction_covers_methods_and_imports() {
        let source = "\
import { api } from \"./api\";

function run() {
  const result = api.fetch();
  return result;
}

class Worker {
  limit = 3;
  poll() {
    run();
  }
}
";
        let analyzer = analyzer(Language::JavaScript, source);

        let functions = analyzer.functions();
        let names: Vec<_> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["run", "poll"]);
        assert!(functions[1].is_method);
        assert_eq!(functions[1].class_name.as_deref(), Some("Worker"));

        let imports = analyzer.imports();
        assert_eq!(imports[0].module, "./api");

        let calls = analyzer.calls();
        let fetch = calls.iter().find(|c| c.callee == "fetch").unwrap();
        assert!(fetch.is_method_call);
        assert_eq!(fetch.object_name.as_deref(), Some("api"));
    }

    #[test]
    fn typescript_interfaces_count_as_classes() {
        let source = "\
interface Pet {
  name: string;
}

class Dog implements Pet {
  name: string = \"rex\";
}
";
        let analyzer = analyzer(Language::TypeScript, source);
        let classes = analyzer.classes();
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Pet", "Dog"]);
        assert_eq!(classes[1].super_classes, vec!["Pet"]);

        let fields = analyzer.fields(Some("Dog"));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type.as_deref(), Some("string"));
    }

    #[test]
    fn java_fields_and_constructor_calls() {
        let source = "\
import java.util.List;

class Registry {
    private List<String> entries;

    Registry() {
        this.entries = new ArrayList();
    }

    void add(String entry) {
        entries.add(entry);
    }
}
";
        let analyzer = analyzer(Language::Java, source);

        let imports = analyzer.imports();
        assert_eq!(imports[0].module, "java.util.List");

        let functions = analyzer.functions();
        let names: Vec<_> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Registry", "add"]);

        let fields = analyzer.fields(None);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "entries");
        assert_eq!(fields[0].field_type.as_deref(), Some("List<String>"));

        // `new ArrayList()` surfaces as a call to the constructed type
        let calls = analyzer.calls();
        assert!(calls.iter().any(|c| c.callee == "ArrayList"));
    }

    #[test]
    fn go_structs_and_method_receivers() {
        let source = "\
package zoo

import \"fmt\"

type Animal struct {
\tName string
}

func (a Animal) Speak() {
\tfmt.Println(a.Name)
}

func main() {
\ta := Animal{}
\ta.Speak()
}
";
        let analyzer = analyzer(Language::Go, source);

        let classes = analyzer.classes();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Animal");
        assert_eq!(classes[0].fields, vec!["Name"]);

        let functions = analyzer.functions();
        let names: Vec<_> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Speak", "main"]);

        let imports = analyzer.imports();
        assert_eq!(imports[0].module, "fmt");

        let calls = analyzer.calls();
        let speak = calls.iter().find(|c| c.callee == "Speak").unwrap();
        assert!(speak.is_method_call);
        assert_eq!(speak.object_name.as_deref(), Some("a"));
        assert_eq!(speak.caller, "main");
    }

    #[test]
    fn find_symbols_reports_kind_and_context() {
        let analyzer = analyzer(Language::Python, PY_SAMPLE);
        let refs = analyzer.find_symbols("greeting");
        // one definition and one usage
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().all(|r| r.kind == "identifier"));
        assert!(refs[0].context.contains("greeting"));
    }

    #[test]
    fn from_source_rejects_nothing_parseable_gracefully() {
        // garbage still parses into a tree with error nodes; extraction
        // yields empty lists rather than failing
        let analyzer = analyzer(Language::Python, "\x01\x02 not python at all");
        assert!(analyzer.functions().is_empty());
        assert!(analyzer.classes().is_empty());
    }

    #[test]
    fn from_path_errors_for_missing_and_unsupported_files() {
        assert!(matches!(
            FileAnalyzer::from_path("/no/such/file.py"),
            Err(AnalyzeError::FileNotFound(_))
        ));
        let dir = tempfile::tempdir().unwrap();
        let unsupported = dir.path().join("notes.txt");
        std::fs::write(&unsupported, "hello").unwrap();
        assert!(matches!(
            FileAnalyzer::from_path(&unsupported),
            Err(AnalyzeError::UnsupportedLanguage(_))
        ));
    }
}
