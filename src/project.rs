//! Project-level aggregation
//!
//! Resolves a path specification (single file, glob pattern, or directory)
//! to a deterministic file set, lazily builds and caches one extraction
//! engine per file, and merges per-file results into project-wide answers.
//! Files that fail to load or parse are excluded from every result; the
//! reduced `files_searched` count is the only user-visible signal.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::analyzer::entities::{
    CallInfo, CallerSite, CalleeSite, ClassInfo, FieldInfo, FunctionInfo, ImportInfo,
    StringLiteral, SymbolRef, VariableInfo,
};
use crate::analyzer::FileAnalyzer;
use crate::error::Result;
use crate::language::{supported_extensions, Language};

/// Classification of a path specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    File,
    Glob,
    Directory,
}

/// Classify a path specification: glob metacharacters win, then an existing
/// directory, then a plain file path.
pub fn detect_path_kind(path: &str) -> PathKind {
    if path.contains(['*', '?', '[', ']']) {
        return PathKind::Glob;
    }
    if Path::new(path).is_dir() {
        return PathKind::Directory;
    }
    PathKind::File
}

fn has_supported_extension(path: &Path) -> bool {
    Language::from_path(path).is_some()
}

fn resolved(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Resolve a path specification to the sorted, deduplicated set of
/// supported source files it denotes.
///
/// Canonicalizing before collection into an ordered set both fixes the
/// lexicographic order and collapses paths a symlinked subtree would
/// otherwise contribute twice.
pub fn find_files(path: &str) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    match detect_path_kind(path) {
        PathKind::File => {
            let candidate = Path::new(path);
            if candidate.is_file() && has_supported_extension(candidate) {
                files.insert(resolved(candidate));
            }
        }
        PathKind::Glob => {
            for entry in glob::glob(path)? {
                let Ok(candidate) = entry else { continue };
                if candidate.is_file() && has_supported_extension(&candidate) {
                    files.insert(resolved(&candidate));
                }
            }
        }
        PathKind::Directory => {
            for extension in supported_extensions() {
                let pattern = format!("{}/**/*.{}", path.trim_end_matches('/'), extension);
                for entry in glob::glob(&pattern)? {
                    let Ok(candidate) = entry else { continue };
                    if candidate.is_file() {
                        files.insert(resolved(&candidate));
                    }
                }
            }
        }
    }

    Ok(files.into_iter().collect())
}

/// Analyzes many source files and merges their results.
pub struct ProjectAnalyzer {
    path: String,
    kind: PathKind,
    files: Vec<PathBuf>,
    /// Lazily-populated engine cache; `None` marks a construction failure so
    /// the file is skipped without being retried.
    analyzers: HashMap<PathBuf, Option<FileAnalyzer>>,
}

impl ProjectAnalyzer {
    /// Resolve `path` and prepare a lazy analyzer over its file set.
    pub fn new(path: &str) -> Result<Self> {
        let kind = detect_path_kind(path);
        let files = find_files(path)?;
        Ok(ProjectAnalyzer {
            path: path.to_string(),
            kind,
            files,
            analyzers: HashMap::new(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    /// The resolved file set, in analysis order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Files that were opened and parsed successfully so far.
    pub fn files_searched(&self) -> usize {
        self.analyzers.values().filter(|a| a.is_some()).count()
    }

    /// Build every per-file engine up front, in parallel.
    ///
    /// Files are analyzed independently with no shared mutable state, so the
    /// fan-out is safe; results land in the same cache the lazy path uses.
    pub fn prime(&mut self) {
        let pending: Vec<PathBuf> = self
            .files
            .iter()
            .filter(|f| !self.analyzers.contains_key(*f))
            .cloned()
            .collect();
        let built: Vec<(PathBuf, Option<FileAnalyzer>)> = pending
            .into_par_iter()
            .map(|file| {
                let slot = Self::build(&file);
                (file, slot)
            })
            .collect();
        self.analyzers.extend(built);
    }

    fn build(file: &Path) -> Option<FileAnalyzer> {
        match FileAnalyzer::from_path(file) {
            Ok(analyzer) => Some(analyzer),
            Err(e) => {
                tracing::warn!(file = %file.display(), "skipping file: {e}");
                None
            }
        }
    }

    fn analyzer(&mut self, file: &PathBuf) -> Option<&FileAnalyzer> {
        if !self.analyzers.contains_key(file) {
            let slot = Self::build(file);
            self.analyzers.insert(file.clone(), slot);
        }
        self.analyzers.get(file).and_then(|a| a.as_ref())
    }

    /// Run `extract` over every file, concatenating in file-sort order.
    fn collect_all<T>(&mut self, extract: impl Fn(&FileAnalyzer) -> Vec<T>) -> Vec<T> {
        let files = self.files.clone();
        let mut merged = Vec::new();
        for file in &files {
            if let Some(analyzer) = self.analyzer(file) {
                merged.extend(extract(analyzer));
            }
        }
        merged
    }

    pub fn functions(&mut self) -> Vec<FunctionInfo> {
        self.collect_all(|a| a.functions())
    }

    pub fn classes(&mut self) -> Vec<ClassInfo> {
        self.collect_all(|a| a.classes())
    }

    pub fn fields(&mut self, class_filter: Option<&str>) -> Vec<FieldInfo> {
        self.collect_all(|a| a.fields(class_filter))
    }

    pub fn calls(&mut self) -> Vec<CallInfo> {
        self.collect_all(|a| a.calls())
    }

    pub fn imports(&mut self) -> Vec<ImportInfo> {
        self.collect_all(|a| a.imports())
    }

    pub fn variables(&mut self) -> Vec<VariableInfo> {
        self.collect_all(|a| a.variables())
    }

    pub fn strings(&mut self) -> Vec<StringLiteral> {
        self.collect_all(|a| a.strings())
    }

    pub fn find_symbols(&mut self, name: &str) -> Vec<SymbolRef> {
        self.collect_all(|a| a.find_symbols(name))
    }

    /// First function matching name and optional class, in file-sort order.
    pub fn function_by_name(
        &mut self,
        name: &str,
        class_filter: Option<&str>,
    ) -> Option<FunctionInfo> {
        let files = self.files.clone();
        for file in &files {
            if let Some(analyzer) = self.analyzer(file) {
                if let Some(function) = analyzer.function_by_name(name, class_filter) {
                    return Some(function);
                }
            }
        }
        None
    }

    /// Every function matching name and optional class, across all files.
    pub fn functions_by_name(
        &mut self,
        name: &str,
        class_filter: Option<&str>,
    ) -> Vec<FunctionInfo> {
        self.collect_all(|a| a.functions_by_name(name, class_filter))
    }

    /// First class named `name`, in file-sort order.
    pub fn class_by_name(&mut self, name: &str) -> Option<ClassInfo> {
        let files = self.files.clone();
        for file in &files {
            if let Some(analyzer) = self.analyzer(file) {
                if let Some(class) = analyzer.class_by_name(name) {
                    return Some(class);
                }
            }
        }
        None
    }

    fn sort_by_site<T>(items: &mut [T], site: impl Fn(&T) -> (&str, u32)) {
        items.sort_by(|a, b| {
            let (file_a, line_a) = site(a);
            let (file_b, line_b) = site(b);
            file_a.cmp(file_b).then(line_a.cmp(&line_b))
        });
    }

    /// Callers of `name` across all files, ordered by (file, line).
    pub fn callers(&mut self, name: &str, class_filter: Option<&str>) -> Vec<CallerSite> {
        let mut callers = self.collect_all(|a| a.function_callers(name, class_filter));
        Self::sort_by_site(&mut callers, |c| {
            (c.location.file.as_str(), c.location.start_line)
        });
        callers
    }

    /// Callees of `name` across all files, ordered by (file, line).
    pub fn callees(&mut self, name: &str, class_filter: Option<&str>) -> Vec<CalleeSite> {
        let mut callees = self.collect_all(|a| a.function_callees(name, class_filter));
        Self::sort_by_site(&mut callees, |c| {
            (c.location.file.as_str(), c.location.start_line)
        });
        callees
    }

    /// Variables inside the named function, ordered by (file, line).
    pub fn function_variables(
        &mut self,
        name: &str,
        class_filter: Option<&str>,
    ) -> Vec<VariableInfo> {
        let mut variables = self.collect_all(|a| a.function_variables(name, class_filter));
        Self::sort_by_site(&mut variables, |v| {
            (v.location.file.as_str(), v.location.start_line)
        });
        variables
    }

    /// String literals inside the named function, ordered by (file, line).
    pub fn function_strings(
        &mut self,
        name: &str,
        class_filter: Option<&str>,
    ) -> Vec<StringLiteral> {
        let mut strings = self.collect_all(|a| a.function_strings(name, class_filter));
        Self::sort_by_site(&mut strings, |s| {
            (s.location.file.as_str(), s.location.start_line)
        });
        strings
    }

    /// Merged forward call graph across all files.
    pub fn call_graph(&mut self) -> std::collections::BTreeMap<String, Vec<CalleeSite>> {
        let mut graph: std::collections::BTreeMap<String, Vec<CalleeSite>> = Default::default();
        let files = self.files.clone();
        for file in &files {
            if let Some(analyzer) = self.analyzer(file) {
                for (caller, callees) in analyzer.call_graph() {
                    let entries = graph.entry(caller).or_default();
                    for callee in callees {
                        if entries.iter().all(|e| e.callee != callee.callee) {
                            entries.push(callee);
                        }
                    }
                }
            }
        }
        graph
    }

    /// Direct superclasses of `name`, resolved only against classes found in
    /// this scan.
    pub fn super_classes(&mut self, name: &str) -> Option<Vec<ClassInfo>> {
        let target = self.class_by_name(name)?;
        let all = self.classes();
        let supers = target
            .super_classes
            .iter()
            .filter_map(|parent| all.iter().find(|c| &c.name == parent).cloned())
            .collect();
        Some(supers)
    }

    /// Classes in this scan whose superclass list contains `name`.
    pub fn sub_classes(&mut self, name: &str) -> Vec<ClassInfo> {
        self.classes()
            .into_iter()
            .filter(|c| c.super_classes.iter().any(|s| s == name))
            .collect()
    }
}
