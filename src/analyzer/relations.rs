// Derived relationship queries
//
// Built on top of the entity accessors: by-name lookups with an optional
// class qualifier, caller/callee summaries, and function-scoped variable and
// string views. Summaries deduplicate by (name, class-qualifier) so repeated
// call sites collapse while same-named calls in distinct classes stay
// distinct.

use std::collections::{BTreeMap, HashSet};

use super::entities::{
    CallerSite, CalleeSite, ClassInfo, FunctionInfo, StringLiteral, VariableInfo, MODULE_SCOPE,
};
use super::FileAnalyzer;

fn class_matches(function: &FunctionInfo, class_filter: Option<&str>) -> bool {
    match class_filter {
        Some(filter) => function.class_name.as_deref() == Some(filter),
        None => true,
    }
}

fn within(function: &FunctionInfo, line: u32) -> bool {
    function.location.start_line <= line && line <= function.location.end_line
}

impl FileAnalyzer {
    /// First function matching `name`, optionally qualified by class.
    pub fn function_by_name(&self, name: &str, class_filter: Option<&str>) -> Option<FunctionInfo> {
        self.functions()
            .into_iter()
            .find(|f| f.name == name && class_matches(f, class_filter))
    }

    /// Every function matching `name`, optionally qualified by class.
    pub fn functions_by_name(&self, name: &str, class_filter: Option<&str>) -> Vec<FunctionInfo> {
        self.functions()
            .into_iter()
            .filter(|f| f.name == name && class_matches(f, class_filter))
            .collect()
    }

    /// First class named `name`.
    pub fn class_by_name(&self, name: &str) -> Option<ClassInfo> {
        self.classes().into_iter().find(|c| c.name == name)
    }

    /// Deduplicated call sites whose callee matches `name`.
    ///
    /// The calling function's class is resolved structurally: a function
    /// whose name matches the recorded caller and whose line range contains
    /// the call site. With a class filter, a call site qualifies when its
    /// enclosing class matches the filter or its receiver text equals the
    /// filter (`Dog.speak()` style calls).
    pub fn function_callers(&self, name: &str, class_filter: Option<&str>) -> Vec<CallerSite> {
        let functions = self.functions();
        let mut seen = HashSet::new();
        let mut callers = Vec::new();

        for call in self.calls() {
            if call.callee != name {
                continue;
            }
            let caller_class = if call.caller == MODULE_SCOPE {
                None
            } else {
                functions
                    .iter()
                    .find(|f| f.name == call.caller && within(f, call.location.start_line))
                    .and_then(|f| f.class_name.clone())
            };
            if let Some(filter) = class_filter {
                let receiver_matches = call.object_name.as_deref() == Some(filter);
                if caller_class.as_deref() != Some(filter) && !receiver_matches {
                    continue;
                }
            }
            if seen.insert((call.caller.clone(), caller_class.clone())) {
                callers.push(CallerSite {
                    caller: call.caller,
                    class_name: caller_class,
                    location: call.location,
                });
            }
        }
        callers
    }

    /// Deduplicated callees of the function(s) matching `name`.
    ///
    /// A call belongs to a function when its location falls within the
    /// function's full line range; the callee label is `object.method` when
    /// the call had a receiver capture.
    pub fn function_callees(&self, name: &str, class_filter: Option<&str>) -> Vec<CalleeSite> {
        let functions = self.functions_by_name(name, class_filter);
        if functions.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut callees = Vec::new();
        for call in self.calls() {
            for function in &functions {
                if !within(function, call.location.start_line) {
                    continue;
                }
                let label = match &call.object_name {
                    Some(object) => format!("{object}.{}", call.callee),
                    None => call.callee.clone(),
                };
                if seen.insert((label.clone(), function.class_name.clone())) {
                    callees.push(CalleeSite {
                        callee: label,
                        class_name: function.class_name.clone(),
                        location: call.location.clone(),
                    });
                }
            }
        }
        callees
    }

    /// Variables whose location lies within the matching function(s).
    pub fn function_variables(&self, name: &str, class_filter: Option<&str>) -> Vec<VariableInfo> {
        let functions = self.functions_by_name(name, class_filter);
        let mut seen = HashSet::new();
        let mut variables = Vec::new();
        for variable in self.variables() {
            if functions
                .iter()
                .any(|f| within(f, variable.location.start_line))
                && seen.insert((variable.name.clone(), variable.location.start_line))
            {
                variables.push(variable);
            }
        }
        variables
    }

    /// String literals whose location lies within the matching function(s).
    pub fn function_strings(&self, name: &str, class_filter: Option<&str>) -> Vec<StringLiteral> {
        let functions = self.functions_by_name(name, class_filter);
        let mut seen = HashSet::new();
        let mut strings = Vec::new();
        for string in self.strings() {
            if functions
                .iter()
                .any(|f| within(f, string.location.start_line))
                && seen.insert((string.value.clone(), string.location.start_line))
            {
                strings.push(string);
            }
        }
        strings
    }

    /// Direct superclasses of `name`, resolved only against classes found in
    /// this file; `None` when the class itself is absent.
    pub fn super_classes_of(&self, name: &str) -> Option<Vec<ClassInfo>> {
        let target = self.class_by_name(name)?;
        let all = self.classes();
        let supers = target
            .super_classes
            .iter()
            .filter_map(|parent| all.iter().find(|c| &c.name == parent).cloned())
            .collect();
        Some(supers)
    }

    /// Classes in this file whose superclass list contains `name`.
    pub fn sub_classes_of(&self, name: &str) -> Vec<ClassInfo> {
        self.classes()
            .into_iter()
            .filter(|c| c.super_classes.iter().any(|s| s == name))
            .collect()
    }

    /// Forward call graph: caller name → deduplicated callees.
    pub fn call_graph(&self) -> BTreeMap<String, Vec<CalleeSite>> {
        let mut graph: BTreeMap<String, Vec<CalleeSite>> = BTreeMap::new();
        for call in self.calls() {
            let label = match &call.object_name {
                Some(object) => format!("{object}.{}", call.callee),
                None => call.callee.clone(),
            };
            let entries = graph.entry(call.caller.clone()).or_default();
            if entries.iter().all(|e| e.callee != label) {
                entries.push(CalleeSite {
                    callee: label,
                    class_name: None,
                    location: call.location,
                });
            }
        }
        graph
    }

    /// Reverse call graph: callee name → deduplicated callers.
    pub fn reverse_call_graph(&self) -> BTreeMap<String, Vec<CallerSite>> {
        let mut graph: BTreeMap<String, Vec<CallerSite>> = BTreeMap::new();
        for call in self.calls() {
            let entries = graph.entry(call.callee.clone()).or_default();
            if entries.iter().all(|e| e.caller != call.caller) {
                entries.push(CallerSite {
                    caller: call.caller,
                    class_name: None,
                    location: call.location,
                });
            }
        }
        graph
    }
}
