// Class member extraction
//
// A restricted walk from a class's outer node: it recurses into every child
// but stops descending once it reaches a method-like node, so a method's
// locals are never misread as fields. Superclass shapes differ per grammar
// (call-style base lists, heritage clauses, implements clauses, embedded
// struct members), so that part is one handler per language, exhaustively
// matched.

use tree_sitter::Node;

use super::captures::node_text;
use super::scope::first_identifier_child;
use crate::language::Language;

/// Node types that define a method inside a class body.
const METHOD_KINDS: &[&str] = &[
    "function_definition",
    "method_definition",
    "method_declaration",
    "constructor_declaration",
];

/// Computed members of one class node.
#[derive(Debug, Default)]
pub(crate) struct ClassMembers {
    pub methods: Vec<String>,
    pub fields: Vec<String>,
    pub super_classes: Vec<String>,
}

/// Collect methods, fields, and superclasses for `class_node`.
pub(crate) fn class_members(class_node: Node, language: Language, source: &[u8]) -> ClassMembers {
    let mut members = ClassMembers::default();
    collect_super_classes(class_node, language, source, &mut members.super_classes);
    walk(class_node, language, source, &mut members);
    members
}

fn walk(node: Node, language: Language, source: &[u8], members: &mut ClassMembers) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if METHOD_KINDS.contains(&child.kind()) {
            if let Some(name) = first_identifier_child(child, source) {
                members.methods.push(name);
            }
            continue;
        }
        if field_member(child, language, source, members) {
            continue;
        }
        walk(child, language, source, members);
    }
}

/// Handle a field-like node; returns true when the node was consumed (the
/// walk does not descend into consumed nodes).
fn field_member(node: Node, language: Language, source: &[u8], members: &mut ClassMembers) -> bool {
    match language {
        Language::Python => {
            if node.kind() != "assignment" {
                return false;
            }
            if let Some(left) = node.child_by_field_name("left") {
                if left.kind() == "identifier" {
                    members.fields.push(node_text(&left, source));
                }
            }
            true
        }
        Language::JavaScript => {
            if node.kind() != "field_definition" {
                return false;
            }
            if let Some(property) = node.child_by_field_name("property") {
                members.fields.push(node_text(&property, source));
            }
            true
        }
        Language::TypeScript | Language::Tsx => {
            if node.kind() != "public_field_definition" {
                return false;
            }
            if let Some(name) = node.child_by_field_name("name") {
                members.fields.push(node_text(&name, source));
            }
            true
        }
        Language::Java => {
            if node.kind() != "field_declaration" {
                return false;
            }
            if let Some(declarator) = node.child_by_field_name("declarator") {
                if let Some(name) = declarator.child_by_field_name("name") {
                    members.fields.push(node_text(&name, source));
                }
            }
            true
        }
        Language::Go => {
            match node.kind() {
                "field_declaration" => {
                    match node.child_by_field_name("name") {
                        Some(name) => members.fields.push(node_text(&name, source)),
                        // unnamed member: embedded type, a pseudo-superclass
                        None => {
                            if let Some(embedded) = node.child_by_field_name("type") {
                                members.super_classes.push(node_text(&embedded, source));
                            }
                        }
                    }
                    true
                }
                // embedded interface inside an interface body
                "type_elem" => {
                    for i in 0..node.named_child_count() {
                        if let Some(embedded) = node.named_child(i) {
                            members.super_classes.push(node_text(&embedded, source));
                        }
                    }
                    true
                }
                _ => false,
            }
        }
    }
}

fn collect_super_classes(
    class_node: Node,
    language: Language,
    source: &[u8],
    supers: &mut Vec<String>,
) {
    match language {
        Language::Python => {
            // call-style base list: class Dog(Animal, Pet):
            if let Some(bases) = class_node.child_by_field_name("superclasses") {
                for i in 0..bases.named_child_count() {
                    if let Some(base) = bases.named_child(i) {
                        if matches!(base.kind(), "identifier" | "attribute") {
                            supers.push(node_text(&base, source));
                        }
                    }
                }
            }
        }
        Language::JavaScript => {
            for i in 0..class_node.named_child_count() {
                let Some(child) = class_node.named_child(i) else {
                    continue;
                };
                if child.kind() == "class_heritage" {
                    for j in 0..child.named_child_count() {
                        if let Some(base) = child.named_child(j) {
                            if matches!(base.kind(), "identifier" | "member_expression") {
                                supers.push(node_text(&base, source));
                            }
                        }
                    }
                }
            }
        }
        Language::TypeScript | Language::Tsx => {
            for i in 0..class_node.named_child_count() {
                let Some(child) = class_node.named_child(i) else {
                    continue;
                };
                match child.kind() {
                    // class: extends and implements, merged untagged
                    "class_heritage" => {
                        for j in 0..child.named_child_count() {
                            let Some(clause) = child.named_child(j) else {
                                continue;
                            };
                            if matches!(clause.kind(), "extends_clause" | "implements_clause") {
                                collect_ts_type_names(clause, source, supers);
                            }
                        }
                    }
                    // interface Foo extends Bar
                    "extends_type_clause" => {
                        collect_ts_type_names(child, source, supers);
                    }
                    _ => {}
                }
            }
        }
        Language::Java => {
            for i in 0..class_node.named_child_count() {
                let Some(child) = class_node.named_child(i) else {
                    continue;
                };
                match child.kind() {
                    "superclass" => collect_java_type_names(child, source, supers),
                    "super_interfaces" | "extends_interfaces" => {
                        for j in 0..child.named_child_count() {
                            if let Some(list) = child.named_child(j) {
                                if list.kind() == "type_list" {
                                    collect_java_type_names(list, source, supers);
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
        // Go inheritance is embedding; handled by the member walk.
        Language::Go => {}
    }
}

fn collect_ts_type_names(clause: Node, source: &[u8], supers: &mut Vec<String>) {
    for i in 0..clause.named_child_count() {
        let Some(ty) = clause.named_child(i) else {
            continue;
        };
        match ty.kind() {
            "identifier" | "type_identifier" | "member_expression" | "nested_type_identifier" => {
                supers.push(node_text(&ty, source));
            }
            // Base<T> contributes the bare base name
            "generic_type" => {
                if let Some(inner) = ty.named_child(0) {
                    supers.push(node_text(&inner, source));
                }
            }
            _ => {}
        }
    }
}

fn collect_java_type_names(node: Node, source: &[u8], supers: &mut Vec<String>) {
    for i in 0..node.named_child_count() {
        let Some(ty) = node.named_child(i) else {
            continue;
        };
        match ty.kind() {
            "type_identifier" | "scoped_type_identifier" => {
                supers.push(node_text(&ty, source));
            }
            "generic_type" => {
                if let Some(inner) = ty.named_child(0) {
                    supers.push(node_text(&inner, source));
                }
            }
            _ => {}
        }
    }
}
