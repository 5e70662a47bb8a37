// Enclosing-scope resolution
//
// A pure upward walk over the ancestor chain, O(depth) per query. The same
// routine backs method/function distinction, variable scope tagging, and
// call-site caller attribution.

use tree_sitter::Node;

use super::captures::node_text;

/// Node types that define a function scope, across all supported grammars.
pub(crate) const FUNCTION_KINDS: &[&str] = &[
    "function_definition",
    "async_function_definition",
    "function_declaration",
    "function_expression",
    "method_definition",
    "arrow_function",
    "method_declaration",
    "constructor_declaration",
];

/// Node types that define a class scope.
pub(crate) const CLASS_KINDS: &[&str] = &[
    "class_definition",
    "class_declaration",
    "interface_declaration",
    "type_declaration",
];

/// Node types that can carry a function or member name.
pub(crate) const IDENTIFIER_KINDS: &[&str] =
    &["identifier", "property_identifier", "field_identifier"];

/// Node types that can carry a class name (TS and Go name classes with
/// `type_identifier` rather than a plain identifier).
const CLASS_NAME_KINDS: &[&str] = &["identifier", "type_identifier"];

/// Text of the first immediate child whose type is identifier-like.
pub(crate) fn first_identifier_child(node: Node, source: &[u8]) -> Option<String> {
    for i in 0..node.child_count() {
        let child = node.child(i)?;
        if IDENTIFIER_KINDS.contains(&child.kind()) {
            return Some(node_text(&child, source));
        }
    }
    None
}

/// Name of the nearest enclosing function-like ancestor.
///
/// An anonymous function-like ancestor (e.g. an arrow function) has no
/// identifier child; the walk keeps climbing past it, so code inside an
/// anonymous callback is attributed to the nearest *named* function.
pub(crate) fn enclosing_function_name(node: Node, source: &[u8]) -> Option<String> {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if FUNCTION_KINDS.contains(&ancestor.kind()) {
            if let Some(name) = first_identifier_child(ancestor, source) {
                return Some(name);
            }
        }
        current = ancestor.parent();
    }
    None
}

/// Name of the nearest enclosing class-like ancestor.
pub(crate) fn enclosing_class_name(node: Node, source: &[u8]) -> Option<String> {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if CLASS_KINDS.contains(&ancestor.kind()) {
            if let Some(name) = class_name_of(ancestor, source) {
                return Some(name);
            }
        }
        current = ancestor.parent();
    }
    None
}

/// Extract the defining name from a class-like node.
///
/// Go's `type_declaration` holds its name one level down on the `type_spec`;
/// every other supported grammar names the class on the node itself.
pub(crate) fn class_name_of(class_node: Node, source: &[u8]) -> Option<String> {
    if class_node.kind() == "type_declaration" {
        for i in 0..class_node.named_child_count() {
            let child = class_node.named_child(i)?;
            if child.kind() == "type_spec" {
                if let Some(name) = child.child_by_field_name("name") {
                    return Some(node_text(&name, source));
                }
            }
        }
        return None;
    }
    if let Some(name) = class_node.child_by_field_name("name") {
        return Some(node_text(&name, source));
    }
    for i in 0..class_node.child_count() {
        let child = class_node.child(i)?;
        if CLASS_NAME_KINDS.contains(&child.kind()) {
            return Some(node_text(&child, source));
        }
    }
    None
}
