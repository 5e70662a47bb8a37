// Pattern execution and byte-range containment lookup
//
// Runs one declarative pattern against a tree root and exposes the captured
// nodes grouped by capture name. Correlation between an outer capture and
// the captures inside it is reconstructed purely from byte ranges, which is
// robust across languages with differing grammars.

use std::collections::HashMap;

use streaming_iterator::StreamingIterator as _;
use tree_sitter::{Node, Query, QueryCursor};

/// Decode a node's byte span from the source buffer.
pub(crate) fn node_text(node: &Node, source: &[u8]) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    if start < source.len() && end <= source.len() {
        String::from_utf8_lossy(&source[start..end]).to_string()
    } else {
        String::new()
    }
}

/// Captured nodes from one pattern execution, grouped by capture name.
pub(crate) struct CaptureTable<'tree> {
    groups: HashMap<String, Vec<Node<'tree>>>,
}

impl<'tree> CaptureTable<'tree> {
    pub(crate) fn empty() -> Self {
        CaptureTable {
            groups: HashMap::new(),
        }
    }

    /// Execute `pattern` over `root` and group every capture by name.
    ///
    /// A pattern that fails to compile (e.g. it references a node type the
    /// grammar does not define) degrades to an empty table; the rest of the
    /// analysis continues unaffected.
    pub(crate) fn run(
        grammar: &tree_sitter::Language,
        pattern: &str,
        root: Node<'tree>,
        source: &[u8],
    ) -> Self {
        let query = match Query::new(grammar, pattern) {
            Ok(query) => query,
            Err(e) => {
                tracing::debug!("pattern failed to compile, yielding no captures: {e}");
                return CaptureTable::empty();
            }
        };

        let capture_names = query.capture_names();
        let mut groups: HashMap<String, Vec<Node<'tree>>> = HashMap::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, source);
        while let Some(m) = matches.next() {
            for capture in m.captures {
                groups
                    .entry(capture_names[capture.index as usize].to_string())
                    .or_default()
                    .push(capture.node);
            }
        }
        CaptureTable { groups }
    }

    /// Nodes captured under `name`, in match order; empty for unknown names.
    pub(crate) fn group(&self, name: &str) -> &[Node<'tree>] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// One capture group pre-sorted by start offset, answering containment
/// lookups by binary search.
///
/// Tie-break is first match in ascending start-offset order, identical to a
/// linear scan over captures in match order.
pub(crate) struct SpanIndex<'tree> {
    nodes: Vec<Node<'tree>>,
}

impl<'tree> SpanIndex<'tree> {
    pub(crate) fn new(nodes: &[Node<'tree>]) -> Self {
        let mut nodes = nodes.to_vec();
        // stable: equal start offsets keep capture order
        nodes.sort_by_key(|n| n.start_byte());
        SpanIndex { nodes }
    }

    /// First node wholly contained in `[start, end]`.
    pub(crate) fn first_within(&self, start: usize, end: usize) -> Option<Node<'tree>> {
        let from = self.nodes.partition_point(|n| n.start_byte() < start);
        self.nodes[from..]
            .iter()
            .take_while(|n| n.start_byte() <= end)
            .find(|n| n.end_byte() <= end)
            .copied()
    }

    /// Innermost node whose span contains `[start, end]`.
    pub(crate) fn enclosing(&self, start: usize, end: usize) -> Option<Node<'tree>> {
        let upto = self.nodes.partition_point(|n| n.start_byte() <= start);
        self.nodes[..upto]
            .iter()
            .rev()
            .find(|n| n.end_byte() >= end)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn parse(language: Language, source: &str) -> tree_sitter::Tree {
        language
            .parser()
            .unwrap()
            .parse(source, None)
            .expect("parse")
    }

    #[test]
    fn groups_captures_by_name() {
        let source = "def alpha():\n    pass\n\ndef beta():\n    pass\n";
        let tree = parse(Language::Python, source);
        let table = CaptureTable::run(
            &Language::Python.grammar(),
            Language::Python.queries().function,
            tree.root_node(),
            source.as_bytes(),
        );
        assert_eq!(table.group("function").len(), 2);
        assert_eq!(table.group("name").len(), 2);
        assert!(table.group("missing").is_empty());
    }

    #[test]
    fn bad_pattern_degrades_to_empty_table() {
        let source = "def alpha():\n    pass\n";
        let tree = parse(Language::Python, source);
        let table = CaptureTable::run(
            &Language::Python.grammar(),
            "(no_such_node) @name",
            tree.root_node(),
            source.as_bytes(),
        );
        assert!(table.group("name").is_empty());
    }

    #[test]
    fn containment_picks_the_name_inside_each_outer_node() {
        let source = "def alpha():\n    pass\n\ndef beta():\n    pass\n";
        let tree = parse(Language::Python, source);
        let table = CaptureTable::run(
            &Language::Python.grammar(),
            Language::Python.queries().function,
            tree.root_node(),
            source.as_bytes(),
        );
        let names = SpanIndex::new(table.group("name"));
        let bytes = source.as_bytes();
        let mut seen = Vec::new();
        for outer in table.group("function") {
            let name = names
                .first_within(outer.start_byte(), outer.end_byte())
                .expect("every function has a contained name");
            seen.push(node_text(&name, bytes));
        }
        seen.sort();
        assert_eq!(seen, vec!["alpha", "beta"]);
    }

    #[test]
    fn containment_is_idempotent_across_lookups() {
        let source = "def alpha():\n    pass\n";
        let tree = parse(Language::Python, source);
        let table = CaptureTable::run(
            &Language::Python.grammar(),
            Language::Python.queries().function,
            tree.root_node(),
            source.as_bytes(),
        );
        let names = SpanIndex::new(table.group("name"));
        let outer = table.group("function")[0];
        let first = names.first_within(outer.start_byte(), outer.end_byte());
        let second = names.first_within(outer.start_byte(), outer.end_byte());
        assert_eq!(first, second);
    }
}
