//! Section id deduplication.
//!
//! Generated documents can legitimately repeat section ids (every nested
//! sub-command block carries the same wrapper id, for instance). Anchors must
//! be unique within a document, so a pre-order pass renames later occurrences
//! with the smallest free `_repeatN` suffix.

use std::collections::HashSet;

use crate::nodes::DocNode;

/// Rewrite duplicate `Section` ids in place. First occurrence wins; later
/// ones get `_repeat1`, `_repeat2`, ... in document order. Running the pass
/// twice is a no-op.
pub fn ensure_unique_ids(nodes: &mut [DocNode]) {
    let mut seen = HashSet::new();
    for node in nodes.iter_mut() {
        visit(node, &mut seen);
    }
}

fn visit(node: &mut DocNode, seen: &mut HashSet<String>) {
    if let DocNode::Section { ids, .. } = node {
        for id in ids.iter_mut() {
            // Empty ids count too: markup sections not starting with a heading
            // carry `""`, and two of those must still end up distinct.
            if !seen.insert(id.clone()) {
                let mut counter = 1;
                let unique = loop {
                    let candidate = format!("{id}_repeat{counter}");
                    if seen.insert(candidate.clone()) {
                        break candidate;
                    }
                    counter += 1;
                };
                *id = unique;
            }
        }
    }
    for slot in node.child_slots_mut() {
        for child in slot.iter_mut() {
            visit(child, seen);
        }
    }
}
