//! Lightweight markup to document tree conversion.
//!
//! Parses a markdown block into [`DocNode`](crate::nodes::DocNode) trees and
//! re-nests flat heading runs into proper `Section` hierarchies. Unsupported
//! constructs are logged and skipped; conversion is best-effort and never
//! fails.

mod convert;
mod nest;

pub mod highlight;

pub use highlight::{HighlightError, Highlighter, RegexHighlighter};

use crate::nodes::DocNode;

/// Parse a block of markup text into a section-nested node forest.
pub fn parse_markup_block(text: &str) -> Vec<DocNode> {
    parse_markup_block_with(text, &RegexHighlighter)
}

/// Like [`parse_markup_block`], with a caller-supplied highlighter for fenced
/// code blocks.
pub fn parse_markup_block_with(text: &str, highlighter: &dyn Highlighter) -> Vec<DocNode> {
    let flat = convert::convert(text, highlighter);
    nest::nest_sections(flat, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_headings_recover_two_groups() {
        // Round-trip property: two same-level headings produce exactly two
        // top-level sections whose content matches the spans between them.
        let nodes = parse_markup_block("# One\n\nalpha\n\n# Two\n\nbeta\n");
        assert_eq!(nodes.len(), 2);
        let texts: Vec<String> = nodes.iter().map(DocNode::to_text).collect();
        assert_eq!(texts[0], "One\n\nalpha");
        assert_eq!(texts[1], "Two\n\nbeta");
    }

    #[test]
    fn leading_content_stays_unattached() {
        let nodes = parse_markup_block("intro paragraph\n\n# One\n\nalpha\n");
        assert_eq!(nodes.len(), 2);
        assert!(matches!(nodes[0], DocNode::Paragraph { .. }));
        assert!(matches!(nodes[1], DocNode::Section { .. }));
    }

    #[test]
    fn flat_input_stays_flat() {
        let nodes = parse_markup_block("just a paragraph\n\nand another\n");
        assert_eq!(nodes.len(), 2);
        assert!(nodes
            .iter()
            .all(|node| matches!(node, DocNode::Paragraph { .. })));
    }

    #[test]
    fn deeper_headings_nest_recursively() {
        let nodes = parse_markup_block("# Top\n\n## Inner\n\nbody\n");
        assert_eq!(nodes.len(), 1);
        let DocNode::Section { ids, children, .. } = &nodes[0] else {
            panic!("expected a section, got {:?}", nodes[0]);
        };
        assert_eq!(ids, &vec!["top".to_string()]);
        // Title, then the nested Inner section.
        assert_eq!(children.len(), 2);
        let DocNode::Section { ids: inner_ids, .. } = &children[1] else {
            panic!("expected a nested section, got {:?}", children[1]);
        };
        assert_eq!(inner_ids, &vec!["inner".to_string()]);
    }
}
