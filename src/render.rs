//! Rendering of introspected command descriptions into document trees.
//!
//! Three layouts share the node model: grouped option sections, recursive
//! sub-command sections, and the man-page arrangement. All of them consume a
//! [`ParserDescription`](crate::introspect::ParserDescription) plus the
//! directive body's override content.

mod groups;
mod manpage;
mod subcommands;

pub use groups::render_action_groups;
pub use manpage::{render_manpage, ManpageSettings};
pub use subcommands::render_subcommands;

use crate::markup::parse_markup_block;
use crate::nodes::DocNode;
use crate::overrides::Fragment;

/// Knobs shared by the section renderers.
#[derive(Debug, Clone)]
pub struct RenderSettings<'a> {
    /// Parse help strings as markup instead of emitting them verbatim.
    pub markup_help: bool,
    /// Title sub-command sections with the full spaced path.
    pub full_subcommand_name: bool,
    /// Prefix for the secondary, directive-scoped group ids. Cleared for
    /// nested sub-command levels.
    pub id_prefix: String,
    pub index_groups: &'a [String],
}

/// Turn accumulated fragments into nodes. Text fragments are parsed as markup
/// when `markup_help` is set and wrapped in plain paragraphs otherwise;
/// node fragments pass through untouched.
pub(crate) fn render_fragments(fragments: &[Fragment], markup_help: bool) -> Vec<DocNode> {
    let mut out = Vec::new();
    for fragment in fragments {
        match fragment {
            Fragment::Text(text) => {
                if text.is_empty() {
                    continue;
                }
                if markup_help {
                    out.extend(parse_markup_block(text));
                } else {
                    out.push(DocNode::plain_paragraph(text.clone()));
                }
            }
            Fragment::Nodes(nodes) => out.extend(nodes.iter().cloned()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_fragments_respect_markup_toggle() {
        let fragments = vec![Fragment::Text("has *emphasis*".to_string())];
        let plain = render_fragments(&fragments, false);
        assert_eq!(plain, vec![DocNode::plain_paragraph("has *emphasis*")]);
        let rich = render_fragments(&fragments, true);
        let DocNode::Paragraph { children } = &rich[0] else {
            panic!("expected paragraph, got {:?}", rich[0]);
        };
        assert!(children
            .iter()
            .any(|node| matches!(node, DocNode::Emphasis { .. })));
    }

    #[test]
    fn empty_text_fragments_render_nothing() {
        let fragments = vec![
            Fragment::Text(String::new()),
            Fragment::Nodes(vec![DocNode::Transition]),
        ];
        assert_eq!(render_fragments(&fragments, false), vec![DocNode::Transition]);
    }
}
