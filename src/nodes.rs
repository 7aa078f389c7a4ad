//! Document node model shared by the markup converter and the renderer.
//!
//! The tree is owned top-down: builders return finished values and nothing
//! holds parent or sibling links, so recursive rendering passes cannot alias
//! each other's state. `Section` is the only variant carrying link anchors.

use serde::Serialize;

/// A classified span produced by a syntax highlighter for a literal block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSpan {
    pub class: String,
    pub text: String,
}

/// One node in the generated document tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocNode {
    Paragraph {
        children: Vec<DocNode>,
    },
    Text {
        text: String,
    },
    Emphasis {
        children: Vec<DocNode>,
    },
    Strong {
        children: Vec<DocNode>,
    },
    /// A hyperlink. `name` carries the optional link title.
    Reference {
        uri: String,
        name: Option<String>,
        children: Vec<DocNode>,
    },
    /// Inline code.
    Literal {
        text: String,
        classes: Vec<String>,
    },
    /// A block of code. `text` always holds the raw source; `tokens` is only
    /// populated when highlighting succeeded.
    LiteralBlock {
        text: String,
        classes: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tokens: Vec<TokenSpan>,
    },
    Title {
        level: u32,
        children: Vec<DocNode>,
    },
    Section {
        ids: Vec<String>,
        names: Vec<String>,
        children: Vec<DocNode>,
    },
    /// An invisible link target.
    Target {
        ids: Vec<String>,
    },
    BulletList {
        children: Vec<DocNode>,
    },
    EnumeratedList {
        start: u64,
        suffix: String,
        children: Vec<DocNode>,
    },
    ListItem {
        children: Vec<DocNode>,
    },
    DefinitionList {
        children: Vec<DocNode>,
    },
    DefinitionListItem {
        term: Vec<DocNode>,
        definition: Vec<DocNode>,
    },
    Image {
        uri: String,
        alt: Option<String>,
    },
    BlockQuote {
        children: Vec<DocNode>,
    },
    Transition,
    /// Raw passthrough content, e.g. inline or block HTML.
    Raw {
        format: String,
        text: String,
    },
}

impl DocNode {
    pub fn text(text: impl Into<String>) -> DocNode {
        DocNode::Text { text: text.into() }
    }

    pub fn plain_paragraph(text: impl Into<String>) -> DocNode {
        DocNode::Paragraph {
            children: vec![DocNode::text(text)],
        }
    }

    pub fn title_text(text: impl Into<String>) -> DocNode {
        DocNode::Title {
            level: 1,
            children: vec![DocNode::text(text)],
        }
    }

    pub fn literal_block(text: impl Into<String>) -> DocNode {
        DocNode::LiteralBlock {
            text: text.into(),
            classes: vec!["code".to_string()],
            tokens: Vec::new(),
        }
    }

    pub fn section(ids: Vec<String>, names: Vec<String>, children: Vec<DocNode>) -> DocNode {
        DocNode::Section {
            ids,
            names,
            children,
        }
    }

    /// Child node lists, in document order. Leaf variants return no slots.
    pub fn child_slots(&self) -> Vec<&[DocNode]> {
        match self {
            DocNode::Paragraph { children }
            | DocNode::Emphasis { children }
            | DocNode::Strong { children }
            | DocNode::Reference { children, .. }
            | DocNode::Title { children, .. }
            | DocNode::Section { children, .. }
            | DocNode::BulletList { children }
            | DocNode::EnumeratedList { children, .. }
            | DocNode::ListItem { children }
            | DocNode::DefinitionList { children }
            | DocNode::BlockQuote { children } => vec![children.as_slice()],
            DocNode::DefinitionListItem { term, definition } => {
                vec![term.as_slice(), definition.as_slice()]
            }
            _ => Vec::new(),
        }
    }

    pub(crate) fn child_slots_mut(&mut self) -> Vec<&mut Vec<DocNode>> {
        match self {
            DocNode::Paragraph { children }
            | DocNode::Emphasis { children }
            | DocNode::Strong { children }
            | DocNode::Reference { children, .. }
            | DocNode::Title { children, .. }
            | DocNode::Section { children, .. }
            | DocNode::BulletList { children }
            | DocNode::EnumeratedList { children, .. }
            | DocNode::ListItem { children }
            | DocNode::DefinitionList { children }
            | DocNode::BlockQuote { children } => vec![children],
            DocNode::DefinitionListItem { term, definition } => vec![term, definition],
            _ => Vec::new(),
        }
    }

    /// Plain-text projection of the subtree. Inline containers concatenate
    /// their children; block containers separate them with blank lines.
    pub fn to_text(&self) -> String {
        match self {
            DocNode::Text { text }
            | DocNode::Literal { text, .. }
            | DocNode::LiteralBlock { text, .. } => text.clone(),
            DocNode::Image { alt, .. } => alt.clone().unwrap_or_default(),
            DocNode::Paragraph { children }
            | DocNode::Emphasis { children }
            | DocNode::Strong { children }
            | DocNode::Reference { children, .. }
            | DocNode::Title { children, .. } => concat_text(children),
            DocNode::Section { children, .. }
            | DocNode::BulletList { children }
            | DocNode::EnumeratedList { children, .. }
            | DocNode::ListItem { children }
            | DocNode::DefinitionList { children }
            | DocNode::BlockQuote { children } => join_text(children),
            DocNode::DefinitionListItem { term, definition } => {
                let term_text = concat_text(term);
                let definition_text = join_text(definition);
                if definition_text.is_empty() {
                    term_text
                } else {
                    format!("{term_text}\n{definition_text}")
                }
            }
            DocNode::Target { .. } | DocNode::Transition | DocNode::Raw { .. } => String::new(),
        }
    }
}

fn concat_text(children: &[DocNode]) -> String {
    children.iter().map(DocNode::to_text).collect()
}

fn join_text(children: &[DocNode]) -> String {
    children
        .iter()
        .map(DocNode::to_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_text_concatenates_inline_content() {
        let node = DocNode::Paragraph {
            children: vec![
                DocNode::text("see "),
                DocNode::Emphasis {
                    children: vec![DocNode::text("this")],
                },
                DocNode::text(" link"),
            ],
        };
        assert_eq!(node.to_text(), "see this link");
    }

    #[test]
    fn to_text_separates_block_content() {
        let node = DocNode::section(
            vec!["s".to_string()],
            vec![],
            vec![
                DocNode::plain_paragraph("first"),
                DocNode::plain_paragraph("second"),
            ],
        );
        assert_eq!(node.to_text(), "first\n\nsecond");
    }

    #[test]
    fn child_slots_cover_definition_items() {
        let node = DocNode::DefinitionListItem {
            term: vec![DocNode::text("term")],
            definition: vec![DocNode::plain_paragraph("body")],
        };
        assert_eq!(node.child_slots().len(), 2);
    }
}
