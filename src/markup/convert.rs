//! pulldown-cmark event stream folding into a flat `DocNode` forest.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use super::highlight::Highlighter;
use crate::nodes::DocNode;

fn markup_options() -> Options {
    // Extensions are enabled explicitly for reproducibility. Definition lists
    // carry the override classifiers, so they are non-negotiable.
    let mut options = Options::empty();
    options.insert(Options::ENABLE_DEFINITION_LIST);
    options
}

pub(super) fn convert(text: &str, highlighter: &dyn Highlighter) -> Vec<DocNode> {
    let mut builder = TreeBuilder::new(highlighter);
    for event in Parser::new_ext(text, markup_options()) {
        builder.handle(event);
    }
    builder.finish()
}

/// Open container being accumulated between a Start and its End event.
enum FrameKind {
    Paragraph,
    Emphasis,
    Strong,
    BlockQuote,
    Item,
    Heading { level: u32 },
    Link { uri: String, name: Option<String> },
    Image { uri: String },
    List { start: Option<u64> },
    CodeBlock { language: Option<String>, text: String },
    HtmlBlock { text: String },
    DefinitionList { items: Vec<(Vec<DocNode>, Vec<DocNode>)> },
    DefinitionTitle,
    DefinitionDefinition,
}

struct Frame {
    kind: FrameKind,
    children: Vec<DocNode>,
}

struct TreeBuilder<'a> {
    highlighter: &'a dyn Highlighter,
    stack: Vec<Frame>,
    root: Vec<DocNode>,
    skip_depth: usize,
}

impl<'a> TreeBuilder<'a> {
    fn new(highlighter: &'a dyn Highlighter) -> Self {
        TreeBuilder {
            highlighter,
            stack: Vec::new(),
            root: Vec::new(),
            skip_depth: 0,
        }
    }

    fn finish(mut self) -> Vec<DocNode> {
        // Unbalanced input should not drop content silently.
        while let Some(frame) = self.stack.pop() {
            let node = self.finalize(frame);
            if let Some(node) = node {
                self.attach(node);
            }
        }
        self.root
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.handle_start(tag),
            Event::End(_) => self.handle_end(),
            _ if self.skip_depth > 0 => {}
            Event::Text(text) => match self.stack.last_mut() {
                Some(Frame {
                    kind: FrameKind::CodeBlock { text: buffer, .. },
                    ..
                })
                | Some(Frame {
                    kind: FrameKind::HtmlBlock { text: buffer },
                    ..
                }) => buffer.push_str(&text),
                _ => self.attach(DocNode::text(text.to_string())),
            },
            Event::Code(text) => self.attach(DocNode::Literal {
                text: text.to_string(),
                classes: vec!["code".to_string()],
            }),
            Event::Html(html) => match self.stack.last_mut() {
                Some(Frame {
                    kind: FrameKind::HtmlBlock { text: buffer },
                    ..
                }) => buffer.push_str(&html),
                _ => self.attach(raw_html(html.to_string())),
            },
            Event::InlineHtml(html) => self.attach(raw_html(html.to_string())),
            Event::SoftBreak | Event::HardBreak => self.attach(DocNode::text("\n")),
            Event::Rule => self.attach(DocNode::Transition),
            other => {
                tracing::warn!(event = ?other, "skipping unsupported markup construct");
            }
        }
    }

    fn handle_start(&mut self, tag: Tag<'_>) {
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return;
        }
        let kind = match tag {
            Tag::Paragraph => FrameKind::Paragraph,
            Tag::Emphasis => FrameKind::Emphasis,
            Tag::Strong => FrameKind::Strong,
            Tag::BlockQuote(_) => FrameKind::BlockQuote,
            Tag::Item => FrameKind::Item,
            Tag::Heading { level, .. } => FrameKind::Heading {
                level: level as u32,
            },
            Tag::Link {
                dest_url, title, ..
            } => FrameKind::Link {
                uri: dest_url.to_string(),
                name: if title.is_empty() {
                    None
                } else {
                    Some(title.to_string())
                },
            },
            Tag::Image { dest_url, .. } => FrameKind::Image {
                uri: dest_url.to_string(),
            },
            Tag::List(start) => FrameKind::List { start },
            Tag::CodeBlock(kind) => FrameKind::CodeBlock {
                language: fence_language(&kind),
                text: String::new(),
            },
            Tag::HtmlBlock => FrameKind::HtmlBlock {
                text: String::new(),
            },
            Tag::DefinitionList => FrameKind::DefinitionList { items: Vec::new() },
            Tag::DefinitionListTitle => FrameKind::DefinitionTitle,
            Tag::DefinitionListDefinition => FrameKind::DefinitionDefinition,
            other => {
                tracing::warn!(tag = ?other, "skipping unsupported markup container");
                self.skip_depth = 1;
                return;
            }
        };
        self.stack.push(Frame {
            kind,
            children: Vec::new(),
        });
    }

    fn handle_end(&mut self) {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame.kind {
            FrameKind::DefinitionTitle => {
                if let Some(Frame {
                    kind: FrameKind::DefinitionList { items },
                    ..
                }) = self.stack.last_mut()
                {
                    items.push((frame.children, Vec::new()));
                }
            }
            FrameKind::DefinitionDefinition => {
                if let Some(Frame {
                    kind: FrameKind::DefinitionList { items },
                    ..
                }) = self.stack.last_mut()
                {
                    match items.last_mut() {
                        Some((_, definition)) => definition.extend(frame.children),
                        None => items.push((Vec::new(), frame.children)),
                    }
                }
            }
            kind => {
                let node = self.finalize(Frame {
                    kind,
                    children: frame.children,
                });
                if let Some(node) = node {
                    self.attach(node);
                }
            }
        }
    }

    fn finalize(&self, frame: Frame) -> Option<DocNode> {
        let Frame { kind, children } = frame;
        let node = match kind {
            FrameKind::Paragraph => DocNode::Paragraph { children },
            FrameKind::Emphasis => DocNode::Emphasis { children },
            FrameKind::Strong => DocNode::Strong { children },
            FrameKind::BlockQuote => DocNode::BlockQuote { children },
            FrameKind::Item => DocNode::ListItem { children },
            FrameKind::Heading { level } => DocNode::Title { level, children },
            FrameKind::Link { uri, name } => DocNode::Reference {
                uri,
                name,
                children,
            },
            FrameKind::Image { uri } => {
                let alt: String = children.iter().map(DocNode::to_text).collect();
                DocNode::Image {
                    uri,
                    alt: if alt.is_empty() { None } else { Some(alt) },
                }
            }
            FrameKind::List { start: Some(start) } => DocNode::EnumeratedList {
                start,
                suffix: ".".to_string(),
                children,
            },
            FrameKind::List { start: None } => DocNode::BulletList { children },
            FrameKind::CodeBlock { language, text } => self.finalize_code_block(language, text),
            FrameKind::HtmlBlock { text } => raw_html(text),
            FrameKind::DefinitionList { items } => DocNode::DefinitionList {
                children: items
                    .into_iter()
                    .map(|(term, definition)| DocNode::DefinitionListItem { term, definition })
                    .collect(),
            },
            // Handled by handle_end; an orphan at finish() has nothing to join.
            FrameKind::DefinitionTitle | FrameKind::DefinitionDefinition => return None,
        };
        Some(node)
    }

    fn finalize_code_block(&self, language: Option<String>, text: String) -> DocNode {
        let mut classes = vec!["code".to_string()];
        let mut tokens = Vec::new();
        if let Some(language) = language {
            classes.push(language.clone());
            // Highlighting is best-effort: any tokenizer failure falls back to
            // the raw literal, which is preserved either way.
            match self.highlighter.tokenize(&text, &language) {
                Ok(spans) => tokens = spans,
                Err(err) => {
                    tracing::debug!(%language, error = %err, "highlighting fell back to plain text");
                }
            }
        }
        DocNode::LiteralBlock {
            text,
            classes,
            tokens,
        }
    }

    fn attach(&mut self, node: DocNode) {
        match self.stack.last_mut() {
            Some(frame) => frame.children.push(node),
            None => self.root.push(node),
        }
    }
}

fn raw_html(text: String) -> DocNode {
    DocNode::Raw {
        format: "html".to_string(),
        text,
    }
}

fn fence_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split_whitespace()
            .next()
            .map(|language| language.to_string()),
        CodeBlockKind::Indented => None,
    }
}
