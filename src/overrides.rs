//! Per-item help overrides extracted from directive body content.
//!
//! Definition lists in the body map argument names (and group titles) to
//! replacement or supplementary content. The term may carry a trailing
//! ` : @classifier` marker selecting how the content combines with the
//! generated help; the default is `@after`.

use std::collections::BTreeMap;

use crate::error::{DocgenError, Result};
use crate::nodes::DocNode;

/// How override content combines with generated help text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classifier {
    Replace,
    Before,
    After,
    Skip,
}

impl Classifier {
    fn parse(marker: &str) -> Result<Self> {
        match marker {
            "@replace" => Ok(Classifier::Replace),
            "@before" => Ok(Classifier::Before),
            "@after" => Ok(Classifier::After),
            "@skip" => Ok(Classifier::Skip),
            other => Err(DocgenError::UnknownClassifier(other.to_string())),
        }
    }
}

/// One override: its combination rule, the content nodes, and any nested
/// definition lists (appended to the generated item body verbatim).
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideEntry {
    pub classifier: Classifier,
    pub content: Vec<DocNode>,
    pub nested: Vec<DocNode>,
}

pub type OverrideMap = BTreeMap<String, OverrideEntry>;

/// A run of content that is either raw help text (still to be rendered) or
/// already-built nodes contributed by an override.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Nodes(Vec<DocNode>),
}

/// Collect every definition-list item in `nodes` into an override map keyed
/// by term. An unknown `@` classifier is a hard error, never ignored.
pub fn map_overrides(nodes: &[DocNode]) -> Result<OverrideMap> {
    let mut map = OverrideMap::new();
    collect(nodes, &mut map)?;
    Ok(map)
}

fn collect(nodes: &[DocNode], map: &mut OverrideMap) -> Result<()> {
    for node in nodes {
        match node {
            DocNode::DefinitionList { children } => collect(children, map)?,
            DocNode::DefinitionListItem { term, definition } => {
                let raw_term: String = term.iter().map(DocNode::to_text).collect();
                let (key, classifier) = split_term(&raw_term)?;
                let mut content = Vec::new();
                let mut nested = Vec::new();
                for child in definition {
                    match child {
                        DocNode::DefinitionList { children } => {
                            // Inner lists ride along with the parent entry and
                            // are also indexed as overrides in their own right.
                            collect(children, map)?;
                            nested.push(child.clone());
                        }
                        other => content.push(other.clone()),
                    }
                }
                map.insert(
                    key,
                    OverrideEntry {
                        classifier,
                        content,
                        nested,
                    },
                );
            }
            other => {
                for slot in other.child_slots() {
                    collect(slot, map)?;
                }
            }
        }
    }
    Ok(())
}

/// Split `--flag : @replace` into the lookup key and its classifier. A
/// trailing segment only counts as a marker when it begins with `@` and
/// contains no whitespace, so option help mentioning a colon stays intact.
fn split_term(term: &str) -> Result<(String, Classifier)> {
    if let Some((head, marker)) = term.rsplit_once(" : ") {
        let marker = marker.trim();
        if marker.starts_with('@') && !marker.contains(char::is_whitespace) {
            return Ok((head.trim().to_string(), Classifier::parse(marker)?));
        }
    }
    Ok((term.trim().to_string(), Classifier::After))
}

/// Combine generated help fragments with an override, if one applies.
pub fn apply_override(default: Vec<Fragment>, entry: Option<&OverrideEntry>) -> Vec<Fragment> {
    let Some(entry) = entry else {
        return default;
    };
    let content = Fragment::Nodes(entry.content.clone());
    match entry.classifier {
        Classifier::Replace => vec![content],
        Classifier::Before => {
            let mut out = vec![content];
            out.extend(default);
            out
        }
        Classifier::After => {
            let mut out = default;
            out.push(content);
            out
        }
        // Skip is honored by group rendering, not by content merging.
        Classifier::Skip => default,
    }
}
