//! Re-nesting of flat heading runs into section hierarchies.
//!
//! The converter emits headings as flat `Title` siblings. This pass groups
//! siblings level by level: content before the first heading at the current
//! level stays where it is, everything else is wrapped in `Section` nodes and
//! recursed into at the next level.

use crate::anchor::make_id;
use crate::nodes::DocNode;

pub(super) fn nest_sections(nodes: Vec<DocNode>, level: u32) -> Vec<DocNode> {
    let has_heading = nodes
        .iter()
        .any(|node| matches!(node, DocNode::Title { level: found, .. } if *found == level));
    if !has_heading {
        return nodes;
    }

    let mut out = Vec::new();
    let mut current: Option<Vec<DocNode>> = None;
    for node in nodes {
        let splits = matches!(&node, DocNode::Title { level: found, .. } if *found == level);
        if splits {
            if let Some(children) = current.take() {
                out.push(make_section(children, level));
            }
            current = Some(vec![node]);
        } else if let Some(children) = current.as_mut() {
            children.push(node);
        } else {
            out.push(node);
        }
    }
    if let Some(children) = current.take() {
        out.push(make_section(children, level));
    }
    out
}

fn make_section(children: Vec<DocNode>, level: u32) -> DocNode {
    let name = match children.first() {
        Some(DocNode::Title {
            children: title, ..
        }) => title.iter().map(DocNode::to_text).collect::<String>(),
        _ => String::new(),
    };
    let id = if name.is_empty() {
        String::new()
    } else {
        make_id(&name)
    };
    let children = nest_sections(children, level + 1);
    DocNode::Section {
        ids: vec![id],
        names: vec![name],
        children,
    }
}
