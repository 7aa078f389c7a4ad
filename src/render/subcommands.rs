//! Recursive sub-command sections.

use crate::anchor::make_id;
use crate::error::Result;
use crate::index::CommandIndex;
use crate::introspect::ParserDescription;
use crate::nodes::DocNode;
use crate::overrides::{apply_override, map_overrides, Fragment};
use crate::render::{render_action_groups, render_fragments, RenderSettings};

/// Render the "Sub-commands" wrapper for `description`, one nested section
/// per visible child, recursing into each child's own groups and
/// sub-commands. Every child registers itself with `index`.
pub fn render_subcommands(
    description: &ParserDescription,
    body: &[DocNode],
    settings: &RenderSettings<'_>,
    index: &mut dyn CommandIndex,
) -> Result<Vec<DocNode>> {
    if description.children.is_empty() {
        return Ok(Vec::new());
    }
    let overrides = map_overrides(body)?;
    let full_command = description.full_command();

    let mut children = vec![DocNode::title_text("Sub-commands")];
    for child in &description.children {
        let child_command = child.full_command();
        let node_id = make_id(&child_command);
        let summary = child
            .description
            .clone()
            .or_else(|| child.help.clone())
            .unwrap_or_else(|| "No description.".to_string());
        index.add_entry(&child_command, &summary, &node_id, settings.index_groups);

        let entry = overrides.get(&child.name);
        let title = if settings.full_subcommand_name {
            child_command.clone()
        } else {
            child.name.clone()
        };

        // Inner definition lists attached to this child become overrides for
        // the child's own option groups.
        let mut child_body = body.to_vec();
        if let Some(entry) = entry {
            child_body.extend(entry.nested.iter().cloned());
        }
        // Nested levels drop the directive-scoped id prefix; the path-derived
        // primary ids stay unique on their own.
        let child_settings = RenderSettings {
            id_prefix: String::new(),
            ..settings.clone()
        };

        let mut section_children = vec![DocNode::title_text(title.clone())];
        let summary_fragments = apply_override(
            vec![Fragment::Text(
                child
                    .description
                    .clone()
                    .or_else(|| child.help.clone())
                    .unwrap_or_else(|| "Undocumented".to_string()),
            )],
            entry,
        );
        section_children.extend(render_fragments(&summary_fragments, settings.markup_help));
        section_children.push(DocNode::literal_block(child.bare_usage.clone()));
        section_children.extend(render_action_groups(child, &child_body, &child_settings)?);
        section_children.extend(render_subcommands(child, &child_body, &child_settings, index)?);
        if let Some(epilog) = &child.epilog {
            section_children.extend(render_fragments(
                &[Fragment::Text(epilog.clone())],
                settings.markup_help,
            ));
        }

        children.push(DocNode::section(
            vec![node_id, child.name.clone()],
            vec![title],
            section_children,
        ));
    }

    Ok(vec![DocNode::section(
        vec![make_id(&format!("{full_command} sub-commands")), "Sub-commands".to_string()],
        vec!["Sub-commands".to_string()],
        children,
    )])
}
