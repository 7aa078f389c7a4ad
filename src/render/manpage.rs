//! Man-page style layout.
//!
//! A fixed four-part arrangement (Synopsis, Description, Options,
//! Sub-Commands) mirroring the structure of a troff manual page, for hosts
//! that feed the tree into a man-page writer.

use crate::error::Result;
use crate::introspect::ParserDescription;
use crate::nodes::DocNode;
use crate::overrides::map_overrides;
use crate::render::groups::option_list;

/// Toggles honored by the man-page layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManpageSettings {
    pub markup_help: bool,
    pub no_description: bool,
    pub no_epilog: bool,
    pub no_subcommands: bool,
}

pub fn render_manpage(
    description: &ParserDescription,
    body: &[DocNode],
    settings: &ManpageSettings,
) -> Result<Vec<DocNode>> {
    let overrides = map_overrides(body)?;
    let mut out = Vec::new();

    out.push(DocNode::section(
        vec!["synopsis-section".to_string()],
        vec!["Synopsis".to_string()],
        vec![
            DocNode::title_text("Synopsis"),
            DocNode::literal_block(description.bare_usage.clone()),
        ],
    ));

    // The epilog toggle is independent of the description toggle: dropping
    // the description must not drop the epilog with it.
    let epilog = if settings.no_epilog {
        None
    } else {
        description.epilog.clone()
    };
    if !settings.no_description {
        let mut children = vec![DocNode::title_text("Description")];
        children.push(DocNode::plain_paragraph(summary_line(description)));
        children.extend(body.iter().filter(|node| {
            !matches!(node, DocNode::DefinitionList { .. })
        }).cloned());
        if let Some(epilog) = &epilog {
            children.push(DocNode::plain_paragraph(epilog.clone()));
        }
        out.push(DocNode::section(
            vec!["description-section".to_string()],
            vec!["Description".to_string()],
            children,
        ));
    } else if let Some(epilog) = &epilog {
        out.push(DocNode::plain_paragraph(epilog.clone()));
    }

    let has_options = !description.args.is_empty()
        || description
            .action_groups
            .iter()
            .any(|group| !group.positional && !group.options.is_empty());
    if has_options {
        let mut option_children = vec![DocNode::title_text("Options")];
        if !description.args.is_empty() {
            option_children.push(option_list(&description.args, &overrides, settings.markup_help));
        }
        for group in &description.action_groups {
            if group.positional || group.options.is_empty() {
                continue;
            }
            option_children.push(DocNode::Paragraph {
                children: vec![DocNode::Strong {
                    children: vec![DocNode::text(group.title.clone())],
                }],
            });
            option_children.push(option_list(&group.options, &overrides, settings.markup_help));
        }
        out.push(DocNode::section(
            vec!["options-section".to_string()],
            vec!["Options".to_string()],
            option_children,
        ));
    }

    if !settings.no_subcommands && !description.children.is_empty() {
        let items = description
            .children
            .iter()
            .map(|child| DocNode::DefinitionListItem {
                term: vec![DocNode::Strong {
                    children: vec![DocNode::text(child.bare_usage.clone())],
                }],
                definition: vec![DocNode::plain_paragraph(summary_line(child))],
            })
            .collect();
        out.push(DocNode::section(
            vec!["subcommands-section".to_string()],
            vec!["Sub-Commands".to_string()],
            vec![
                DocNode::title_text("Sub-Commands"),
                DocNode::DefinitionList { children: items },
            ],
        ));
    }

    Ok(out)
}

fn summary_line(description: &ParserDescription) -> String {
    description
        .description
        .clone()
        .or_else(|| description.help.clone())
        .unwrap_or_else(|| "Undocumented".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{parse_parser, IntrospectOptions};

    fn tool() -> clap::Command {
        clap::Command::new("tool")
            .about("Does tool things")
            .after_help("Closing remarks.")
            .arg(clap::Arg::new("input").help("Input file").value_name("FILE"))
            .arg(clap::Arg::new("force").long("force").action(clap::ArgAction::SetTrue))
            .subcommand(clap::Command::new("sub").about("A sub-command"))
    }

    fn section_ids(nodes: &[DocNode]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|node| match node {
                DocNode::Section { ids, .. } => ids.first().cloned(),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn emits_the_four_fixed_sections() {
        let description = parse_parser(&tool(), &IntrospectOptions::default());
        let nodes = render_manpage(&description, &[], &ManpageSettings::default())
            .expect("no overrides");
        assert_eq!(
            section_ids(&nodes),
            vec![
                "synopsis-section",
                "description-section",
                "options-section",
                "subcommands-section"
            ]
        );
    }

    #[test]
    fn toggles_drop_description_and_subcommands() {
        let description = parse_parser(&tool(), &IntrospectOptions::default());
        let settings = ManpageSettings {
            no_description: true,
            no_subcommands: true,
            ..ManpageSettings::default()
        };
        let nodes = render_manpage(&description, &[], &settings).expect("no overrides");
        assert_eq!(section_ids(&nodes), vec!["synopsis-section", "options-section"]);
    }

    #[test]
    fn description_carries_body_and_epilog() {
        let description = parse_parser(&tool(), &IntrospectOptions::default());
        let body = vec![
            DocNode::plain_paragraph("extra prose"),
            DocNode::DefinitionList { children: vec![] },
        ];
        let nodes = render_manpage(&description, &body, &ManpageSettings::default())
            .expect("no overrides");
        let text = nodes[1].to_text();
        assert!(text.contains("Does tool things"));
        assert!(text.contains("extra prose"));
        assert!(text.contains("Closing remarks."));
        // Override definition lists are consumed, not re-rendered.
        assert!(!nodes[1]
            .child_slots()
            .iter()
            .flat_map(|slot| slot.iter())
            .any(|node| matches!(node, DocNode::DefinitionList { .. })));
    }

    #[test]
    fn epilog_survives_without_the_description_section() {
        let description = parse_parser(&tool(), &IntrospectOptions::default());
        let settings = ManpageSettings {
            no_description: true,
            ..ManpageSettings::default()
        };
        let nodes = render_manpage(&description, &[], &settings).expect("no overrides");
        let text: String = nodes.iter().map(DocNode::to_text).collect();
        assert!(text.contains("Closing remarks."));
        assert!(!text.contains("Does tool things"));

        let settings = ManpageSettings {
            no_description: true,
            no_epilog: true,
            ..ManpageSettings::default()
        };
        let nodes = render_manpage(&description, &[], &settings).expect("no overrides");
        let text: String = nodes.iter().map(DocNode::to_text).collect();
        assert!(!text.contains("Closing remarks."));
    }

    #[test]
    fn argument_free_commands_get_no_options_section() {
        let command = clap::Command::new("bare")
            .about("Nothing to configure")
            .disable_help_flag(true);
        let description = parse_parser(&command, &IntrospectOptions::default());
        let nodes = render_manpage(&description, &[], &ManpageSettings::default())
            .expect("no overrides");
        assert_eq!(section_ids(&nodes), vec!["synopsis-section", "description-section"]);
    }

    #[test]
    fn options_section_separates_positionals_from_groups() {
        let description = parse_parser(&tool(), &IntrospectOptions::default());
        let nodes = render_manpage(&description, &[], &ManpageSettings::default())
            .expect("no overrides");
        let DocNode::Section { children, .. } = &nodes[2] else {
            panic!("expected options section");
        };
        // Title, positional list, then a bolded group heading and its list.
        assert!(matches!(children[1], DocNode::BulletList { .. }));
        assert!(children.iter().any(|node| {
            matches!(node, DocNode::Paragraph { children }
                if matches!(children.first(), Some(DocNode::Strong { .. })))
        }));
    }
}
