//! Option group sections.

use crate::anchor::make_id;
use crate::error::Result;
use crate::introspect::{ArgDescriptor, DefaultValue, ParserDescription};
use crate::nodes::DocNode;
use crate::overrides::{apply_override, map_overrides, Classifier, Fragment, OverrideEntry,
    OverrideMap};
use crate::render::{render_fragments, RenderSettings};

/// Render one section per non-empty option group. Body definition lists feed
/// the override map; a group whose title is marked `@skip` is dropped
/// entirely.
pub fn render_action_groups(
    description: &ParserDescription,
    body: &[DocNode],
    settings: &RenderSettings<'_>,
) -> Result<Vec<DocNode>> {
    let overrides = map_overrides(body)?;
    let full_command = description.full_command();

    let mut out = Vec::new();
    for group in &description.action_groups {
        if group.options.is_empty() {
            continue;
        }
        let group_entry = overrides.get(&group.title);
        if matches!(group_entry.map(|entry| entry.classifier), Some(Classifier::Skip)) {
            continue;
        }

        let title_slug = make_id(&group.title);
        let mut ids = vec![make_id(&format!("{full_command} {}", group.title))];
        if !settings.id_prefix.is_empty() {
            ids.push(format!("{}-{title_slug}", settings.id_prefix));
        }

        let mut children = vec![DocNode::title_text(group.title.clone())];
        let default_description: Vec<Fragment> = group
            .description
            .iter()
            .map(|text| Fragment::Text(text.clone()))
            .collect();
        children.extend(render_fragments(
            &apply_override(default_description, group_entry),
            settings.markup_help,
        ));
        children.push(option_list(&group.options, &overrides, settings.markup_help));

        out.push(DocNode::section(ids, vec![group.title.clone()], children));
    }
    Ok(out)
}

/// One bullet list covering `options`, shared with the man-page layout.
pub(super) fn option_list(
    options: &[ArgDescriptor],
    overrides: &OverrideMap,
    markup_help: bool,
) -> DocNode {
    let items = options
        .iter()
        .map(|option| option_item(option, overrides, markup_help))
        .collect();
    DocNode::BulletList { children: items }
}

fn option_item(option: &ArgDescriptor, overrides: &OverrideMap, markup_help: bool) -> DocNode {
    let entry = lookup(option, overrides);

    let mut fragments = Vec::new();
    if let Some(choices) = &option.choices {
        fragments.push(Fragment::Text(format!(
            "Possible choices: {}",
            choices.join(", ")
        )));
    }
    match &option.help {
        Some(help) => fragments.push(Fragment::Text(help.clone())),
        // The placeholder only fills a truly empty item; a choices line alone
        // is enough.
        None if option.choices.is_none() => {
            fragments.push(Fragment::Text("Undocumented".to_string()));
        }
        None => {}
    }
    let mut fragments = apply_override(fragments, entry);
    if let Some(entry) = entry {
        if !entry.nested.is_empty() {
            fragments.push(Fragment::Nodes(entry.nested.clone()));
        }
    }
    if let DefaultValue::Value(value) = &option.default {
        fragments.push(Fragment::Nodes(vec![DocNode::Paragraph {
            children: vec![
                DocNode::text("Default: "),
                DocNode::Literal {
                    text: value.clone(),
                    classes: vec!["code".to_string()],
                },
            ],
        }]));
    }

    let display = option.names.join(", ");
    let mut children = vec![DocNode::Paragraph {
        children: vec![DocNode::Literal {
            text: display,
            classes: vec!["option".to_string()],
        }],
    }];
    children.extend(render_fragments(&fragments, markup_help));
    DocNode::ListItem { children }
}

/// Overrides match the space-joined name list or any single name, so a body
/// can target `--force` without spelling out `-f --force`.
fn lookup<'a>(option: &ArgDescriptor, overrides: &'a OverrideMap) -> Option<&'a OverrideEntry> {
    overrides
        .get(&option.names.join(" "))
        .or_else(|| option.names.iter().find_map(|name| overrides.get(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{parse_parser, IntrospectOptions};

    fn tool() -> clap::Command {
        clap::Command::new("tool")
            .arg(
                clap::Arg::new("mode")
                    .long("mode")
                    .help("Operating mode")
                    .value_parser(["fast", "slow"])
                    .default_value("fast"),
            )
            .arg(
                clap::Arg::new("trace")
                    .long("trace")
                    .help("Enable tracing")
                    .action(clap::ArgAction::SetTrue)
                    .help_heading("Advanced"),
            )
    }

    fn settings(index_groups: &[String]) -> RenderSettings<'_> {
        RenderSettings {
            markup_help: false,
            full_subcommand_name: false,
            id_prefix: "demo-tool".to_string(),
            index_groups,
        }
    }

    fn section_names(sections: &[DocNode]) -> Vec<String> {
        sections
            .iter()
            .filter_map(|node| match node {
                DocNode::Section { names, .. } => names.first().cloned(),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn renders_each_group_with_scoped_ids() {
        let description = parse_parser(&tool(), &IntrospectOptions::default());
        let groups_arg: Vec<String> = vec![];
        let sections = render_action_groups(&description, &[], &settings(&groups_arg))
            .expect("no overrides");
        assert_eq!(section_names(&sections), vec!["Options", "Advanced"]);
        let DocNode::Section { ids, .. } = &sections[0] else {
            panic!("expected section");
        };
        assert_eq!(ids, &vec!["tool-options".to_string(), "demo-tool-options".to_string()]);
    }

    #[test]
    fn skip_classifier_drops_a_group() {
        let body = vec![DocNode::DefinitionList {
            children: vec![DocNode::DefinitionListItem {
                term: vec![DocNode::text("Advanced : @skip")],
                definition: vec![],
            }],
        }];
        let description = parse_parser(&tool(), &IntrospectOptions::default());
        let groups_arg: Vec<String> = vec![];
        let sections =
            render_action_groups(&description, &body, &settings(&groups_arg)).expect("valid body");
        assert_eq!(section_names(&sections), vec!["Options"]);
    }

    #[test]
    fn items_carry_choices_help_and_default() {
        let description = parse_parser(&tool(), &IntrospectOptions::default());
        let groups_arg: Vec<String> = vec![];
        let sections = render_action_groups(&description, &[], &settings(&groups_arg))
            .expect("no overrides");
        let text = sections[0].to_text();
        assert!(text.contains("--mode"));
        assert!(text.contains("Possible choices: fast, slow"));
        assert!(text.contains("Operating mode"));
        assert!(text.contains("Default: "));
        assert!(text.contains("fast"));
    }

    #[test]
    fn replace_override_discards_generated_help() {
        let body = vec![DocNode::DefinitionList {
            children: vec![DocNode::DefinitionListItem {
                term: vec![DocNode::text("--mode : @replace")],
                definition: vec![DocNode::plain_paragraph("hand-written")],
            }],
        }];
        let description = parse_parser(&tool(), &IntrospectOptions::default());
        let groups_arg: Vec<String> = vec![];
        let sections =
            render_action_groups(&description, &body, &settings(&groups_arg)).expect("valid body");
        let text = sections[0].to_text();
        assert!(text.contains("hand-written"));
        assert!(!text.contains("Operating mode"));
        assert!(!text.contains("Possible choices"));
        // Replacement does not touch the trailing default line.
        assert!(text.contains("Default: "));
    }

    #[test]
    fn undocumented_options_say_so() {
        let command = clap::Command::new("tool").arg(clap::Arg::new("quiet").long("quiet"));
        let description = parse_parser(&command, &IntrospectOptions::default());
        let groups_arg: Vec<String> = vec![];
        let sections = render_action_groups(&description, &[], &settings(&groups_arg))
            .expect("no overrides");
        assert!(sections[0].to_text().contains("Undocumented"));
    }
}
