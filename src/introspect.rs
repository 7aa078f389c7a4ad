//! Command definition introspection.
//!
//! Walks a `clap::Command` and produces a plain, owned description of its
//! arguments, option groups, and sub-commands. The description is the only
//! input the renderer sees, which keeps rendering deterministic and easy to
//! test against hand-built trees.

use serde::Serialize;

use crate::error::{DocgenError, Result};

/// Title of the pseudo-group holding positional arguments, matching the
/// heading conventionally used in generated CLI documentation.
pub const POSITIONAL_GROUP_TITLE: &str = "Positional Arguments";

/// Default heading for options that declare no explicit help heading.
pub const DEFAULT_GROUP_TITLE: &str = "Options";

#[derive(Debug, Clone, Copy, Default)]
pub struct IntrospectOptions {
    /// Record `DefaultValue::Suppressed` instead of ordinary default values.
    pub skip_default_values: bool,
    /// Record `DefaultValue::Suppressed` instead of defaults on
    /// constant-valued options (flags, counters, help/version).
    pub skip_default_const_values: bool,
}

/// A captured default, replacing the magic suppression string the equivalent
/// dynamic-language tooling uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    None,
    Suppressed,
    Value(String),
}

impl DefaultValue {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, DefaultValue::Suppressed)
    }
}

/// One positional or optional argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgDescriptor {
    /// Display names: `-s`, `--long`, aliases; the metavar for positionals.
    pub names: Vec<String>,
    pub metavar: String,
    pub help: Option<String>,
    pub default: DefaultValue,
    pub choices: Option<Vec<String>>,
}

/// A titled cluster of related options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionGroup {
    pub title: String,
    /// Group descriptions come only from overrides; command definitions carry
    /// no heading text.
    pub description: Option<String>,
    pub options: Vec<ArgDescriptor>,
    /// Marks the positional pseudo-group, which man-page rendering lists
    /// separately.
    pub positional: bool,
}

/// One command or sub-command, with `children` forming a finite tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParserDescription {
    pub name: String,
    /// Accumulated command path from the root, e.g. `["tool", "sub"]`.
    pub path: Vec<String>,
    pub usage: String,
    pub bare_usage: String,
    pub description: Option<String>,
    pub epilog: Option<String>,
    /// Short help line used when listing this command under its parent.
    pub help: Option<String>,
    pub args: Vec<ArgDescriptor>,
    pub action_groups: Vec<ActionGroup>,
    pub children: Vec<ParserDescription>,
}

impl ParserDescription {
    /// Full spaced command path, e.g. `tool sub`.
    pub fn full_command(&self) -> String {
        crate::anchor::command_path_text(&self.path)
    }
}

/// Introspect a command definition into a [`ParserDescription`].
pub fn parse_parser(command: &clap::Command, options: &IntrospectOptions) -> ParserDescription {
    // The auto-generated `help` sub-command would otherwise show up in every
    // child list; the help flag itself is kept.
    let mut command = command.clone().disable_help_subcommand(true);
    command.build();
    let path = vec![command.get_name().to_string()];
    describe(&command, path, options)
}

/// Walk `path` (slash- or whitespace-delimited sub-command names) down the
/// `children` relation. Any unmatched segment fails; no partial tree is
/// returned.
pub fn navigate<'a>(
    description: &'a ParserDescription,
    path: &str,
) -> Result<&'a ParserDescription> {
    let mut current = description;
    let segments = path
        .split(|ch: char| ch == '/' || ch.is_whitespace())
        .filter(|segment| !segment.is_empty());
    for segment in segments {
        current = current
            .children
            .iter()
            .find(|child| child.name == segment)
            .ok_or_else(|| DocgenError::PathNotFound {
                parent: current.full_command(),
                segment: segment.to_string(),
            })?;
    }
    Ok(current)
}

fn describe(
    command: &clap::Command,
    path: Vec<String>,
    options: &IntrospectOptions,
) -> ParserDescription {
    let mut usage_command = command.clone().bin_name(path.join(" "));
    usage_command.build();
    let usage = usage_command.render_usage().to_string();
    let bare_usage = usage.strip_prefix("Usage: ").unwrap_or(&usage).to_string();

    let args: Vec<ArgDescriptor> = command
        .get_positionals()
        .filter(|arg| !arg.is_hide_set())
        .map(|arg| describe_positional(arg, options))
        .collect();

    let mut action_groups: Vec<ActionGroup> = Vec::new();
    if !args.is_empty() {
        action_groups.push(ActionGroup {
            title: POSITIONAL_GROUP_TITLE.to_string(),
            description: None,
            options: args.clone(),
            positional: true,
        });
    }
    for arg in command.get_arguments() {
        if arg.is_positional() || arg.is_hide_set() {
            continue;
        }
        let title = arg
            .get_help_heading()
            .unwrap_or(DEFAULT_GROUP_TITLE)
            .to_string();
        let descriptor = describe_option(arg, options);
        match action_groups
            .iter_mut()
            .find(|group| group.title == title && !group.positional)
        {
            Some(group) => group.options.push(descriptor),
            None => action_groups.push(ActionGroup {
                title,
                description: None,
                options: vec![descriptor],
                positional: false,
            }),
        }
    }

    let children = command
        .get_subcommands()
        .filter(|sub| !sub.is_hide_set() && sub.get_name() != "help")
        .map(|sub| {
            let mut child_path = path.clone();
            child_path.push(sub.get_name().to_string());
            describe(sub, child_path, options)
        })
        .collect();

    ParserDescription {
        name: path.last().cloned().unwrap_or_default(),
        path,
        usage,
        bare_usage,
        description: styled_text(command.get_long_about().or_else(|| command.get_about())),
        epilog: styled_text(
            command
                .get_after_long_help()
                .or_else(|| command.get_after_help()),
        ),
        help: styled_text(command.get_about()),
        args,
        action_groups,
        children,
    }
}

fn describe_positional(arg: &clap::Arg, options: &IntrospectOptions) -> ArgDescriptor {
    let metavar = metavar(arg);
    ArgDescriptor {
        names: vec![metavar.clone()],
        metavar,
        help: help_text(arg),
        default: capture_default(arg, options),
        choices: choices(arg),
    }
}

fn describe_option(arg: &clap::Arg, options: &IntrospectOptions) -> ArgDescriptor {
    let mut names = Vec::new();
    if let Some(short) = arg.get_short() {
        names.push(format!("-{short}"));
    }
    if let Some(long) = arg.get_long() {
        names.push(format!("--{long}"));
    }
    if let Some(aliases) = arg.get_visible_aliases() {
        for alias in aliases {
            names.push(format!("--{alias}"));
        }
    }
    if names.is_empty() {
        names.push(arg.get_id().to_string());
    }
    ArgDescriptor {
        names,
        metavar: metavar(arg),
        help: help_text(arg),
        default: capture_default(arg, options),
        choices: choices(arg),
    }
}

fn capture_default(arg: &clap::Arg, options: &IntrospectOptions) -> DefaultValue {
    let defaults = arg.get_default_values();
    if defaults.is_empty() {
        return DefaultValue::None;
    }
    let const_valued = matches!(
        arg.get_action(),
        clap::ArgAction::SetTrue
            | clap::ArgAction::SetFalse
            | clap::ArgAction::Count
            | clap::ArgAction::Help
            | clap::ArgAction::HelpShort
            | clap::ArgAction::HelpLong
            | clap::ArgAction::Version
    );
    let suppressed = if const_valued {
        options.skip_default_const_values
    } else {
        options.skip_default_values
    };
    if suppressed {
        return DefaultValue::Suppressed;
    }
    DefaultValue::Value(
        defaults
            .iter()
            .map(|value| value.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn choices(arg: &clap::Arg) -> Option<Vec<String>> {
    let values: Vec<String> = arg
        .get_possible_values()
        .iter()
        .filter(|value| !value.is_hide_set())
        .map(|value| value.get_name().to_string())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn metavar(arg: &clap::Arg) -> String {
    if let Some(names) = arg.get_value_names() {
        if let Some(first) = names.first() {
            return first.to_string();
        }
    }
    arg.get_id().to_string()
}

fn help_text(arg: &clap::Arg) -> Option<String> {
    styled_text(arg.get_long_help().or_else(|| arg.get_help()))
}

fn styled_text(text: Option<&clap::builder::StyledStr>) -> Option<String> {
    text.map(ToString::to_string)
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_command() -> clap::Command {
        clap::Command::new("tool")
            .about("Does tool things")
            .after_help("See the manual for more.")
            .arg(
                clap::Arg::new("input")
                    .help("Input file")
                    .value_name("FILE"),
            )
            .arg(
                clap::Arg::new("speed")
                    .long("speed")
                    .help("Transfer speed")
                    .value_parser(["fast", "slow"])
                    .default_value("slow"),
            )
            .arg(
                clap::Arg::new("force")
                    .long("force")
                    .short('f')
                    .help("Force it")
                    .action(clap::ArgAction::SetTrue)
                    .help_heading("Danger Zone"),
            )
            .subcommand(
                clap::Command::new("sub")
                    .about("A sub-command")
                    .arg(clap::Arg::new("x").long("x").help("desc")),
            )
    }

    #[test]
    fn captures_groups_in_first_seen_order() {
        let description = parse_parser(&sample_command(), &IntrospectOptions::default());
        let titles: Vec<&str> = description
            .action_groups
            .iter()
            .map(|group| group.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Positional Arguments", "Options", "Danger Zone"]);
        assert!(description.action_groups[0].positional);
    }

    #[test]
    fn captures_choices_and_defaults() {
        let description = parse_parser(&sample_command(), &IntrospectOptions::default());
        let speed = description
            .action_groups
            .iter()
            .flat_map(|group| &group.options)
            .find(|option| option.names.contains(&"--speed".to_string()))
            .expect("--speed captured");
        assert_eq!(
            speed.choices,
            Some(vec!["fast".to_string(), "slow".to_string()])
        );
        assert_eq!(speed.default, DefaultValue::Value("slow".to_string()));
    }

    #[test]
    fn skip_default_values_suppresses_ordinary_defaults() {
        let options = IntrospectOptions {
            skip_default_values: true,
            skip_default_const_values: false,
        };
        let description = parse_parser(&sample_command(), &options);
        let speed = description
            .action_groups
            .iter()
            .flat_map(|group| &group.options)
            .find(|option| option.names.contains(&"--speed".to_string()))
            .expect("--speed captured");
        assert!(speed.default.is_suppressed());
    }

    #[test]
    fn skip_default_const_values_targets_flags_only() {
        let options = IntrospectOptions {
            skip_default_values: false,
            skip_default_const_values: true,
        };
        let description = parse_parser(&sample_command(), &options);
        let by_name = |name: &str| {
            description
                .action_groups
                .iter()
                .flat_map(|group| &group.options)
                .find(|option| option.names.contains(&name.to_string()))
                .cloned()
                .expect("option captured")
        };
        assert!(by_name("--force").default.is_suppressed());
        assert_eq!(
            by_name("--speed").default,
            DefaultValue::Value("slow".to_string())
        );
    }

    #[test]
    fn builds_child_paths() {
        let description = parse_parser(&sample_command(), &IntrospectOptions::default());
        assert_eq!(description.children.len(), 1);
        let child = &description.children[0];
        assert_eq!(child.full_command(), "tool sub");
        assert!(child.bare_usage.contains("tool sub"));
    }

    #[test]
    fn navigate_walks_children() {
        let description = parse_parser(&sample_command(), &IntrospectOptions::default());
        let child = navigate(&description, "sub").expect("sub exists");
        assert_eq!(child.name, "sub");
        // Slash and space delimiters are interchangeable.
        assert_eq!(navigate(&description, "/sub/").expect("sub exists").name, "sub");
        assert_eq!(navigate(&description, "").expect("empty path").name, "tool");
    }

    #[test]
    fn navigate_misses_are_not_found() {
        let description = parse_parser(&sample_command(), &IntrospectOptions::default());
        let err = navigate(&description, "sub missing").expect_err("no such child");
        assert!(matches!(
            err,
            DocgenError::PathNotFound { parent, segment }
                if parent == "tool sub" && segment == "missing"
        ));
    }

    #[test]
    fn positional_metavar_prefers_value_name() {
        let description = parse_parser(&sample_command(), &IntrospectOptions::default());
        assert_eq!(description.args[0].metavar, "FILE");
    }
}
