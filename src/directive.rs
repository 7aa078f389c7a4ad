//! Directive entry point.
//!
//! [`ArgparseDirective`] is the seam a documentation host drives: it carries
//! the parsed option set and the raw body content, resolves the target
//! command through a [`CommandResolver`], and assembles the final node tree.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::anchor::make_id;
use crate::dedupe::ensure_unique_ids;
use crate::error::{DocgenError, Result};
use crate::index::CommandIndex;
use crate::introspect::{navigate, parse_parser, IntrospectOptions, ParserDescription};
use crate::markup::parse_markup_block;
use crate::nodes::DocNode;
use crate::overrides::Fragment;
use crate::render::{
    render_action_groups, render_fragments, render_manpage, render_subcommands, ManpageSettings,
    RenderSettings,
};

/// Recognized directive options. Field names follow the canonical option
/// spellings; `index_groups` holds the already-split group labels.
#[derive(Debug, Clone, Default)]
pub struct DirectiveOptions {
    pub module: Option<String>,
    pub func: Option<String>,
    pub reference: Option<String>,
    pub filename: Option<PathBuf>,
    /// Override the documented program name.
    pub prog: Option<String>,
    /// Sub-command path to document instead of the root.
    pub path: Option<String>,
    pub no_default: bool,
    pub no_default_const: bool,
    pub no_subcommands: bool,
    pub pass_parser: bool,
    pub no_epilog: bool,
    pub no_description: bool,
    /// Parse the directive body as markup rather than flattening it.
    pub markup_body: bool,
    /// Parse generated help strings as markup.
    pub markup_help: bool,
    pub manpage: bool,
    pub full_subcommand_name: bool,
    pub index_groups: Vec<String>,
}

impl DirectiveOptions {
    /// Parse the raw comma-separated `index-groups` option value.
    pub fn set_index_groups(&mut self, raw: &str) {
        self.index_groups = raw
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// Determine which command lookup the options describe. Exactly three
    /// combinations are legal; anything else fails before rendering starts.
    pub fn command_spec(&self) -> Result<CommandSpec> {
        if let (Some(module), Some(func)) = (&self.module, &self.func) {
            return Ok(CommandSpec::Named {
                module: module.clone(),
                func: func.clone(),
            });
        }
        if let Some(reference) = &self.reference {
            return Ok(CommandSpec::Ref(reference.clone()));
        }
        if let (Some(filename), Some(func)) = (&self.filename, &self.func) {
            return Ok(CommandSpec::File {
                filename: filename.clone(),
                func: func.clone(),
            });
        }
        Err(DocgenError::Config(
            "`module` and `func` should be specified, or `ref`, or `filename` and `func`"
                .to_string(),
        ))
    }
}

/// Where to find the command definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    Named { module: String, func: String },
    Ref(String),
    File { filename: PathBuf, func: String },
}

impl CommandSpec {
    /// Stable registry key, also used to scope generated group ids.
    pub fn key(&self) -> String {
        match self {
            CommandSpec::Named { module, func } => format!("{module}.{func}"),
            CommandSpec::Ref(reference) => reference.clone(),
            CommandSpec::File { filename, func } => {
                format!("{}:{func}", filename.display())
            }
        }
    }
}

/// A registered way of producing a command definition.
pub enum CommandFactory {
    /// A pre-built command, cloned on every resolve.
    Instance(clap::Command),
    /// A plain factory.
    New(fn() -> clap::Command),
    /// A factory that amends a seed command, for `pass_parser` directives.
    Amend(fn(clap::Command) -> clap::Command),
}

/// Host seam for turning a [`CommandSpec`] into a live command definition.
pub trait CommandResolver {
    fn resolve(&self, spec: &CommandSpec, pass_parser: bool) -> Result<clap::Command>;
}

/// Table-driven resolver keyed by [`CommandSpec::key`].
#[derive(Default)]
pub struct CommandRegistry {
    factories: BTreeMap<String, CommandFactory>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: impl Into<String>, factory: CommandFactory) {
        self.factories.insert(key.into(), factory);
    }
}

impl CommandResolver for CommandRegistry {
    fn resolve(&self, spec: &CommandSpec, pass_parser: bool) -> Result<clap::Command> {
        let key = spec.key();
        let factory = self
            .factories
            .get(&key)
            .ok_or_else(|| DocgenError::Config(format!("no command registered for `{key}`")))?;
        match factory {
            CommandFactory::Instance(command) => Ok(command.clone()),
            CommandFactory::New(build) => {
                if pass_parser {
                    return Err(DocgenError::Config(format!(
                        "`{key}` builds its own parser; drop the `passparser` option"
                    )));
                }
                Ok(build())
            }
            CommandFactory::Amend(amend) => {
                if !pass_parser {
                    return Err(DocgenError::Config(format!(
                        "`{key}` amends an existing parser; set the `passparser` option"
                    )));
                }
                Ok(amend(clap::Command::new("program")))
            }
        }
    }
}

/// One directive invocation: options plus raw body content.
#[derive(Debug, Clone, Default)]
pub struct ArgparseDirective {
    pub options: DirectiveOptions,
    pub content: String,
}

impl ArgparseDirective {
    pub fn run(
        &self,
        resolver: &dyn CommandResolver,
        index: &mut dyn CommandIndex,
    ) -> Result<Vec<DocNode>> {
        let spec = self.options.command_spec()?;
        let mut command = resolver.resolve(&spec, self.options.pass_parser)?;
        if let Some(prog) = &self.options.prog {
            command = command.name(prog.clone());
        }

        let introspect_options = IntrospectOptions {
            skip_default_values: self.options.no_default,
            skip_default_const_values: self.options.no_default_const,
        };
        let description = parse_parser(&command, &introspect_options);
        let description = match &self.options.path {
            Some(path) => navigate(&description, path)?.clone(),
            None => description,
        };

        let body = self.body_nodes();
        let mut nodes = if self.options.manpage {
            let settings = ManpageSettings {
                markup_help: self.options.markup_help,
                no_description: self.options.no_description,
                no_epilog: self.options.no_epilog,
                no_subcommands: self.options.no_subcommands,
            };
            render_manpage(&description, &body, &settings)?
        } else {
            self.standard_items(&spec, &description, &body, index)?
        };
        if std::env::var_os("ARGDOC_DEBUG_SECTION").is_some() {
            nodes.push(debug_section(&description)?);
        }
        ensure_unique_ids(&mut nodes);
        Ok(nodes)
    }

    /// Body content as nodes. Definition lists are always extracted so
    /// overrides work either way; without `markup_body` everything else is
    /// flattened to plain paragraphs.
    fn body_nodes(&self) -> Vec<DocNode> {
        if self.content.trim().is_empty() {
            return Vec::new();
        }
        let parsed = parse_markup_block(&self.content);
        if self.options.markup_body {
            return parsed;
        }
        parsed
            .into_iter()
            .filter_map(|node| match node {
                list @ DocNode::DefinitionList { .. } => Some(list),
                other => {
                    let text = other.to_text();
                    if text.is_empty() {
                        None
                    } else {
                        Some(DocNode::plain_paragraph(text))
                    }
                }
            })
            .collect()
    }

    fn standard_items(
        &self,
        spec: &CommandSpec,
        description: &ParserDescription,
        body: &[DocNode],
        index: &mut dyn CommandIndex,
    ) -> Result<Vec<DocNode>> {
        let settings = RenderSettings {
            markup_help: self.options.markup_help,
            full_subcommand_name: self.options.full_subcommand_name,
            id_prefix: make_id(&spec.key()),
            index_groups: &self.options.index_groups,
        };
        let full_command = description.full_command();
        let node_id = make_id(&full_command);

        let mut items: Vec<DocNode> = body
            .iter()
            .filter(|node| !matches!(node, DocNode::DefinitionList { .. }))
            .cloned()
            .collect();
        if !self.options.no_description {
            if let Some(text) = &description.description {
                items.extend(render_fragments(
                    &[Fragment::Text(text.clone())],
                    self.options.markup_help,
                ));
            }
        }
        items.push(DocNode::Target {
            ids: vec![node_id.clone()],
        });
        index.add_entry(
            &full_command,
            description
                .description
                .as_deref()
                .unwrap_or("No description."),
            &node_id,
            &self.options.index_groups,
        );
        items.push(DocNode::literal_block(description.bare_usage.clone()));
        items.extend(render_action_groups(description, body, &settings)?);
        if !self.options.no_subcommands {
            items.extend(render_subcommands(description, body, &settings, index)?);
        }
        if !self.options.no_epilog {
            if let Some(epilog) = &description.epilog {
                items.extend(render_fragments(
                    &[Fragment::Text(epilog.clone())],
                    self.options.markup_help,
                ));
            }
        }
        Ok(items)
    }
}

/// JSON view of the introspected command, appended to either layout when the
/// `ARGDOC_DEBUG_SECTION` env var is set.
fn debug_section(description: &ParserDescription) -> Result<DocNode> {
    Ok(DocNode::section(
        vec!["debug-section".to_string()],
        vec!["Debug".to_string()],
        vec![
            DocNode::title_text("Debug"),
            DocNode::literal_block(serde_json::to_string_pretty(description)?),
        ],
    ))
}
