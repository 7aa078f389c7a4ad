//! Structured documentation generator for command-line argument parsers.
//!
//! The pipeline has three stages: introspect a [`clap::Command`] into a plain
//! [`ParserDescription`], merge it with override content parsed from a
//! directive body, and render the result as a tree of [`DocNode`] values a
//! documentation host can serialize or translate into its own node model.
//!
//! ```
//! use argdoc::{ArgparseDirective, CommandFactory, CommandRegistry, DirectiveOptions,
//!     InMemoryIndex};
//!
//! let mut registry = CommandRegistry::new();
//! registry.register(
//!     "demo.tool",
//!     CommandFactory::New(|| {
//!         clap::Command::new("tool")
//!             .about("Does tool things")
//!             .arg(clap::Arg::new("force").long("force").help("Force it"))
//!     }),
//! );
//!
//! let directive = ArgparseDirective {
//!     options: DirectiveOptions {
//!         module: Some("demo".to_string()),
//!         func: Some("tool".to_string()),
//!         ..DirectiveOptions::default()
//!     },
//!     content: String::new(),
//! };
//! let mut index = InMemoryIndex::new("reference");
//! let nodes = directive.run(&registry, &mut index).unwrap();
//! assert!(!nodes.is_empty());
//! ```

pub mod anchor;
pub mod dedupe;
pub mod directive;
pub mod error;
pub mod index;
pub mod introspect;
pub mod markup;
pub mod nodes;
pub mod overrides;
pub mod render;

pub use directive::{
    ArgparseDirective, CommandFactory, CommandRegistry, CommandResolver, CommandSpec,
    DirectiveOptions,
};
pub use error::{DocgenError, Result};
pub use index::{CommandIndex, InMemoryIndex, IndexEntry};
pub use introspect::{
    navigate, parse_parser, ActionGroup, ArgDescriptor, DefaultValue, IntrospectOptions,
    ParserDescription,
};
pub use markup::parse_markup_block;
pub use nodes::{DocNode, TokenSpan};
