use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use argdoc::{
    parse_markup_block, ArgparseDirective, CommandFactory, CommandRegistry, DirectiveOptions,
    InMemoryIndex, IntrospectOptions,
};

#[derive(Parser, Debug)]
#[command(name = "argdoc-dump", version, about = "Dump argdoc node trees as JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a markdown file into a node tree
    Parse(ParseArgs),
    /// Render a built-in sample command through the full pipeline
    Demo(DemoArgs),
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Markdown file to convert
    file: PathBuf,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Print the introspected description instead of the rendered tree
    #[arg(long)]
    introspect_only: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Parse(args) => run_parse(&args),
        Commands::Demo(args) => run_demo(&args),
    }
}

fn run_parse(args: &ParseArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let nodes = parse_markup_block(&text);
    println!("{}", serde_json::to_string_pretty(&nodes)?);
    Ok(())
}

fn run_demo(args: &DemoArgs) -> Result<()> {
    if args.introspect_only {
        let description =
            argdoc::parse_parser(&sample_command(), &IntrospectOptions::default());
        println!("{}", serde_json::to_string_pretty(&description)?);
        return Ok(());
    }

    let mut registry = CommandRegistry::new();
    registry.register("demo.sample", CommandFactory::New(sample_command));
    let directive = ArgparseDirective {
        options: DirectiveOptions {
            module: Some("demo".to_string()),
            func: Some("sample".to_string()),
            markup_help: true,
            ..DirectiveOptions::default()
        },
        content: String::new(),
    };
    let mut index = InMemoryIndex::new("demo");
    let nodes = directive
        .run(&registry, &mut index)
        .context("rendering the sample command")?;
    println!("{}", serde_json::to_string_pretty(&nodes)?);
    Ok(())
}

fn sample_command() -> clap::Command {
    clap::Command::new("sample")
        .about("Sample command used to exercise the renderer")
        .after_help("See `sample sub --help` for more.")
        .arg(
            clap::Arg::new("input")
                .help("Input file")
                .value_name("FILE"),
        )
        .arg(
            clap::Arg::new("mode")
                .long("mode")
                .help("Operating mode")
                .value_parser(["fast", "slow"])
                .default_value("fast"),
        )
        .subcommand(
            clap::Command::new("sub")
                .about("A nested level")
                .arg(clap::Arg::new("force").long("force").short('f').help("Force it")),
        )
}
