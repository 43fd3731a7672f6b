//! hardenkit — security-compliance script templates.
//!
//! # Usage
//!
//! ```text
//! hardenkit init [--force]
//! hardenkit list [--search S] [--category C] [--checklist U-102] [--difficulty D]
//!                [--official | --community] [--tag T]... [--sort KEY] [--desc] [--json]
//! hardenkit show <id> [--json]
//! hardenkit generate <id> [--var NAME=VALUE]... [--out PATH] [--dry-run] [--user U] [--json]
//! hardenkit diff <id> [--var NAME=VALUE]... --out PATH
//! hardenkit usage [--template ID] [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{
    diff::DiffArgs, generate::GenerateArgs, init::InitArgs, list::ListArgs, show::ShowArgs,
    usage::UsageArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "hardenkit",
    version,
    about = "Browse and generate Linux security-compliance scripts from templates",
    long_about = None,
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seed ~/.hardenkit/catalog.yaml with the built-in templates.
    Init(InitArgs),

    /// List templates, optionally filtered and sorted.
    List(ListArgs),

    /// Show one template with its variables.
    Show(ShowArgs),

    /// Generate a script from a template.
    Generate(GenerateArgs),

    /// Show what re-generating would change in an exported script.
    Diff(DiffArgs),

    /// Show recorded template uses.
    Usage(UsageArgs),
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::List(args) => args.run(),
        Commands::Show(args) => args.run(),
        Commands::Generate(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Usage(args) => args.run(),
    }
}
