//! `hardenkit generate <id>` — fill a template and emit the script.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use hardenkit_core::{catalog, config, TemplateId};
use hardenkit_export::{use_template, UseOutcome, UseRequest, WriteResult};

use super::{home_dir, parse_vars, resolve_user};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Template id, e.g. u102-password-complexity.
    pub id: String,

    /// Variable value as NAME=VALUE (repeatable).
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Write the script here instead of printing it.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Generate without writing files or recording the use.
    #[arg(long)]
    pub dry_run: bool,

    /// Identity recorded in the usage log.
    #[arg(long)]
    pub user: Option<String>,

    /// Emit the full outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    pub fn run(self) -> Result<()> {
        let home = home_dir()?;
        let settings = config::load_at(&home).context("failed to load settings")?;
        let catalog = catalog::open_at(&home).context("failed to load catalog")?;
        let id = TemplateId::from(self.id.as_str());
        let template = catalog
            .get(&id)
            .with_context(|| format!("cannot generate '{}'", self.id))?;
        let values = parse_vars(template, &self.vars, &settings.array_separator)?;

        let request = UseRequest {
            template_id: id,
            values,
            user: resolve_user(self.user, &settings),
            output: self.out,
            dry_run: self.dry_run,
        };
        let outcome = use_template(&home, &request)
            .with_context(|| format!("generate failed for '{}'", self.id))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome).context("failed to serialize outcome")?
            );
        } else {
            report(&outcome, self.dry_run);
        }

        if !outcome.result.success {
            bail!("'{}' is missing required variables", self.id);
        }
        Ok(())
    }
}

fn report(outcome: &UseOutcome, dry_run: bool) {
    for warning in &outcome.result.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
    for error in &outcome.result.errors {
        eprintln!("{} {}", "error:".red().bold(), error);
    }
    if !outcome.result.success {
        return;
    }

    let prefix = if dry_run { "[dry-run] " } else { "" };
    match &outcome.write {
        None => print!("{}", outcome.script),
        Some(WriteResult::Written { path, .. }) => {
            println!("{prefix}✎  {}", path.display())
        }
        Some(WriteResult::WouldWrite { path, .. }) => {
            println!("{prefix}~  {}", path.display())
        }
        Some(WriteResult::Unchanged { path, .. }) => {
            println!("{prefix}·  {} (unchanged)", path.display())
        }
    }
}
