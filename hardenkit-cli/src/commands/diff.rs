//! `hardenkit diff <id> --out PATH` — what re-generating would change.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hardenkit_core::{catalog, config, TemplateId};
use hardenkit_export::{diff_script, UseRequest};

use super::{home_dir, parse_vars};

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Template id.
    pub id: String,

    /// Variable value as NAME=VALUE (repeatable).
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Previously exported script to compare against.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: PathBuf,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let home = home_dir()?;
        let settings = config::load_at(&home).context("failed to load settings")?;
        let catalog = catalog::open_at(&home).context("failed to load catalog")?;
        let id = TemplateId::from(self.id.as_str());
        let template = catalog
            .get(&id)
            .with_context(|| format!("cannot diff '{}'", self.id))?;
        let values = parse_vars(template, &self.vars, &settings.array_separator)?;

        let mut request = UseRequest::new(id, values);
        request.dry_run = true;
        let diff = diff_script(&home, &request, &self.out)
            .with_context(|| format!("diff failed for '{}'", self.id))?;

        match diff {
            None => println!("No differences for '{}'.", self.out.display()),
            Some(diff) => {
                print!("{}", diff.unified_diff);
                if !diff.unified_diff.ends_with('\n') {
                    println!();
                }
            }
        }
        Ok(())
    }
}
