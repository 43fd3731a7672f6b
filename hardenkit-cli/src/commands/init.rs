//! `hardenkit init [--force]`

use anyhow::{Context, Result};
use clap::Args;

use hardenkit_core::catalog;

use super::home_dir;

/// Seed the local catalog from the built-in templates.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing catalog (resets download counts).
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let home = home_dir()?;
        let path = catalog::catalog_path_at(&home);
        let existed = path.exists();

        let catalog = catalog::init_at(&home, self.force)
            .with_context(|| format!("failed to initialise catalog at {}", path.display()))?;

        if existed && !self.force {
            println!(
                "· Catalog already initialised ({} templates); use --force to reset",
                catalog.len()
            );
        } else {
            println!("✓ Catalog initialised with {} templates", catalog.len());
        }
        println!("  Saved to: {}", path.display());
        Ok(())
    }
}
