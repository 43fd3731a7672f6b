//! `hardenkit list` — filtered, sorted catalog listing.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use hardenkit_core::{
    catalog, ChecklistType, Difficulty, SortDirection, SortKey, SortSpec, TemplateFilter,
    TemplateSummary,
};

use super::home_dir;

/// Arguments for `hardenkit list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive text matched against name, description and tags.
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Exact category, e.g. account_management.
    #[arg(long)]
    pub category: Option<String>,

    /// Exact checklist code, e.g. U-102.
    #[arg(long, value_name = "CODE")]
    pub checklist: Option<String>,

    /// easy | medium | hard
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Only official templates.
    #[arg(long, conflicts_with = "community")]
    pub official: bool,

    /// Only community templates.
    #[arg(long)]
    pub community: bool,

    /// Match templates carrying any of these tags (repeatable).
    #[arg(long = "tag", short = 't', value_name = "TAG")]
    pub tags: Vec<String>,

    /// name | created | updated | usage. Catalog order when omitted.
    #[arg(long, value_name = "KEY")]
    pub sort: Option<SortKey>,

    /// Sort descending.
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    fn filter(&self) -> TemplateFilter {
        TemplateFilter {
            search: self.search.clone(),
            category: self.category.clone(),
            checklist_type: self.checklist.as_deref().map(ChecklistType::from),
            difficulty: self.difficulty,
            is_official: match (self.official, self.community) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            tags: (!self.tags.is_empty()).then(|| self.tags.clone()),
        }
    }

    fn sort_spec(&self) -> Option<SortSpec> {
        let dir = if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        self.sort.map(|by| SortSpec::new(by, dir))
    }

    pub fn run(self) -> Result<()> {
        let home = home_dir()?;
        let catalog = catalog::open_at(&home).context("failed to load catalog")?;
        let rows = catalog.list(&self.filter(), self.sort_spec());

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize list JSON")?
            );
            return Ok(());
        }

        print_table(&rows, catalog.len());
        Ok(())
    }
}

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "checklist")]
    checklist: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "category")]
    category: String,
    #[tabled(rename = "difficulty")]
    difficulty: String,
    #[tabled(rename = "official")]
    official: String,
    #[tabled(rename = "uses")]
    uses: u64,
    #[tabled(rename = "tags")]
    tags: String,
}

fn print_table(rows: &[TemplateSummary], total: usize) {
    if rows.is_empty() {
        println!("No templates match.");
        return;
    }

    let table_rows: Vec<ListRow> = rows
        .iter()
        .map(|t| ListRow {
            id: t.id.to_string(),
            checklist: t.checklist_type.to_string(),
            name: t.name.clone(),
            category: t.category.clone(),
            difficulty: t.difficulty.to_string(),
            official: if t.is_official { "✓" } else { "" }.to_string(),
            uses: t.download_count,
            tags: t.tags.join(", "),
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "{}",
        format!("{} of {} templates", rows.len(), total).bright_black()
    );
}
