//! `hardenkit usage` — recorded template uses.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use hardenkit_core::{usage, TemplateId, UsageRecord};

use super::home_dir;

#[derive(Args, Debug)]
pub struct UsageArgs {
    /// Only uses of this template.
    #[arg(long, value_name = "ID")]
    pub template: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "when")]
    when: String,
    #[tabled(rename = "template")]
    template: String,
    #[tabled(rename = "user")]
    user: String,
    #[tabled(rename = "result")]
    result: String,
    #[tabled(rename = "variables")]
    variables: String,
}

impl From<&UsageRecord> for UsageRow {
    fn from(r: &UsageRecord) -> Self {
        UsageRow {
            when: r
                .recorded_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            template: r.template_id.to_string(),
            user: r.user.clone(),
            result: if r.success {
                "ok".green().to_string()
            } else {
                "failed".red().to_string()
            },
            variables: r
                .variables
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl UsageArgs {
    pub fn run(self) -> Result<()> {
        let home = home_dir()?;
        let log = usage::load_at(&home).context("failed to load usage log")?;

        let wanted = self.template.as_deref().map(TemplateId::from);
        let records: Vec<&UsageRecord> = match &wanted {
            Some(id) => log.for_template(id).collect(),
            None => log.records().iter().collect(),
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&records).context("failed to serialize usage JSON")?
            );
            return Ok(());
        }

        if records.is_empty() {
            println!("No recorded uses.");
            return Ok(());
        }
        let rows: Vec<UsageRow> = records.into_iter().map(UsageRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
