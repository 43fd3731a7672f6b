//! `hardenkit show <id>` — one template with its variable schema.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use hardenkit_core::{catalog, Constraint, Template, TemplateId, Variable};
use hardenkit_generator::{undeclared_placeholders, unused_variables};

use super::home_dir;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Template id, e.g. u102-password-complexity.
    pub id: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    pub fn run(self) -> Result<()> {
        let home = home_dir()?;
        let catalog = catalog::open_at(&home).context("failed to load catalog")?;
        let template = catalog
            .get(&TemplateId::from(self.id.as_str()))
            .with_context(|| format!("cannot show '{}'", self.id))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(template).context("failed to serialize template")?
            );
            return Ok(());
        }

        print_template(template);
        Ok(())
    }
}

#[derive(Tabled)]
struct VariableRow {
    #[tabled(rename = "variable")]
    name: String,
    #[tabled(rename = "kind")]
    kind: String,
    #[tabled(rename = "required")]
    required: String,
    #[tabled(rename = "default")]
    default: String,
    #[tabled(rename = "constraint")]
    constraint: String,
    #[tabled(rename = "description")]
    description: String,
}

impl From<&Variable> for VariableRow {
    fn from(v: &Variable) -> Self {
        let mut constraint = v.constraint.as_ref().map(describe).unwrap_or_default();
        if !v.options.is_empty() {
            if !constraint.is_empty() {
                constraint.push_str("; ");
            }
            constraint.push_str(&format!("one of {}", v.options.join(" | ")));
        }
        VariableRow {
            name: v.name.clone(),
            kind: v.kind.to_string(),
            required: if v.required { "yes" } else { "no" }.to_string(),
            default: v.default.as_ref().map(ToString::to_string).unwrap_or_default(),
            constraint,
            description: v.description.clone(),
        }
    }
}

fn describe(c: &Constraint) -> String {
    let mut parts = Vec::new();
    match (c.min, c.max) {
        (Some(min), Some(max)) => parts.push(format!("{min}..={max}")),
        (Some(min), None) => parts.push(format!(">= {min}")),
        (None, Some(max)) => parts.push(format!("<= {max}")),
        (None, None) => {}
    }
    match (c.min_length, c.max_length) {
        (Some(min), Some(max)) => parts.push(format!("length {min}..={max}")),
        (Some(min), None) => parts.push(format!("length >= {min}")),
        (None, Some(max)) => parts.push(format!("length <= {max}")),
        (None, None) => {}
    }
    if let Some(pattern) = &c.pattern {
        parts.push(format!("/{pattern}/"));
    }
    parts.join("; ")
}

fn print_template(t: &Template) {
    println!("{} {}", t.name.bold(), format!("[{}]", t.checklist_type).cyan());
    println!("  id:         {}", t.id);
    if !t.description.is_empty() {
        println!("  about:      {}", t.description);
    }
    println!("  category:   {}", t.category);
    println!("  difficulty: {}", t.difficulty);
    println!(
        "  author:     {} ({})",
        t.author,
        if t.is_official { "official" } else { "community" }
    );
    println!("  version:    {} (updated {})", t.version, t.updated_at.format("%Y-%m-%d"));
    println!("  uses:       {}", t.download_count);
    if !t.tags.is_empty() {
        println!("  tags:       {}", t.tags.join(", "));
    }

    if !t.variables.is_empty() {
        let rows: Vec<VariableRow> = t.variables.iter().map(VariableRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    for name in undeclared_placeholders(t) {
        println!("{} {{{{{name}}}}} has no declared variable", "!".yellow().bold());
    }
    for name in unused_variables(t) {
        println!("{} variable {name} is not used in the body", "!".yellow().bold());
    }

    println!("{}", "─".repeat(60).bright_black());
    print!("{}", t.body);
    if !t.body.ends_with('\n') {
        println!();
    }
}
