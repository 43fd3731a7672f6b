pub mod diff;
pub mod generate;
pub mod init;
pub mod list;
pub mod show;
pub mod usage;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use hardenkit_core::{Settings, Template, Value, VariableMap};

pub(crate) fn home_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    tracing::debug!("home: {}", home.display());
    Ok(home)
}

/// Parse `NAME=VALUE` arguments against the template's declared kinds.
pub(crate) fn parse_vars(template: &Template, raw: &[String], separator: &str) -> Result<VariableMap> {
    let mut values = VariableMap::new();
    for arg in raw {
        let Some((name, value)) = arg.split_once('=') else {
            bail!("expected NAME=VALUE, got '{arg}'");
        };
        let name = name.trim();
        let Some(variable) = template.variable(name) else {
            let declared: Vec<&str> = template.variables.iter().map(|v| v.name.as_str()).collect();
            bail!(
                "'{}' has no variable '{name}'; declared: {}",
                template.id,
                declared.join(", ")
            );
        };
        let parsed = Value::parse_as(name, variable.kind, value, separator)
            .with_context(|| format!("invalid --var {arg}"))?;
        values.insert(name.to_string(), parsed);
    }
    Ok(values)
}

/// `--user` > settings > `$USER` > `anonymous`.
pub(crate) fn resolve_user(flag: Option<String>, settings: &Settings) -> String {
    flag.or_else(|| settings.user.clone())
        .or_else(|| std::env::var("USER").ok().filter(|u| !u.is_empty()))
        .unwrap_or_else(|| "anonymous".to_string())
}
