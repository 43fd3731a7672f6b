//! The "use a template" pipeline shared by `hardenkit generate` and `hardenkit diff`.
//!
//! generate → wrap as script → (unless dry-run) record usage, bump
//! `download_count`, persist → hash-gated write of the script.

use std::path::{Path, PathBuf};

use serde::Serialize;

use hardenkit_core::{
    catalog, config, usage, Catalog, Settings, Template, TemplateId, TemplateSummary, VariableMap,
};
use hardenkit_generator::{GenerationResult, Generator, ScriptRenderer};

use crate::error::ExportError;
use crate::writer::{write_script, WriteResult};

/// One use of a template.
#[derive(Debug, Clone, PartialEq)]
pub struct UseRequest {
    pub template_id: TemplateId,
    /// Caller-supplied values; may be sparse.
    pub values: VariableMap,
    /// Identity recorded in the usage log.
    pub user: String,
    /// Where to write the script, if anywhere.
    pub output: Option<PathBuf>,
    /// Generate and render only; nothing on disk changes.
    pub dry_run: bool,
}

impl UseRequest {
    pub fn new(template_id: impl Into<TemplateId>, values: VariableMap) -> Self {
        Self {
            template_id: template_id.into(),
            values,
            user: "anonymous".to_string(),
            output: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UseOutcome {
    pub template: TemplateSummary,
    pub result: GenerationResult,
    /// The complete script file text.
    pub script: String,
    /// `None` when no output path was given or generation failed.
    pub write: Option<WriteResult>,
    /// Counter value after this use (unchanged on dry runs).
    pub download_count: u64,
    /// Whether a usage record was persisted.
    pub recorded: bool,
}

/// Generated, rendered, not yet persisted.
pub(crate) struct Prepared {
    pub catalog: Catalog,
    pub template: Template,
    pub result: GenerationResult,
    pub script: String,
}

pub(crate) fn prepare(home: &Path, request: &UseRequest) -> Result<Prepared, ExportError> {
    let settings: Settings = config::load_at(home)?;
    let catalog = catalog::open_at(home)?;
    let template = catalog.get(&request.template_id)?.clone();

    let generator = Generator::from_settings(&settings);
    let result = generator.generate(&template, &request.values);
    for warning in &result.warnings {
        tracing::warn!("{}: {}", template.id, warning);
    }
    for error in &result.errors {
        tracing::warn!("{}: {}", template.id, error);
    }

    let layouts = catalog::layouts_dir_at(home);
    let script = ScriptRenderer::with_layouts(Some(&layouts))?.render_script(
        &template,
        &result,
        &settings.default_shell,
    )?;
    Ok(Prepared {
        catalog,
        template,
        result,
        script,
    })
}

/// Use a template: generate, render, persist usage and write the script.
///
/// An unknown id is an error. A failed generation is returned, recorded as
/// an unsuccessful use, and never written to disk.
pub fn use_template(home: &Path, request: &UseRequest) -> Result<UseOutcome, ExportError> {
    let Prepared {
        mut catalog,
        template,
        result,
        script,
    } = prepare(home, request)?;

    let write = match &request.output {
        Some(path) if result.success => Some(write_script(path, &script, request.dry_run)?),
        Some(path) => {
            tracing::warn!(
                "{}: generation failed, not writing {}",
                template.id,
                path.display()
            );
            None
        }
        None => None,
    };

    let mut download_count = template.download_count;
    let recorded = !request.dry_run;
    if recorded {
        download_count = catalog.record_download(&template.id)?;
        catalog::save_at(home, &catalog)?;

        let mut log = usage::load_at(home)?;
        log.record(
            template.id.clone(),
            request.user.clone(),
            request.values.clone(),
            result.success,
        );
        usage::save_at(home, &log)?;
        tracing::info!(
            "recorded use of {} by {} (downloads: {})",
            template.id,
            request.user,
            download_count
        );
    }

    let mut summary = template.summary();
    summary.download_count = download_count;
    Ok(UseOutcome {
        template: summary,
        result,
        script,
        write,
        download_count,
        recorded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hardenkit_core::Value;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, Value)]) -> VariableMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn use_bumps_counter_and_records_usage() {
        let home = TempDir::new().unwrap();
        let mut request = UseRequest::new("u102-password-complexity", VariableMap::new());
        request.user = "auditor".into();

        let outcome = use_template(home.path(), &request).unwrap();
        assert!(outcome.result.success);
        assert!(outcome.recorded);
        assert_eq!(outcome.download_count, 43);
        assert_eq!(outcome.template.download_count, 43);

        let saved = catalog::load_at(home.path()).unwrap();
        let t = saved
            .get(&TemplateId::from("u102-password-complexity"))
            .unwrap();
        assert_eq!(t.download_count, 43);

        let log = usage::load_at(home.path()).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].user, "auditor");
        assert!(log.records()[0].success);
    }

    #[test]
    fn dry_run_touches_nothing() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("u105.sh");
        let mut request = UseRequest::new("u105-passwd-permissions", VariableMap::new());
        request.output = Some(out.clone());
        request.dry_run = true;

        let outcome = use_template(home.path(), &request).unwrap();
        assert!(!outcome.recorded);
        assert_eq!(outcome.download_count, 64);
        assert!(matches!(outcome.write, Some(WriteResult::WouldWrite { .. })));
        assert!(!out.exists());
        assert!(!catalog::catalog_path_at(home.path()).exists());
        assert!(!usage::usage_path_at(home.path()).exists());
    }

    #[test]
    fn failed_generation_is_recorded_but_not_written() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("u108.sh");
        let mut request = UseRequest::new("u108-unused-accounts", VariableMap::new());
        request.output = Some(out.clone());

        let outcome = use_template(home.path(), &request).unwrap();
        assert!(!outcome.result.success);
        assert!(outcome.write.is_none());
        assert!(!out.exists());

        let log = usage::load_at(home.path()).unwrap();
        assert!(!log.records()[0].success);
    }

    #[test]
    fn writes_script_then_reports_unchanged() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("scripts").join("u108.sh");
        let mut request = UseRequest::new(
            "u108-unused-accounts",
            vars(&[(
                "CHECK_USERS",
                Value::List(vec!["games".into(), "lp".into()]),
            )]),
        );
        request.output = Some(out.clone());

        let first = use_template(home.path(), &request).unwrap();
        assert!(matches!(first.write, Some(WriteResult::Written { .. })));
        let on_disk = std::fs::read_to_string(&out).unwrap();
        assert_eq!(on_disk, first.script);
        assert!(on_disk.contains("<<< \"games,lp\""));

        let second = use_template(home.path(), &request).unwrap();
        assert!(matches!(second.write, Some(WriteResult::Unchanged { .. })));
        assert_eq!(second.download_count, first.download_count + 1);
    }

    #[test]
    fn unknown_template_is_not_found() {
        let home = TempDir::new().unwrap();
        let request = UseRequest::new("nonexistent-id", VariableMap::new());
        let err = use_template(home.path(), &request).unwrap_err();
        assert!(err.is_not_found(), "got: {err}");
    }

    #[test]
    fn layout_override_in_home_is_used() {
        let home = TempDir::new().unwrap();
        let layouts = catalog::layouts_dir_at(home.path());
        std::fs::create_dir_all(&layouts).unwrap();
        std::fs::write(
            layouts.join("script.sh.tera"),
            "{{ shebang }}\n# site policy: {{ template_id }}\n{{ body }}",
        )
        .unwrap();

        let mut request = UseRequest::new("u106-shadow-permissions", VariableMap::new());
        request.dry_run = true;
        let outcome = use_template(home.path(), &request).unwrap();
        assert!(outcome
            .script
            .starts_with("#!/bin/bash\n# site policy: u106-shadow-permissions\n"));
        assert!(!outcome.script.contains("generated by hardenkit"));
    }

    #[test]
    fn embedded_layout_without_override() {
        let home = TempDir::new().unwrap();
        let mut request = UseRequest::new("u106-shadow-permissions", VariableMap::new());
        request.dry_run = true;
        let outcome = use_template(home.path(), &request).unwrap();
        assert!(outcome.script.contains("# generated by hardenkit"));
    }

    #[test]
    fn settings_separator_applies() {
        let home = TempDir::new().unwrap();
        let settings_path = config::settings_path_at(home.path());
        std::fs::create_dir_all(settings_path.parent().unwrap()).unwrap();
        std::fs::write(&settings_path, "array_separator: \" \"\n").unwrap();

        let mut request = UseRequest::new(
            "u108-unused-accounts",
            vars(&[(
                "CHECK_USERS",
                Value::List(vec!["games".into(), "lp".into()]),
            )]),
        );
        request.dry_run = true;
        let outcome = use_template(home.path(), &request).unwrap();
        assert!(outcome.result.rendered_text.contains("<<< \"games lp\""));
    }
}
