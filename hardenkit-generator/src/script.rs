//! Tera script wrapper: [`ScriptContext`] and [`ScriptRenderer`].
//!
//! Wraps a generated body into a complete shell script: interpreter line,
//! a comment header describing the template and the values used, then the
//! body. The header carries no wall-clock time, so the same generation
//! always produces byte-identical output.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tera::Tera;

use hardenkit_core::Template;

use crate::error::RenderError;
use crate::generator::{GenerationResult, ResolvedVariable};

/// Name of the layout every script is rendered through.
pub const SCRIPT_LAYOUT: &str = "script.sh.tera";

const LAYOUTS: &[(&str, &str)] = &[(SCRIPT_LAYOUT, include_str!("templates/script.sh.tera"))];

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Serializable rendering payload for the script layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptContext {
    pub shebang: String,
    pub template_id: String,
    pub template_name: String,
    pub checklist_type: String,
    pub version: String,
    pub updated_on: String,
    pub hardenkit_version: String,
    pub variables: Vec<ResolvedVariable>,
    pub warnings: Vec<String>,
    /// Rendered body without its shebang line.
    pub body: String,
}

impl ScriptContext {
    /// Build the context from a template and its generation result.
    ///
    /// A body that starts with `#!` keeps its own interpreter line; otherwise
    /// `#!<default_shell>` is used. Every header field is reduced to a single
    /// line so it stays inside its `#` comment.
    pub fn new(template: &Template, result: &GenerationResult, default_shell: &str) -> Self {
        let (shebang, body) = split_shebang(&result.rendered_text, &single_line(default_shell));
        ScriptContext {
            shebang,
            template_id: single_line(&template.id.0),
            template_name: single_line(&template.name),
            checklist_type: single_line(&template.checklist_type.0),
            version: single_line(&template.version),
            updated_on: template.updated_at.format("%Y-%m-%d").to_string(),
            hardenkit_version: env!("CARGO_PKG_VERSION").to_string(),
            variables: result
                .resolved
                .iter()
                .map(|v| ResolvedVariable {
                    name: single_line(&v.name),
                    value: single_line(&v.value),
                    from_default: v.from_default,
                })
                .collect(),
            warnings: result
                .warnings
                .iter()
                .map(|w| single_line(&w.to_string()))
                .collect(),
            body,
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

/// Escape line breaks as a literal `\n` / `\r`.
fn single_line(text: &str) -> String {
    text.replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

fn split_shebang(text: &str, default_shell: &str) -> (String, String) {
    let text = text.replace("\r\n", "\n");
    if text.starts_with("#!") {
        match text.split_once('\n') {
            Some((first, rest)) => (first.to_string(), rest.to_string()),
            None => (text, String::new()),
        }
    } else {
        (format!("#!{default_shell}"), text)
    }
}

// ---------------------------------------------------------------------------
// Layout loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

/// `.tera` files directly inside `dir`, keyed by file name.
fn load_user_layouts(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut layouts = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
            continue;
        };
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        layouts.push((name, contents));
    }
    Ok(layouts)
}

fn build_tera(user_layout_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut layouts: HashMap<String, String> = LAYOUTS
        .iter()
        .map(|(name, content)| (name.to_string(), content.to_string()))
        .collect();
    if let Some(dir) = user_layout_dir {
        layouts.extend(load_user_layouts(dir)?);
    }

    let mut tera = Tera::default();
    tera.add_raw_templates(layouts.into_iter().collect::<Vec<_>>())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// ScriptRenderer
// ---------------------------------------------------------------------------

/// Tera-based renderer for generated scripts.
///
/// `user_layout_dir` may contain a `script.sh.tera` that overrides the
/// embedded layout. Create once and reuse.
pub struct ScriptRenderer {
    tera: Tera,
}

impl ScriptRenderer {
    /// Renderer with the embedded layout only.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_layouts(None)
    }

    /// Renderer with overrides from `user_layout_dir`, if any.
    pub fn with_layouts(user_layout_dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(ScriptRenderer {
            tera: build_tera(user_layout_dir)?,
        })
    }

    /// Render the full script text: LF line endings, exactly one trailing newline.
    pub fn render(&self, ctx: &ScriptContext) -> Result<String, RenderError> {
        let rendered = self.tera.render(SCRIPT_LAYOUT, &ctx.to_tera_context()?)?;
        let mut out = rendered.replace("\r\n", "\n").trim_end_matches('\n').to_string();
        out.push('\n');
        Ok(out)
    }

    /// Convenience: build the context and render.
    pub fn render_script(
        &self,
        template: &Template,
        result: &GenerationResult,
        default_shell: &str,
    ) -> Result<String, RenderError> {
        self.render(&ScriptContext::new(template, result, default_shell))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
