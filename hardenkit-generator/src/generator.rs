//! Template generation: resolve values, substitute placeholders, collect findings.
//!
//! Generation is a pure function of (template, values, separator). It never
//! fails; missing required variables and constraint breaches are reported in
//! the returned [`GenerationResult`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hardenkit_core::{Catalog, CatalogError, Settings, Template, TemplateId, VariableMap};

use crate::placeholder::substitute;
use crate::validation::{evaluate, ValidationWarning};

/// Fatal-to-`success` finding. Never raised, only collected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationError {
    #[error("required variable '{variable}' was not provided")]
    MissingRequired { variable: String },
}

/// The value a variable was rendered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVariable {
    pub name: String,
    pub value: String,
    /// True when the template default was used.
    pub from_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// True iff `errors` is empty.
    pub success: bool,
    /// Body with every resolvable placeholder substituted. Placeholders of
    /// missing required variables stay as literal `{{NAME}}`.
    pub rendered_text: String,
    pub warnings: Vec<ValidationWarning>,
    pub errors: Vec<GenerationError>,
    /// Declaration order.
    pub resolved: Vec<ResolvedVariable>,
}

/// Generator configured with an array separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    array_separator: String,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(",")
    }
}

impl Generator {
    pub fn new(array_separator: impl Into<String>) -> Self {
        Self {
            array_separator: array_separator.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.array_separator.clone())
    }

    pub fn array_separator(&self) -> &str {
        &self.array_separator
    }

    /// Render `template` with the caller's (possibly sparse) `values`.
    pub fn generate(&self, template: &Template, values: &VariableMap) -> GenerationResult {
        let mut substitutions: HashMap<&str, String> = HashMap::new();
        let mut resolved = Vec::new();
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        for variable in &template.variables {
            let (effective, from_default) = match values.get(&variable.name) {
                Some(v) => (Some(v), false),
                None => (variable.default.as_ref(), true),
            };

            let Some(value) = effective else {
                if variable.required {
                    errors.push(GenerationError::MissingRequired {
                        variable: variable.name.clone(),
                    });
                }
                continue;
            };

            let text = value.render(&self.array_separator);
            substitutions.insert(variable.name.as_str(), text.clone());
            resolved.push(ResolvedVariable {
                name: variable.name.clone(),
                value: text,
                from_default,
            });

            warnings.extend(
                evaluate(variable, value)
                    .into_iter()
                    .map(|kind| ValidationWarning::new(&variable.name, kind)),
            );
        }

        GenerationResult {
            success: errors.is_empty(),
            rendered_text: substitute(&template.body, &substitutions),
            warnings,
            errors,
            resolved,
        }
    }
}

/// [`Generator::generate`] with the default `,` separator.
pub fn generate(template: &Template, values: &VariableMap) -> GenerationResult {
    Generator::default().generate(template, values)
}

/// Look up `id` and generate. A missing template is the explicit
/// `CatalogError::TemplateNotFound`.
pub fn generate_by_id(
    catalog: &Catalog,
    id: &TemplateId,
    values: &VariableMap,
    generator: &Generator,
) -> Result<GenerationResult, CatalogError> {
    let template = catalog.get(id)?;
    Ok(generator.generate(template, values))
}
