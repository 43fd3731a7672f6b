//! # hardenkit-generator
//!
//! Renders catalog templates into shell scripts.
//!
//! - [`generate`] substitutes `{{NAME}}` placeholders and validates values,
//!   returning a [`GenerationResult`]; it never fails.
//! - [`ScriptRenderer`] wraps a result into a complete script file.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hardenkit_core::{Catalog, TemplateId, Value, VariableMap};
//! use hardenkit_generator::{generate_by_id, Generator};
//!
//! fn min_length_12(catalog: &Catalog) {
//!     let mut values = VariableMap::new();
//!     values.insert("MIN_LENGTH".into(), Value::Number(12.0));
//!     let id = TemplateId::from("u102-password-complexity");
//!     if let Ok(result) = generate_by_id(catalog, &id, &values, &Generator::default()) {
//!         for warning in &result.warnings {
//!             eprintln!("warning: {warning}");
//!         }
//!         println!("{}", result.rendered_text);
//!     }
//! }
//! ```

pub mod error;
pub mod generator;
pub mod placeholder;
pub mod script;
pub mod validation;

pub use error::RenderError;
pub use generator::{
    generate, generate_by_id, GenerationError, GenerationResult, Generator, ResolvedVariable,
};
pub use placeholder::{placeholders, undeclared_placeholders, unused_variables};
pub use script::{ScriptContext, ScriptRenderer};
pub use validation::{ValidationWarning, WarningKind};
