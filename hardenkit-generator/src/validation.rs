//! Constraint evaluation. Findings never block substitution.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use hardenkit_core::{Constraint, Value, Variable, VariableKind};

/// Why a value was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    BelowMinimum,
    AboveMaximum,
    TooShort,
    TooLong,
    FormatInvalid,
    /// The declared `pattern` does not compile.
    InvalidRule,
    KindMismatch,
    NotAnOption,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            WarningKind::BelowMinimum => "value below minimum",
            WarningKind::AboveMaximum => "value above maximum",
            WarningKind::TooShort => "value shorter than minimum length",
            WarningKind::TooLong => "value longer than maximum length",
            WarningKind::FormatInvalid => "format invalid",
            WarningKind::InvalidRule => "invalid validation rule",
            WarningKind::KindMismatch => "value does not match declared kind",
            WarningKind::NotAnOption => "value not among allowed options",
        };
        f.write_str(msg)
    }
}

/// A non-fatal finding about one variable's effective value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub variable: String,
    pub kind: WarningKind,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(variable: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            variable: variable.into(),
            kind,
            message: kind.to_string(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.variable, self.message)
    }
}

/// Evaluate `value` against the declaration of `variable`.
///
/// Only the constraint fields relevant to the variable's kind are consulted.
pub fn evaluate(variable: &Variable, value: &Value) -> Vec<WarningKind> {
    if !value.conforms_to(variable.kind) {
        return vec![WarningKind::KindMismatch];
    }

    let mut found = Vec::new();
    if variable.kind == VariableKind::Select && !variable.options.is_empty() {
        if let Value::Text(choice) = value {
            if !variable.options.iter().any(|o| o == choice) {
                found.push(WarningKind::NotAnOption);
            }
        }
    }

    let Some(constraint) = &variable.constraint else {
        return found;
    };
    match (variable.kind, value) {
        (VariableKind::Number, Value::Number(n)) => evaluate_number(constraint, *n, &mut found),
        (VariableKind::String, Value::Text(s)) => evaluate_text(constraint, s, &mut found),
        _ => {}
    }
    found
}

fn evaluate_number(constraint: &Constraint, n: f64, found: &mut Vec<WarningKind>) {
    if let Some(min) = constraint.min {
        if n < min {
            found.push(WarningKind::BelowMinimum);
        }
    }
    if let Some(max) = constraint.max {
        if n > max {
            found.push(WarningKind::AboveMaximum);
        }
    }
}

fn evaluate_text(constraint: &Constraint, s: &str, found: &mut Vec<WarningKind>) {
    let len = s.chars().count();
    if let Some(min) = constraint.min_length {
        if len < min {
            found.push(WarningKind::TooShort);
        }
    }
    if let Some(max) = constraint.max_length {
        if len > max {
            found.push(WarningKind::TooLong);
        }
    }
    if let Some(pattern) = &constraint.pattern {
        match full_match(pattern) {
            Ok(re) if !re.is_match(s) => found.push(WarningKind::FormatInvalid),
            Ok(_) => {}
            Err(_) => found.push(WarningKind::InvalidRule),
        }
    }
}

/// Anchor `pattern` so it must match the whole value.
fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn var(kind: VariableKind, constraint: Constraint) -> Variable {
        Variable {
            name: "V".into(),
            kind,
            description: String::new(),
            default: None,
            required: false,
            constraint: Some(constraint),
            options: vec![],
        }
    }

    fn numeric(min: f64, max: f64) -> Variable {
        var(
            VariableKind::Number,
            Constraint {
                min: Some(min),
                max: Some(max),
                ..Default::default()
            },
        )
    }

    fn text(pattern: Option<&str>, min_length: Option<usize>, max_length: Option<usize>) -> Variable {
        var(
            VariableKind::String,
            Constraint {
                pattern: pattern.map(str::to_string),
                min_length,
                max_length,
                ..Default::default()
            },
        )
    }

    #[rstest]
    #[case(2.0, vec![WarningKind::BelowMinimum])]
    #[case(4.0, vec![])]
    #[case(32.0, vec![])]
    #[case(33.0, vec![WarningKind::AboveMaximum])]
    fn numeric_bounds_are_inclusive(#[case] n: f64, #[case] expected: Vec<WarningKind>) {
        assert_eq!(evaluate(&numeric(4.0, 32.0), &Value::Number(n)), expected);
    }

    #[rstest]
    #[case("644", vec![])]
    #[case("0644", vec![])]
    #[case("64", vec![WarningKind::FormatInvalid])]
    #[case("644x", vec![WarningKind::FormatInvalid])]
    #[case("x644", vec![WarningKind::FormatInvalid])]
    fn pattern_must_match_whole_value(#[case] raw: &str, #[case] expected: Vec<WarningKind>) {
        let v = text(Some("[0-7]{3,4}"), None, None);
        assert_eq!(evaluate(&v, &Value::Text(raw.into())), expected);
    }

    #[test]
    fn alternation_is_anchored_as_a_group() {
        let v = text(Some("a|b"), None, None);
        assert!(evaluate(&v, &Value::Text("a".into())).is_empty());
        assert_eq!(
            evaluate(&v, &Value::Text("ab".into())),
            vec![WarningKind::FormatInvalid]
        );
    }

    #[test]
    fn malformed_pattern_becomes_invalid_rule_warning() {
        let v = text(Some("[unclosed"), None, None);
        assert_eq!(
            evaluate(&v, &Value::Text("anything".into())),
            vec![WarningKind::InvalidRule]
        );
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let v = text(None, Some(2), Some(3));
        assert!(evaluate(&v, &Value::Text("관리자".into())).is_empty());
        assert_eq!(
            evaluate(&v, &Value::Text("관".into())),
            vec![WarningKind::TooShort]
        );
        assert_eq!(
            evaluate(&v, &Value::Text("관리자님".into())),
            vec![WarningKind::TooLong]
        );
    }

    #[test]
    fn irrelevant_constraint_fields_are_ignored() {
        let v = var(
            VariableKind::Number,
            Constraint {
                min_length: Some(10),
                pattern: Some("x".into()),
                ..Default::default()
            },
        );
        assert!(evaluate(&v, &Value::Number(1.0)).is_empty());
    }

    #[test]
    fn wrong_shape_is_kind_mismatch_only() {
        assert_eq!(
            evaluate(&numeric(4.0, 32.0), &Value::Text("2".into())),
            vec![WarningKind::KindMismatch]
        );
    }

    #[test]
    fn select_outside_options_is_flagged() {
        let mut v = var(VariableKind::Select, Constraint::default());
        v.options = vec!["/sbin/nologin".into(), "/bin/false".into()];
        assert!(evaluate(&v, &Value::Text("/bin/false".into())).is_empty());
        assert_eq!(
            evaluate(&v, &Value::Text("/bin/sh".into())),
            vec![WarningKind::NotAnOption]
        );
    }

    #[test]
    fn warning_display_names_variable() {
        let w = ValidationWarning::new("MIN_LENGTH", WarningKind::BelowMinimum);
        assert_eq!(w.message, "value below minimum");
        assert_eq!(w.to_string(), "MIN_LENGTH: value below minimum");
    }
}
