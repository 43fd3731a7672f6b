//! `{{NAME}}` placeholder scanning and substitution.
//!
//! A placeholder name is any non-empty text without whitespace, control
//! characters or braces, so `{{LOG-FILE}}` and `{{계정}}` are tokens while
//! `{{ spaced }}` and `${HOME}` are plain text.

use std::collections::HashMap;
use std::ops::Range;

use hardenkit_core::types::is_placeholder_name;
use hardenkit_core::Template;

/// Byte span of each placeholder token in `body`, with its name.
fn tokens(body: &str) -> Vec<(Range<usize>, &str)> {
    let mut out = Vec::new();
    let mut offset = 0;
    while let Some(start) = body[offset..].find("{{") {
        let open = offset + start;
        let name_start = open + 2;
        let Some(len) = body[name_start..].find("}}") else {
            break;
        };
        let name = &body[name_start..name_start + len];
        if is_placeholder_name(name) {
            let end = name_start + len + 2;
            out.push((open..end, name));
            offset = end;
        } else {
            // `{{{NAME}}}` must still find the token starting one byte later.
            offset = open + 1;
        }
    }
    out
}

/// Distinct placeholder names in first-appearance order.
pub fn placeholders(body: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (_, name) in tokens(body) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Replace every token whose name is in `values`; other tokens stay verbatim.
///
/// Single pass over the original body, so substituted text is never rescanned.
pub fn substitute(body: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(body.len());
    let mut last = 0;
    for (span, name) in tokens(body) {
        if let Some(value) = values.get(name) {
            out.push_str(&body[last..span.start]);
            out.push_str(value);
            last = span.end;
        }
    }
    out.push_str(&body[last..]);
    out
}

/// Placeholders in the body with no declared variable. These pass through
/// generation untouched.
pub fn undeclared_placeholders(template: &Template) -> Vec<String> {
    placeholders(&template.body)
        .into_iter()
        .filter(|name| template.variable(name).is_none())
        .collect()
}

/// Declared variables whose placeholder never appears in the body.
pub fn unused_variables(template: &Template) -> Vec<String> {
    let used = placeholders(&template.body);
    template
        .variables
        .iter()
        .filter(|v| !used.contains(&v.name))
        .map(|v| v.name.clone())
        .collect()
}
