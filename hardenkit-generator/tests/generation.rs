//! Generation behaviour against the built-in catalog.

use chrono::Utc;
use hardenkit_core::{
    Catalog, ChecklistType, Constraint, Difficulty, Template, TemplateId, Value, Variable,
    VariableKind, VariableMap,
};
use hardenkit_generator::{
    generate, generate_by_id, placeholders, undeclared_placeholders, unused_variables,
    GenerationError, Generator, WarningKind,
};
use rstest::rstest;

fn builtin() -> Catalog {
    Catalog::builtin().expect("builtin catalog")
}

fn min_length_template() -> Template {
    let now = Utc::now();
    Template {
        id: TemplateId::from("pw"),
        name: "Password length".into(),
        description: String::new(),
        category: "account_management".into(),
        checklist_type: ChecklistType::from("U-102"),
        tags: vec![],
        difficulty: Difficulty::Easy,
        author: String::new(),
        version: "1.0.0".into(),
        is_official: true,
        is_active: true,
        download_count: 0,
        created_at: now,
        updated_at: now,
        variables: vec![Variable {
            name: "MIN_LENGTH".into(),
            kind: VariableKind::Number,
            description: String::new(),
            default: Some(Value::Number(8.0)),
            required: true,
            constraint: Some(Constraint {
                min: Some(4.0),
                max: Some(32.0),
                ..Default::default()
            }),
            options: vec![],
        }],
        body: "minlen = {{MIN_LENGTH}}\n# {{UNDECLARED}}\n".into(),
    }
}

fn values(pairs: &[(&str, Value)]) -> VariableMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Worked examples
// ---------------------------------------------------------------------------

#[test]
fn default_fills_missing_value() {
    let r = generate(&min_length_template(), &VariableMap::new());
    assert!(r.success);
    assert_eq!(r.rendered_text, "minlen = 8\n# {{UNDECLARED}}\n");
    assert!(r.warnings.is_empty());
}

#[test]
fn below_minimum_warns_but_substitutes() {
    let r = generate(
        &min_length_template(),
        &values(&[("MIN_LENGTH", Value::Number(2.0))]),
    );
    assert!(r.success);
    assert!(r.rendered_text.starts_with("minlen = 2\n"));
    let messages: Vec<_> = r.warnings.iter().map(|w| w.message.as_str()).collect();
    assert_eq!(messages, vec!["value below minimum"]);
    assert_eq!(r.warnings[0].variable, "MIN_LENGTH");
}

#[test]
fn missing_required_leaves_placeholder_verbatim() {
    let cat = builtin();
    let r = generate_by_id(
        &cat,
        &TemplateId::from("u108-unused-accounts"),
        &VariableMap::new(),
        &Generator::default(),
    )
    .expect("template exists");
    assert!(!r.success);
    assert_eq!(
        r.errors,
        vec![GenerationError::MissingRequired {
            variable: "CHECK_USERS".into()
        }]
    );
    assert_eq!(
        r.errors[0].to_string(),
        "required variable 'CHECK_USERS' was not provided"
    );
    assert!(r.rendered_text.contains("<<< \"{{CHECK_USERS}}\""));
    // Other variables are still substituted.
    assert!(r.rendered_text.contains("usermod -s /sbin/nologin"));
}

#[test]
fn unknown_template_is_not_found() {
    let err = generate_by_id(
        &builtin(),
        &TemplateId::from("nonexistent-id"),
        &VariableMap::new(),
        &Generator::default(),
    )
    .unwrap_err();
    assert!(err.is_not_found());
}

// ---------------------------------------------------------------------------
// 2. Properties over every built-in template
// ---------------------------------------------------------------------------

#[rstest]
#[case::nothing(VariableMap::new())]
#[case::users(values(&[("CHECK_USERS", Value::List(vec!["games".into(), "lp".into()]))]))]
#[case::out_of_range(values(&[("MIN_LENGTH", Value::Number(64.0)), ("DENY_COUNT", Value::Number(0.0))]))]
#[case::bad_format(values(&[("FILE_MODE", Value::Text("abc".into())), ("OWNER", Value::Text("Root!".into()))]))]
fn properties_hold_for_all_templates(#[case] supplied: VariableMap) {
    let cat = builtin();
    for t in cat.templates() {
        let r = generate(t, &supplied);

        let missing = t
            .variables
            .iter()
            .any(|v| v.required && v.default.is_none() && !supplied.contains_key(&v.name));
        assert_eq!(r.success, !missing, "success mismatch for {}", t.id);

        let again = generate(t, &supplied);
        assert_eq!(r, again, "generation must be idempotent for {}", t.id);

        for v in &t.variables {
            let resolvable = supplied.contains_key(&v.name) || v.default.is_some();
            if resolvable {
                assert!(
                    !r.rendered_text.contains(&v.placeholder()),
                    "{} left {} unresolved",
                    t.id,
                    v.placeholder()
                );
            }
        }

        for name in undeclared_placeholders(t) {
            assert!(r.rendered_text.contains(&format!("{{{{{name}}}}}")));
        }
    }
}

#[test]
fn constraint_findings_never_flip_success() {
    let cat = builtin();
    let t = cat.get(&TemplateId::from("u105-passwd-permissions")).unwrap();
    let r = generate(
        t,
        &values(&[
            ("FILE_MODE", Value::Text("777x".into())),
            ("OWNER", Value::Text("".into())),
        ]),
    );
    assert!(r.success);
    let kinds: Vec<_> = r.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            WarningKind::TooShort,
            WarningKind::FormatInvalid,
            WarningKind::FormatInvalid
        ]
    );
    assert!(r.rendered_text.contains("chmod 777x"));
}

#[test]
fn mistyped_value_is_substituted_with_warning() {
    let r = generate(
        &min_length_template(),
        &values(&[("MIN_LENGTH", Value::Text("twelve".into()))]),
    );
    assert!(r.success);
    assert!(r.rendered_text.starts_with("minlen = twelve"));
    assert_eq!(r.warnings[0].kind, WarningKind::KindMismatch);
}

#[test]
fn builtin_templates_declare_every_placeholder() {
    for t in builtin().templates() {
        assert!(undeclared_placeholders(t).is_empty(), "{} has undeclared placeholders", t.id);
        assert!(unused_variables(t).is_empty(), "{} has unused variables", t.id);
        assert!(!placeholders(&t.body).is_empty());
    }
}

// ---------------------------------------------------------------------------
// 3. Variable names beyond ASCII identifiers
// ---------------------------------------------------------------------------

fn named(name: &str) -> Template {
    let mut t = min_length_template();
    t.variables[0].name = name.into();
    t.variables[0].kind = VariableKind::String;
    t.variables[0].default = Some(Value::Text("x".into()));
    t.variables[0].constraint = None;
    t.body = format!("v={{{{{name}}}}}");
    t
}

#[rstest]
#[case::hyphenated("LOG-FILE")]
#[case::hangul("계정")]
fn any_accepted_name_is_substituted(#[case] name: &str) {
    let cat = Catalog::new(vec![named(name)]).expect("name is accepted");
    let r = generate_by_id(&cat, &TemplateId::from("pw"), &VariableMap::new(), &Generator::default())
        .expect("template exists");
    assert!(r.success);
    assert_eq!(r.rendered_text, "v=x");
    assert!(unused_variables(&cat.templates()[0]).is_empty());
}

#[rstest]
#[case::space("LOG FILE")]
#[case::brace("A}B")]
#[case::empty("")]
fn names_that_cannot_form_a_placeholder_are_rejected(#[case] name: &str) {
    assert!(Catalog::new(vec![named(name)]).is_err());
}

// ---------------------------------------------------------------------------
// 4. Array separators against the shipped scripts
// ---------------------------------------------------------------------------

/// Characters in the first `IFS=$'...'` assignment of `script`.
fn ifs_chars(script: &str) -> Vec<char> {
    let start = script.find("IFS=$'").expect("IFS assignment") + "IFS=$'".len();
    let len = script[start..].find('\'').expect("closing quote");
    script[start..start + len].replace("\\t", "\t").chars().collect()
}

#[rstest]
#[case::comma(",")]
#[case::space(" ")]
#[case::semicolon(";")]
#[case::tab("\t")]
fn shipped_array_split_matches_supported_separators(#[case] separator: &str) {
    let cat = builtin();
    let t = cat.get(&TemplateId::from("u108-unused-accounts")).unwrap();
    let r = Generator::new(separator).generate(
        t,
        &values(&[("CHECK_USERS", Value::List(vec!["games".into(), "lp".into()]))]),
    );
    assert!(r.success);
    assert!(r.rendered_text.contains(&format!("<<< \"games{separator}lp\"")));
    for c in separator.chars() {
        assert!(
            ifs_chars(&r.rendered_text).contains(&c),
            "separator {separator:?} is not split by the script"
        );
    }
}
