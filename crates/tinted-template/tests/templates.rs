use proptest::prelude::*;
use serde_json::json;
use tinted_template::{
    from_fn, Arity, Delimiters, ExecError, FuncError, FuncMap, ParseErrorKind, Template, Value,
};

fn braces() -> Delimiters {
    Delimiters::new("{", "}")
}

fn parse(text: &str) -> Template<()> {
    Template::parse("it", text, FuncMap::with_builtins(), &braces()).unwrap()
}

#[test]
fn builtins_compose() {
    let template = parse(r#"{if and .a (not .b)}yes{else}no{end} {len .xs} {print 1 2 "x"}"#);
    let out = template
        .render(&mut (), &json!({"a": true, "b": false, "xs": [1, 2, 3]}))
        .unwrap();
    assert_eq!(out, "yes 3 1 2x");
}

#[test]
fn default_delimiters_leave_single_braces_alone() {
    let template: Template<()> =
        Template::parse("it", "{x} {{.x}}", FuncMap::with_builtins(), &Delimiters::default()).unwrap();
    assert_eq!(template.render(&mut (), &json!({"x": 1})).unwrap(), "{x} 1");
}

#[test]
fn execute_appends_partial_output_on_error() {
    let funcs = FuncMap::new().add("fail", Arity::Exact(0), |_: &mut (), _: &[Value]| {
        Err(FuncError::Custom("nope".into()))
    });
    let template = Template::parse("it", "before{fail}after", funcs, &braces()).unwrap();

    let mut out = String::new();
    let err = template.execute(&mut (), &Value::Null, &mut out).unwrap_err();
    assert_eq!(out, "before");
    assert!(matches!(err, ExecError::Call { .. }));
    assert!(err.to_string().contains("nope"));
}

#[test]
fn template_reports_its_functions() {
    let mut funcs = FuncMap::with_builtins();
    funcs.insert("x", from_fn(Arity::AtLeast(0), |_: &mut (), _: &[Value]| Ok(Value::Null)));
    let template = Template::parse("named", "{x}", funcs, &braces()).unwrap();
    assert_eq!(template.name(), "named");
    assert!(template.funcs().names().any(|n| n == "x"));
}

#[test]
fn parse_error_names_template() {
    let err = Template::<()>::parse("style", "{if .a}", FuncMap::with_builtins(), &braces()).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedEof("if"));
    assert_eq!(err.to_string(), "template: style:1: unexpected EOF in if");
}

proptest! {
    /// Text without delimiters renders unchanged.
    #[test]
    fn plain_text_round_trips(text in "[^{}]*") {
        let template = parse(&text);
        prop_assert_eq!(template.render(&mut (), &Value::Null).unwrap(), text);
    }

    /// A quoted literal prints exactly its contents.
    #[test]
    fn quoted_literals_print_verbatim(text in "[a-zA-Z0-9 {}|.$]*") {
        let template = parse(&format!("{{{:?}}}", text));
        prop_assert_eq!(template.render(&mut (), &Value::Null).unwrap(), text);
    }
}
