use proptest::prelude::*;
use tinted::{compile, trim_styles, Compiler, Extensions};

fn directive_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<u8>().prop_map(|c| format!("{{fg {}}}", c)),
        any::<u8>().prop_map(|c| format!("{{bg {}}}", c)),
        prop::sample::select(vec![
            "{nofg}", "{nobg}", "{bold}", "{nobold}", "{reverse}", "{noreverse}", "{reset}",
        ])
        .prop_map(str::to_string),
        ("[a-z ]{0,3}", any::<u8>()).prop_map(|(t, c)| format!("{{from {:?} {}}}", t, c)),
        (any::<u8>(), "[a-z ]{0,3}").prop_map(|(c, t)| format!("{{to {} {:?}}}", c, t)),
        "[a-z ]{1,5}",
    ]
}

fn style_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(directive_strategy(), 0..12).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn fg_then_bg(c in any::<u8>(), d in any::<u8>()) {
        let mut style = compile(&format!("{{fg {}}}{{bg {}}}", c, d), &Extensions::new()).unwrap();
        let out = style.execute_to_string(&()).unwrap();
        prop_assert_eq!(out, format!("\x1b[38;5;{}m\x1b[48;5;{}m", c, d));
        prop_assert_eq!((style.foreground(), style.background()), (c, d));
    }

    #[test]
    fn default_colors_are_constant(c in any::<u8>(), d in any::<u8>()) {
        let text = format!("{{fg {}}}{{bg {}}}", c, d);
        let mut style = compile(&(text + "{nofg}{nobg}"), &Extensions::new()).unwrap();
        let out = style.execute_to_string(&()).unwrap();
        prop_assert!(out.ends_with("\x1b[39m\x1b[49m"));
        prop_assert_eq!((style.foreground(), style.background()), (0, 0));
    }

    #[test]
    fn reset_always_clears(text in style_strategy()) {
        let mut style = compile(&(text + "{reset}"), &Extensions::new()).unwrap();
        let out = style.execute_to_string(&()).unwrap();
        prop_assert!(out.ends_with("\x1b[0m"));
        prop_assert_eq!((style.foreground(), style.background()), (0, 0));
    }

    #[test]
    fn transitions_restore_foreground(text in style_strategy(), t in "[a-z]{0,2}", c in any::<u8>()) {
        let mut style = compile(&text, &Extensions::new()).unwrap();
        style.execute_to_string(&()).unwrap();
        let fg = style.foreground();

        let mut from = compile(&format!("{}{{from {:?} {}}}", text, t, c), &Extensions::new()).unwrap();
        from.execute_to_string(&()).unwrap();
        prop_assert_eq!((from.foreground(), from.background()), (fg, c));

        let mut to = compile(&format!("{}{{to {} {:?}}}", text, c, t), &Extensions::new()).unwrap();
        to.execute_to_string(&()).unwrap();
        prop_assert_eq!((to.foreground(), to.background()), (fg, c));
    }

    #[test]
    fn no_colors_output_has_no_escapes(text in style_strategy()) {
        let mut plain = Compiler::new().no_colors(true).compile(&text).unwrap();
        let mut colored = compile(&text, &Extensions::new()).unwrap();

        let plain_out = plain.execute_to_string(&()).unwrap();
        let colored_out = colored.execute_to_string(&()).unwrap();

        prop_assert!(!plain_out.contains('\x1b'));
        prop_assert_eq!(&plain_out, &trim_styles(&colored_out));
        prop_assert_eq!(plain.state().foreground(), colored.state().foreground());
        prop_assert_eq!(plain.state().background(), colored.state().background());
    }

    #[test]
    fn trim_is_idempotent(input in "(\x1b|[a-z;\\[m ]){0,40}") {
        let once = trim_styles(&input);
        prop_assert_eq!(trim_styles(&once), once.clone());
    }

    #[test]
    fn trim_leaves_plain_text(input in "[^\x1b]*") {
        prop_assert_eq!(trim_styles(&input), input);
    }
}
