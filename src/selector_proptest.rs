#![cfg(test)]

// Property tests for member expression validation, kept inside the crate so
// they can reach the private parser.

use crate::selector::{member_name, Selector, SelectorKind};
use proptest::prelude::*;

fn ident() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,12}"
}

fn recognized_or_ident() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Count".to_string()),
        Just("IsEmpty".to_string()),
        Just("Keys".to_string()),
        Just("Values".to_string()),
        ident(),
    ]
}

fn type_name() -> impl Strategy<Value = String> {
    prop_oneof![
        ident(),
        (ident(), ident()).prop_map(|(a, b)| format!("{a}::{b}")),
        (ident(), ident(), ident()).prop_map(|(t, k, v)| format!("{t}<{k}, {v}>")),
    ]
}

proptest! {
    // Every accepted shape names the same member.
    #[test]
    fn prop_direct_reference_shapes(
        param in ident(),
        name in recognized_or_ident(),
        pad in " {0,2}",
        ty in type_name(),
        parens in 1usize..4,
    ) {
        let (open, close) = ("(".repeat(parens), ")".repeat(parens));
        let bare = format!("{pad}{name}{pad}");
        let dotted = format!("{param}{pad}.{pad}{name}");
        let lambda = format!("{param}{pad}=>{pad}{param}.{name}");
        let paren_param = format!("({pad}{param}{pad}) => {param}.{name}");
        let typed_param = format!("({ty} {param}) => {param}.{name}");
        let paren_body = format!("{param} => {open}{param}.{name}{close}");
        prop_assert_eq!(member_name(&bare), Some(name.as_str()));
        prop_assert_eq!(member_name(&dotted), Some(name.as_str()));
        prop_assert_eq!(member_name(&lambda), Some(name.as_str()));
        prop_assert_eq!(member_name(&paren_param), Some(name.as_str()));
        prop_assert_eq!(member_name(&typed_param), Some(name.as_str()));
        prop_assert_eq!(member_name(&paren_body), Some(name.as_str()));
    }

    // Calls are never member references, whatever their arguments.
    #[test]
    fn prop_calls_rejected(param in ident(), name in recognized_or_ident(), args in "[a-z0-9, ]{0,6}") {
        let expr = format!("{param} => {param}.{name}({args})");
        prop_assert_eq!(member_name(&expr), None);
        let s: Selector<'_, (), ()> = Selector::member(&expr, |_: &()| ());
        let err = s.kind().unwrap_err();
        prop_assert_eq!(err.selector, expr.clone());
    }

    // Member chains are compound expressions.
    #[test]
    fn prop_chains_rejected(param in ident(), a in ident(), b in ident()) {
        let expr = format!("{param} => {param}.{a}.{b}");
        prop_assert_eq!(member_name(&expr), None);
    }

    // Validation outcome depends on the name alone.
    #[test]
    fn prop_kind_is_name_lookup(name in recognized_or_ident()) {
        let expr = format!("m => m.{name}");
        let s: Selector<'_, (), u8> = Selector::member(&expr, |_: &()| 0);
        prop_assert_eq!(s.kind(), Ok(SelectorKind::from_name(&name)));
    }

    // No panics on arbitrary text.
    #[test]
    fn prop_parser_total(expr in any::<String>()) {
        let s: Selector<'_, (), ()> = Selector::member(&expr, |_: &()| ());
        if let Ok(kind) = s.kind() {
            let name = member_name(&expr).unwrap();
            prop_assert_eq!(kind, SelectorKind::from_name(name));
        }
    }
}
