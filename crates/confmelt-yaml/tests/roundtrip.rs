/*
 * roundtrip.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Property-based tests for YAML parse/emit fidelity.
 *
 * Any document built from maps, sequences and typed scalars must read back
 * from its emitted text unchanged: same key order, same scalar types.
 */

use confmelt_config::{Node, Scalar, melt};
use confmelt_yaml::{emit, parse};
use proptest::prelude::*;

fn arb_scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        "([a-zA-Z0-9_+.~][a-zA-Z0-9 _.+-]{0,11})?".prop_map(Scalar::String),
        any::<i64>().prop_map(Scalar::Integer),
        (-1e6f64..1e6f64).prop_map(Scalar::Float),
        any::<bool>().prop_map(Scalar::Boolean),
        Just(Scalar::Null),
    ]
}

fn arb_node() -> impl Strategy<Value = Node> {
    arb_scalar()
        .prop_map(Node::Scalar)
        .prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Node::Sequence),
                prop::collection::vec(("[a-z_][a-z0-9_]{0,7}", inner), 0..6)
                    .prop_map(Node::from_entries),
            ]
        })
}

proptest! {
    #[test]
    fn parse_after_emit_is_identity(node in arb_node()) {
        let text = emit(&node).unwrap();
        let back = parse(&text).unwrap();
        prop_assert_eq!(back, node, "emitted text:\n{}", text);
    }

    #[test]
    fn melt_survives_a_file_round_trip(node in arb_node()) {
        let back = parse(&emit(&node).unwrap()).unwrap();
        prop_assert_eq!(melt(&back).unwrap(), melt(&node).unwrap());
    }
}

#[test]
fn test_quoted_numeric_strings_survive() {
    let text = "version: '1.10'\nport: 8080\nzip: \"02134\"\n";
    let node = parse(text).unwrap();

    assert_eq!(node.get_key("version"), Some(&Node::from("1.10")));
    assert_eq!(node.get_key("port"), Some(&Node::from(8080)));
    assert_eq!(node.get_key("zip"), Some(&Node::from("02134")));
    assert_eq!(parse(&emit(&node).unwrap()).unwrap(), node);
}

#[test]
fn test_strings_that_look_like_other_types_stay_strings() {
    let tricky = [
        "+.inf", "+.Inf", "+.INF", ".inf", "-.inf", ".nan", "+5", "+1.5", "-0", "1e3", "1.",
        "inf", "NaN", "0x1F", "yes", "off", "~", "null", "", " padded ", "+", ".", "-",
        "99999999999999999999",
    ];
    let node = Node::from_entries(tricky.iter().enumerate().map(|(i, s)| {
        (format!("k{i}"), Node::from(*s))
    }));
    let text = emit(&node).unwrap();
    assert_eq!(parse(&text).unwrap(), node, "emitted text:\n{text}");
}
