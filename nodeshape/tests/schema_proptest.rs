//! Property-based tests for shape expansion
//!
//! Grammars are generated around one collection rule whose members mix literals, patterns,
//! visible symbols and acyclic hidden symbols. The properties hold for any such grammar:
//! - the reachable shapes never contain duplicates
//! - reordering the members changes the order of the shapes but not the set
//! - generating twice gives the same output

use indexmap::IndexSet;
use nodeshape::{Grammar, Rule, SchemaGenerator, Shape};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Generate a single member of the collection rule
fn member_strategy() -> impl Strategy<Value = Rule> {
    let leaf = prop_oneof![
        "[a-d]".prop_map(Rule::string),
        Just(Rule::pattern("[0-9]+")),
        (0..3usize).prop_map(|i| Rule::symbol(format!("visible{}", i))),
        (0..3usize).prop_map(|i| Rule::symbol(format!("_hidden{}", i))),
        Just(Rule::blank()),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(Rule::seq),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Rule::choice),
            inner.clone().prop_map(Rule::repeat),
            inner.prop_map(|rule| Rule::prec(None, rule)),
        ]
    })
}

/// Generate members together with a shuffled copy
fn members_and_permutation() -> impl Strategy<Value = (Vec<Rule>, Vec<Rule>)> {
    prop::collection::vec(member_strategy(), 1..8)
        .prop_flat_map(|members| (Just(members.clone()), Just(members).prop_shuffle()))
}

fn grammar_with(collection: Rule) -> Grammar {
    Grammar::new()
        .with_rule("root", collection)
        .with_rule("visible0", Rule::pattern("[a-z]+"))
        .with_rule("visible1", Rule::repeat(Rule::symbol("_hidden0")))
        .with_rule("visible2", Rule::string("v"))
        .with_rule(
            "_hidden0",
            Rule::choice([Rule::string("h"), Rule::symbol("visible0")]),
        )
        .with_rule(
            "_hidden1",
            Rule::seq([Rule::symbol("_hidden0"), Rule::string("a")]),
        )
        .with_rule(
            "_hidden2",
            Rule::repeat1(Rule::choice([Rule::symbol("_hidden1"), Rule::symbol("visible2")])),
        )
        .with_rule("comment", Rule::pattern("#.*"))
        .with_extra(Rule::symbol("comment"))
}

fn shapes_of(grammar: &Grammar) -> IndexSet<Shape> {
    SchemaGenerator::new(grammar).shapes_of("root").unwrap()
}

proptest! {
    #[test]
    fn test_shapes_have_no_duplicates(members in prop::collection::vec(member_strategy(), 1..8)) {
        let grammar = grammar_with(Rule::seq(members));
        let shapes: Vec<Shape> = SchemaGenerator::new(&grammar)
            .generate()
            .unwrap()
            .get("root")
            .unwrap()
            .to_vec();
        let unique: BTreeSet<&Shape> = shapes.iter().collect();
        prop_assert_eq!(unique.len(), shapes.len());
    }

    #[test]
    fn test_member_order_does_not_change_the_set((members, shuffled) in members_and_permutation()) {
        let original = shapes_of(&grammar_with(Rule::choice(members)));
        let permuted = shapes_of(&grammar_with(Rule::choice(shuffled)));
        let original: BTreeSet<Shape> = original.into_iter().collect();
        let permuted: BTreeSet<Shape> = permuted.into_iter().collect();
        prop_assert_eq!(original, permuted);
    }

    #[test]
    fn test_generation_is_deterministic(members in prop::collection::vec(member_strategy(), 1..8)) {
        let grammar = grammar_with(Rule::seq(members));
        let first = SchemaGenerator::new(&grammar).generate().unwrap();
        let second = SchemaGenerator::new(&grammar).generate().unwrap();
        prop_assert_eq!(first.to_json(false).unwrap(), second.to_json(false).unwrap());
    }
}
