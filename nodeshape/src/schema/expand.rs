//! Shape expansion over the rule graph
//!
//! [Expander] resolves a rule node to the shapes it can produce, inlining hidden symbols on
//! the way. One expander (and therefore one memo table) is used per top-level query, so
//! results never leak between unrelated rules.
//!
//! Expansion nests once per rule node and once per inlined hidden rule. Nesting deeper than
//! [MAX_EXPANSION_DEPTH] fails with [SchemaError::MalformedGrammar] instead of exhausting
//! the stack.

use crate::error::{SchemaError, SchemaResult};
use crate::grammar::{Grammar, Rule};
use crate::schema::SchemaOptions;
use crate::shape::Shape;
use indexmap::IndexSet;
use log::trace;
use std::collections::HashMap;

/// Deepest rule nesting, hidden rule inlining included, that expansion accepts
pub const MAX_EXPANSION_DEPTH: usize = 512;

pub(crate) struct Expander<'g> {
    grammar: &'g Grammar,
    options: &'g SchemaOptions,
    /// Shapes of every hidden rule expanded so far. An empty entry is either a rule that
    /// produces nothing or one whose expansion is still in progress.
    memo: HashMap<&'g str, Vec<Shape>>,
    depth: usize,
}

impl<'g> Expander<'g> {
    pub(crate) fn new(grammar: &'g Grammar, options: &'g SchemaOptions) -> Self {
        Self {
            grammar,
            options,
            memo: HashMap::new(),
            depth: 0,
        }
    }

    /// All shapes `rule` can produce, in first-occurrence order, possibly with duplicates
    pub(crate) fn expand(&mut self, rule: &'g Rule) -> SchemaResult<Vec<Shape>> {
        if self.depth == MAX_EXPANSION_DEPTH {
            return Err(SchemaError::malformed(format!(
                "rule nesting deeper than {} levels while expanding {}",
                MAX_EXPANSION_DEPTH,
                rule.tag()
            )));
        }
        self.depth += 1;
        let shapes = self.expand_node(rule);
        self.depth -= 1;
        shapes
    }

    fn expand_node(&mut self, rule: &'g Rule) -> SchemaResult<Vec<Shape>> {
        match rule {
            // single-valued: only the first underlying shape survives
            Rule::Alias { content, .. } | Rule::Field { content, .. } => {
                let mut shapes = self.expand(content)?;
                shapes.truncate(1);
                Ok(shapes)
            }
            Rule::Seq { members } | Rule::Choice { members } => {
                let mut shapes = Vec::new();
                for member in members {
                    shapes.extend(self.expand(member)?);
                }
                Ok(shapes)
            }
            Rule::Repeat { content }
            | Rule::Repeat1 { content }
            | Rule::Prec { content, .. }
            | Rule::PrecLeft { content, .. } => self.expand(content),
            Rule::StringLiteral { value } => Ok(vec![Shape::literal(value.as_str())]),
            Rule::Pattern { .. } => Ok(vec![Shape::Pattern]),
            Rule::SymbolRef { name } => self.expand_symbol(name),
            Rule::Blank => Ok(Vec::new()),
        }
    }

    fn expand_symbol(&mut self, name: &'g str) -> SchemaResult<Vec<Shape>> {
        if !self.grammar.resolves(name) {
            return Err(SchemaError::unknown_rule(name));
        }
        if !self.options.is_hidden(name) {
            return Ok(vec![Shape::symbol(name)]);
        }
        if let Some(shapes) = self.memo.get(name) {
            if shapes.is_empty() {
                trace!("hidden rule {} already being expanded, cutting cycle", name);
            }
            return Ok(shapes.clone());
        }
        let Some(rule) = self.grammar.rules.get(name) else {
            // hidden external token: nothing to inline
            return Ok(Vec::new());
        };

        self.memo.insert(name, Vec::new());
        trace!("inlining hidden rule {}", name);
        let shapes: Vec<Shape> = self
            .expand(rule)?
            .into_iter()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        self.memo.insert(name, shapes.clone());
        Ok(shapes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(grammar: &Grammar, rule: &Rule) -> SchemaResult<Vec<Shape>> {
        let options = SchemaOptions::default();
        Expander::new(grammar, &options).expand(rule)
    }

    #[test]
    fn test_terminals() {
        let grammar = Grammar::new();
        assert_eq!(
            expand(&grammar, &Rule::string("if")).unwrap(),
            vec![Shape::literal("if")]
        );
        assert_eq!(
            expand(&grammar, &Rule::pattern("\\d+")).unwrap(),
            vec![Shape::Pattern]
        );
        assert!(expand(&grammar, &Rule::blank()).unwrap().is_empty());
    }

    #[test]
    fn test_combinators_concatenate() {
        let grammar = Grammar::new();
        let rule = Rule::seq([
            Rule::string("("),
            Rule::choice([Rule::string("a"), Rule::string("(")]),
            Rule::string(")"),
        ]);
        assert_eq!(
            expand(&grammar, &rule).unwrap(),
            vec![
                Shape::literal("("),
                Shape::literal("a"),
                Shape::literal("("),
                Shape::literal(")")
            ]
        );
    }

    #[test]
    fn test_wrappers_are_transparent() {
        let grammar = Grammar::new();
        let rule = Rule::prec_left(
            None,
            Rule::repeat1(Rule::prec(None, Rule::repeat(Rule::string("x")))),
        );
        assert_eq!(expand(&grammar, &rule).unwrap(), vec![Shape::literal("x")]);
    }

    #[test]
    fn test_alias_and_field_take_first_shape() {
        let grammar = Grammar::new();
        let content = Rule::choice([Rule::string("a"), Rule::string("b")]);

        let alias = Rule::alias(content.clone(), true, "letter");
        assert_eq!(expand(&grammar, &alias).unwrap(), vec![Shape::literal("a")]);

        let field = Rule::field("letter", content);
        assert_eq!(expand(&grammar, &field).unwrap(), vec![Shape::literal("a")]);

        let empty = Rule::field("nothing", Rule::blank());
        assert!(expand(&grammar, &empty).unwrap().is_empty());
    }

    #[test]
    fn test_visible_symbol_is_opaque() {
        let grammar = Grammar::new().with_rule("block", Rule::repeat(Rule::string("stmt")));
        assert_eq!(
            expand(&grammar, &Rule::symbol("block")).unwrap(),
            vec![Shape::symbol("block")]
        );
    }

    #[test]
    fn test_hidden_symbol_is_inlined_and_deduplicated() {
        let grammar = Grammar::new().with_rule(
            "_op",
            Rule::choice([Rule::string("+"), Rule::string("-"), Rule::string("+")]),
        );
        assert_eq!(
            expand(&grammar, &Rule::symbol("_op")).unwrap(),
            vec![Shape::literal("+"), Shape::literal("-")]
        );
    }

    #[test]
    fn test_mutual_hidden_cycle_terminates() {
        let grammar = Grammar::new()
            .with_rule("_a", Rule::choice([Rule::symbol("_b"), Rule::string("a")]))
            .with_rule("_b", Rule::choice([Rule::symbol("_a"), Rule::string("b")]));
        assert_eq!(
            expand(&grammar, &Rule::symbol("_a")).unwrap(),
            vec![Shape::literal("b"), Shape::literal("a")]
        );
    }

    #[test]
    fn test_memo_hit_returns_completed_shapes() {
        let grammar = Grammar::new().with_rule("_kw", Rule::string("let"));
        let rule = Rule::seq([
            Rule::symbol("_kw"),
            Rule::alias(Rule::symbol("_kw"), false, "keyword"),
        ]);
        assert_eq!(
            expand(&grammar, &rule).unwrap(),
            vec![Shape::literal("let"), Shape::literal("let")]
        );
    }

    #[test]
    fn test_unknown_symbol_is_an_error() {
        let grammar = Grammar::new();
        assert_eq!(
            expand(&grammar, &Rule::symbol("_ghost")).unwrap_err(),
            SchemaError::unknown_rule("_ghost")
        );
        assert_eq!(
            expand(&grammar, &Rule::symbol("ghost")).unwrap_err(),
            SchemaError::unknown_rule("ghost")
        );
    }

    #[test]
    fn test_external_symbols() {
        let grammar = Grammar::new()
            .with_external(Rule::symbol("heredoc"))
            .with_external(Rule::symbol("_newline"));
        assert_eq!(
            expand(&grammar, &Rule::symbol("heredoc")).unwrap(),
            vec![Shape::symbol("heredoc")]
        );
        assert!(expand(&grammar, &Rule::symbol("_newline")).unwrap().is_empty());
    }

    /// `_h0 -> _h1 -> ... -> "end"`
    fn hidden_chain(length: usize) -> Grammar {
        (0..length).fold(Grammar::new(), |grammar, i| {
            let next = if i + 1 == length {
                Rule::string("end")
            } else {
                Rule::symbol(format!("_h{}", i + 1))
            };
            grammar.with_rule(format!("_h{}", i), Rule::seq([next]))
        })
    }

    #[test]
    fn test_long_hidden_chain_within_limit() {
        let grammar = hidden_chain(100);
        assert_eq!(
            expand(&grammar, &Rule::symbol("_h0")).unwrap(),
            vec![Shape::literal("end")]
        );
    }

    #[test]
    fn test_hidden_chain_beyond_limit_fails() {
        let grammar = hidden_chain(MAX_EXPANSION_DEPTH);
        assert!(matches!(
            expand(&grammar, &Rule::symbol("_h0")),
            Err(SchemaError::MalformedGrammar { .. })
        ));
    }

    #[test]
    fn test_deeply_nested_rule_fails() {
        let grammar = Grammar::new();
        let rule = (0..MAX_EXPANSION_DEPTH).fold(Rule::string("x"), |rule, _| Rule::repeat(rule));
        assert!(matches!(
            expand(&grammar, &rule),
            Err(SchemaError::MalformedGrammar { .. })
        ));
    }
}
