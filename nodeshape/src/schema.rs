//! Grammar type schema generation
//!
//!     The schema answers one question for every collection rule of a grammar: which node
//!     shapes can a consumer meet when it walks that rule's children? Collection rules are
//!     the ones whose top-level node is `REPEAT`, `REPEAT1`, `CHOICE` or `SEQ`.
//!
//! Expansion
//!
//!     Shapes are found by expanding the rule graph one node at a time:
//!
//!         - literals and patterns are shapes of their own
//!         - visible symbols are opaque shapes named after the rule; they are never entered
//!         - hidden symbols are inlined, each one at most once per query
//!         - combinators, repetitions and precedence wrappers contribute the union of their
//!           contents
//!         - aliases and fields are single-valued and keep only the first shape of their content
//!
//!     A hidden rule that reaches itself again while it is still being expanded contributes
//!     nothing on the inner path: its shapes are already collected by the path that entered it
//!     first. Chains of hidden rules and nested rule nodes are followed up to
//!     [MAX_EXPANSION_DEPTH] levels; deeper grammars are rejected as malformed.
//!
//! Extras
//!
//!     Extras (whitespace, comments) may appear between any two nodes, so the shapes of every
//!     extra are appended to every collection rule's set.
//!
//! Ordering
//!
//!     Sets keep first-occurrence order and the schema keeps grammar rule order, so the same
//!     grammar always serializes to the same bytes.

pub(crate) mod expand;

use crate::error::SchemaResult;
use crate::grammar::{Grammar, Rule};
use crate::shape::Shape;
use expand::Expander;
pub use expand::MAX_EXPANSION_DEPTH;
use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::{Deserialize, Serialize};

/// Knobs for schema generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Rules whose name starts with this marker are inlined
    pub hidden_prefix: char,
    /// Whether extras are added to every collection rule
    pub include_extras: bool,
}

impl SchemaOptions {
    pub fn is_hidden(&self, name: &str) -> bool {
        name.starts_with(self.hidden_prefix)
    }
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            hidden_prefix: '_',
            include_extras: true,
        }
    }
}

/// Rule name to the ordered, deduplicated shapes reachable from that rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    rules: IndexMap<String, Vec<Shape>>,
}

impl Schema {
    pub fn get(&self, rule: &str) -> Option<&[Shape]> {
        self.rules.get(rule).map(Vec::as_slice)
    }

    pub fn contains_rule(&self, rule: &str) -> bool {
        self.rules.contains_key(rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Shape])> {
        self.rules
            .iter()
            .map(|(name, shapes)| (name.as_str(), shapes.as_slice()))
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Computes reachable shapes over one grammar
pub struct SchemaGenerator<'g> {
    grammar: &'g Grammar,
    options: SchemaOptions,
}

impl<'g> SchemaGenerator<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_options(grammar, SchemaOptions::default())
    }

    pub fn with_options(grammar: &'g Grammar, options: SchemaOptions) -> Self {
        Self { grammar, options }
    }

    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    /// Shapes reachable from `rule_name`, deduplicated in first-occurrence order.
    ///
    /// Collection rules also carry the shapes of every extra, after their own.
    pub fn shapes_of(&self, rule_name: &str) -> SchemaResult<IndexSet<Shape>> {
        let rule = self.grammar.rule(rule_name)?;
        let extras = if rule.is_collection() {
            self.extra_shapes()?
        } else {
            IndexSet::new()
        };
        self.shapes_with_extras(rule_name, rule, &extras)
    }

    /// Shapes contributed by the grammar's extras (empty when extras are disabled)
    pub fn extra_shapes(&self) -> SchemaResult<IndexSet<Shape>> {
        let mut shapes = IndexSet::new();
        if !self.options.include_extras {
            return Ok(shapes);
        }
        for extra in &self.grammar.extras {
            shapes.extend(Expander::new(self.grammar, &self.options).expand(extra)?);
        }
        Ok(shapes)
    }

    /// Build the schema for every collection rule, in grammar order.
    ///
    /// The first failing rule aborts generation; a partial schema is never returned.
    pub fn generate(&self) -> SchemaResult<Schema> {
        let extras = self.extra_shapes()?;
        let mut rules = IndexMap::new();
        for (name, rule) in self.grammar.rules.iter().filter(|(_, r)| r.is_collection()) {
            let shapes = self.shapes_with_extras(name, rule, &extras)?;
            rules.insert(name.clone(), shapes.into_iter().collect());
        }
        debug!(
            "generated schema for {} of {} rules",
            rules.len(),
            self.grammar.rules.len()
        );
        Ok(Schema { rules })
    }

    fn shapes_with_extras(
        &self,
        rule_name: &str,
        rule: &'g Rule,
        extras: &IndexSet<Shape>,
    ) -> SchemaResult<IndexSet<Shape>> {
        debug!("computing shapes of rule {} ({})", rule_name, rule.tag());
        let mut shapes: IndexSet<Shape> = Expander::new(self.grammar, &self.options)
            .expand(rule)?
            .into_iter()
            .collect();
        if rule.is_collection() {
            shapes.extend(extras.iter().cloned());
        }
        Ok(shapes)
    }
}

/// Generate the schema of `grammar` with default options
pub fn generate_schema(grammar: &Grammar) -> SchemaResult<Schema> {
    SchemaGenerator::new(grammar).generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    fn shapes(generator: &SchemaGenerator, rule: &str) -> Vec<Shape> {
        generator.shapes_of(rule).unwrap().into_iter().collect()
    }

    #[test]
    fn test_hidden_prefix() {
        let options = SchemaOptions::default();
        assert!(options.is_hidden("_expression"));
        assert!(!options.is_hidden("expression"));

        let options = SchemaOptions {
            hidden_prefix: '$',
            ..SchemaOptions::default()
        };
        assert!(options.is_hidden("$inline"));
        assert!(!options.is_hidden("_expression"));
    }

    #[test]
    fn test_shapes_of_unknown_rule() {
        let grammar = Grammar::new();
        let generator = SchemaGenerator::new(&grammar);
        assert_eq!(
            generator.shapes_of("missing").unwrap_err(),
            SchemaError::unknown_rule("missing")
        );
    }

    #[test]
    fn test_extras_only_for_collections() {
        let grammar = Grammar::new()
            .with_rule("list", Rule::repeat(Rule::string("x")))
            .with_rule("word", Rule::pattern("[a-z]+"))
            .with_rule("comment", Rule::pattern("//.*"))
            .with_extra(Rule::symbol("comment"));
        let generator = SchemaGenerator::new(&grammar);

        assert_eq!(
            shapes(&generator, "list"),
            vec![Shape::literal("x"), Shape::symbol("comment")]
        );
        assert_eq!(shapes(&generator, "word"), vec![Shape::Pattern]);
    }

    #[test]
    fn test_extras_can_be_disabled() {
        let grammar = Grammar::new()
            .with_rule("list", Rule::repeat(Rule::string("x")))
            .with_extra(Rule::pattern("\\s"));
        let options = SchemaOptions {
            include_extras: false,
            ..SchemaOptions::default()
        };
        let generator = SchemaGenerator::with_options(&grammar, options);
        assert_eq!(shapes(&generator, "list"), vec![Shape::literal("x")]);
        assert!(generator.extra_shapes().unwrap().is_empty());
    }

    #[test]
    fn test_extra_already_reachable_is_not_duplicated() {
        let grammar = Grammar::new()
            .with_rule(
                "block",
                Rule::seq([Rule::symbol("comment"), Rule::string("end")]),
            )
            .with_rule("comment", Rule::pattern("#.*"))
            .with_extra(Rule::symbol("comment"));
        let generator = SchemaGenerator::new(&grammar);
        assert_eq!(
            shapes(&generator, "block"),
            vec![Shape::symbol("comment"), Shape::literal("end")]
        );
    }

    #[test]
    fn test_generate_covers_collection_rules_in_order() {
        let grammar = Grammar::new()
            .with_rule("source", Rule::repeat(Rule::symbol("_item")))
            .with_rule("_item", Rule::choice([Rule::symbol("call"), Rule::string(";")]))
            .with_rule("call", Rule::seq([Rule::symbol("name"), Rule::string("()")]))
            .with_rule("name", Rule::pattern("\\w+"));
        let schema = generate_schema(&grammar).unwrap();

        assert_eq!(
            schema.rule_names().collect::<Vec<_>>(),
            vec!["source", "_item", "call"]
        );
        assert_eq!(
            schema.get("source").unwrap(),
            &[Shape::symbol("call"), Shape::literal(";")]
        );
        assert!(schema.get("name").is_none());
    }

    #[test]
    fn test_generate_fails_without_partial_output() {
        let grammar = Grammar::new()
            .with_rule("ok", Rule::repeat(Rule::string("x")))
            .with_rule("broken", Rule::seq([Rule::symbol("_nowhere")]));
        assert_eq!(
            generate_schema(&grammar).unwrap_err(),
            SchemaError::unknown_rule("_nowhere")
        );
    }

    #[test]
    fn test_failing_extra_fails_generation() {
        let grammar = Grammar::new()
            .with_rule("ok", Rule::repeat(Rule::string("x")))
            .with_extra(Rule::symbol("comment"));
        assert_eq!(
            generate_schema(&grammar).unwrap_err(),
            SchemaError::unknown_rule("comment")
        );
    }

    #[test]
    fn test_schema_json() {
        let grammar = Grammar::new()
            .with_rule(
                "pair",
                Rule::seq([Rule::symbol("key"), Rule::string(":"), Rule::pattern(".")]),
            )
            .with_rule("key", Rule::pattern("\\w+"));
        let schema = generate_schema(&grammar).unwrap();
        assert_eq!(
            schema.to_json(false).unwrap(),
            r#"{"pair":[{"kind":"symbol","name":"key"},{"kind":"literal","value":":"},{"kind":"pattern"}]}"#
        );
    }
}
