//! Grammar - the rule graph consumed by the schema generator
//!
//!     A grammar is an ordered mapping from rule name to its top-level [Rule] plus an ordered
//!     list of extras. Both come straight from the external grammar compiler's JSON output:
//!
//!         {
//!           "name": "mini",
//!           "rules": { "program": { "type": "REPEAT", "content": { ... } }, ... },
//!           "extras": [ { "type": "SYMBOL", "name": "comment" } ]
//!         }
//!
//!     Rule order is the document's order and is kept stable (the map is an [IndexMap]), so
//!     everything derived from a grammar iterates deterministically. Other top-level fields
//!     the compiler emits (`word`, `conflicts`, `inline`, ...) are ignored. `externals` is kept:
//!     symbols produced by an external scanner are legal references without a rule of their own.
//!
//! Hidden Rules
//!
//!     Whether a rule is hidden is a naming convention (a leading marker, `_` by default). The
//!     grammar itself does not interpret it; see [SchemaOptions](crate::schema::SchemaOptions).

pub mod rule;

pub use rule::{Precedence, Rule};

use crate::error::{SchemaError, SchemaResult};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub rules: IndexMap<String, Rule>,
    #[serde(default)]
    pub extras: Vec<Rule>,
    /// Tokens produced by an external scanner. Symbols declared here resolve without a rule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub externals: Vec<Rule>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add (or replace) a rule, keeping its first insertion position
    pub fn with_rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.rules.insert(name.into(), rule);
        self
    }

    pub fn with_extra(mut self, rule: Rule) -> Self {
        self.extras.push(rule);
        self
    }

    pub fn with_external(mut self, rule: Rule) -> Self {
        self.externals.push(rule);
        self
    }

    /// Parse the grammar compiler's JSON output
    pub fn from_json(source: &str) -> SchemaResult<Self> {
        let grammar: Grammar = serde_json::from_str(source)?;
        grammar.log_loaded();
        Ok(grammar)
    }

    pub fn from_reader(reader: impl Read) -> SchemaResult<Self> {
        let grammar: Grammar = serde_json::from_reader(reader)?;
        grammar.log_loaded();
        Ok(grammar)
    }

    pub fn from_value(value: serde_json::Value) -> SchemaResult<Self> {
        let grammar: Grammar = serde_json::from_value(value)?;
        grammar.log_loaded();
        Ok(grammar)
    }

    fn log_loaded(&self) {
        debug!(
            "loaded grammar {} with {} rules and {} extras",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.rules.len(),
            self.extras.len()
        );
    }

    /// Look up a rule, failing with [SchemaError::UnknownRule] when it is not defined
    pub fn rule(&self, name: &str) -> SchemaResult<&Rule> {
        self.rules
            .get(name)
            .ok_or_else(|| SchemaError::unknown_rule(name))
    }

    pub fn contains_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Whether `name` is declared as an external scanner token
    pub fn is_external(&self, name: &str) -> bool {
        self.externals
            .iter()
            .any(|rule| matches!(rule, Rule::SymbolRef { name: external } if external == name))
    }

    /// Whether a symbol reference to `name` resolves to a rule or an external token
    pub fn resolves(&self, name: &str) -> bool {
        self.contains_rule(name) || self.is_external(name)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Verify that every symbol reference in every rule and extra resolves.
    ///
    /// Schema generation reports dangling references lazily, one rule at a time. This checks
    /// the whole grammar up front and reports the first dangling name in rule order.
    pub fn check_references(&self) -> SchemaResult<()> {
        let roots = self.rules.values().chain(self.extras.iter());
        for rule in roots {
            if let Some(name) = rule
                .symbol_refs()
                .into_iter()
                .find(|name| !self.resolves(name))
            {
                return Err(SchemaError::unknown_rule(name));
            }
        }
        Ok(())
    }
}
