//! Rule nodes - the tagged production graph handed over by the grammar compiler
//!
//! Every variant maps to exactly one `type` tag of the compiler's JSON output. The set is
//! closed: any other tag fails deserialization instead of being treated as "no shape".

use serde::{Deserialize, Serialize};

/// Precedence attached to `PREC`/`PREC_LEFT` wrappers. It never affects shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Precedence {
    Level(i64),
    Name(String),
}

/// One node of a production rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Rule {
    #[serde(rename = "BLANK")]
    Blank,
    #[serde(rename = "STRING")]
    StringLiteral { value: String },
    #[serde(rename = "PATTERN")]
    Pattern {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flags: Option<String>,
    },
    #[serde(rename = "SYMBOL")]
    SymbolRef { name: String },
    #[serde(rename = "ALIAS")]
    Alias {
        content: Box<Rule>,
        named: bool,
        value: String,
    },
    #[serde(rename = "FIELD")]
    Field { name: String, content: Box<Rule> },
    #[serde(rename = "SEQ")]
    Seq { members: Vec<Rule> },
    #[serde(rename = "CHOICE")]
    Choice { members: Vec<Rule> },
    #[serde(rename = "REPEAT")]
    Repeat { content: Box<Rule> },
    #[serde(rename = "REPEAT1")]
    Repeat1 { content: Box<Rule> },
    #[serde(rename = "PREC")]
    Prec {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Precedence>,
        content: Box<Rule>,
    },
    #[serde(rename = "PREC_LEFT")]
    PrecLeft {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Precedence>,
        content: Box<Rule>,
    },
}

impl Rule {
    pub fn blank() -> Self {
        Rule::Blank
    }

    pub fn string(value: impl Into<String>) -> Self {
        Rule::StringLiteral {
            value: value.into(),
        }
    }

    pub fn pattern(value: impl Into<String>) -> Self {
        Rule::Pattern {
            value: value.into(),
            flags: None,
        }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Rule::SymbolRef { name: name.into() }
    }

    pub fn alias(content: Rule, named: bool, value: impl Into<String>) -> Self {
        Rule::Alias {
            content: Box::new(content),
            named,
            value: value.into(),
        }
    }

    pub fn field(name: impl Into<String>, content: Rule) -> Self {
        Rule::Field {
            name: name.into(),
            content: Box::new(content),
        }
    }

    pub fn seq(members: impl IntoIterator<Item = Rule>) -> Self {
        Rule::Seq {
            members: members.into_iter().collect(),
        }
    }

    pub fn choice(members: impl IntoIterator<Item = Rule>) -> Self {
        Rule::Choice {
            members: members.into_iter().collect(),
        }
    }

    pub fn repeat(content: Rule) -> Self {
        Rule::Repeat {
            content: Box::new(content),
        }
    }

    pub fn repeat1(content: Rule) -> Self {
        Rule::Repeat1 {
            content: Box::new(content),
        }
    }

    pub fn prec(value: Option<Precedence>, content: Rule) -> Self {
        Rule::Prec {
            value,
            content: Box::new(content),
        }
    }

    pub fn prec_left(value: Option<Precedence>, content: Rule) -> Self {
        Rule::PrecLeft {
            value,
            content: Box::new(content),
        }
    }

    /// The wire tag of this node, as spelled in the grammar JSON
    pub fn tag(&self) -> &'static str {
        match self {
            Rule::Blank => "BLANK",
            Rule::StringLiteral { .. } => "STRING",
            Rule::Pattern { .. } => "PATTERN",
            Rule::SymbolRef { .. } => "SYMBOL",
            Rule::Alias { .. } => "ALIAS",
            Rule::Field { .. } => "FIELD",
            Rule::Seq { .. } => "SEQ",
            Rule::Choice { .. } => "CHOICE",
            Rule::Repeat { .. } => "REPEAT",
            Rule::Repeat1 { .. } => "REPEAT1",
            Rule::Prec { .. } => "PREC",
            Rule::PrecLeft { .. } => "PREC_LEFT",
        }
    }

    /// Whether a rule with this top-level node produces a collection of children
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Rule::Repeat { .. } | Rule::Repeat1 { .. } | Rule::Choice { .. } | Rule::Seq { .. }
        )
    }

    /// Direct sub-rules of this node, in declaration order
    pub fn children(&self) -> &[Rule] {
        match self {
            Rule::Seq { members } | Rule::Choice { members } => members,
            Rule::Alias { content, .. }
            | Rule::Field { content, .. }
            | Rule::Repeat { content }
            | Rule::Repeat1 { content }
            | Rule::Prec { content, .. }
            | Rule::PrecLeft { content, .. } => std::slice::from_ref(&**content),
            Rule::Blank
            | Rule::StringLiteral { .. }
            | Rule::Pattern { .. }
            | Rule::SymbolRef { .. } => &[],
        }
    }

    /// Every symbol name referenced anywhere below this node, in document order
    pub fn symbol_refs(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut stack = vec![self];
        while let Some(rule) = stack.pop() {
            if let Rule::SymbolRef { name } = rule {
                names.push(name.as_str());
            }
            stack.extend(rule.children().iter().rev());
        }
        names
    }
}
