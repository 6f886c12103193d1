//! Shapes - the externally visible identity of a concrete node

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a consumer can observe about a node without looking at its children
///
/// Shapes compare by value. Hidden rules never become shapes: they are inlined into the
/// rules that reference them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// A visible rule, identified by its name
    Symbol { name: String },
    /// An unnamed literal token, identified by its text
    Literal { value: String },
    /// Any token matched by a regular expression
    Pattern,
}

impl Shape {
    pub fn symbol(name: impl Into<String>) -> Self {
        Shape::Symbol { name: name.into() }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Shape::Literal {
            value: value.into(),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Shape::Symbol { .. })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Symbol { name } => write!(f, "{}", name),
            Shape::Literal { value } => write!(f, "{:?}", value),
            Shape::Pattern => write!(f, "Pattern"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Shape::symbol("expression").to_string(), "expression");
        assert_eq!(Shape::literal("+").to_string(), "\"+\"");
        assert_eq!(Shape::literal("\"").to_string(), r#""\"""#);
        assert_eq!(Shape::Pattern.to_string(), "Pattern");
    }

    #[test]
    fn test_serialized_form() {
        assert_eq!(
            serde_json::to_value(Shape::symbol("block")).unwrap(),
            json!({ "kind": "symbol", "name": "block" })
        );
        assert_eq!(
            serde_json::to_value(Shape::literal("{")).unwrap(),
            json!({ "kind": "literal", "value": "{" })
        );
        assert_eq!(
            serde_json::to_value(Shape::Pattern).unwrap(),
            json!({ "kind": "pattern" })
        );
    }

    #[test]
    fn test_equality_is_by_value() {
        assert_eq!(Shape::literal("x"), Shape::literal(String::from("x")));
        assert_ne!(Shape::literal("x"), Shape::symbol("x"));
        assert!(Shape::symbol("x").is_named());
        assert!(!Shape::Pattern.is_named());
    }
}
