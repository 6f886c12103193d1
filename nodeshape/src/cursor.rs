//! Cursor traits - the only view of a realized tree the walker relies on
//!
//! A parser engine exposes its tree through a cursor that can move to the first child, the
//! next sibling or the parent, and report the node it points at. Nothing else is assumed: no
//! random access, no parent pointers on nodes, no way to snapshot and restore a position.

use crate::range::SourceRange;
use std::fmt;

/// A mutable, move-only handle over a realized tree
///
/// Every move mutates the cursor in place and returns whether it succeeded. A failed move
/// must leave the cursor where it was. A cursor is owned by one walk at a time; the walker
/// enforces this by taking it as `&mut`.
pub trait Cursor {
    type Node;

    /// The node the cursor currently points at
    fn node(&self) -> Self::Node;

    fn goto_first_child(&mut self) -> bool;
    fn goto_next_sibling(&mut self) -> bool;
    fn goto_parent(&mut self) -> bool;
}

/// Common read-only interface of a syntax node
pub trait SyntaxNode {
    /// The node kind, matching the shape vocabulary of its grammar
    fn kind(&self) -> &str;
    fn range(&self) -> SourceRange;
}

/// One of the three cursor primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    FirstChild,
    NextSibling,
    Parent,
}

impl Movement {
    /// Attempt this move on `cursor`
    pub fn apply<C: Cursor + ?Sized>(self, cursor: &mut C) -> bool {
        match self {
            Movement::FirstChild => cursor.goto_first_child(),
            Movement::NextSibling => cursor.goto_next_sibling(),
            Movement::Parent => cursor.goto_parent(),
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Movement::FirstChild => "goto_first_child",
            Movement::NextSibling => "goto_next_sibling",
            Movement::Parent => "goto_parent",
        };
        write!(f, "{}", name)
    }
}
