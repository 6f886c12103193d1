//! Cursor-based tree walking
//!
//!     The walker visits every node strictly below the cursor's starting node, in document
//!     order (pre-order: a node before its children, a subtree before the next sibling). It
//!     never recurses and never materializes a node list: the cursor already encodes the
//!     ancestor chain, so the only extra state is a `descend` flag and a depth counter.
//!
//! The Loop
//!
//!     On every step the three moves are tried at most once, in this order:
//!
//!         1. descend is set and `goto_first_child` succeeds: visit the child
//!         2. `goto_next_sibling` succeeds: visit the sibling, set descend
//!         3. `goto_parent` succeeds: clear descend (the parent was visited on the way down)
//!         4. nothing moved: the walk is complete
//!
//!     The walk also ends as soon as the cursor climbs back to its starting node, so it never
//!     leaves the subtree it started on. A finished walk leaves the cursor on that node.
//!
//! Stopping Early
//!
//!     [walk] takes a visitor returning [ControlFlow]. `Break` stops the walk immediately and is
//!     handed back to the caller; the cursor is then left on the node just visited and must
//!     not be used to resume.

use crate::cursor::{Cursor, Movement, SyntaxNode};
use crate::error::{CursorContractViolation, Violation};
use log::trace;
use std::convert::Infallible;
use std::ops::ControlFlow;

#[derive(Debug, Clone)]
struct WalkState {
    descend: bool,
    depth: usize,
    finished: bool,
}

impl WalkState {
    fn new() -> Self {
        Self {
            descend: true,
            depth: 0,
            finished: false,
        }
    }

    /// Move to the next node of the walk, or finish.
    ///
    /// `attempt` performs a single move and reports whether it succeeded.
    fn advance<C, E>(
        &mut self,
        cursor: &mut C,
        mut attempt: impl FnMut(&mut C, Movement) -> Result<bool, E>,
    ) -> Result<Option<C::Node>, E>
    where
        C: Cursor + ?Sized,
    {
        while !self.finished {
            if self.descend && attempt(cursor, Movement::FirstChild)? {
                self.depth += 1;
                return Ok(Some(cursor.node()));
            }
            if self.depth == 0 {
                break;
            }
            if attempt(cursor, Movement::NextSibling)? {
                self.descend = true;
                return Ok(Some(cursor.node()));
            }
            if !attempt(cursor, Movement::Parent)? {
                break;
            }
            self.depth -= 1;
            self.descend = false;
        }
        self.finished = true;
        Ok(None)
    }
}

/// Pre-order iterator over the descendants of a cursor's starting node
///
/// The iterator borrows the cursor mutably for its whole lifetime, so no other walk can
/// move it in between.
pub struct Descendants<'c, C: Cursor + ?Sized> {
    cursor: &'c mut C,
    state: WalkState,
}

impl<'c, C: Cursor + ?Sized> Descendants<'c, C> {
    pub fn new(cursor: &'c mut C) -> Self {
        Self {
            cursor,
            state: WalkState::new(),
        }
    }

    /// Depth of the last yielded node below the starting node (children are at depth 1)
    pub fn depth(&self) -> usize {
        self.state.depth
    }
}

impl<C: Cursor + ?Sized> Iterator for Descendants<'_, C> {
    type Item = C::Node;

    fn next(&mut self) -> Option<C::Node> {
        let step = self.state.advance(&mut *self.cursor, |cursor, movement| {
            Ok::<_, Infallible>(movement.apply(cursor))
        });
        match step {
            Ok(node) => node,
            Err(never) => match never {},
        }
    }
}

impl<C: Cursor + ?Sized> std::iter::FusedIterator for Descendants<'_, C> {}

/// Like [Descendants], but checks every move against the cursor contract.
///
/// A failed move must not change the current node and a successful child or sibling move
/// must change it. The first violation is yielded as an error and ends the iteration.
pub struct CheckedDescendants<'c, C: Cursor + ?Sized> {
    cursor: &'c mut C,
    state: WalkState,
}

impl<'c, C> CheckedDescendants<'c, C>
where
    C: Cursor + ?Sized,
    C::Node: PartialEq + SyntaxNode,
{
    pub fn new(cursor: &'c mut C) -> Self {
        Self {
            cursor,
            state: WalkState::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.state.depth
    }
}

impl<C> Iterator for CheckedDescendants<'_, C>
where
    C: Cursor + ?Sized,
    C::Node: PartialEq + SyntaxNode,
{
    type Item = Result<C::Node, CursorContractViolation>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.state.advance(&mut *self.cursor, checked_move);
        match step {
            Ok(node) => node.map(Ok),
            Err(violation) => {
                self.state.finished = true;
                Some(Err(violation))
            }
        }
    }
}

fn checked_move<C>(cursor: &mut C, movement: Movement) -> Result<bool, CursorContractViolation>
where
    C: Cursor + ?Sized,
    C::Node: PartialEq + SyntaxNode,
{
    let before = cursor.node();
    let moved = movement.apply(cursor);
    let stayed = cursor.node() == before;
    let violation = match (moved, stayed) {
        (false, false) => Violation::MovedOnFailure,
        (true, true) => Violation::StayedOnSuccess,
        _ => return Ok(moved),
    };
    Err(CursorContractViolation {
        movement,
        violation,
        kind: before.kind().to_string(),
        range: before.range(),
    })
}

/// Visit every node below the cursor's starting node in document order.
///
/// The visitor decides whether to continue. The first `Break` ends the walk and is returned.
pub fn walk<C, B, F>(cursor: &mut C, mut visit: F) -> ControlFlow<B>
where
    C: Cursor + ?Sized,
    F: FnMut(C::Node) -> ControlFlow<B>,
{
    trace!("walk started");
    for node in Descendants::new(cursor) {
        visit(node)?;
    }
    trace!("walk finished");
    ControlFlow::Continue(())
}

/// Visit every node below the cursor's starting node, returning how many were visited
pub fn walk_all<C, F>(cursor: &mut C, mut visit: F) -> usize
where
    C: Cursor + ?Sized,
    F: FnMut(C::Node),
{
    let mut visited = 0;
    for node in Descendants::new(cursor) {
        visit(node);
        visited += 1;
    }
    trace!("walk finished after {} nodes", visited);
    visited
}

/// [walk] with every cursor move checked against the cursor contract
pub fn try_walk<C, B, F>(
    cursor: &mut C,
    mut visit: F,
) -> Result<ControlFlow<B>, CursorContractViolation>
where
    C: Cursor + ?Sized,
    C::Node: PartialEq + SyntaxNode,
    F: FnMut(C::Node) -> ControlFlow<B>,
{
    for node in CheckedDescendants::new(cursor) {
        if let ControlFlow::Break(value) = visit(node?) {
            return Ok(ControlFlow::Break(value));
        }
    }
    Ok(ControlFlow::Continue(()))
}
