//! Arena tree - an in-memory syntax tree with a three-primitive cursor
//!
//!     Real trees come from an external parser engine. This arena is the crate's own
//!     implementation of the same contract: every node lives in one `Vec`, children are stored
//!     as id lists, and [TreeCursor] navigates with nothing but first-child, next-sibling and
//!     parent moves. It backs the tests and is a reference for adapting other engines.
//!
//!     A cursor is bounded to the node it was created on: it never moves to that node's
//!     siblings or parent, the same way cursors of incremental parsers treat their starting
//!     node as the root.
//!
//! Building
//!
//!     Trees are assembled depth-first:
//!
//!         let tree = TreeBuilder::new()
//!             .start_node("call")
//!             .token("name")
//!             .start_node("arguments")
//!             .token("number")
//!             .finish_node()
//!             .finish_node()
//!             .finish()?;

use crate::cursor::{Cursor, SyntaxNode};
use crate::error::TreeBuildError;
use crate::range::SourceRange;
use std::fmt;

/// Index of a node inside its [Tree]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: String,
    range: SourceRange,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An owned syntax tree. The root is always the first node.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then_some(Node { tree: self, id })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A cursor positioned on the root
    pub fn cursor(&self) -> TreeCursor<'_> {
        TreeCursor::new(self.root())
    }

    /// A cursor bounded to the subtree of `id`
    pub fn cursor_at(&self, id: NodeId) -> Option<TreeCursor<'_>> {
        self.node(id).map(TreeCursor::new)
    }

    /// Every node in document order, root first
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.nodes.len()).map(move |index| Node {
            tree: self,
            id: NodeId(index),
        })
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

/// A borrowed handle to one node of a [Tree]
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> Node<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &'t str {
        &self.tree.data(self.id).kind
    }

    pub fn range(&self) -> SourceRange {
        self.tree.data(self.id).range
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.tree.data(self.id).parent.map(|id| Node {
            tree: self.tree,
            id,
        })
    }

    pub fn child_count(&self) -> usize {
        self.tree.data(self.id).children.len()
    }

    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        let id = *self.tree.data(self.id).children.get(index)?;
        Some(Node {
            tree: self.tree,
            id,
        })
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id.0)
            .field("kind", &self.kind())
            .field("range", &self.range())
            .finish()
    }
}

impl SyntaxNode for Node<'_> {
    fn kind(&self) -> &str {
        Node::kind(self)
    }

    fn range(&self) -> SourceRange {
        Node::range(self)
    }
}

/// Cursor over a [Tree], bounded to the node it starts on
#[derive(Debug, Clone)]
pub struct TreeCursor<'t> {
    tree: &'t Tree,
    current: NodeId,
    /// For every level above `current`: the parent and `current`'s index among its children
    ancestors: Vec<(NodeId, usize)>,
}

impl<'t> TreeCursor<'t> {
    pub fn new(start: Node<'t>) -> Self {
        Self {
            tree: start.tree,
            current: start.id,
            ancestors: Vec::new(),
        }
    }

    /// Depth of the current node relative to the starting node
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
}

impl<'t> Cursor for TreeCursor<'t> {
    type Node = Node<'t>;

    fn node(&self) -> Node<'t> {
        Node {
            tree: self.tree,
            id: self.current,
        }
    }

    fn goto_first_child(&mut self) -> bool {
        match self.tree.data(self.current).children.first() {
            Some(&child) => {
                self.ancestors.push((self.current, 0));
                self.current = child;
                true
            }
            None => false,
        }
    }

    fn goto_next_sibling(&mut self) -> bool {
        let Some((parent, index)) = self.ancestors.last_mut() else {
            return false;
        };
        match self.tree.data(*parent).children.get(*index + 1) {
            Some(&sibling) => {
                *index += 1;
                self.current = sibling;
                true
            }
            None => false,
        }
    }

    fn goto_parent(&mut self) -> bool {
        match self.ancestors.pop() {
            Some((parent, _)) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }
}

/// Depth-first builder for [Tree]
///
/// Misuse (closing a node that was never opened, starting a second root) is recorded and
/// reported by [TreeBuilder::finish].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
    error: Option<TreeBuildError>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_node(self, kind: impl Into<String>) -> Self {
        self.start_node_at(kind, SourceRange::default())
    }

    pub fn start_node_at(mut self, kind: impl Into<String>, range: SourceRange) -> Self {
        if let Some(id) = self.push(kind.into(), range) {
            self.open.push(id);
        }
        self
    }

    /// Add a node without children
    pub fn token(self, kind: impl Into<String>) -> Self {
        self.token_at(kind, SourceRange::default())
    }

    pub fn token_at(mut self, kind: impl Into<String>, range: SourceRange) -> Self {
        self.push(kind.into(), range);
        self
    }

    pub fn finish_node(mut self) -> Self {
        if self.open.pop().is_none() {
            self.fail(TreeBuildError::NoOpenNode);
        }
        self
    }

    pub fn finish(self) -> Result<Tree, TreeBuildError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.nodes.is_empty() {
            return Err(TreeBuildError::Empty);
        }
        if !self.open.is_empty() {
            return Err(TreeBuildError::Unclosed {
                open: self.open.len(),
            });
        }
        Ok(Tree { nodes: self.nodes })
    }

    fn push(&mut self, kind: String, range: SourceRange) -> Option<NodeId> {
        let parent = self.open.last().copied();
        if parent.is_none() && !self.nodes.is_empty() {
            self.fail(TreeBuildError::SecondRoot { kind });
            return None;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            range,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        Some(id)
    }

    fn fail(&mut self, error: TreeBuildError) {
        self.error.get_or_insert(error);
    }
}
