//! # nodeshape
//!
//! Typed access to syntax trees produced by an external parser engine.
//!
//! Two independent halves:
//!
//!   - Schema generation: given a grammar's rule graph, compute for every collection rule
//!     the set of node shapes (named symbols, literal tokens, patterns) that may appear among
//!     its children. The resulting [Schema] serializes to JSON for downstream code generators.
//!   - Tree walking: a non-recursive, document-order traversal of a realized tree that needs
//!     nothing but a three-move [Cursor](cursor::Cursor).
//!
//! File Layout
//!
//! src
//!   ├── grammar      Rule graph model and JSON loading
//!   ├── schema       Shape expansion and schema generation
//!   ├── cursor       The cursor contract
//!   ├── walk         Descendant iteration over a cursor
//!   ├── tree         In-memory arena tree implementing the cursor contract
//!   ├── formats      Text renderings of trees (treeviz)
//!   └── testing      Fixtures for tests
//!
//! For test fixtures and helpers, see the [testing module](testing).

pub mod cursor;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod range;
pub mod schema;
pub mod shape;
pub mod testing;
pub mod tree;
pub mod walk;

pub use cursor::{Cursor, Movement, SyntaxNode};
pub use error::{CursorContractViolation, SchemaError, SchemaResult, TreeBuildError, Violation};
pub use grammar::{Grammar, Precedence, Rule};
pub use range::{SourceLocation, SourcePosition, SourceRange};
pub use schema::{
    generate_schema, Schema, SchemaGenerator, SchemaOptions, MAX_EXPANSION_DEPTH,
};
pub use shape::Shape;
pub use tree::{Node, NodeId, Tree, TreeBuilder, TreeCursor};
pub use walk::{try_walk, walk, walk_all, CheckedDescendants, Descendants};
